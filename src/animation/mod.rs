//! Keyframe Animation
//!
//! - [`AnimationClip`] / [`KeyframeTrack`]: keyframe data bound to nodes by name
//! - [`AnimationAction`]: play-head of one clip on one model
//! - [`AnimationMixer`]: per-model playback controller
//! - [`AnimationRegistry`]: mixers and clip sets keyed by model root
//! - [`AnimationScheduler`]: procedural callbacks plus the registry, ticked together

pub mod action;
pub mod binder;
pub mod binding;
pub mod clip;
pub mod mixer;
pub mod registry;
pub mod scheduler;
pub mod tracks;
pub mod values;

pub use action::{AnimationAction, LoopMode};
pub use binder::Binder;
pub use binding::{PropertyBinding, TargetPath};
pub use clip::{AnimationClip, Track, TrackData, TrackMeta};
pub use mixer::AnimationMixer;
pub use registry::AnimationRegistry;
pub use scheduler::{AnimationCallback, AnimationScheduler, CallbackId};
pub use tracks::{InterpolationMode, KeyframeCursor, KeyframeTrack};
pub use values::Interpolatable;

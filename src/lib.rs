#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod animation;
pub mod camera;
pub mod config;
pub mod errors;
pub mod math;
pub mod scene;
pub mod stage;
pub mod time;
pub mod tween;

pub use animation::{AnimationAction, AnimationClip, AnimationMixer, AnimationRegistry, AnimationScheduler, Binder, LoopMode};
pub use camera::{Camera, CameraMotion, CameraPose, CameraRig, OrbitControls, Waypoint};
pub use config::StageConfig;
pub use errors::{Result, StageError};
pub use math::{BoundingBox, Bounds};
pub use scene::{Node, NodeHandle, Scene, Transform};
pub use stage::Stage;
pub use time::FrameClock;
pub use tween::{Ease, Repeat, Timeline, Tween, TweenDriver, TweenHandle, TweenTarget};

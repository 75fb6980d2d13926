//! Interpolation driver
//!
//! Time-based tweens of target positions with easing, repeat, per-tick and
//! completion callbacks, plus sequential timelines:
//!
//! - [`Tween`]: one interpolation (destination or curve, duration, ease)
//! - [`Timeline`]: tweens played strictly in order
//! - [`TweenDriver`]: owns in-flight entries, advanced once per frame
//! - [`Curve`]: arc-length parameterized paths for `Motion::Along`

pub mod curve;
pub mod driver;
pub mod easing;
#[allow(clippy::module_inception)]
pub mod tween;

pub use curve::{CatmullRomCurve, Curve, LinePath};
pub use driver::{TweenDriver, TweenHandle, TweenSink};
pub use easing::Ease;
pub use tween::{Motion, Repeat, TargetKey, Timeline, Tween, TweenTarget};

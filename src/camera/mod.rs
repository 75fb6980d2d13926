//! Stage camera
//!
//! - [`Camera`]: perspective projection parameters and matrices
//! - [`CameraRig`]: camera pose plus its single transition slot
//! - [`framing`]: placement math for fitting subtree bounds into view
//! - [`OrbitControls`]: user orbit/pan/zoom, suspended during transitions

pub mod framing;
pub mod orbit;
pub mod projection;
pub mod rig;

pub use framing::{FramingPlan, FramingSettings, frame_bounds, reframe_bounds};
pub use orbit::OrbitControls;
pub use projection::Camera;
pub use rig::{CameraMotion, CameraPose, CameraRig, GlideSettings, Waypoint};

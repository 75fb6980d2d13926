//! Camera placement from subtree bounds.
//!
//! Two deliberately different placements:
//! - [`frame_bounds`]: initial auto-framing, distance from the box diagonal
//!   and the field of view, raised for flat objects.
//! - [`reframe_bounds`]: re-centering after a selection, distance from the
//!   largest axis, elevated 45 degree offset.

use glam::Vec3;

use crate::math::Bounds;

/// Smallest extent used for distance math, so degenerate boxes never divide by zero.
pub const MIN_FRAMING_EXTENT: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramingSettings {
    /// Multiplier on the fitted distance so the subject does not touch the viewport edges.
    pub padding: f32,
    /// `size.y < threshold * min(size.x, size.z)` classifies a box as flat.
    pub flatness_threshold: f32,
}

impl Default for FramingSettings {
    fn default() -> Self {
        Self {
            padding: 1.2,
            flatness_threshold: 0.1,
        }
    }
}

/// Where the camera should go and what it should look at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramingPlan {
    pub position: Vec3,
    pub look_at: Vec3,
    pub distance: f32,
    pub flat: bool,
}

#[inline]
#[must_use]
pub fn is_flat(size: Vec3, threshold: f32) -> bool {
    size.y < size.x.min(size.z) * threshold
}

/// Fits the bounds' diagonal into the vertical field of view (`fov` in radians).
///
/// The camera is placed relative to the bounds center: `distance` in front
/// of it along +Z (`center.z + distance`), raised by `distance / 2` for flat
/// objects.
#[must_use]
pub fn frame_bounds(bounds: &Bounds, fov: f32, settings: &FramingSettings) -> FramingPlan {
    let max_dim = bounds.size.length().max(MIN_FRAMING_EXTENT);
    let distance = max_dim / (2.0 * (fov / 2.0).tan()) * settings.padding;

    let flat = is_flat(bounds.size, settings.flatness_threshold);
    let center = bounds.center;
    let height = if flat { center.y + distance * 0.5 } else { center.y };

    FramingPlan {
        position: Vec3::new(center.x, height, center.z + distance),
        look_at: center,
        distance,
        flat,
    }
}

/// Elevated placement at `center + (0, d, d)` with `d` from the largest axis.
#[must_use]
pub fn reframe_bounds(bounds: &Bounds, settings: &FramingSettings) -> FramingPlan {
    let max_axis = bounds.size.max_element().max(MIN_FRAMING_EXTENT);
    let distance = max_axis * settings.padding;

    FramingPlan {
        position: bounds.center + Vec3::new(0.0, distance, distance),
        look_at: bounds.center,
        distance,
        flat: false,
    }
}

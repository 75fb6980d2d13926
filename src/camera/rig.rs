//! The stage camera and its transition state.
//!
//! A [`CameraRig`] has exactly one [`CameraMotion`] slot. Every way of moving
//! the camera (the idle glide, driver tweens, path sequences) goes through
//! that slot, so two transitions can never write the camera in the same
//! frame.

use glam::Vec3;

use crate::camera::projection::Camera;
use crate::scene::Transform;
use crate::tween::TweenHandle;

/// Snapshot of the camera's pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    /// Look-at point.
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov: f32,
}

/// A position/look-at pair visited by a camera path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl Waypoint {
    #[must_use]
    pub fn new(position: Vec3, look_at: Vec3) -> Self {
        Self { position, look_at }
    }
}

/// Which mechanism currently owns the camera position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraMotion {
    Idle,
    /// Rate-based lerp towards `target`, looking at the origin.
    Gliding { target: Vec3, elapsed: f32 },
    /// A driver tween or timeline is writing the position.
    Tweening { handle: TweenHandle, destination: Vec3 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlideSettings {
    /// Lerp factor per second.
    pub rate: f32,
    /// Snap distance.
    pub epsilon: f32,
    /// Seconds after which a glide that has not converged snaps to its target.
    pub timeout: f32,
}

impl Default for GlideSettings {
    fn default() -> Self {
        Self {
            rate: 2.0,
            epsilon: 0.01,
            timeout: 10.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CameraRig {
    pub camera: Camera,
    pub transform: Transform,
    look_target: Vec3,
    motion: CameraMotion,
    glide: GlideSettings,
}

impl CameraRig {
    #[must_use]
    pub fn new(camera: Camera, position: Vec3, glide: GlideSettings) -> Self {
        let mut rig = Self {
            camera,
            transform: Transform::from_position(position),
            look_target: Vec3::ZERO,
            motion: CameraMotion::Idle,
            glide,
        };
        rig.look_at(Vec3::ZERO);
        rig
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Last point the camera was turned towards.
    #[inline]
    #[must_use]
    pub fn look_target(&self) -> Vec3 {
        self.look_target
    }

    #[inline]
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.transform.forward()
    }

    #[must_use]
    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.transform.position,
            target: self.look_target,
            fov: self.camera.fov,
        }
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
        self.refresh_view();
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.transform.look_at(target, Vec3::Y);
        self.look_target = target;
        self.refresh_view();
    }

    /// Tween write: move, then face `look_at`.
    pub(crate) fn apply_tween_value(&mut self, position: Vec3, look_at: Vec3) {
        self.transform.position = position;
        self.look_at(look_at);
    }

    /// Orbit controls wrote `transform` directly; adopt their center.
    pub(crate) fn adopt_orbit_pose(&mut self, center: Vec3) {
        self.look_target = center;
        self.refresh_view();
    }

    fn refresh_view(&mut self) {
        self.transform.update_local_matrix();
        let local = *self.transform.local_matrix();
        self.transform.set_world_matrix(local);
        self.camera.update_view_projection(&local);
    }

    #[inline]
    #[must_use]
    pub fn motion(&self) -> CameraMotion {
        self.motion
    }

    /// True while any transition owns the camera.
    #[inline]
    #[must_use]
    pub fn is_animating(&self) -> bool {
        !matches!(self.motion, CameraMotion::Idle)
    }

    /// Destination of the in-flight transition. `None` when idle.
    #[must_use]
    pub fn target_position(&self) -> Option<Vec3> {
        match self.motion {
            CameraMotion::Idle => None,
            CameraMotion::Gliding { target, .. } => Some(target),
            CameraMotion::Tweening { destination, .. } => Some(destination),
        }
    }

    /// Handle of the tween owning the camera, if any.
    #[must_use]
    pub fn tween_handle(&self) -> Option<TweenHandle> {
        match self.motion {
            CameraMotion::Tweening { handle, .. } => Some(handle),
            _ => None,
        }
    }

    /// Hands the camera to a driver tween. The caller cancels any previous
    /// tween returned by [`tween_handle`](Self::tween_handle).
    pub fn begin_tween(&mut self, handle: TweenHandle, destination: Vec3) {
        self.motion = CameraMotion::Tweening { handle, destination };
    }

    /// Starts the rate-based glide. The caller cancels any previous tween.
    pub fn begin_glide(&mut self, target: Vec3) {
        self.motion = CameraMotion::Gliding { target, elapsed: 0.0 };
    }

    /// Returns the camera to idle, keeping its current pose.
    pub fn halt(&mut self) {
        self.motion = CameraMotion::Idle;
    }

    /// Releases the slot if the owning tween is gone (completed, cancelled
    /// or lost its target).
    pub fn release_finished_tween(&mut self, is_active: impl Fn(TweenHandle) -> bool) {
        if let CameraMotion::Tweening { handle, .. } = self.motion
            && !is_active(handle)
        {
            self.motion = CameraMotion::Idle;
        }
    }

    /// Advances the glide by `dt` seconds.
    ///
    /// Lerps by `dt * rate` (clamped to 1, so it never overshoots), snaps
    /// exactly once within `epsilon`, and looks at the world origin while
    /// gliding.
    pub fn update(&mut self, dt: f32) {
        let CameraMotion::Gliding { target, elapsed } = &mut self.motion else {
            return;
        };
        let target = *target;
        *elapsed += dt.max(0.0);
        let timed_out = *elapsed >= self.glide.timeout;

        let alpha = (dt * self.glide.rate).clamp(0.0, 1.0);
        let position = self.transform.position.lerp(target, alpha);
        self.transform.position = position;

        let remaining = position.distance(target);
        if remaining < self.glide.epsilon || timed_out {
            if remaining >= self.glide.epsilon {
                log::warn!("Camera glide timed out {remaining:.3} units from target, snapping");
            }
            self.transform.position = target;
            self.motion = CameraMotion::Idle;
        }

        self.look_at(Vec3::ZERO);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig() -> CameraRig {
        let camera = Camera::new_perspective(75.0, 1.0, 0.1, 100.0);
        CameraRig::new(camera, Vec3::new(0.0, 0.0, 5.0), GlideSettings::default())
    }

    #[test]
    fn glide_never_overshoots_and_snaps() {
        let mut rig = rig();
        let target = Vec3::new(4.0, 0.0, 5.0);
        rig.begin_glide(target);

        rig.update(10.0);
        assert_eq!(rig.position(), target);
        assert_eq!(rig.motion(), CameraMotion::Idle);
    }

    #[test]
    fn glide_times_out() {
        let glide = GlideSettings {
            rate: 0.01,
            timeout: 1.0,
            ..GlideSettings::default()
        };
        let mut rig = CameraRig::new(Camera::new_perspective(75.0, 1.0, 0.1, 100.0), Vec3::ZERO, glide);
        let target = Vec3::new(100.0, 0.0, 0.0);
        rig.begin_glide(target);

        rig.update(0.5);
        assert!(rig.is_animating());
        rig.update(0.5);
        assert_eq!(rig.position(), target);
        assert!(!rig.is_animating());
    }

    #[test]
    fn tween_slot_is_released_when_handle_dies() {
        let mut rig = rig();
        rig.begin_tween(TweenHandle::default(), Vec3::ONE);
        rig.release_finished_tween(|_| true);
        assert!(rig.tween_handle().is_some());

        rig.release_finished_tween(|_| false);
        assert_eq!(rig.motion(), CameraMotion::Idle);
    }
}

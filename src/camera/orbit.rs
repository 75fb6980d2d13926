use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Vec2, Vec3};

use crate::scene::transform::Transform;

const PHI_EPS: f32 = 0.0001;

/// Pointer input accumulated between two control updates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrbitInput {
    /// Pixels dragged with the rotate button.
    pub rotate: Vec2,
    /// Pixels dragged with the pan button.
    pub pan: Vec2,
    /// Scroll steps, positive zooms in.
    pub zoom: f32,
}

/// Orbit camera controls around a center point.
///
/// Spherical state (`radius`, `theta`, `phi`) drives the camera position.
/// While a camera transition owns the pose the controls are marked stale and
/// re-derive their state from the camera the next time they run.
pub struct OrbitControls {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub damping_factor: f32,
    pub enable_damping: bool,
    pub min_distance: f32,
    pub max_distance: f32,
    pub viewport_height: f32,

    pub center: Vec3,
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,

    input: OrbitInput,
    rotate_delta: Vec2,
    stale: bool,
}

impl OrbitControls {
    #[must_use]
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            rotate_speed: 1.0,
            zoom_speed: 0.05,
            pan_speed: 1.0,
            damping_factor: 0.05,
            enable_damping: true,
            min_distance: 1.0,
            max_distance: 1000.0,
            viewport_height: 720.0,

            center,
            radius,
            theta: 0.0,
            phi: FRAC_PI_2,

            input: OrbitInput::default(),
            rotate_delta: Vec2::ZERO,
            stale: false,
        }
    }

    pub fn rotate_by(&mut self, pixels: Vec2) {
        self.input.rotate += pixels;
    }

    pub fn pan_by(&mut self, pixels: Vec2) {
        self.input.pan += pixels;
    }

    pub fn zoom_by(&mut self, steps: f32) {
        self.input.zoom += steps;
    }

    /// The camera was moved by something else; re-sync before the next update.
    pub fn mark_stale(&mut self) {
        self.stale = true;
        self.input = OrbitInput::default();
        self.rotate_delta = Vec2::ZERO;
    }

    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Derives the spherical state from a camera position and its look-at point.
    ///
    /// The radius is taken as is, even outside `min_distance..=max_distance`;
    /// those limits only bound zoom input.
    pub fn sync_from(&mut self, position: Vec3, target: Vec3) {
        let offset = position - target;
        self.center = target;
        self.radius = offset.length();
        if offset.length_squared() > 1e-12 {
            self.theta = offset.x.atan2(offset.z);
            self.phi = (offset.y / offset.length()).clamp(-1.0, 1.0).acos();
        }
        self.phi = self.phi.clamp(PHI_EPS, PI - PHI_EPS);
        self.stale = false;
    }

    /// Consumes pending input and writes the orbit pose into `transform`.
    pub fn update(&mut self, transform: &mut Transform, fov: f32, dt: f32) {
        let screen_height = self.viewport_height.max(1.0);
        let input = std::mem::take(&mut self.input);

        let rotate_per_pixel = 2.0 * PI / screen_height;
        self.rotate_delta -= input.rotate * rotate_per_pixel * self.rotate_speed;

        if self.enable_damping {
            let target_fps = 60.0;
            let retention = (1.0 - self.damping_factor).powf(dt * target_fps);
            let delta_apply = self.rotate_delta * (1.0 - retention);

            self.theta += delta_apply.x;
            self.phi += delta_apply.y;
            self.rotate_delta *= retention;
        } else {
            self.theta += self.rotate_delta.x;
            self.phi += self.rotate_delta.y;
            self.rotate_delta = Vec2::ZERO;
        }

        self.phi = self.phi.clamp(PHI_EPS, PI - PHI_EPS);

        if input.zoom != 0.0 {
            let scale = (1.0 - self.zoom_speed).powf(input.zoom.abs());
            // Zoom never pushes an out-of-range radius further out of range,
            // nor snaps it across the limit it is already beyond.
            if input.zoom > 0.0 {
                self.radius = (self.radius * scale).max(self.min_distance.min(self.radius));
            } else {
                self.radius = (self.radius / scale).min(self.max_distance.max(self.radius));
            }
        }

        let direction = self.direction();

        if input.pan != Vec2::ZERO {
            let target_world_height = 2.0 * self.radius * (fov / 2.0).tan();
            let pixels_to_world_ratio = target_world_height / screen_height;

            let forward = -direction;
            let right = forward.cross(Vec3::Y).normalize();
            let up = right.cross(forward).normalize();

            self.center += (right * -input.pan.x + up * input.pan.y) * pixels_to_world_ratio * self.pan_speed;
        }

        transform.position = self.center + direction * self.radius;
        transform.look_at(self.center, Vec3::Y);
    }

    fn direction(&self) -> Vec3 {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        Vec3::new(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_round_trip() {
        let mut controls = OrbitControls::new(Vec3::ZERO, 5.0);
        controls.enable_damping = false;
        let position = Vec3::new(3.0, 4.0, 5.0);
        let target = Vec3::new(1.0, 0.0, 0.0);
        controls.sync_from(position, target);

        let mut transform = Transform::new();
        controls.update(&mut transform, 1.0, 0.016);
        assert!(transform.position.distance(position) < 1e-4);
    }

    #[test]
    fn test_zoom_in_shrinks_radius() {
        let mut controls = OrbitControls::new(Vec3::ZERO, 10.0);
        controls.zoom_by(1.0);
        let mut transform = Transform::new();
        controls.update(&mut transform, 1.0, 0.016);
        assert!(controls.radius < 10.0);
        assert!((transform.position.length() - controls.radius).abs() < 1e-4);
    }

    #[test]
    fn test_mark_stale_drops_pending_input() {
        let mut controls = OrbitControls::new(Vec3::ZERO, 10.0);
        controls.zoom_by(3.0);
        controls.mark_stale();
        assert!(controls.is_stale());
        controls.sync_from(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        let mut transform = Transform::new();
        controls.update(&mut transform, 1.0, 0.016);
        assert!((controls.radius - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_sync_keeps_radius_outside_zoom_limits() {
        let mut controls = OrbitControls::new(Vec3::ZERO, 5.0);
        controls.enable_damping = false;
        let near = Vec3::new(0.0, 0.1, 0.25);
        controls.sync_from(near, Vec3::ZERO);
        assert!((controls.radius - near.length()).abs() < 1e-6);

        let mut transform = Transform::new();
        controls.update(&mut transform, 1.0, 0.016);
        assert!(transform.position.distance(near) < 1e-5);

        controls.sync_from(Vec3::new(0.0, 0.0, 2500.0), Vec3::ZERO);
        controls.update(&mut transform, 1.0, 0.016);
        assert!((transform.position.z - 2500.0).abs() < 1e-2);
    }

    #[test]
    fn test_zoom_from_out_of_range_radius() {
        let mut controls = OrbitControls::new(Vec3::ZERO, 0.5);
        let mut transform = Transform::new();

        controls.zoom_by(1.0);
        controls.update(&mut transform, 1.0, 0.016);
        assert!((controls.radius - 0.5).abs() < 1e-6);

        controls.zoom_by(-1.0);
        controls.update(&mut transform, 1.0, 0.016);
        assert!(controls.radius > 0.5 && controls.radius < controls.min_distance);

        controls.radius = 2000.0;
        controls.zoom_by(-1.0);
        controls.update(&mut transform, 1.0, 0.016);
        assert!((controls.radius - 2000.0).abs() < 1e-3);
        controls.zoom_by(1.0);
        controls.update(&mut transform, 1.0, 0.016);
        assert!(controls.radius < 2000.0);
    }
}

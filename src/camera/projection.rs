use glam::{Affine3A, Mat4, Vec3};

/// Perspective projection parameters of the stage camera.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Vertical field of view in radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,

    pub(crate) view_matrix: Mat4,
    pub(crate) projection_matrix: Mat4,
    pub(crate) view_projection_matrix: Mat4,
}

impl Camera {
    /// `fov_degrees` is converted to radians on construction.
    #[must_use]
    pub fn new_perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut cam = Self {
            fov: fov_degrees.to_radians(),
            aspect,
            near,
            far,
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            view_projection_matrix: Mat4::IDENTITY,
        };
        cam.update_projection_matrix();
        cam
    }

    pub fn update_projection_matrix(&mut self) {
        self.projection_matrix = Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far);
        self.view_projection_matrix = self.projection_matrix * self.view_matrix;
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
            self.update_projection_matrix();
        } else {
            log::warn!("Ignoring invalid camera aspect ratio {aspect}");
        }
    }

    /// View = inverse of the camera's world transform.
    pub fn update_view_projection(&mut self, world_transform: &Affine3A) {
        self.view_matrix = Mat4::from(world_transform.inverse());
        self.view_projection_matrix = self.projection_matrix * self.view_matrix;
    }

    #[must_use]
    pub fn view_matrix(&self) -> &Mat4 {
        &self.view_matrix
    }

    #[must_use]
    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    #[must_use]
    pub fn view_projection_matrix(&self) -> &Mat4 {
        &self.view_projection_matrix
    }

    /// Projects a world point to normalized device coordinates.
    #[must_use]
    pub fn project(&self, point: Vec3) -> Vec3 {
        self.view_projection_matrix.project_point3(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn test_project_center_and_side() {
        let mut camera = Camera::new_perspective(90.0, 1.0, 0.1, 100.0);
        let world = Affine3A::from_rotation_translation(Quat::IDENTITY, Vec3::new(0.0, 0.0, 5.0));
        camera.update_view_projection(&world);

        let center = camera.project(Vec3::ZERO);
        assert!(center.x.abs() < 1e-6 && center.y.abs() < 1e-6);
        assert!(center.z > 0.0 && center.z < 1.0);

        // 90 degree fov: a point as far right as it is deep lands on the edge
        let edge = camera.project(Vec3::new(5.0, 0.0, 0.0));
        assert!((edge.x - 1.0).abs() < 1e-5);

        let behind_far = camera.project(Vec3::new(0.0, 0.0, -200.0));
        assert!(behind_far.z > 1.0);
    }
}

use glam::{Mat4, Vec3};

/// Perspective camera looking from `position` at `target`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view, degrees.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub const HOME_POSITION: Vec3 = Vec3::new(0.0, 0.0, 5.0);
    pub const HOME_TARGET: Vec3 = Vec3::ZERO;

    pub fn new(aspect: f32) -> Self {
        Self {
            position: Self::HOME_POSITION,
            target: Self::HOME_TARGET,
            fov: 60.0,
            aspect,
            near: 0.1,
            far: 100.0,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// Projection into wgpu clip space (depth 0..1).
    pub fn projection_matrix(&self) -> Mat4 {
        let aspect = if self.aspect.is_finite() && self.aspect > 0.0 { self.aspect } else { 1.0 };
        Mat4::perspective_rh(self.fov.to_radians(), aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Moves the camera back to its starting pose.
    pub fn reset(&mut self) {
        self.position = Self::HOME_POSITION;
        self.target = Self::HOME_TARGET;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(1.0)
    }
}

use glam::{Mat4, Quat, Vec3};

/// Object placement: translation, rotation, scale.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Radians per second the demo object turns about +Y.
    pub const SPIN_RATE: f32 = 1.0;

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Rotates about a local axis by `angle` radians.
    pub fn rotate_local(&mut self, axis: Vec3, angle: f32) {
        self.rotation = (self.rotation * Quat::from_axis_angle(axis, angle)).normalize();
    }

    pub fn spin(&mut self, dt: f32) {
        self.rotate_local(Vec3::Y, Self::SPIN_RATE * dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn identity_by_default() {
        assert_eq!(Transform::default().model_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn spin_turns_about_y_at_one_radian_per_second() {
        let mut t = Transform::default();
        t.spin(FRAC_PI_2);
        let x = t.model_matrix().transform_vector3(Vec3::X);
        assert!((x - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn spin_accumulates() {
        let mut a = Transform::default();
        let mut b = Transform::default();
        a.spin(0.25);
        a.spin(0.25);
        b.spin(0.5);
        assert!(a.rotation.abs_diff_eq(b.rotation, 1e-5));
    }
}

use glam::Vec3;

use crate::input::{InputFrame, InputState, Key, MouseButton};

use super::camera::Camera;

/// Fly camera driven by WASD/QE with right-mouse look and wheel dolly.
///
/// Yaw and pitch are in degrees; yaw 0 / pitch 0 looks down -Z.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraController {
    pub yaw: f32,
    pub pitch: f32,
    /// World units per second.
    pub move_speed: f32,
    pub sprint_multiplier: f32,
    /// Degrees per logical pixel of pointer motion.
    pub mouse_sensitivity: f32,
    /// World units per wheel line.
    pub dolly_step: f32,
}

impl Default for CameraController {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            move_speed: 5.0,
            sprint_multiplier: 2.0,
            mouse_sensitivity: 0.1,
            dolly_step: 0.5,
        }
    }
}

impl CameraController {
    const PITCH_LIMIT: f32 = 89.0;

    pub fn forward(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        Vec3::new(pitch.cos() * yaw.sin(), pitch.sin(), -pitch.cos() * yaw.cos())
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.mouse_sensitivity;
        self.pitch = (self.pitch - dy * self.mouse_sensitivity)
            .clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
    }

    /// Applies this frame's input to `camera`.
    ///
    /// The wheel dollies along the view direction at any time; look and
    /// movement need the right mouse button held.
    pub fn update(&mut self, camera: &mut Camera, input: &InputState, frame: &InputFrame, dt: f32) {
        if frame.wheel_lines != 0.0 {
            let forward = self.forward();
            camera.position += forward * frame.wheel_lines * self.dolly_step;
            camera.target = camera.position + forward;
        }

        if !input.button_down(MouseButton::Right) {
            return;
        }

        let (dx, dy) = frame.pointer_delta;
        self.rotate(dx, dy);

        let forward = self.forward();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward).normalize_or_zero();

        let axis = |pos: Key, neg: Key| -> f32 {
            (input.key_down(pos) as i32 - input.key_down(neg) as i32) as f32
        };
        let wish = forward * axis(Key::W, Key::S) + right * axis(Key::D, Key::A) + up * axis(Key::E, Key::Q);

        let mut speed = self.move_speed;
        if input.key_down(Key::Shift) {
            speed *= self.sprint_multiplier;
        }

        camera.position += wish.normalize_or_zero() * speed * dt.max(0.0);
        camera.target = camera.position + forward;
    }

    /// Returns camera and controller to the starting pose.
    pub fn reset(&mut self, camera: &mut Camera) {
        camera.reset();
        self.yaw = 0.0;
        self.pitch = 0.0;
    }
}

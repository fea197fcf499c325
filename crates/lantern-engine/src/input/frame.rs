use std::collections::HashSet;

use super::types::Key;

/// What happened during one frame. Cleared by the runtime after every
/// `on_frame`; [`InputState`](super::InputState) carries what is held.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Keys that went down this frame, key repeat included.
    pub keys_pressed: HashSet<Key>,
    /// Pointer motion, logical pixels.
    pub pointer_delta: (f32, f32),
    /// Scroll, in lines.
    pub wheel_lines: f32,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.keys_pressed.clear();
        self.pointer_delta = (0.0, 0.0);
        self.wheel_lines = 0.0;
    }

    #[inline]
    pub fn pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }
}

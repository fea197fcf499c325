use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{ButtonState, InputEvent, Key, Modifiers, MouseButton};

/// Held keys and buttons plus the pointer position.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,
    /// Logical pixels; `None` outside the window.
    pub pointer_pos: Option<(f32, f32)>,
    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Folds `ev` into the held state and records its per-frame part in `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match ev {
            InputEvent::ModifiersChanged(m) => self.modifiers = m,

            InputEvent::Focused(focused) => {
                if !focused {
                    // Releases go to the newly focused window.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                    self.modifiers = Modifiers::default();
                }
            }

            InputEvent::PointerMoved { x, y } => {
                if let Some((px, py)) = self.pointer_pos {
                    frame.pointer_delta.0 += x - px;
                    frame.pointer_delta.1 += y - py;
                }
                self.pointer_pos = Some((x, y));
            }

            InputEvent::PointerLeft => self.pointer_pos = None,

            InputEvent::Key { key, state: ButtonState::Pressed, repeat } => {
                if self.keys_down.insert(key) || repeat {
                    frame.keys_pressed.insert(key);
                }
            }
            InputEvent::Key { key, state: ButtonState::Released, .. } => {
                self.keys_down.remove(&key);
            }

            InputEvent::PointerButton { button, state: ButtonState::Pressed } => {
                self.buttons_down.insert(button);
            }
            InputEvent::PointerButton { button, state: ButtonState::Released } => {
                self.buttons_down.remove(&button);
            }

            InputEvent::Wheel(lines) => frame.wheel_lines += lines,
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: ButtonState, repeat: bool) -> InputEvent {
        InputEvent::Key { key, state, repeat }
    }

    #[test]
    fn press_is_recorded_once_and_release_lifts_the_key() {
        let mut st = InputState::default();
        let mut fr = InputFrame::default();

        st.apply_event(&mut fr, key(Key::W, ButtonState::Pressed, false));
        assert!(st.key_down(Key::W));
        assert!(fr.pressed(Key::W));

        fr.clear();
        st.apply_event(&mut fr, key(Key::W, ButtonState::Pressed, false));
        assert!(!fr.pressed(Key::W));

        st.apply_event(&mut fr, key(Key::W, ButtonState::Released, false));
        assert!(!st.key_down(Key::W));
    }

    #[test]
    fn key_repeat_counts_as_a_press() {
        let mut st = InputState::default();
        let mut fr = InputFrame::default();
        st.apply_event(&mut fr, key(Key::ArrowRight, ButtonState::Pressed, false));
        fr.clear();
        st.apply_event(&mut fr, key(Key::ArrowRight, ButtonState::Pressed, true));
        assert!(fr.pressed(Key::ArrowRight));
    }

    #[test]
    fn pointer_delta_accumulates_from_second_sample() {
        let mut st = InputState::default();
        let mut fr = InputFrame::default();
        st.apply_event(&mut fr, InputEvent::PointerMoved { x: 10.0, y: 10.0 });
        assert_eq!(fr.pointer_delta, (0.0, 0.0));
        st.apply_event(&mut fr, InputEvent::PointerMoved { x: 13.0, y: 8.0 });
        st.apply_event(&mut fr, InputEvent::PointerMoved { x: 15.0, y: 8.0 });
        assert_eq!(fr.pointer_delta, (5.0, -2.0));
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut st = InputState::default();
        let mut fr = InputFrame::default();
        st.apply_event(&mut fr, key(Key::Shift, ButtonState::Pressed, false));
        st.apply_event(&mut fr, InputEvent::PointerButton { button: MouseButton::Right, state: ButtonState::Pressed });
        st.apply_event(&mut fr, InputEvent::Focused(false));
        assert!(st.keys_down.is_empty());
        assert!(!st.button_down(MouseButton::Right));
    }

    #[test]
    fn wheel_lines_add_up_within_a_frame() {
        let mut st = InputState::default();
        let mut fr = InputFrame::default();
        st.apply_event(&mut fr, InputEvent::Wheel(1.0));
        st.apply_event(&mut fr, InputEvent::Wheel(0.5));
        assert_eq!(fr.wheel_lines, 1.5);
        fr.clear();
        assert_eq!(fr.wheel_lines, 0.0);
    }
}

/// Keys the demos bind. Everything else arrives as `Unknown` with the
/// platform key code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Tab,
    Shift,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    // Fly camera.
    W, A, S, D, Q, E,

    // Panel shortcuts.
    P, R, V,
    Digit1, Digit2, Digit3, Digit4, Digit5, Digit6,
    F1, F2, F3, F4,

    Unknown(u32),
}

impl Key {
    /// List position `1..=6` of a digit key.
    pub fn digit(self) -> Option<u8> {
        match self {
            Key::Digit1 => Some(1),
            Key::Digit2 => Some(2),
            Key::Digit3 => Some(3),
            Key::Digit4 => Some(4),
            Key::Digit5 => Some(5),
            Key::Digit6 => Some(6),
            _ => None,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Press or release of a key or mouse button.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ButtonState {
    Pressed,
    Released,
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

/// Window input, already converted to logical pixels and wheel lines.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    ModifiersChanged(Modifiers),
    Key { key: Key, state: ButtonState, repeat: bool },
    PointerMoved { x: f32, y: f32 },
    PointerButton { button: MouseButton, state: ButtonState },
    /// Vertical scroll, in lines; positive scrolls away from the user.
    Wheel(f32),
    PointerLeft,
    Focused(bool),
}

impl InputEvent {
    /// Button presses and scrolling, which a UI window under the pointer
    /// takes for itself. Key events are never claimed.
    pub fn claimable_by_ui(&self) -> bool {
        matches!(
            self,
            InputEvent::PointerButton { state: ButtonState::Pressed, .. } | InputEvent::Wheel(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ui_claims_pointer_presses_and_wheel_only() {
        assert!(InputEvent::PointerButton { button: MouseButton::Left, state: ButtonState::Pressed }.claimable_by_ui());
        assert!(InputEvent::Wheel(1.0).claimable_by_ui());
        assert!(!InputEvent::PointerButton { button: MouseButton::Left, state: ButtonState::Released }.claimable_by_ui());
        assert!(!InputEvent::Key { key: Key::Tab, state: ButtonState::Pressed, repeat: false }.claimable_by_ui());
        assert!(!InputEvent::PointerMoved { x: 1.0, y: 1.0 }.claimable_by_ui());
    }

    #[test]
    fn digits_map_to_list_positions() {
        assert_eq!(Key::Digit1.digit(), Some(1));
        assert_eq!(Key::Digit6.digit(), Some(6));
        assert_eq!(Key::F1.digit(), None);
    }
}

use crate::input::{InputFrame, InputState, Key};
use crate::post::{EffectKind, ParamSlot};
use crate::scene::MaterialField;

use super::Controls;

/// Which control groups a demo exposes.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PanelConfig {
    pub effects: bool,
    pub material: bool,
    pub palette: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self { effects: false, material: true, palette: false }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Focus {
    EffectParam,
    Material(MaterialField),
}

/// Outcome of one frame of control input.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct PanelResponse {
    /// Some control value changed.
    pub changed: bool,
    pub reset_camera: bool,
    pub toggle_preview: bool,
    pub exit: bool,
}

impl std::ops::BitOr for PanelResponse {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            changed: self.changed | rhs.changed,
            reset_camera: self.reset_camera | rhs.reset_camera,
            toggle_preview: self.toggle_preview | rhs.toggle_preview,
            exit: self.exit | rhs.exit,
        }
    }
}

/// Settings panel: an egui window (see [`show`](Self::show)) plus keyboard
/// shortcuts.
///
/// - `Tab` / `Shift+Tab` cycle the effect, `1`..`6` pick one by list position
/// - `Up` / `Down` choose the focused parameter component
/// - `F1`..`F4` focus ambient, diffuse, specular, shininess
/// - `Left` / `Right` adjust the focused value (x10 with `Shift`)
/// - `P` next palette, `R` reset camera, `V` show or hide the framebuffer image, `Escape` quit
#[derive(Debug, Clone)]
pub struct ControlPanel {
    config: PanelConfig,
    focus: Focus,
    slot: usize,
}

impl ControlPanel {
    pub fn new(config: PanelConfig) -> Self {
        let focus = if config.effects {
            Focus::EffectParam
        } else {
            Focus::Material(MaterialField::Ambient)
        };
        Self { config, focus, slot: 0 }
    }

    pub fn config(&self) -> PanelConfig {
        self.config
    }

    /// Focused effect parameter component, if the active effect has any.
    pub fn focused_slot(&self, controls: &Controls) -> Option<ParamSlot> {
        if self.focus != Focus::EffectParam {
            return None;
        }
        let slots = controls.effects.active_kind().param_slots();
        slots.get(self.slot.min(slots.len().saturating_sub(1))).copied()
    }

    pub fn handle(&mut self, input: &InputState, frame: &InputFrame, controls: &mut Controls) -> PanelResponse {
        let mut resp = PanelResponse {
            reset_camera: frame.pressed(Key::R),
            toggle_preview: frame.pressed(Key::V),
            exit: frame.pressed(Key::Escape),
            ..Default::default()
        };

        if self.config.effects {
            resp.changed |= self.handle_effect_selection(input, frame, controls);
        }

        if self.config.material {
            for (key, field) in [
                (Key::F1, MaterialField::Ambient),
                (Key::F2, MaterialField::Diffuse),
                (Key::F3, MaterialField::Specular),
                (Key::F4, MaterialField::Shininess),
            ] {
                if frame.pressed(key) {
                    self.focus = Focus::Material(field);
                }
            }
        }

        if self.config.effects && (frame.pressed(Key::ArrowUp) || frame.pressed(Key::ArrowDown)) {
            let count = controls.effects.active_kind().param_slots().len();
            if count > 0 {
                let cur = if self.focus == Focus::EffectParam { self.slot.min(count - 1) } else { 0 };
                self.slot = if frame.pressed(Key::ArrowDown) {
                    (cur + 1) % count
                } else {
                    (cur + count - 1) % count
                };
                self.focus = Focus::EffectParam;
            }
        }

        let steps = frame.pressed(Key::ArrowRight) as i32 - frame.pressed(Key::ArrowLeft) as i32;
        if steps != 0 {
            let steps = if input.modifiers.shift { steps * 10 } else { steps };
            resp.changed |= self.adjust(controls, steps);
        }

        if self.config.palette && frame.pressed(Key::P) {
            controls.palette.cycle();
            resp.changed = true;
        }

        if resp.changed {
            log::info!("{}", self.summary(controls));
        }
        resp
    }

    fn handle_effect_selection(&mut self, input: &InputState, frame: &InputFrame, controls: &mut Controls) -> bool {
        let before = controls.effects.active_kind();

        if frame.pressed(Key::Tab) {
            controls.effects.cycle(!input.modifiers.shift);
        }

        for key in frame.keys_pressed.iter() {
            let Some(kind) = key.digit().filter(|d| *d > 0).and_then(|d| EffectKind::from_index(d as usize - 1))
            else {
                continue;
            };
            controls.select_effect(kind);
        }

        let changed = controls.effects.active_kind() != before;
        if changed {
            self.effect_changed();
        }
        changed
    }

    /// Moves keyboard focus to the first parameter of a newly chosen effect.
    pub(super) fn effect_changed(&mut self) {
        self.slot = 0;
        self.focus = Focus::EffectParam;
    }

    fn adjust(&mut self, controls: &mut Controls, steps: i32) -> bool {
        match self.focus {
            Focus::Material(field) if self.config.material => {
                let old = controls.material.get(field);
                old != controls.material.nudge(field, steps)
            }
            Focus::EffectParam => match self.focused_slot(controls) {
                Some(slot) => {
                    let old = controls.effects.param(slot);
                    old != controls.effects.nudge_param(slot, steps)
                }
                None => false,
            },
            Focus::Material(_) => false,
        }
    }

    /// One-line description of the current control state.
    pub fn summary(&self, controls: &Controls) -> String {
        let mut out = String::new();
        if self.config.effects {
            out.push_str(&format!("effect: {}", controls.effects.active_kind()));
            for slot in controls.effects.active_kind().param_slots() {
                let mark = if Some(*slot) == self.focused_slot(controls) { "*" } else { "" };
                out.push_str(&format!(" {mark}{slot}={:.3}", controls.effects.param(*slot)));
            }
        }
        if self.config.material {
            if !out.is_empty() {
                out.push_str(" | ");
            }
            out.push_str("material:");
            for field in MaterialField::ALL {
                let mark = if self.focus == Focus::Material(field) { "*" } else { "" };
                out.push_str(&format!(" {mark}{field}={:.2}", controls.material.get(field)));
            }
        }
        if self.config.palette {
            if !out.is_empty() {
                out.push_str(" | ");
            }
            out.push_str(&format!("palette: {}", controls.palette.current().name));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;
    use crate::post::Effect;

    const ALL: PanelConfig = PanelConfig { effects: true, material: true, palette: true };

    fn frame(keys: &[Key]) -> InputFrame {
        let mut fr = InputFrame::default();
        fr.keys_pressed.extend(keys.iter().copied());
        fr
    }

    fn shifted() -> InputState {
        InputState { modifiers: Modifiers { shift: true, ..Default::default() }, ..Default::default() }
    }

    // ── effect selection ─────────────────────────────────────────────────

    #[test]
    fn digits_pick_effects_by_list_position() {
        let mut panel = ControlPanel::new(ALL);
        let mut c = Controls::default();
        let resp = panel.handle(&InputState::default(), &frame(&[Key::Digit3]), &mut c);
        assert!(resp.changed);
        assert_eq!(c.effects.active_kind(), EffectKind::Blur);
    }

    #[test]
    fn crt_digit_is_rejected() {
        let mut panel = ControlPanel::new(ALL);
        let mut c = Controls::default();
        panel.handle(&InputState::default(), &frame(&[Key::Digit4]), &mut c);
        let resp = panel.handle(&InputState::default(), &frame(&[Key::Digit6]), &mut c);
        assert!(!resp.changed);
        assert_eq!(c.effects.active_kind(), EffectKind::Inverse);
    }

    #[test]
    fn shift_tab_cycles_backwards() {
        let mut panel = ControlPanel::new(ALL);
        let mut c = Controls::default();
        panel.handle(&shifted(), &frame(&[Key::Tab]), &mut c);
        assert_eq!(c.effects.active_kind(), EffectKind::ChromaticAberration);
        panel.handle(&InputState::default(), &frame(&[Key::Tab]), &mut c);
        assert_eq!(c.effects.active_kind(), EffectKind::None);
    }

    #[test]
    fn effect_keys_ignored_when_disabled() {
        let mut panel = ControlPanel::new(PanelConfig::default());
        let mut c = Controls::default();
        panel.handle(&InputState::default(), &frame(&[Key::Digit3, Key::Tab]), &mut c);
        assert_eq!(c.effects.active_kind(), EffectKind::None);
    }

    // ── sliders ──────────────────────────────────────────────────────────

    #[test]
    fn blur_slider_reaches_both_bounds() {
        let mut panel = ControlPanel::new(ALL);
        let mut c = Controls::default();
        panel.handle(&InputState::default(), &frame(&[Key::Digit3]), &mut c);

        for _ in 0..3 {
            panel.handle(&shifted(), &frame(&[Key::ArrowRight]), &mut c);
        }
        assert_eq!(c.effects.blur().strength(), 32.0);

        let resp = panel.handle(&InputState::default(), &frame(&[Key::ArrowRight]), &mut c);
        assert!(!resp.changed);

        for _ in 0..4 {
            panel.handle(&shifted(), &frame(&[Key::ArrowLeft]), &mut c);
        }
        assert_eq!(c.effects.blur().strength(), 0.0);
    }

    #[test]
    fn up_down_walks_aberration_components() {
        let mut panel = ControlPanel::new(ALL);
        let mut c = Controls::default();
        panel.handle(&InputState::default(), &frame(&[Key::Digit5]), &mut c);
        assert_eq!(panel.focused_slot(&c), Some(ParamSlot::AberrationOffset(0)));

        panel.handle(&InputState::default(), &frame(&[Key::ArrowUp]), &mut c);
        assert_eq!(panel.focused_slot(&c), Some(ParamSlot::AberrationDirection(1)));

        panel.handle(&InputState::default(), &frame(&[Key::ArrowLeft]), &mut c);
        let Effect::ChromaticAberration(p) = c.effects.active() else { panic!() };
        assert!((p.direction().y - 0.95).abs() < 1e-6);
        assert_eq!(p.direction().x, 1.0);
    }

    #[test]
    fn material_focus_and_adjust() {
        let mut panel = ControlPanel::new(ALL);
        let mut c = Controls::default();
        panel.handle(&InputState::default(), &frame(&[Key::F4]), &mut c);
        let resp = panel.handle(&InputState::default(), &frame(&[Key::ArrowRight]), &mut c);
        assert!(resp.changed);
        assert_eq!(c.material.shininess, 136.0);
        assert_eq!(c.effects.blur().strength(), 16.0);
    }

    // ── misc ─────────────────────────────────────────────────────────────

    #[test]
    fn palette_cycles_only_when_enabled() {
        let mut c = Controls::default();
        ControlPanel::new(PanelConfig::default()).handle(&InputState::default(), &frame(&[Key::P]), &mut c);
        assert_eq!(c.palette.current().name, "Sunny Day");

        let resp = ControlPanel::new(ALL).handle(&InputState::default(), &frame(&[Key::P]), &mut c);
        assert!(resp.changed);
        assert_eq!(c.palette.current().name, "Bright Night");
    }

    #[test]
    fn action_keys_are_reported() {
        let mut panel = ControlPanel::new(PanelConfig::default());
        let mut c = Controls::default();
        let resp = panel.handle(&InputState::default(), &frame(&[Key::R, Key::V, Key::Escape]), &mut c);
        assert_eq!(
            resp,
            PanelResponse { changed: false, reset_camera: true, toggle_preview: true, exit: true }
        );
    }

    #[test]
    fn responses_combine() {
        let keys = PanelResponse { reset_camera: true, ..Default::default() };
        let window = PanelResponse { changed: true, ..Default::default() };
        assert_eq!(
            keys | window,
            PanelResponse { changed: true, reset_camera: true, toggle_preview: false, exit: false }
        );
    }

    #[test]
    fn summary_marks_focus() {
        let mut panel = ControlPanel::new(ALL);
        let mut c = Controls::default();
        panel.handle(&InputState::default(), &frame(&[Key::Digit3]), &mut c);
        let s = panel.summary(&c);
        assert!(s.starts_with("effect: Kernel Blur *strength=16.000"), "{s}");
        assert!(s.contains("palette: Sunny Day"));
    }
}

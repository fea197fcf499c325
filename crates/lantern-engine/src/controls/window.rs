use crate::post::EffectKind;
use crate::render::IncompleteTarget;
use crate::scene::palette::PRESETS;
use crate::scene::MaterialField;

use super::panel::{ControlPanel, PanelResponse};
use super::{Controls, SliderRange};

/// Width of the framebuffer image inside the settings window, points.
const FRAMEBUFFER_WIDTH: f32 = 240.0;

/// Offscreen image shown in the settings window.
#[derive(Debug, Copy, Clone)]
pub struct FramebufferView<'a> {
    pub texture: egui::TextureId,
    pub aspect: f32,
    pub status: Result<(), &'a IncompleteTarget>,
    pub visible: bool,
}

/// Slider over `range`; the value written back goes through the range clamp.
fn range_slider(ui: &mut egui::Ui, label: impl std::fmt::Display, value: f32, range: SliderRange) -> Option<f32> {
    let mut v = value;
    let slider = egui::Slider::new(&mut v, range.min..=range.max)
        .text(label.to_string())
        .logarithmic(range.max / range.min.max(f32::EPSILON) > 100.0 && range.min > 0.0);
    ui.add(slider).changed().then(|| range.clamp(v))
}

impl ControlPanel {
    /// Draws the settings window for one frame and applies what the user did.
    pub fn show(
        &mut self,
        ctx: &egui::Context,
        title: &str,
        controls: &mut Controls,
        framebuffer: Option<FramebufferView<'_>>,
    ) -> PanelResponse {
        let mut resp = PanelResponse::default();
        let config = self.config();

        egui::Window::new(title)
            .default_pos([16.0, 16.0])
            .default_width(280.0)
            .resizable(false)
            .show(ctx, |ui| {
                if config.effects {
                    resp.changed |= self.effect_section(ui, controls);
                }
                if config.material {
                    ui.collapsing("Material", |ui| {
                        for field in MaterialField::ALL {
                            let value = controls.material.get(field);
                            if let Some(v) = range_slider(ui, field, value, field.range()) {
                                resp.changed |= controls.material.set(field, v) != value;
                            }
                        }
                    });
                }
                if config.palette {
                    let current = controls.palette.index();
                    egui::ComboBox::from_id_salt("lantern palette")
                        .selected_text(controls.palette.current().name)
                        .show_ui(ui, |ui| {
                            for (i, preset) in PRESETS.iter().enumerate() {
                                if ui.selectable_label(i == current, preset.name).clicked() && i != current {
                                    controls.palette.select(i);
                                    resp.changed = true;
                                }
                            }
                        });
                }

                ui.separator();
                ui.horizontal(|ui| {
                    resp.reset_camera = ui.button("Reset camera").clicked();
                    if let Some(fb) = framebuffer {
                        let label = if fb.visible { "Hide framebuffer" } else { "Show framebuffer" };
                        resp.toggle_preview = ui.button(label).clicked();
                    }
                });

                if let Some(fb) = framebuffer.filter(|fb| fb.visible) {
                    framebuffer_section(ui, fb);
                }
                ui.weak("Right mouse: look, WASD/QE: move, wheel: dolly");
            });

        if resp.changed {
            log::info!("{}", self.summary(controls));
        }
        resp
    }

    fn effect_section(&mut self, ui: &mut egui::Ui, controls: &mut Controls) -> bool {
        let mut changed = false;
        let active = controls.effects.active_kind();

        egui::ComboBox::from_id_salt("lantern effect")
            .selected_text(active.label())
            .show_ui(ui, |ui| {
                for kind in EffectKind::ALL {
                    let label = if kind.is_implemented() {
                        kind.label().to_string()
                    } else {
                        format!("{} (unavailable)", kind.label())
                    };
                    if ui.selectable_label(kind == active, label).clicked() && controls.select_effect(kind) {
                        self.effect_changed();
                        changed = true;
                    }
                }
            });

        for slot in controls.effects.active_kind().param_slots() {
            let value = controls.effects.param(*slot);
            if let Some(v) = range_slider(ui, slot, value, slot.range()) {
                changed |= controls.effects.set_param(*slot, v) != value;
            }
        }
        changed
    }
}

fn framebuffer_section(ui: &mut egui::Ui, fb: FramebufferView<'_>) {
    match fb.status {
        Ok(()) => {
            let aspect = if fb.aspect.is_finite() && fb.aspect > 0.0 { fb.aspect } else { 1.0 };
            ui.image((fb.texture, egui::vec2(FRAMEBUFFER_WIDTH, FRAMEBUFFER_WIDTH / aspect)));
        }
        Err(reason) => {
            ui.colored_label(egui::Color32::from_rgb(230, 50, 50), format!("framebuffer incomplete: {reason}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::PanelConfig;

    const ALL: PanelConfig = PanelConfig { effects: true, material: true, palette: true };

    fn screen() -> egui::RawInput {
        egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(1080.0, 720.0))),
            ..Default::default()
        }
    }

    fn run(
        ctx: &egui::Context,
        input: egui::RawInput,
        panel: &mut ControlPanel,
        controls: &mut Controls,
        fb: Option<FramebufferView<'_>>,
    ) -> (PanelResponse, egui::FullOutput) {
        let mut resp = PanelResponse::default();
        let output = ctx.run(input, |ctx| {
            resp = panel.show(ctx, "Settings", controls, fb);
        });
        (resp, output)
    }

    // ── layout ──

    #[test]
    fn idle_frames_change_nothing() {
        let ctx = egui::Context::default();
        let mut panel = ControlPanel::new(ALL);
        let mut c = Controls::default();
        c.select_effect(EffectKind::ChromaticAberration);
        let before = c.clone();

        for _ in 0..3 {
            let (resp, output) = run(&ctx, screen(), &mut panel, &mut c, None);
            assert_eq!(resp, PanelResponse::default());
            assert!(!output.shapes.is_empty());
        }
        assert_eq!(c, before);
    }

    #[test]
    fn window_stays_on_screen() {
        let ctx = egui::Context::default();
        let mut panel = ControlPanel::new(ALL);
        let mut c = Controls::default();
        run(&ctx, screen(), &mut panel, &mut c, None);
        run(&ctx, screen(), &mut panel, &mut c, None);

        let area = ctx.memory(|m| m.area_rect(egui::Id::new("Settings")));
        let Some(area) = area else { panic!("settings window not laid out") };
        assert!(area.min.x >= 0.0 && area.min.y >= 0.0, "{area:?}");
        assert!(area.max.x <= 1080.0 && area.max.y <= 720.0, "{area:?}");
    }

    #[test]
    fn incomplete_framebuffer_is_reported_not_drawn() {
        let ctx = egui::Context::default();
        let mut panel = ControlPanel::new(ALL);
        let mut c = Controls::default();
        let reason = IncompleteTarget::ZeroSize { width: 0, height: 600 };
        let fb = FramebufferView {
            texture: egui::TextureId::User(0),
            aspect: 0.0,
            status: Err(&reason),
            visible: true,
        };

        let (_, output) = run(&ctx, screen(), &mut panel, &mut c, Some(fb));
        let prims = ctx.tessellate(output.shapes, output.pixels_per_point);
        let uses_user_texture = prims.iter().any(|p| match &p.primitive {
            egui::epaint::Primitive::Mesh(m) => m.texture_id == egui::TextureId::User(0),
            _ => false,
        });
        assert!(!uses_user_texture);
    }

    #[test]
    fn complete_framebuffer_is_drawn_from_its_texture() {
        let ctx = egui::Context::default();
        let mut panel = ControlPanel::new(ALL);
        let mut c = Controls::default();
        let fb = FramebufferView {
            texture: egui::TextureId::User(7),
            aspect: 800.0 / 600.0,
            status: Ok(()),
            visible: true,
        };

        let (_, output) = run(&ctx, screen(), &mut panel, &mut c, Some(fb));
        let prims = ctx.tessellate(output.shapes, output.pixels_per_point);
        assert!(prims.iter().any(|p| match &p.primitive {
            egui::epaint::Primitive::Mesh(m) => m.texture_id == egui::TextureId::User(7),
            _ => false,
        }));
    }

    // ── sliders ──

    /// One frame with a lone blur slider; returns the area it was laid out in.
    fn slider_frame(ctx: &egui::Context, events: Vec<egui::Event>, value: &mut f32) -> egui::Rect {
        let mut rect = egui::Rect::NOTHING;
        let _ = ctx.run(egui::RawInput { events, ..screen() }, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                if let Some(v) = range_slider(ui, "strength", *value, crate::controls::range::BLUR_STRENGTH) {
                    *value = v;
                }
                rect = ui.min_rect();
            });
        });
        rect
    }

    #[test]
    fn dragging_a_slider_reaches_both_bounds() {
        let ctx = egui::Context::default();
        let mut value = 16.0;
        let rect = slider_frame(&ctx, Vec::new(), &mut value);
        assert_eq!(value, 16.0);

        let press = egui::pos2(rect.min.x + 1.0, rect.center().y);
        slider_frame(
            &ctx,
            vec![
                egui::Event::PointerMoved(press),
                egui::Event::PointerButton {
                    pos: press,
                    button: egui::PointerButton::Primary,
                    pressed: true,
                    modifiers: egui::Modifiers::NONE,
                },
            ],
            &mut value,
        );
        assert_eq!(value, 0.0);

        let far = egui::pos2(rect.min.x + 5000.0, rect.center().y);
        slider_frame(&ctx, vec![egui::Event::PointerMoved(far)], &mut value);
        assert_eq!(value, 32.0);
    }
}

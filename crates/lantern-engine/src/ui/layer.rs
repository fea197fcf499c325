use winit::event::WindowEvent;
use winit::window::Window;

/// Tessellated output of one UI pass, ready for [`UiPainter`](super::UiPainter).
#[derive(Default)]
pub struct UiFrame {
    pub primitives: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub pixels_per_point: f32,
}

impl UiFrame {
    /// Tessellates `output` and hands its platform part back to the caller.
    fn from_output(ctx: &egui::Context, output: egui::FullOutput) -> (Self, egui::PlatformOutput) {
        let egui::FullOutput { platform_output, textures_delta, shapes, pixels_per_point, .. } = output;
        let frame = Self {
            primitives: ctx.tessellate(shapes, pixels_per_point),
            textures_delta,
            pixels_per_point,
        };
        (frame, platform_output)
    }
}

/// Immediate-mode UI over the window: egui context plus its winit bridge.
pub struct UiLayer {
    ctx: egui::Context,
    state: egui_winit::State,
}

impl UiLayer {
    pub(crate) fn new(window: &Window) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            window.theme(),
            None,
        );
        Self { ctx, state }
    }

    pub(crate) fn set_max_texture_side(&mut self, side: usize) {
        self.state.set_max_texture_side(side);
    }

    /// Feeds a window event to egui. Returns whether egui consumed it.
    pub(crate) fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// A text field has keyboard focus.
    pub fn wants_keyboard(&self) -> bool {
        self.ctx.wants_keyboard_input()
    }

    /// Runs one UI pass over the input gathered since the last one.
    pub(crate) fn run(&mut self, window: &Window, build: impl FnMut(&egui::Context)) -> UiFrame {
        let raw = self.state.take_egui_input(window);
        let output = self.ctx.run(raw, build);
        let (frame, platform) = UiFrame::from_output(&self.ctx, output);
        self.state.handle_platform_output(window, platform);
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen(w: f32, h: f32) -> egui::RawInput {
        egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(w, h))),
            ..Default::default()
        }
    }

    #[test]
    fn first_frame_uploads_fonts_and_draws() {
        let ctx = egui::Context::default();
        let output = ctx.run(screen(800.0, 600.0), |ctx| {
            egui::Window::new("Settings").show(ctx, |ui| {
                ui.label("Effect");
            });
        });

        let (frame, _) = UiFrame::from_output(&ctx, output);
        assert!(!frame.primitives.is_empty());
        assert!(frame.textures_delta.set.iter().any(|(id, _)| *id == egui::TextureId::default()));
        assert!(frame.pixels_per_point > 0.0);
    }

    #[test]
    fn empty_ui_tessellates_to_nothing() {
        let ctx = egui::Context::default();
        let output = ctx.run(screen(800.0, 600.0), |_| {});
        let (frame, _) = UiFrame::from_output(&ctx, output);
        assert!(frame.primitives.is_empty());
    }
}

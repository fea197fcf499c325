use crate::render::fullscreen_quad::QUAD_VERTEX_COUNT;

use super::effect::{EffectKind, EffectSettings, EffectUniforms};

/// Clear color of the default target before the quad is drawn.
pub const POST_CLEAR: wgpu::Color = wgpu::Color::BLACK;

/// Everything the post pass does this frame, decided before any GPU call.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PostPassPlan {
    /// Program to activate. `EffectKind::None` is the passthrough program.
    pub program: EffectKind,
    pub uniforms: EffectUniforms,
    pub clear: wgpu::Color,
    /// Always false: the quad must not be depth-tested.
    pub depth_test: bool,
    /// Vertices drawn, or 0 when there is no source image.
    pub vertex_count: u32,
}

impl PostPassPlan {
    pub fn new(settings: &EffectSettings, source_complete: bool) -> Self {
        let effect = settings.active();
        Self {
            program: effect.kind(),
            uniforms: effect.uniforms(),
            clear: POST_CLEAR,
            depth_test: false,
            vertex_count: if source_complete { QUAD_VERTEX_COUNT } else { 0 },
        }
    }

    pub fn draws_quad(&self) -> bool {
        self.vertex_count > 0
    }
}

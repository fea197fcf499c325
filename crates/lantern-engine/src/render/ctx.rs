use super::target::{ActiveTarget, TargetTracker};

/// Renderer-facing context (device/queue + surface format + surface size).
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    /// Window surface size in physical pixels.
    pub surface_size: (u32, u32),
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        surface_size: (u32, u32),
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            surface_size,
        }
    }

    /// Surface aspect ratio (width / height), 1.0 for a degenerate surface.
    pub fn surface_aspect(&self) -> f32 {
        let (w, h) = self.surface_size;
        if w == 0 || h == 0 { 1.0 } else { w as f32 / h as f32 }
    }
}

/// Frame recording target: the encoder, the surface view, and the tracker of
/// which image passes currently write to.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
    tracker: TargetTracker,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, color_view: &'a wgpu::TextureView) -> Self {
        Self {
            encoder,
            color_view,
            tracker: TargetTracker::default(),
        }
    }

    /// Target the next pass writes to.
    pub fn active(&self) -> ActiveTarget {
        self.tracker.current()
    }

    /// Splits the target into its encoder and tracker so a pass guard can hold both.
    pub(crate) fn parts(&mut self) -> (&mut wgpu::CommandEncoder, &TargetTracker) {
        (&mut *self.encoder, &self.tracker)
    }

    /// Begins a pass on the window surface.
    ///
    /// `clear = None` loads the existing contents (overlays). A depth view, if
    /// given, is cleared to 1.0.
    pub fn begin_default_pass(
        &mut self,
        label: &str,
        clear: Option<wgpu::Color>,
        depth: Option<&wgpu::TextureView>,
    ) -> wgpu::RenderPass<'_> {
        debug_assert_eq!(self.tracker.current(), ActiveTarget::Default);

        let load = match clear {
            Some(c) => wgpu::LoadOp::Clear(c),
            None => wgpu::LoadOp::Load,
        };

        self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: self.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: depth.map(depth_clear_attachment),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}

/// Depth attachment cleared to the far plane and stored.
pub(crate) fn depth_clear_attachment(view: &wgpu::TextureView) -> wgpu::RenderPassDepthStencilAttachment<'_> {
    wgpu::RenderPassDepthStencilAttachment {
        view,
        depth_ops: Some(wgpu::Operations {
            load: wgpu::LoadOp::Clear(1.0),
            store: wgpu::StoreOp::Store,
        }),
        stencil_ops: None,
    }
}

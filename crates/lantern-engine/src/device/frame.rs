/// A single acquired swapchain frame.
///
/// Short-lived: holding the surface texture blocks acquisition of the next one.
/// `Gpu::submit` consumes it and presents.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

impl GpuFrame {
    /// Size of the acquired image. Attachments drawn together with
    /// [`view`](Self::view) must match it.
    pub fn size(&self) -> (u32, u32) {
        let extent = self.surface_texture.texture.size();
        (extent.width, extent.height)
    }
}

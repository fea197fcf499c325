/// Depth buffer that follows the window surface size.
#[derive(Default)]
pub struct SurfaceDepth {
    size: (u32, u32),
    view: Option<wgpu::TextureView>,
}

impl SurfaceDepth {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view matching `size`, reallocating after a resize.
    pub fn ensure(&mut self, device: &wgpu::Device, size: (u32, u32)) -> &wgpu::TextureView {
        let size = (size.0.max(1), size.1.max(1));
        if self.size != size {
            self.view = None;
        }
        self.size = size;
        self.view.get_or_insert_with(|| {
            let texture = device.create_texture(&wgpu::TextureDescriptor {
                label: Some("lantern surface depth"),
                size: wgpu::Extent3d {
                    width: size.0,
                    height: size.1,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: Self::FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            });
            log::debug!("surface depth reallocated at {}x{}", size.0, size.1);
            texture.create_view(&wgpu::TextureViewDescriptor::default())
        })
    }
}

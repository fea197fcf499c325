use crate::assets::ImageData;

/// Texel format of every loaded image. Bytes are sampled as stored, so
/// shading and effects work on the values the image file holds.
pub const IMAGE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// How a texture is sampled.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TextureKind {
    /// Surface color, repeating.
    Color,
    /// Lookup table, clamped (toon ramps).
    Lookup,
}

impl TextureKind {
    fn address_mode(self) -> wgpu::AddressMode {
        match self {
            TextureKind::Color => wgpu::AddressMode::Repeat,
            TextureKind::Lookup => wgpu::AddressMode::ClampToEdge,
        }
    }
}

/// Sampled 2D texture with its own sampler.
pub struct Texture2d {
    _texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl Texture2d {
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        image: &ImageData,
        kind: TextureKind,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: image.width.max(1),
            height: image.height.max(1),
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: IMAGE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        if image.rgba.len() as u64 == 4 * size.width as u64 * size.height as u64 {
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                &image.rgba,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * size.width),
                    rows_per_image: Some(size.height),
                },
                size,
            );
        } else {
            log::warn!("texture '{label}': pixel data does not match {}x{}", image.width, image.height);
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let address = kind.address_mode();
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: address,
            address_mode_v: address,
            address_mode_w: address,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self { _texture: texture, view, sampler }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn images_are_sampled_without_srgb_decode() {
        assert!(!IMAGE_FORMAT.is_srgb());
        assert_eq!(TextureKind::Color.address_mode(), wgpu::AddressMode::Repeat);
        assert_eq!(TextureKind::Lookup.address_mode(), wgpu::AddressMode::ClampToEdge);
    }
}

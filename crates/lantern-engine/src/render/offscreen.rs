//! Offscreen render target: a fixed-size color image (+ optional depth) the
//! scene is drawn into before post-processing samples it.

use std::fmt;
use std::ops::{Deref, DerefMut};

use super::ctx::{depth_clear_attachment, RenderTarget};
use super::target::{ActiveTarget, TargetScope};

/// Creation parameters for an [`OffscreenTarget`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct OffscreenDesc {
    pub width: u32,
    pub height: u32,
    pub color_format: wgpu::TextureFormat,
    /// `None` creates a color-only target.
    pub depth_format: Option<wgpu::TextureFormat>,
}

impl OffscreenDesc {
    pub const DEFAULT_WIDTH: u32 = 800;
    pub const DEFAULT_HEIGHT: u32 = 600;
    pub const DEFAULT_COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
    pub const DEFAULT_DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

    pub fn new(width: u32, height: u32, want_depth: bool) -> Self {
        Self {
            width,
            height,
            color_format: Self::DEFAULT_COLOR_FORMAT,
            depth_format: want_depth.then_some(Self::DEFAULT_DEPTH_FORMAT),
        }
    }
}

impl Default for OffscreenDesc {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WIDTH, Self::DEFAULT_HEIGHT, true)
    }
}

/// Why an attachment combination was rejected.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum IncompleteTarget {
    ZeroSize { width: u32, height: u32 },
    TooLarge { width: u32, height: u32, max: u32 },
    /// Color format is a depth/stencil format.
    ColorIsDepth(wgpu::TextureFormat),
    /// Color format cannot be both rendered to and sampled.
    ColorNotRenderable(wgpu::TextureFormat),
    /// Depth attachment format has no depth aspect.
    DepthWithoutDepthAspect(wgpu::TextureFormat),
}

impl fmt::Display for IncompleteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroSize { width, height } => write!(f, "zero-sized attachment {width}x{height}"),
            Self::TooLarge { width, height, max } => {
                write!(f, "attachment {width}x{height} exceeds max dimension {max}")
            }
            Self::ColorIsDepth(fmt) => write!(f, "color attachment uses depth format {fmt:?}"),
            Self::ColorNotRenderable(fmt) => {
                write!(f, "color format {fmt:?} is not renderable and sampleable")
            }
            Self::DepthWithoutDepthAspect(fmt) => {
                write!(f, "depth attachment format {fmt:?} has no depth aspect")
            }
        }
    }
}

impl std::error::Error for IncompleteTarget {}

/// Validates an attachment combination against the device.
///
/// This plays the role of a framebuffer completeness check: every request
/// either passes or names the first rule it breaks.
pub fn check_completeness(
    desc: &OffscreenDesc,
    limits: &wgpu::Limits,
    features: wgpu::Features,
) -> Result<(), IncompleteTarget> {
    let OffscreenDesc { width, height, color_format, depth_format } = *desc;

    if width == 0 || height == 0 {
        return Err(IncompleteTarget::ZeroSize { width, height });
    }

    let max = limits.max_texture_dimension_2d;
    if width > max || height > max {
        return Err(IncompleteTarget::TooLarge { width, height, max });
    }

    if color_format.is_depth_stencil_format() {
        return Err(IncompleteTarget::ColorIsDepth(color_format));
    }

    let needed = wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING;
    let allowed = color_format.guaranteed_format_features(features).allowed_usages;
    if !allowed.contains(needed) {
        return Err(IncompleteTarget::ColorNotRenderable(color_format));
    }

    if let Some(depth) = depth_format {
        if !depth.has_depth_aspect() {
            return Err(IncompleteTarget::DepthWithoutDepthAspect(depth));
        }
    }

    Ok(())
}

struct Attachments {
    _color: wgpu::Texture,
    color_view: wgpu::TextureView,
    depth: Option<(wgpu::Texture, wgpu::TextureView)>,
}

/// Off-screen color (+ optional depth) render destination.
///
/// Resolution is fixed at creation; window resizes do not touch it. An
/// incomplete target owns no images: binding it yields no pass and it exposes
/// no color view, so callers carry on with nothing drawn.
pub struct OffscreenTarget {
    desc: OffscreenDesc,
    attachments: Option<Attachments>,
    incomplete: Option<IncompleteTarget>,
}

impl OffscreenTarget {
    /// Allocates the attachments and checks completeness.
    ///
    /// An incomplete combination is logged and reported through
    /// [`status`](Self::status); it is not an error for the caller.
    pub fn new(device: &wgpu::Device, desc: OffscreenDesc) -> Self {
        if let Err(reason) = check_completeness(&desc, &device.limits(), device.features()) {
            log::error!("offscreen target incomplete: {reason}");
            return Self::incomplete(desc, reason);
        }

        let size = wgpu::Extent3d {
            width: desc.width,
            height: desc.height,
            depth_or_array_layers: 1,
        };

        let color = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("lantern offscreen color"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: desc.color_format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let color_view = color.create_view(&wgpu::TextureViewDescriptor::default());

        let depth = desc.depth_format.map(|format| {
            let texture = device.create_texture(&wgpu::TextureDescriptor {
                label: Some("lantern offscreen depth"),
                size,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            });
            let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
            (texture, view)
        });

        log::info!(
            "offscreen target {}x{} {:?} (depth: {:?}) complete",
            desc.width,
            desc.height,
            desc.color_format,
            desc.depth_format,
        );

        Self {
            desc,
            attachments: Some(Attachments { _color: color, color_view, depth }),
            incomplete: None,
        }
    }

    fn incomplete(desc: OffscreenDesc, reason: IncompleteTarget) -> Self {
        Self {
            desc,
            attachments: None,
            incomplete: Some(reason),
        }
    }

    pub fn desc(&self) -> &OffscreenDesc {
        &self.desc
    }

    pub fn size(&self) -> (u32, u32) {
        (self.desc.width, self.desc.height)
    }

    /// Width / height of the target, which the scene camera should use.
    pub fn aspect(&self) -> f32 {
        if self.desc.height == 0 {
            1.0
        } else {
            self.desc.width as f32 / self.desc.height as f32
        }
    }

    pub fn is_complete(&self) -> bool {
        self.incomplete.is_none()
    }

    /// Why the target is unusable, for display next to the image it would hold.
    pub fn status(&self) -> Result<(), &IncompleteTarget> {
        match &self.incomplete {
            None => Ok(()),
            Some(reason) => Err(reason),
        }
    }

    /// Color image, for sampling in the post pass or showing in the settings window.
    pub fn color_view(&self) -> Option<&wgpu::TextureView> {
        self.attachments.as_ref().map(|a| &a.color_view)
    }

    /// Routes subsequent drawing into this target until the returned pass is
    /// dropped, clearing color to `clear` and depth to 1.0.
    ///
    /// Returns `None` for an incomplete target.
    pub fn bind<'t>(
        &'t self,
        target: &'t mut RenderTarget<'_>,
        clear: wgpu::Color,
    ) -> Option<OffscreenPass<'t>> {
        let attachments = self.attachments.as_ref()?;
        let (encoder, tracker) = target.parts();
        let scope = tracker.acquire(ActiveTarget::Offscreen);

        let pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("lantern offscreen pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &attachments.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: attachments
                .depth
                .as_ref()
                .map(|(_, view)| depth_clear_attachment(view)),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        Some(OffscreenPass { pass, _scope: scope })
    }
}

/// Render pass into an [`OffscreenTarget`].
///
/// Dropping it ends the pass and restores the default target, on every exit
/// path. Field order matters: the pass ends before the scope restores.
pub struct OffscreenPass<'t> {
    pass: wgpu::RenderPass<'t>,
    _scope: TargetScope<'t>,
}

impl<'t> Deref for OffscreenPass<'t> {
    type Target = wgpu::RenderPass<'t>;

    fn deref(&self) -> &Self::Target {
        &self.pass
    }
}

impl DerefMut for OffscreenPass<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.pass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(desc: OffscreenDesc) -> Result<(), IncompleteTarget> {
        check_completeness(&desc, &wgpu::Limits::default(), wgpu::Features::empty())
    }

    #[test]
    fn default_target_is_800x600_with_depth() {
        let desc = OffscreenDesc::default();
        assert_eq!((desc.width, desc.height), (800, 600));
        assert!(desc.depth_format.is_some());
        assert_eq!(check(desc), Ok(()));
    }

    #[test]
    fn color_only_target_is_complete() {
        assert_eq!(check(OffscreenDesc::new(800, 600, false)), Ok(()));
    }

    #[test]
    fn valid_sizes_are_complete() {
        for (w, h) in [(1, 1), (800, 600), (1920, 1080), (4096, 16)] {
            for depth in [false, true] {
                assert_eq!(check(OffscreenDesc::new(w, h, depth)), Ok(()), "{w}x{h} depth={depth}");
            }
        }
    }

    #[test]
    fn zero_size_is_incomplete() {
        assert_eq!(
            check(OffscreenDesc::new(0, 600, true)),
            Err(IncompleteTarget::ZeroSize { width: 0, height: 600 })
        );
    }

    #[test]
    fn oversize_is_incomplete() {
        let max = wgpu::Limits::default().max_texture_dimension_2d;
        let err = check(OffscreenDesc::new(max + 1, 16, false)).unwrap_err();
        assert!(matches!(err, IncompleteTarget::TooLarge { .. }));
    }

    #[test]
    fn depth_format_as_color_is_incomplete() {
        let desc = OffscreenDesc {
            color_format: wgpu::TextureFormat::Depth32Float,
            ..OffscreenDesc::default()
        };
        assert_eq!(
            check(desc),
            Err(IncompleteTarget::ColorIsDepth(wgpu::TextureFormat::Depth32Float))
        );
    }

    #[test]
    fn shared_exponent_color_is_not_renderable() {
        let desc = OffscreenDesc {
            color_format: wgpu::TextureFormat::Rgb9e5Ufloat,
            ..OffscreenDesc::default()
        };
        assert_eq!(
            check(desc),
            Err(IncompleteTarget::ColorNotRenderable(wgpu::TextureFormat::Rgb9e5Ufloat))
        );
    }

    #[test]
    fn color_format_as_depth_is_incomplete() {
        let desc = OffscreenDesc {
            depth_format: Some(wgpu::TextureFormat::Rgba8Unorm),
            ..OffscreenDesc::default()
        };
        assert_eq!(
            check(desc),
            Err(IncompleteTarget::DepthWithoutDepthAspect(wgpu::TextureFormat::Rgba8Unorm))
        );
    }

    #[test]
    fn incomplete_target_exposes_no_attachments() {
        let desc = OffscreenDesc::new(0, 0, true);
        let target = OffscreenTarget::incomplete(desc, IncompleteTarget::ZeroSize { width: 0, height: 0 });
        assert!(!target.is_complete());
        assert!(target.status().is_err());
        assert!(target.color_view().is_none());
    }

    #[test]
    fn aspect_follows_fixed_size() {
        let target = OffscreenTarget::incomplete(
            OffscreenDesc::default(),
            IncompleteTarget::ZeroSize { width: 0, height: 0 },
        );
        assert!((target.aspect() - 800.0 / 600.0).abs() < 1e-6);
    }
}

//! Surface policy: format, present mode and alpha choices, plus resize and
//! error handling for the configured swapchain.

use winit::dpi::PhysicalSize;

/// What the frame loop does after a failed image acquisition.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Swapchain rebuilt; the next frame can render.
    Reconfigured,
    SkipFrame,
    /// Unrecoverable (out of memory); the runtime exits.
    Fatal,
}

/// Picks the surface format the demos present with.
///
/// Shaders write display-ready values (effects operate on what is shown), so
/// a plain UNORM format is preferred. An sRGB-only surface is accepted with a
/// warning; its output is encoded once more by the hardware.
pub(crate) fn choose_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    const PREFERRED: [wgpu::TextureFormat; 2] =
        [wgpu::TextureFormat::Bgra8Unorm, wgpu::TextureFormat::Rgba8Unorm];

    if let Some(f) = PREFERRED.into_iter().find(|f| formats.contains(f)) {
        return Some(f);
    }
    if let Some(f) = formats.iter().copied().find(|f| !f.is_srgb()) {
        return Some(f);
    }
    let first = formats.first().copied()?;
    log::warn!("surface only offers sRGB formats; presenting with {first:?}");
    Some(first)
}

pub(crate) fn choose_present_mode(modes: &[wgpu::PresentMode], vsync: bool) -> wgpu::PresentMode {
    if vsync {
        return wgpu::PresentMode::Fifo;
    }
    [wgpu::PresentMode::Mailbox, wgpu::PresentMode::Immediate]
        .into_iter()
        .find(|m| modes.contains(m))
        .unwrap_or(wgpu::PresentMode::Fifo)
}

pub(crate) fn choose_alpha_mode(modes: &[wgpu::CompositeAlphaMode]) -> wgpu::CompositeAlphaMode {
    if modes.contains(&wgpu::CompositeAlphaMode::Opaque) {
        wgpu::CompositeAlphaMode::Opaque
    } else {
        modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto)
    }
}

/// `(width, height)` of a window that can be drawn into; `None` while either
/// side is zero (minimized).
pub(crate) fn drawable(size: PhysicalSize<u32>) -> Option<(u32, u32)> {
    (size.width > 0 && size.height > 0).then_some((size.width, size.height))
}

/// Records the new window size and reconfigures the swapchain when it is
/// drawable. An empty size leaves the old configuration in place; frames are
/// not acquired until the window is restored.
pub(crate) fn apply_resize(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &mut wgpu::SurfaceConfiguration,
    size: &mut PhysicalSize<u32>,
    new_size: PhysicalSize<u32>,
) {
    *size = new_size;
    let Some((width, height)) = drawable(new_size) else { return };
    config.width = width;
    config.height = height;
    surface.configure(device, config);
}

pub(crate) fn map_surface_error(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    err: wgpu::SurfaceError,
) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
            if drawable(size).is_some() {
                surface.configure(device, config);
            }
            log::debug!("surface {err:?}; reconfigured");
            SurfaceErrorAction::Reconfigured
        }
        wgpu::SurfaceError::OutOfMemory => {
            log::error!("surface out of memory");
            SurfaceErrorAction::Fatal
        }
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => {
            log::warn!("surface {err:?}; skipping frame");
            SurfaceErrorAction::SkipFrame
        }
    }
}

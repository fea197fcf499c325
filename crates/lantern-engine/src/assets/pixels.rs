use std::path::Path;

use anyhow::Context;

/// Tightly packed RGBA8 pixels, row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl ImageData {
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [self.rgba[i], self.rgba[i + 1], self.rgba[i + 2], self.rgba[i + 3]]
    }
}

pub fn load_image(path: &Path) -> anyhow::Result<ImageData> {
    let img = image::open(path)
        .with_context(|| format!("failed to load image {}", path.display()))?
        .to_rgba8();
    let (width, height) = img.dimensions();
    log::info!("loaded {}: {}x{}", path.display(), width, height);
    Ok(ImageData { width, height, rgba: img.into_raw() })
}

/// Two-color checkerboard with square cells of `cell` pixels.
pub fn checker(size: u32, cell: u32, a: [u8; 4], b: [u8; 4]) -> ImageData {
    let cell = cell.max(1);
    let mut rgba = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let even = ((x / cell) + (y / cell)) % 2 == 0;
            rgba.extend_from_slice(if even { &a } else { &b });
        }
    }
    ImageData { width: size, height: size, rgba }
}

/// Horizontal lighting ramp with `bands` hard steps from dark (left) to
/// bright (right), one pixel high.
pub fn toon_ramp(width: u32, bands: u32) -> ImageData {
    let bands = bands.max(1);
    let mut rgba = Vec::with_capacity((width * 4) as usize);
    for x in 0..width {
        let band = (x * bands / width.max(1)).min(bands - 1);
        let level = if bands == 1 { 255 } else { (band * 255 / (bands - 1)) as u8 };
        rgba.extend_from_slice(&[level, level, level, 255]);
    }
    ImageData { width, height: 1, rgba }
}

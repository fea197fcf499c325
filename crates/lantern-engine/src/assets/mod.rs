//! Asset loading with procedural fallbacks.
//!
//! A missing or unreadable file is logged at warn level and replaced, so the
//! demos always have something to draw.

mod mesh;
mod pixels;

use std::path::{Path, PathBuf};

pub use mesh::{load_obj, uv_sphere, MeshData};
pub use pixels::{checker, load_image, toon_ramp, ImageData};

/// Directory assets are resolved against.
#[derive(Debug, Clone)]
pub struct AssetDir {
    root: PathBuf,
}

impl Default for AssetDir {
    fn default() -> Self {
        Self::new("assets")
    }
}

impl AssetDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// OBJ mesh, or a UV sphere if it cannot be loaded.
    pub fn mesh_or_sphere(&self, name: &str) -> MeshData {
        match load_obj(&self.path(name)) {
            Ok(mesh) => mesh,
            Err(err) => {
                log::warn!("{err:#}; using a procedural sphere");
                uv_sphere(32, 64)
            }
        }
    }

    /// Image, or `fallback()` if it cannot be loaded.
    pub fn image_or(&self, name: &str, fallback: impl FnOnce() -> ImageData) -> ImageData {
        match load_image(&self.path(name)) {
            Ok(img) => img,
            Err(err) => {
                log::warn!("{err:#}; using a procedural texture");
                fallback()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_files_fall_back() {
        let dir = AssetDir::new("no-such-asset-dir");
        let mesh = dir.mesh_or_sphere("Suzanne.obj");
        assert!(mesh.triangle_count() > 0);

        let img = dir.image_or("brick_color.jpg", || checker(4, 1, [255; 4], [0; 4]));
        assert_eq!((img.width, img.height), (4, 4));
    }

    #[test]
    fn paths_resolve_under_root() {
        let dir = AssetDir::default();
        assert_eq!(dir.path("ZAtoon.png"), Path::new("assets").join("ZAtoon.png"));
    }
}

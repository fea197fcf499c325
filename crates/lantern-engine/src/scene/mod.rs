//! Scene state shared by the demos: camera, object transform, material and
//! toon palette.

mod camera;
mod controller;
mod material;
pub mod palette;
mod transform;

pub use camera::Camera;
pub use controller::CameraController;
pub use material::{Material, MaterialField, MaterialUniform};
pub use palette::{Palette, PaletteSelection, PaletteUniform};
pub use transform::Transform;

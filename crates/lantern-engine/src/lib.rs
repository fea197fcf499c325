//! Lantern engine crate.
//!
//! Platform + GPU runtime for the shading demos: window loop, input, an
//! offscreen render target, a textured-mesh scene renderer and a single-effect
//! post-process stage, with an egui settings overlay.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod assets;
pub mod controls;
pub mod post;
pub mod render;
pub mod scene;
pub mod ui;

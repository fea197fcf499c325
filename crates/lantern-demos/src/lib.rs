//! Shading demos built on `lantern-engine`.
//!
//! Each binary picks a [`DemoConfig`] preset and hands it to [`run`].

mod config;
mod demo;

use anyhow::Result;

use lantern_engine::window::Runtime;

pub use config::{DemoConfig, ShadingChoice};
pub use demo::ShadingDemo;

/// Opens the demo window and runs until it closes.
pub fn run(config: DemoConfig) -> Result<()> {
    log::info!(
        "shortcuts: Tab/1-6 effect, Up/Down param, F1-F4 material, Left/Right adjust, \
         P palette, R reset camera, V framebuffer image, right mouse + WASD/QE fly, wheel dolly, Esc quit"
    );
    let runtime = config.runtime();
    let gpu_init = config.gpu_init();
    Runtime::run(runtime, gpu_init, ShadingDemo::new(config))
}

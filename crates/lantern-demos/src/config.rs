use winit::dpi::LogicalSize;

use lantern_engine::assets::AssetDir;
use lantern_engine::controls::PanelConfig;
use lantern_engine::device::GpuInit;
use lantern_engine::render::OffscreenDesc;
use lantern_engine::window::RuntimeConfig;

/// Lighting model a demo draws with, and the assets it samples.
#[derive(Debug, Clone, PartialEq)]
pub enum ShadingChoice {
    BlinnPhong { albedo: &'static str },
    Toon { albedo: &'static str, ramp: &'static str },
}

/// Everything that distinguishes one demo from another.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub title: String,
    pub window_size: LogicalSize<f64>,
    pub assets: AssetDir,
    pub mesh: &'static str,
    pub shading: ShadingChoice,
    /// Route the scene through an offscreen target and the post stage.
    /// `None` draws straight to the window.
    pub offscreen: Option<OffscreenDesc>,
    pub panel: PanelConfig,
    pub vsync: bool,
}

impl DemoConfig {
    /// Blinn-Phong Suzanne with material sliders.
    pub fn assignment0() -> Self {
        Self {
            title: "Assignment 0".to_string(),
            window_size: LogicalSize::new(1080.0, 720.0),
            assets: AssetDir::default(),
            mesh: "Suzanne.obj",
            shading: ShadingChoice::BlinnPhong { albedo: "brick_color.jpg" },
            offscreen: None,
            panel: PanelConfig { effects: false, material: true, palette: false },
            vsync: true,
        }
    }

    /// Toon-shaded skull with palette presets.
    pub fn worksession0() -> Self {
        Self {
            title: "Worksession 0".to_string(),
            mesh: "skull.obj",
            shading: ShadingChoice::Toon { albedo: "Txo_dokuo.png", ramp: "ZAtoon.png" },
            panel: PanelConfig { effects: false, material: false, palette: true },
            ..Self::assignment0()
        }
    }

    /// Assignment 0 rendered offscreen and post-processed.
    pub fn assignment1() -> Self {
        Self {
            title: "Assignment 1".to_string(),
            offscreen: Some(OffscreenDesc::default()),
            panel: PanelConfig { effects: true, material: true, palette: false },
            ..Self::assignment0()
        }
    }

    pub fn gpu_init(&self) -> GpuInit {
        GpuInit { vsync: self.vsync, ..GpuInit::default() }
    }

    pub fn runtime(&self) -> RuntimeConfig {
        RuntimeConfig {
            title: self.title.clone(),
            initial_size: self.window_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_assignment1_post_processes() {
        assert!(DemoConfig::assignment0().offscreen.is_none());
        assert!(DemoConfig::worksession0().offscreen.is_none());

        let desc = DemoConfig::assignment1().offscreen.unwrap();
        assert_eq!((desc.width, desc.height), (800, 600));
    }

    #[test]
    fn panels_match_demo_features() {
        assert!(DemoConfig::assignment1().panel.effects);
        assert!(!DemoConfig::assignment0().panel.effects);
        assert!(DemoConfig::worksession0().panel.palette);
        assert!(!DemoConfig::worksession0().panel.material);
    }

    #[test]
    fn worksession_uses_toon_assets() {
        let cfg = DemoConfig::worksession0();
        assert_eq!(cfg.mesh, "skull.obj");
        assert_eq!(cfg.shading, ShadingChoice::Toon { albedo: "Txo_dokuo.png", ramp: "ZAtoon.png" });
        assert_eq!(cfg.runtime().title, "Worksession 0");
    }

    #[test]
    fn vsync_carries_into_gpu_init() {
        let mut cfg = DemoConfig::assignment1();
        assert!(cfg.gpu_init().vsync);
        cfg.vsync = false;
        assert!(!cfg.gpu_init().vsync);
    }
}

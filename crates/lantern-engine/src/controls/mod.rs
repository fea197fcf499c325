//! User-adjustable demo settings, the settings window that edits them and its
//! keyboard shortcuts.

mod panel;
pub mod range;
mod window;

use crate::post::{EffectKind, EffectSettings};
use crate::scene::{Material, PaletteSelection};

pub use panel::{ControlPanel, PanelConfig, PanelResponse};
pub use range::SliderRange;
pub use window::FramebufferView;

/// Values the control panel edits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Controls {
    pub effects: EffectSettings,
    pub material: Material,
    pub palette: PaletteSelection,
}

impl Controls {
    /// Switches the active effect. A rejected choice (CRT) is logged and the
    /// current effect stays. Returns whether the effect changed.
    pub fn select_effect(&mut self, kind: EffectKind) -> bool {
        let before = self.effects.active_kind();
        if let Err(err) = self.effects.select(kind) {
            log::warn!("{err}; keeping \"{before}\"");
        }
        self.effects.active_kind() != before
    }
}

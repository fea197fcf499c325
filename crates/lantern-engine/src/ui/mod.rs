//! On-screen UI: egui windows drawn over the frame.
//!
//! [`UiLayer`] owns the egui context and translates window events;
//! [`UiPainter`] draws its tessellated output with the frame's encoder.

mod layer;
mod painter;

pub use layer::{UiFrame, UiLayer};
pub use painter::UiPainter;

//! Post-processing: one selectable full-screen effect applied to the
//! offscreen image on its way to the window.

pub mod effect;
mod plan;
mod stage;

pub use effect::{
    AberrationParams, BlurParams, Effect, EffectKind, EffectSettings, EffectUniforms, ParamSlot,
    UnsupportedEffect,
};
pub use plan::{PostPassPlan, POST_CLEAR};
pub use stage::PostProcessStage;

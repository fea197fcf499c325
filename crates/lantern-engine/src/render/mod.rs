//! GPU rendering subsystem.
//!
//! Renderers own their GPU resources (pipelines, buffers, bind groups) and
//! build them lazily for the formats they are first used with. Every pass is
//! recorded into the frame's single encoder through [`RenderTarget`].

mod ctx;
pub mod depth;
pub mod fullscreen_quad;
pub mod mesh;
pub mod offscreen;
pub mod scene;
pub mod target;
pub mod texture;

pub use ctx::{RenderCtx, RenderTarget};
pub use depth::SurfaceDepth;
pub use fullscreen_quad::FullscreenQuad;
pub use mesh::{GpuMesh, MeshVertex};
pub use offscreen::{check_completeness, IncompleteTarget, OffscreenDesc, OffscreenPass, OffscreenTarget};
pub use scene::{PassFormats, SceneFrame, SceneRenderer, Shading, SCENE_CLEAR};
pub use target::ActiveTarget;
pub use texture::{Texture2d, TextureKind};

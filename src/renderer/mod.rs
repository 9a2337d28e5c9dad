//! Rendering module
//!
//! `scene` builds a backend-agnostic draw list from the game state, `shapes`
//! tessellates it into triangles and `pipeline` presents them with WebGPU.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{AssetSource, DrawCmd, DrawList, ImageRef, NoAssets, RenderContext, TextAlign, build_frame};
pub use shapes::tessellate;
pub use vertex::Vertex;

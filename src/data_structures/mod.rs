//! Scene data: CPU-side mesh arrays, object transforms and GPU textures.
//!
//! - `mesh` holds interleaved vertex/index arrays and the vertex layout
//! - `transform` composes the per-draw model matrix
//! - `texture` wraps GPU textures, the shadow map and the fallback pixel

pub mod mesh;
pub mod texture;
pub mod transform;

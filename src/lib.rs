//! still-life
//!
//! A fixed tabletop scene (marble table, photo album, puzzle box, cork
//! backdrop and a glass bottle) lit by one warm directional light with a
//! shadow map, rendered with wgpu.
//!
//! High-level modules
//! - `backend`: the draw-call seam between scene code and the GPU, plus its wgpu implementation
//! - `camera`: fly camera, projection and the view manager writing camera uniforms
//! - `config`: window, light and asset-root settings
//! - `context`: window surface, device and queue
//! - `data_structures`: mesh arrays, transforms and GPU textures
//! - `flow`: the winit event loop and per-frame rendering
//! - `meshes`: procedural and hand-authored mesh providers
//! - `pipelines`: render pipelines and program descriptors per pass
//! - `resources`: image decoding and mip generation
//! - `scene`: texture/material registries, lights and the object layout
//! - `shader`: named-uniform shader programs
//!

pub mod backend;
pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod meshes;
pub mod pipelines;
pub mod resources;
pub mod scene;
pub mod shader;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath;
pub use wgpu;

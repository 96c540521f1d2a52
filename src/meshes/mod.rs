//! Mesh providers: fixed shapes uploaded once and drawn many times.
//!
//! Each provider owns the GPU meshes it created. `load_*` builds the vertex
//! and index arrays and hands them to the backend; `draw_*` issues an indexed
//! draw with the program currently in use. Reloading replaces (and drops) the
//! previous mesh, drawing before loading is skipped with a warning.

pub mod box_album;
pub mod box_puzzle;
pub mod half_cylinder;
pub mod shape_meshes;

use crate::{backend::GraphicsBackend, data_structures::mesh::MeshData, shader::ShaderProgram};

pub use box_album::BoxAlbumTextures;
pub use box_puzzle::BoxPuzzleTextures;
pub use half_cylinder::HalfCylinder;
pub use shape_meshes::ShapeMeshes;

pub(crate) fn load_into<B: GraphicsBackend>(
    backend: &mut B,
    slot: &mut Option<B::Mesh>,
    label: &str,
    data: &MeshData,
) {
    log::debug!(
        "Loading {label} mesh: {} vertices, {} indices",
        data.vertex_count(),
        data.index_count()
    );
    *slot = Some(backend.upload_mesh(label, data));
}

pub(crate) fn draw_from<B: GraphicsBackend>(
    backend: &mut B,
    slot: &Option<B::Mesh>,
    label: &str,
    shader: &ShaderProgram,
) {
    match slot {
        Some(mesh) => backend.draw_indexed(mesh, shader),
        None => log::warn!("{label} mesh was drawn before it was loaded"),
    }
}

//! Unit box textured from the photo album atlas.
//!
//! Atlas regions, in texture coordinates:
//!
//! | face         | u           | v            |
//! |--------------|-------------|--------------|
//! | top (cover)  | 0.0 .. 0.5  | 0.0 .. 1.0   |
//! | bottom       | 0.5 .. 1.0  | 0.5 .. 1.0   |
//! | -X (spine)   | 0.5 .. 1.0  | 0.25 .. 0.5  |
//! | other sides  | 0.5 .. 1.0  | 0.0 .. 0.25  |

use crate::{backend::GraphicsBackend, data_structures::mesh::MeshData, shader::ShaderProgram};

use super::{
    draw_from, load_into,
    shape_meshes::{FaceUvs, box_with_uvs},
};

const fn region(u0: f32, u1: f32, v0: f32, v1: f32) -> FaceUvs {
    [[u0, v0], [u1, v0], [u1, v1], [u0, v1]]
}

pub const COVER: FaceUvs = region(0.0, 0.5, 0.0, 1.0);
pub const BACK_COVER: FaceUvs = region(0.5, 1.0, 0.5, 1.0);
pub const SPINE: FaceUvs = region(0.5, 1.0, 0.25, 0.5);
pub const PAGE_EDGES: FaceUvs = region(0.5, 1.0, 0.0, 0.25);

pub fn album_box() -> MeshData {
    box_with_uvs([PAGE_EDGES, SPINE, COVER, BACK_COVER, PAGE_EDGES, PAGE_EDGES])
}

pub struct BoxAlbumTextures<M> {
    mesh: Option<M>,
}

impl<M> Default for BoxAlbumTextures<M> {
    fn default() -> Self {
        Self { mesh: None }
    }
}

impl<M> BoxAlbumTextures<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_box_mesh<B: GraphicsBackend<Mesh = M>>(&mut self, backend: &mut B) {
        load_into(backend, &mut self.mesh, "album box", &album_box());
    }

    pub fn draw_box_mesh<B: GraphicsBackend<Mesh = M>>(&self, backend: &mut B, shader: &ShaderProgram) {
        draw_from(backend, &self.mesh, "album box", shader);
    }
}

//! Unit box textured from the puzzle atlas: the side faces share the strip
//! `u 0.5..1, v 0.8145..1` and the lid shows the picture in `u 0..0.5`.

use crate::{backend::GraphicsBackend, data_structures::mesh::MeshData, shader::ShaderProgram};

use super::{draw_from, load_into};

#[rustfmt::skip]
const VERTICES: [f32; 24 * 8] = [
    // -Z
     0.5,  0.5, -0.5,   0.0,  0.0, -1.0,   0.5, 1.0,
     0.5, -0.5, -0.5,   0.0,  0.0, -1.0,   0.5, 0.8145,
    -0.5, -0.5, -0.5,   0.0,  0.0, -1.0,   1.0, 0.8145,
    -0.5,  0.5, -0.5,   0.0,  0.0, -1.0,   1.0, 1.0,
    // -Y
    -0.5, -0.5,  0.5,   0.0, -1.0,  0.0,   0.5, 1.0,
    -0.5, -0.5, -0.5,   0.0, -1.0,  0.0,   0.5, 0.0,
     0.5, -0.5, -0.5,   0.0, -1.0,  0.0,   1.0, 0.0,
     0.5, -0.5,  0.5,   0.0, -1.0,  0.0,   1.0, 1.0,
    // -X
    -0.5,  0.5, -0.5,  -1.0,  0.0,  0.0,   0.5, 1.0,
    -0.5, -0.5, -0.5,  -1.0,  0.0,  0.0,   0.5, 0.8145,
    -0.5, -0.5,  0.5,  -1.0,  0.0,  0.0,   1.0, 0.8145,
    -0.5,  0.5,  0.5,  -1.0,  0.0,  0.0,   1.0, 1.0,
    // +X
     0.5,  0.5,  0.5,   1.0,  0.0,  0.0,   0.5, 1.0,
     0.5, -0.5,  0.5,   1.0,  0.0,  0.0,   0.5, 0.8145,
     0.5, -0.5, -0.5,   1.0,  0.0,  0.0,   1.0, 0.8145,
     0.5,  0.5, -0.5,   1.0,  0.0,  0.0,   1.0, 1.0,
    // +Y
    -0.5,  0.5, -0.5,   0.0,  1.0,  0.0,   0.0, 1.0,
    -0.5,  0.5,  0.5,   0.0,  1.0,  0.0,   0.0, 0.0,
     0.5,  0.5,  0.5,   0.0,  1.0,  0.0,   0.5, 0.0,
     0.5,  0.5, -0.5,   0.0,  1.0,  0.0,   0.5, 1.0,
    // +Z
    -0.5,  0.5,  0.5,   0.0,  0.0,  1.0,   0.5, 1.0,
    -0.5, -0.5,  0.5,   0.0,  0.0,  1.0,   0.5, 0.8145,
     0.5, -0.5,  0.5,   0.0,  0.0,  1.0,   1.0, 0.8145,
     0.5,  0.5,  0.5,   0.0,  0.0,  1.0,   1.0, 1.0,
];

#[rustfmt::skip]
const INDICES: [u32; 36] = [
    0, 1, 2,    0, 3, 2,
    4, 5, 6,    4, 7, 6,
    8, 9, 10,   8, 11, 10,
    12, 13, 14, 12, 15, 14,
    16, 17, 18, 16, 19, 18,
    20, 21, 22, 20, 23, 22,
];

pub fn puzzle_box() -> MeshData {
    MeshData::new(VERTICES.to_vec(), INDICES.to_vec())
}

pub struct BoxPuzzleTextures<M> {
    mesh: Option<M>,
}

impl<M> Default for BoxPuzzleTextures<M> {
    fn default() -> Self {
        Self { mesh: None }
    }
}

impl<M> BoxPuzzleTextures<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_box_mesh<B: GraphicsBackend<Mesh = M>>(&mut self, backend: &mut B) {
        load_into(backend, &mut self.mesh, "puzzle box", &puzzle_box());
    }

    pub fn draw_box_mesh<B: GraphicsBackend<Mesh = M>>(&self, backend: &mut B, shader: &ShaderProgram) {
        draw_from(backend, &self.mesh, "puzzle box", shader);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_without_a_mesh() {
        let provider: BoxPuzzleTextures<()> = BoxPuzzleTextures::default();
        assert!(provider.mesh.is_none());
    }

    #[test]
    fn twenty_four_vertices_thirty_six_indices() {
        let mesh = puzzle_box();
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.index_count(), 36);
        assert!(mesh.indices.iter().all(|&i| i < 24));
    }

    #[test]
    fn sides_sample_the_top_strip() {
        let mesh = puzzle_box();
        for v in (0..4).chain(8..16).chain(20..24) {
            let [u, w] = mesh.uv(v);
            assert!((0.5..=1.0).contains(&u));
            assert!((0.8145..=1.0).contains(&w));
        }
        for v in 16..20 {
            assert!(mesh.uv(v)[0] <= 0.5);
        }
    }
}

//! Half of a unit cylinder cut along the XY plane.
//!
//! The curved shell covers `z >= 0`, the cut is closed by a flat face
//! pointing at `-z`, and the mesh is centred on the origin (`y` in
//! `[-0.5, 0.5]`). The album spine is one of these lying on its side.

use std::f32::consts::PI;

use crate::{backend::GraphicsBackend, data_structures::mesh::MeshData, shader::ShaderProgram};

use super::{draw_from, load_into};

const SEGMENTS: u32 = 18;

pub fn half_cylinder() -> MeshData {
    let mut mesh = MeshData::default();

    for i in 0..=SEGMENTS {
        let t = i as f32 / SEGMENTS as f32;
        let (sin, cos) = (t * PI).sin_cos();
        let normal = [cos, 0.0, sin];
        mesh.push_vertex([cos, -0.5, sin], normal, [t, 0.0]);
        mesh.push_vertex([cos, 0.5, sin], normal, [t, 1.0]);
    }
    for i in 0..SEGMENTS {
        let (b0, t0, b1, t1) = (2 * i, 2 * i + 1, 2 * i + 2, 2 * i + 3);
        mesh.push_triangle(b0, t0, t1);
        mesh.push_triangle(b0, t1, b1);
    }

    for (y, facing) in [(-0.5, -1.0), (0.5, 1.0)] {
        let normal = [0.0, facing, 0.0];
        let center = mesh.push_vertex([0.0, y, 0.0], normal, [0.5, 0.5]);
        for i in 0..=SEGMENTS {
            let (sin, cos) = (i as f32 / SEGMENTS as f32 * PI).sin_cos();
            mesh.push_vertex([cos, y, sin], normal, [0.5 + 0.5 * cos, 0.5 + 0.5 * sin]);
        }
        for i in 0..SEGMENTS {
            let (a, b) = (center + 1 + i, center + 2 + i);
            if facing > 0.0 {
                mesh.push_triangle(center, b, a);
            } else {
                mesh.push_triangle(center, a, b);
            }
        }
    }

    mesh.push_quad(
        [
            [1.0, -0.5, 0.0],
            [-1.0, -0.5, 0.0],
            [-1.0, 0.5, 0.0],
            [1.0, 0.5, 0.0],
        ],
        [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
    );
    mesh
}

pub struct HalfCylinder<M> {
    mesh: Option<M>,
}

impl<M> Default for HalfCylinder<M> {
    fn default() -> Self {
        Self { mesh: None }
    }
}

impl<M> HalfCylinder<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_cylinder_mesh<B: GraphicsBackend<Mesh = M>>(&mut self, backend: &mut B) {
        load_into(backend, &mut self.mesh, "half cylinder", &half_cylinder());
    }

    pub fn draw_cylinder_mesh<B: GraphicsBackend<Mesh = M>>(
        &self,
        backend: &mut B,
        shader: &ShaderProgram,
    ) {
        draw_from(backend, &self.mesh, "half cylinder", shader);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meshes::test_support::{assert_indices_in_range, assert_outward_winding};

    #[test]
    fn starts_without_a_mesh() {
        let provider: HalfCylinder<()> = HalfCylinder::default();
        assert!(provider.mesh.is_none());
    }

    #[test]
    fn shell_stays_in_front_of_the_cut() {
        let mesh = half_cylinder();
        assert_indices_in_range(&mesh);
        assert_outward_winding(&mesh);
        for v in 0..mesh.vertex_count() {
            let p = mesh.position(v);
            assert!(p[2] >= -1e-6, "vertex {v} at {p:?} is behind the cut");
            assert!(p[1].abs() <= 0.5);
        }
    }

    #[test]
    fn back_face_points_at_negative_z() {
        let mesh = half_cylinder();
        let last = mesh.vertex_count() - 1;
        assert_eq!(mesh.normal(last), [0.0, 0.0, -1.0]);
    }
}

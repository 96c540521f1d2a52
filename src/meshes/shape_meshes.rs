//! Basic shapes: plane, box, cylinder, tapered cylinder, torus and sphere.
//!
//! All shapes are unit sized: the plane spans `[-1, 1]` in XZ, the box
//! `[-0.5, 0.5]` on every axis, round shapes have radius 1 and the
//! cylinders stand on `y = 0` with height 1.

use std::f32::consts::PI;

use cgmath::{InnerSpace, Vector3};

use crate::{backend::GraphicsBackend, data_structures::mesh::MeshData, shader::ShaderProgram};

use super::{draw_from, load_into};

const ROUND_SEGMENTS: u32 = 36;
const SPHERE_STACKS: u32 = 18;
const TORUS_TUBE_SEGMENTS: u32 = 18;
const TORUS_TUBE_RADIUS: f32 = 0.2;

pub fn plane() -> MeshData {
    let mut mesh = MeshData::default();
    mesh.push_quad(
        [
            [-1.0, 0.0, 1.0],
            [1.0, 0.0, 1.0],
            [1.0, 0.0, -1.0],
            [-1.0, 0.0, -1.0],
        ],
        [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
    );
    mesh
}

/// Texture coordinates of one box face, counter-clockwise from its
/// lower-left corner as seen from outside.
pub type FaceUvs = [[f32; 2]; 4];

pub const FULL_FACE: FaceUvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// Faces in the order +X, -X, +Y, -Y, +Z, -Z.
pub fn box_with_uvs(uvs: [FaceUvs; 6]) -> MeshData {
    const H: f32 = 0.5;
    let faces = [
        [[H, -H, H], [H, -H, -H], [H, H, -H], [H, H, H]],
        [[-H, -H, -H], [-H, -H, H], [-H, H, H], [-H, H, -H]],
        [[-H, H, H], [H, H, H], [H, H, -H], [-H, H, -H]],
        [[-H, -H, -H], [H, -H, -H], [H, -H, H], [-H, -H, H]],
        [[-H, -H, H], [H, -H, H], [H, H, H], [-H, H, H]],
        [[H, -H, -H], [-H, -H, -H], [-H, H, -H], [H, H, -H]],
    ];
    let mut mesh = MeshData::default();
    for (corners, face_uvs) in faces.into_iter().zip(uvs) {
        mesh.push_quad(corners, face_uvs);
    }
    mesh
}

pub fn box_mesh() -> MeshData {
    box_with_uvs([FULL_FACE; 6])
}

/// A closed cone frustum standing on `y = 0`; equal radii give a cylinder.
pub fn frustum(bottom_radius: f32, top_radius: f32) -> MeshData {
    let mut mesh = MeshData::default();
    let slope = bottom_radius - top_radius;

    for i in 0..=ROUND_SEGMENTS {
        let t = i as f32 / ROUND_SEGMENTS as f32;
        let (sin, cos) = (t * 2.0 * PI).sin_cos();
        let normal: [f32; 3] = Vector3::new(cos, slope, sin).normalize().into();
        mesh.push_vertex([bottom_radius * cos, 0.0, bottom_radius * sin], normal, [t, 0.0]);
        mesh.push_vertex([top_radius * cos, 1.0, top_radius * sin], normal, [t, 1.0]);
    }
    for i in 0..ROUND_SEGMENTS {
        let (b0, t0, b1, t1) = (2 * i, 2 * i + 1, 2 * i + 2, 2 * i + 3);
        mesh.push_triangle(b0, t0, t1);
        mesh.push_triangle(b0, t1, b1);
    }

    push_cap(&mut mesh, 0.0, bottom_radius, -1.0);
    push_cap(&mut mesh, 1.0, top_radius, 1.0);
    mesh
}

fn push_cap(mesh: &mut MeshData, y: f32, radius: f32, facing: f32) {
    let normal = [0.0, facing, 0.0];
    let center = mesh.push_vertex([0.0, y, 0.0], normal, [0.5, 0.5]);
    for i in 0..=ROUND_SEGMENTS {
        let (sin, cos) = (i as f32 / ROUND_SEGMENTS as f32 * 2.0 * PI).sin_cos();
        mesh.push_vertex(
            [radius * cos, y, radius * sin],
            normal,
            [0.5 + 0.5 * cos, 0.5 + 0.5 * sin],
        );
    }
    for i in 0..ROUND_SEGMENTS {
        let (a, b) = (center + 1 + i, center + 2 + i);
        if facing > 0.0 {
            mesh.push_triangle(center, b, a);
        } else {
            mesh.push_triangle(center, a, b);
        }
    }
}

pub fn cylinder() -> MeshData {
    frustum(1.0, 1.0)
}

pub fn tapered_cylinder() -> MeshData {
    frustum(1.0, 0.5)
}

/// A ring of radius 1 around the Y axis.
pub fn torus() -> MeshData {
    let mut mesh = MeshData::default();
    let columns = TORUS_TUBE_SEGMENTS + 1;
    for i in 0..=ROUND_SEGMENTS {
        let s = i as f32 / ROUND_SEGMENTS as f32;
        let (sin_u, cos_u) = (s * 2.0 * PI).sin_cos();
        for j in 0..=TORUS_TUBE_SEGMENTS {
            let t = j as f32 / TORUS_TUBE_SEGMENTS as f32;
            let (sin_v, cos_v) = (t * 2.0 * PI).sin_cos();
            let ring = 1.0 + TORUS_TUBE_RADIUS * cos_v;
            mesh.push_vertex(
                [ring * cos_u, TORUS_TUBE_RADIUS * sin_v, ring * sin_u],
                [cos_v * cos_u, sin_v, cos_v * sin_u],
                [s, t],
            );
        }
    }
    for i in 0..ROUND_SEGMENTS {
        for j in 0..TORUS_TUBE_SEGMENTS {
            let a = i * columns + j;
            let b = a + columns;
            let c = a + 1;
            let d = b + 1;
            mesh.push_triangle(a, c, b);
            mesh.push_triangle(b, c, d);
        }
    }
    mesh
}

pub fn sphere() -> MeshData {
    let mut mesh = MeshData::default();
    let columns = ROUND_SEGMENTS + 1;
    for j in 0..=SPHERE_STACKS {
        let v = j as f32 / SPHERE_STACKS as f32;
        let (sin_phi, cos_phi) = (v * PI).sin_cos();
        // sin(PI) is slightly negative in f32; keep the south pole on the axis
        let sin_phi = sin_phi.max(0.0);
        for i in 0..=ROUND_SEGMENTS {
            let u = i as f32 / ROUND_SEGMENTS as f32;
            let (sin_theta, cos_theta) = (u * 2.0 * PI).sin_cos();
            let p = [sin_phi * cos_theta, cos_phi, sin_phi * sin_theta];
            mesh.push_vertex(p, p, [u, 1.0 - v]);
        }
    }
    for j in 0..SPHERE_STACKS {
        for i in 0..ROUND_SEGMENTS {
            let a = j * columns + i;
            let b = a + 1;
            let c = a + columns;
            let d = c + 1;
            mesh.push_triangle(a, b, c);
            mesh.push_triangle(b, d, c);
        }
    }
    mesh
}

/// Owns the GPU copies of the basic shapes.
pub struct ShapeMeshes<M> {
    plane: Option<M>,
    box_mesh: Option<M>,
    cylinder: Option<M>,
    tapered_cylinder: Option<M>,
    torus: Option<M>,
    sphere: Option<M>,
}

impl<M> Default for ShapeMeshes<M> {
    fn default() -> Self {
        Self {
            plane: None,
            box_mesh: None,
            cylinder: None,
            tapered_cylinder: None,
            torus: None,
            sphere: None,
        }
    }
}

impl<M> ShapeMeshes<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_plane_mesh<B: GraphicsBackend<Mesh = M>>(&mut self, backend: &mut B) {
        load_into(backend, &mut self.plane, "plane", &plane());
    }

    pub fn load_box_mesh<B: GraphicsBackend<Mesh = M>>(&mut self, backend: &mut B) {
        load_into(backend, &mut self.box_mesh, "box", &box_mesh());
    }

    pub fn load_cylinder_mesh<B: GraphicsBackend<Mesh = M>>(&mut self, backend: &mut B) {
        load_into(backend, &mut self.cylinder, "cylinder", &cylinder());
    }

    pub fn load_tapered_cylinder_mesh<B: GraphicsBackend<Mesh = M>>(&mut self, backend: &mut B) {
        load_into(
            backend,
            &mut self.tapered_cylinder,
            "tapered cylinder",
            &tapered_cylinder(),
        );
    }

    pub fn load_torus_mesh<B: GraphicsBackend<Mesh = M>>(&mut self, backend: &mut B) {
        load_into(backend, &mut self.torus, "torus", &torus());
    }

    pub fn load_sphere_mesh<B: GraphicsBackend<Mesh = M>>(&mut self, backend: &mut B) {
        load_into(backend, &mut self.sphere, "sphere", &sphere());
    }

    pub fn draw_plane_mesh<B: GraphicsBackend<Mesh = M>>(&self, backend: &mut B, shader: &ShaderProgram) {
        draw_from(backend, &self.plane, "plane", shader);
    }

    pub fn draw_box_mesh<B: GraphicsBackend<Mesh = M>>(&self, backend: &mut B, shader: &ShaderProgram) {
        draw_from(backend, &self.box_mesh, "box", shader);
    }

    pub fn draw_cylinder_mesh<B: GraphicsBackend<Mesh = M>>(
        &self,
        backend: &mut B,
        shader: &ShaderProgram,
    ) {
        draw_from(backend, &self.cylinder, "cylinder", shader);
    }

    pub fn draw_tapered_cylinder_mesh<B: GraphicsBackend<Mesh = M>>(
        &self,
        backend: &mut B,
        shader: &ShaderProgram,
    ) {
        draw_from(backend, &self.tapered_cylinder, "tapered cylinder", shader);
    }

    pub fn draw_torus_mesh<B: GraphicsBackend<Mesh = M>>(&self, backend: &mut B, shader: &ShaderProgram) {
        draw_from(backend, &self.torus, "torus", shader);
    }

    pub fn draw_sphere_mesh<B: GraphicsBackend<Mesh = M>>(&self, backend: &mut B, shader: &ShaderProgram) {
        draw_from(backend, &self.sphere, "sphere", shader);
    }
}

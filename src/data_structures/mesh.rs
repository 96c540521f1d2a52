//! CPU-side mesh data shared by every mesh provider.
//!
//! Vertices are stored flat, eight floats each: position (3), normal (3) and
//! texture coordinates (2). The same layout is bound at shader locations
//! 0, 1 and 2 by every pipeline, see [`MeshVertex::desc`].

use cgmath::{InnerSpace, Vector3};

pub const FLOATS_PER_POSITION: usize = 3;
pub const FLOATS_PER_NORMAL: usize = 3;
pub const FLOATS_PER_UV: usize = 2;
pub const FLOATS_PER_VERTEX: usize = FLOATS_PER_POSITION + FLOATS_PER_NORMAL + FLOATS_PER_UV;

/// Fixed vertex and index arrays that make up one drawable shape.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(vertices: Vec<f32>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / FLOATS_PER_VERTEX
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Append a vertex and return its index.
    pub fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> u32 {
        let index = self.vertex_count() as u32;
        self.vertices.extend_from_slice(&position);
        self.vertices.extend_from_slice(&normal);
        self.vertices.extend_from_slice(&uv);
        index
    }

    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Append a flat quad. Corners go counter-clockwise when seen from the
    /// side the face points to; the normal is derived from the first three.
    pub fn push_quad(&mut self, corners: [[f32; 3]; 4], uvs: [[f32; 2]; 4]) {
        let normal: [f32; 3] = triangle_normal(
            corners[0].into(),
            corners[1].into(),
            corners[2].into(),
        )
        .into();
        let first = self.push_vertex(corners[0], normal, uvs[0]);
        for i in 1..4 {
            self.push_vertex(corners[i], normal, uvs[i]);
        }
        self.push_triangle(first, first + 1, first + 2);
        self.push_triangle(first, first + 2, first + 3);
    }

    pub fn position(&self, vertex: usize) -> [f32; 3] {
        let start = vertex * FLOATS_PER_VERTEX;
        [
            self.vertices[start],
            self.vertices[start + 1],
            self.vertices[start + 2],
        ]
    }

    pub fn normal(&self, vertex: usize) -> [f32; 3] {
        let start = vertex * FLOATS_PER_VERTEX + FLOATS_PER_POSITION;
        [
            self.vertices[start],
            self.vertices[start + 1],
            self.vertices[start + 2],
        ]
    }

    pub fn uv(&self, vertex: usize) -> [f32; 2] {
        let start = vertex * FLOATS_PER_VERTEX + FLOATS_PER_POSITION + FLOATS_PER_NORMAL;
        [self.vertices[start], self.vertices[start + 1]]
    }
}

/// Unit normal of the triangle `p0 p1 p2`, computed as `(p1 - p0) x (p2 - p1)`.
///
/// Degenerate triangles yield the zero vector.
pub fn triangle_normal(p0: Vector3<f32>, p1: Vector3<f32>, p2: Vector3<f32>) -> Vector3<f32> {
    let v1 = p1 - p0;
    let v2 = p2 - p1;
    let normal = Vector3::new(
        v1.y * v2.z - v1.z * v2.y,
        v1.z * v2.x - v1.x * v2.z,
        v1.x * v2.y - v1.y * v2.x,
    );
    let len = normal.magnitude();
    if len == 0.0 {
        normal
    } else {
        normal / len
    }
}

/**
 * The GPU view of one vertex in [`MeshData::vertices`].
 *
 * Never constructed on the host; it only pins down the byte layout so the
 * flat float arrays can be uploaded as-is.
 */
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl MeshVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; FLOATS_PER_POSITION]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; FLOATS_PER_POSITION + FLOATS_PER_NORMAL]>()
                        as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

//! The seam between scene logic and the GPU.
//!
//! Mesh providers, shader programs and the scene manager only ever talk to a
//! [`GraphicsBackend`]. The application uses [`gpu::WgpuBackend`]; anything
//! else implementing the trait (e.g. a call recorder) can drive the same
//! scene code.

pub mod gpu;

use crate::{
    data_structures::mesh::MeshData,
    resources::texture::{TextureImage, Wrapping},
    shader::{ProgramDescriptor, ShaderProgram},
};

/// Handle of a compiled program, issued by [`GraphicsBackend::compile_program`].
pub type ProgramId = usize;

/// Number of texture units a backend exposes.
pub const TEXTURE_UNITS: u32 = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderPass {
    /// Depth-only pass from the light's point of view into the shadow map.
    Shadow,
    /// Camera pass into the window, clearing colour and depth.
    Main,
    /// Screen-space pass drawn over the finished main pass.
    Overlay,
}

pub trait GraphicsBackend {
    type Mesh;
    type Texture: Clone;

    fn compile_program(
        &mut self,
        descriptor: &ProgramDescriptor,
        source: &str,
    ) -> anyhow::Result<ProgramId>;

    fn upload_mesh(&mut self, label: &str, data: &MeshData) -> Self::Mesh;

    fn create_texture(
        &mut self,
        label: &str,
        image: &TextureImage,
        wrapping: Wrapping,
    ) -> Self::Texture;

    /// The depth texture the shadow pass renders into.
    fn shadow_map(&self) -> Self::Texture;

    fn bind_texture(&mut self, unit: u32, texture: &Self::Texture);

    fn use_program(&mut self, program: ProgramId);

    fn begin_pass(&mut self, pass: RenderPass);

    /// Draw `mesh` as an indexed triangle list with the program in use,
    /// reading uniform values and sampler units from `program`.
    fn draw_indexed(&mut self, mesh: &Self::Mesh, program: &ShaderProgram);

    fn end_pass(&mut self);
}

//! Depth-only pass from the light into the shadow map.

use std::path::Path;

use cgmath::{Matrix4, Vector3};

use crate::{
    backend::RenderPass,
    camera::OPENGL_TO_WGPU_MATRIX,
    config::{LightSpaceConfig, resolve_asset},
    data_structures::{mesh::MeshVertex, texture::Texture},
    shader::{ProgramDescriptor, UniformKind, UniformLayout},
};

pub fn depth_uniform_layout() -> UniformLayout {
    UniformLayout::new()
        .field("model", UniformKind::Mat4)
        .field("lightSpaceMatrix", UniformKind::Mat4)
}

pub fn depth_program(asset_root: &Path) -> ProgramDescriptor {
    ProgramDescriptor {
        label: "depth".to_string(),
        path: resolve_asset(asset_root, "shaders/depth.wgsl"),
        pass: RenderPass::Shadow,
        layout: depth_uniform_layout(),
    }
}

/// Orthographic projection times the light's view, mapping world space into
/// the shadow map's clip space.
pub fn light_space_matrix(light: &LightSpaceConfig) -> Matrix4<f32> {
    let e = light.half_extent;
    let projection = cgmath::ortho(-e, e, -e, e, light.near_plane, light.far_plane);
    let view = Matrix4::look_at_rh(light.eye, light.target, Vector3::unit_y());
    OPENGL_TO_WGPU_MATRIX * projection * view
}

pub fn mk_shadow_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
) -> wgpu::RenderPipeline {
    super::basic::mk_render_pipeline(
        device,
        Some("Shadow Pipeline"),
        layout,
        shader,
        None,
        Some(wgpu::DepthStencilState {
            format: Texture::DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState {
                constant: 2,
                slope_scale: 2.0,
                clamp: 0.0,
            },
        }),
        &[MeshVertex::desc()],
    )
}

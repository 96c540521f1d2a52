use std::path::Path;

use crate::{
    backend::RenderPass,
    config::resolve_asset,
    data_structures::mesh::MeshVertex,
    shader::{ProgramDescriptor, SamplerKind, UniformKind, UniformLayout},
};

pub fn debug_quad_program(asset_root: &Path) -> ProgramDescriptor {
    ProgramDescriptor {
        label: "debug quad".to_string(),
        path: resolve_asset(asset_root, "shaders/debug_quad.wgsl"),
        pass: RenderPass::Overlay,
        layout: UniformLayout::new()
            .field("near_plane", UniformKind::Float)
            .field("far_plane", UniformKind::Float)
            .sampler("depthMap", SamplerKind::Depth),
    }
}

/// Full-screen greyscale view of the shadow map, drawn over the frame
/// without depth testing.
pub fn mk_debug_quad_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    color_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    super::basic::mk_render_pipeline(
        device,
        Some("Debug Quad Pipeline"),
        layout,
        shader,
        Some(wgpu::ColorTargetState {
            format: color_format,
            blend: None,
            write_mask: wgpu::ColorWrites::ALL,
        }),
        None,
        &[MeshVertex::desc()],
    )
}

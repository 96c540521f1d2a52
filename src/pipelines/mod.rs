pub mod basic;
pub mod debug_quad;
pub mod shadow;

use crate::backend::RenderPass;

/// Build the render pipeline for a program drawn in `pass`.
pub fn mk_pass_pipeline(
    device: &wgpu::Device,
    pass: RenderPass,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    color_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    match pass {
        RenderPass::Shadow => shadow::mk_shadow_pipeline(device, layout, shader),
        RenderPass::Main => basic::mk_main_pipeline(device, layout, shader, color_format),
        RenderPass::Overlay => {
            debug_quad::mk_debug_quad_pipeline(device, layout, shader, color_format)
        }
    }
}

use std::path::Path;

use crate::{
    backend::RenderPass,
    config::resolve_asset,
    data_structures::{mesh::MeshVertex, texture::Texture},
    scene::MAX_LIGHTS,
    shader::{ProgramDescriptor, SamplerKind, UniformKind, UniformLayout},
};

/// Uniforms of `shaders/main.wgsl`, in the order its `Uniforms` struct
/// declares them.
pub fn main_uniform_layout() -> UniformLayout {
    UniformLayout::new()
        .field("model", UniformKind::Mat4)
        .field("view", UniformKind::Mat4)
        .field("projection", UniformKind::Mat4)
        .field("lightSpaceMatrix", UniformKind::Mat4)
        .field("objectColor", UniformKind::Vec4)
        .field("viewPosition", UniformKind::Vec3)
        .field("bUseTexture", UniformKind::Bool)
        .field("bUseLighting", UniformKind::Bool)
        .field("UVscale", UniformKind::Vec2)
        .structure(
            "material",
            &[
                ("ambientColor", UniformKind::Vec3),
                ("ambientStrength", UniformKind::Float),
                ("diffuseColor", UniformKind::Vec3),
                ("specularColor", UniformKind::Vec3),
                ("shininess", UniformKind::Float),
            ],
        )
        .struct_array(
            "lightSources",
            MAX_LIGHTS,
            &[
                ("position", UniformKind::Vec3),
                ("ambientColor", UniformKind::Vec3),
                ("diffuseColor", UniformKind::Vec3),
                ("specularColor", UniformKind::Vec3),
                ("focalStrength", UniformKind::Float),
                ("specularIntensity", UniformKind::Float),
            ],
        )
        .sampler("objectTexture", SamplerKind::Color)
        .sampler("depthMap", SamplerKind::Depth)
}

pub fn main_program(asset_root: &Path) -> ProgramDescriptor {
    ProgramDescriptor {
        label: "main".to_string(),
        path: resolve_asset(asset_root, "shaders/main.wgsl"),
        pass: RenderPass::Main,
        layout: main_uniform_layout(),
    }
}

/// Lit, textured and shadowed geometry drawn from the camera.
pub fn mk_main_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    color_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    mk_render_pipeline(
        device,
        Some("Main Pipeline"),
        layout,
        shader,
        Some(wgpu::ColorTargetState {
            format: color_format,
            blend: Some(wgpu::BlendState {
                alpha: wgpu::BlendComponent::REPLACE,
                color: wgpu::BlendComponent::REPLACE,
            }),
            write_mask: wgpu::ColorWrites::ALL,
        }),
        Some(wgpu::DepthStencilState {
            format: Texture::DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        &[MeshVertex::desc()],
    )
}

/// Shared pipeline builder. Without a colour target the fragment stage is
/// left out entirely, which is what a depth-only pass wants.
pub fn mk_render_pipeline(
    device: &wgpu::Device,
    label: Option<&str>,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    color_target: Option<wgpu::ColorTargetState>,
    depth_stencil: Option<wgpu::DepthStencilState>,
    vertex_layouts: &[wgpu::VertexBufferLayout],
) -> wgpu::RenderPipeline {
    let targets = [color_target];
    let fragment = targets[0].is_some().then(|| wgpu::FragmentState {
        module: shader,
        entry_point: Some("fs_main"),
        targets: &targets,
        compilation_options: Default::default(),
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        cache: None,
        label,
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: vertex_layouts,
            compilation_options: Default::default(),
        },
        fragment,
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // hand-authored meshes do not share one winding
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil,
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}

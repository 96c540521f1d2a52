//! wgpu implementation of [`GraphicsBackend`].
//!
//! Draws are recorded while the scene renders and encoded in one go by
//! [`WgpuBackend::finish_frame`]. Every draw gets its own slice of a shared
//! uniform buffer (bound with a dynamic offset) and one bind group per
//! sampler slot of its program, so values written between draws behave the
//! way a program's uniforms are expected to behave: each draw sees what was
//! set when it was issued.

use std::{iter, num::NonZeroU64};

use anyhow::bail;
use wgpu::util::DeviceExt;

use crate::{
    data_structures::{mesh::MeshData, texture::Texture},
    pipelines,
    resources::texture::{TextureImage, Wrapping},
    shader::{ProgramDescriptor, SamplerKind, ShaderProgram},
};

use super::{GraphicsBackend, ProgramId, RenderPass, TEXTURE_UNITS};

/// Vertex and index buffers of one uploaded mesh.
#[derive(Clone, Debug)]
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

struct CompiledProgram {
    label: String,
    pass: RenderPass,
    pipeline: wgpu::RenderPipeline,
    uniform_layout: wgpu::BindGroupLayout,
    sampler_layouts: Vec<(SamplerKind, wgpu::BindGroupLayout)>,
    uniform_size: u64,
}

struct QueuedDraw {
    program: ProgramId,
    mesh: GpuMesh,
    uniform_offset: u32,
    textures: Vec<wgpu::BindGroup>,
}

struct QueuedPass {
    pass: RenderPass,
    draws: Vec<QueuedDraw>,
}

pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    color_format: wgpu::TextureFormat,
    uniform_alignment: u64,
    programs: Vec<CompiledProgram>,
    units: Vec<Option<Texture>>,
    current_program: Option<ProgramId>,
    open_pass: Option<RenderPass>,
    passes: Vec<QueuedPass>,
    uniform_staging: Vec<u8>,
    uniform_buffer: wgpu::Buffer,
    shadow_map: Texture,
    white: Texture,
}

fn align_to(value: u64, alignment: u64) -> u64 {
    value.div_ceil(alignment) * alignment
}

fn create_uniform_buffer(device: &wgpu::Device, size: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Draw Uniforms"),
        size,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn sampler_layout(device: &wgpu::Device, kind: SamplerKind) -> wgpu::BindGroupLayout {
    let (sample_type, sampler) = match kind {
        SamplerKind::Color => (
            wgpu::TextureSampleType::Float { filterable: true },
            wgpu::SamplerBindingType::Filtering,
        ),
        SamplerKind::Depth => (
            wgpu::TextureSampleType::Depth,
            wgpu::SamplerBindingType::Comparison,
        ),
    };
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(sampler),
                count: None,
            },
        ],
        label: Some(match kind {
            SamplerKind::Color => "color_texture_layout",
            SamplerKind::Depth => "depth_texture_layout",
        }),
    })
}

fn matches_kind(texture: &Texture, kind: SamplerKind) -> bool {
    let is_depth = texture.texture.format().is_depth_stencil_format();
    match kind {
        SamplerKind::Color => !is_depth && texture.sampler.is_some(),
        SamplerKind::Depth => is_depth && texture.sampler.is_some(),
    }
}

impl WgpuBackend {
    pub fn new(
        device: wgpu::Device,
        queue: wgpu::Queue,
        color_format: wgpu::TextureFormat,
        shadow_map_size: u32,
    ) -> Self {
        let uniform_alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let shadow_map = Texture::create_depth_texture(
            &device,
            [shadow_map_size, shadow_map_size],
            "shadow_map",
        );
        let white = Texture::create_white_pixel(&device, &queue);
        let uniform_buffer = create_uniform_buffer(&device, uniform_alignment * 64);
        Self {
            device,
            queue,
            color_format,
            uniform_alignment,
            programs: Vec::new(),
            units: vec![None; TEXTURE_UNITS as usize],
            current_program: None,
            open_pass: None,
            passes: Vec::new(),
            uniform_staging: Vec::new(),
            uniform_buffer,
            shadow_map,
            white,
        }
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// The view and sampler a sampler slot of `kind` reads when pointed at
    /// `unit`. Empty, negative or mismatched units fall back to the white
    /// pixel or the shadow map.
    fn texture_for(&self, unit: i32, kind: SamplerKind) -> Option<(&wgpu::TextureView, &wgpu::Sampler)> {
        let fallback = match kind {
            SamplerKind::Color => &self.white,
            SamplerKind::Depth => &self.shadow_map,
        };
        let bound = usize::try_from(unit)
            .ok()
            .and_then(|unit| self.units.get(unit))
            .and_then(Option::as_ref);
        let texture = match bound {
            Some(texture) if matches_kind(texture, kind) => texture,
            Some(_) => {
                log::warn!("Texture unit {unit} does not hold a {kind:?} texture");
                fallback
            }
            None => fallback,
        };
        Some((&texture.view, texture.sampler.as_ref()?))
    }

    fn texture_bind_group(
        &self,
        (view, sampler): (&wgpu::TextureView, &wgpu::Sampler),
        layout: &wgpu::BindGroupLayout,
    ) -> wgpu::BindGroup {
        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
            label: None,
        })
    }

    /// Encode every pass recorded since the last frame, rendering the
    /// camera passes into `target` with `depth` as depth buffer, and submit.
    ///
    /// The first pass drawing into `target` clears it to `clear`; a frame
    /// with no such pass is still cleared.
    pub fn finish_frame(
        &mut self,
        target: &wgpu::TextureView,
        depth: &wgpu::TextureView,
        clear: wgpu::Color,
    ) {
        if self.open_pass.take().is_some() {
            log::warn!("A render pass was still open at the end of the frame");
        }

        let staged = self.uniform_staging.len() as u64;
        if staged > self.uniform_buffer.size() {
            let size = staged.next_power_of_two();
            log::debug!("Growing draw uniform buffer to {size} bytes");
            self.uniform_buffer = create_uniform_buffer(&self.device, size);
        }
        if staged > 0 {
            self.queue.write_buffer(&self.uniform_buffer, 0, &self.uniform_staging);
        }

        let uniform_groups: Vec<wgpu::BindGroup> = self
            .programs
            .iter()
            .map(|program| {
                self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    layout: &program.uniform_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                            buffer: &self.uniform_buffer,
                            offset: 0,
                            size: NonZeroU64::new(program.uniform_size),
                        }),
                    }],
                    label: Some(&program.label),
                })
            })
            .collect();

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let mut target_cleared = false;
        let mut depth_cleared = false;
        for queued in &self.passes {
            let (color, depth_attachment) = match queued.pass {
                RenderPass::Shadow => (
                    None,
                    Some(wgpu::RenderPassDepthStencilAttachment {
                        view: &self.shadow_map.view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }),
                ),
                RenderPass::Main | RenderPass::Overlay => {
                    let load = if target_cleared {
                        wgpu::LoadOp::Load
                    } else {
                        wgpu::LoadOp::Clear(clear)
                    };
                    target_cleared = true;
                    let color = Some(wgpu::RenderPassColorAttachment {
                        view: target,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load,
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    });
                    let depth_attachment = (queued.pass == RenderPass::Main).then(|| {
                        let load = if depth_cleared {
                            wgpu::LoadOp::Load
                        } else {
                            wgpu::LoadOp::Clear(1.0)
                        };
                        depth_cleared = true;
                        wgpu::RenderPassDepthStencilAttachment {
                            view: depth,
                            depth_ops: Some(wgpu::Operations {
                                load,
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        }
                    });
                    (color, depth_attachment)
                }
            };

            let color_attachments: Vec<_> = color.into_iter().map(Some).collect();
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some(match queued.pass {
                    RenderPass::Shadow => "Shadow Pass",
                    RenderPass::Main => "Main Pass",
                    RenderPass::Overlay => "Overlay Pass",
                }),
                color_attachments: &color_attachments,
                depth_stencil_attachment: depth_attachment,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            for draw in &queued.draws {
                let program = &self.programs[draw.program];
                render_pass.set_pipeline(&program.pipeline);
                render_pass.set_bind_group(0, &uniform_groups[draw.program], &[draw.uniform_offset]);
                for (slot, group) in draw.textures.iter().enumerate() {
                    render_pass.set_bind_group(slot as u32 + 1, group, &[]);
                }
                render_pass.set_vertex_buffer(0, draw.mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(draw.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..draw.mesh.index_count, 0, 0..1);
            }
        }

        if !target_cleared {
            let _ = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Clear Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
        }

        self.queue.submit(iter::once(encoder.finish()));
        self.passes.clear();
        self.uniform_staging.clear();
    }

    /// Number of draws recorded for the frame in progress.
    pub fn queued_draws(&self) -> usize {
        self.passes.iter().map(|p| p.draws.len()).sum()
    }
}

impl GraphicsBackend for WgpuBackend {
    type Mesh = GpuMesh;
    type Texture = Texture;

    fn compile_program(
        &mut self,
        descriptor: &ProgramDescriptor,
        source: &str,
    ) -> anyhow::Result<ProgramId> {
        let module = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&descriptor.label),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            });
        let info = futures::executor::block_on(module.get_compilation_info());
        let errors: Vec<String> = info
            .messages
            .iter()
            .filter(|m| matches!(m.message_type, wgpu::CompilationMessageType::Error))
            .map(|m| m.message.clone())
            .collect();
        if !errors.is_empty() {
            bail!(
                "{} failed to compile:\n{}",
                descriptor.path.display(),
                errors.join("\n")
            );
        }

        let uniform_size = descriptor.layout.size() as u64;
        let uniform_layout = self
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: NonZeroU64::new(uniform_size),
                    },
                    count: None,
                }],
                label: Some("uniform_bind_group_layout"),
            });
        let sampler_layouts: Vec<(SamplerKind, wgpu::BindGroupLayout)> = descriptor
            .layout
            .samplers()
            .iter()
            .map(|slot| (slot.kind, sampler_layout(&self.device, slot.kind)))
            .collect();

        let mut group_layouts = vec![&uniform_layout];
        group_layouts.extend(sampler_layouts.iter().map(|(_, layout)| layout));
        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(&descriptor.label),
                bind_group_layouts: &group_layouts,
                push_constant_ranges: &[],
            });
        let pipeline = pipelines::mk_pass_pipeline(
            &self.device,
            descriptor.pass,
            &pipeline_layout,
            &module,
            self.color_format,
        );

        let id = self.programs.len();
        self.programs.push(CompiledProgram {
            label: descriptor.label.clone(),
            pass: descriptor.pass,
            pipeline,
            uniform_layout,
            sampler_layouts,
            uniform_size,
        });
        Ok(id)
    }

    fn upload_mesh(&mut self, label: &str, data: &MeshData) -> GpuMesh {
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Vertex Buffer")),
                contents: bytemuck::cast_slice(&data.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Index Buffer")),
                contents: bytemuck::cast_slice(&data.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        GpuMesh {
            vertex_buffer,
            index_buffer,
            index_count: data.index_count() as u32,
        }
    }

    fn create_texture(&mut self, label: &str, image: &TextureImage, wrapping: Wrapping) -> Texture {
        Texture::from_texture_image(&self.device, &self.queue, image, Some(label), wrapping)
    }

    fn shadow_map(&self) -> Texture {
        self.shadow_map.clone()
    }

    fn bind_texture(&mut self, unit: u32, texture: &Texture) {
        match self.units.get_mut(unit as usize) {
            Some(slot) => *slot = Some(texture.clone()),
            None => log::warn!("Texture unit {unit} is out of range, {TEXTURE_UNITS} units exist"),
        }
    }

    fn use_program(&mut self, program: ProgramId) {
        if program < self.programs.len() {
            self.current_program = Some(program);
        } else {
            log::warn!("Unknown program {program}");
        }
    }

    fn begin_pass(&mut self, pass: RenderPass) {
        if let Some(open) = self.open_pass.replace(pass) {
            log::warn!("{open:?} pass was not ended before starting a {pass:?} pass");
        }
        self.passes.push(QueuedPass {
            pass,
            draws: Vec::new(),
        });
    }

    fn draw_indexed(&mut self, mesh: &GpuMesh, program: &ShaderProgram) {
        let Some(pass) = self.open_pass else {
            log::warn!("Draw with {} outside of a render pass", program.label());
            return;
        };
        let Some(current) = self.current_program else {
            log::warn!("Draw with no program in use");
            return;
        };
        if current != program.id() {
            log::warn!(
                "Draw supplied uniforms of {} while another program is in use",
                program.label()
            );
            return;
        }
        let compiled = &self.programs[current];
        if compiled.pass != pass {
            log::warn!(
                "Program {} renders in the {:?} pass, not {pass:?}",
                compiled.label,
                compiled.pass
            );
            return;
        }

        let textures: Option<Vec<wgpu::BindGroup>> = compiled
            .sampler_layouts
            .iter()
            .zip(program.sampler_units())
            .map(|((kind, layout), unit)| {
                let texture = self.texture_for(*unit, *kind)?;
                Some(self.texture_bind_group(texture, layout))
            })
            .collect();
        let Some(textures) = textures else {
            log::warn!("{}: a sampler has no texture to read, draw skipped", program.label());
            return;
        };

        let uniform_offset = self.uniform_staging.len() as u64;
        let bytes = program.uniform_bytes();
        self.uniform_staging.extend_from_slice(bytes);
        let padded = align_to(self.uniform_staging.len() as u64, self.uniform_alignment);
        self.uniform_staging.resize(padded as usize, 0);

        if let Some(queued) = self.passes.last_mut() {
            queued.draws.push(QueuedDraw {
                program: current,
                mesh: mesh.clone(),
                uniform_offset: uniform_offset as u32,
                textures,
            });
        }
    }

    fn end_pass(&mut self) {
        if self.open_pass.take().is_none() {
            log::warn!("end_pass without a matching begin_pass");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_slices_are_aligned() {
        assert_eq!(align_to(0, 256), 0);
        assert_eq!(align_to(672, 256), 768);
        assert_eq!(align_to(128, 256), 256);
        assert_eq!(align_to(512, 256), 512);
    }
}

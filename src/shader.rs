//! Named-uniform shader programs.
//!
//! A [`ShaderProgram`] pairs a compiled backend program with a host-side copy
//! of its uniform block. Values are written by name, e.g.
//! `set_mat4_value("model", m)`, into the byte offsets a [`UniformLayout`]
//! computed with WGSL uniform address-space rules. Names are looked up on
//! every call; unknown names are ignored.
//!
//! # Key types
//!
//! - [`UniformLayout`] lists the named fields and sampler slots of a program
//! - [`ProgramDescriptor`] says where the WGSL source lives and which pass it renders in
//! - [`ShaderProgram`] is the compiled program plus its current uniform values

use std::path::PathBuf;

use anyhow::Context;
use cgmath::{Matrix4, Vector2, Vector3, Vector4};

use crate::backend::{GraphicsBackend, ProgramId, RenderPass};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UniformKind {
    /// Stored as a `u32` since WGSL has no host-shareable `bool`.
    Bool,
    Int,
    Float,
    Vec2,
    Vec3,
    Vec4,
    Mat4,
}

impl UniformKind {
    pub fn size(self) -> u32 {
        match self {
            UniformKind::Bool | UniformKind::Int | UniformKind::Float => 4,
            UniformKind::Vec2 => 8,
            UniformKind::Vec3 => 12,
            UniformKind::Vec4 => 16,
            UniformKind::Mat4 => 64,
        }
    }

    pub fn align(self) -> u32 {
        match self {
            UniformKind::Bool | UniformKind::Int | UniformKind::Float => 4,
            UniformKind::Vec2 => 8,
            UniformKind::Vec3 | UniformKind::Vec4 | UniformKind::Mat4 => 16,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Mat4([[f32; 4]; 4]),
}

impl UniformValue {
    pub fn kind(&self) -> UniformKind {
        match self {
            UniformValue::Bool(_) => UniformKind::Bool,
            UniformValue::Int(_) => UniformKind::Int,
            UniformValue::Float(_) => UniformKind::Float,
            UniformValue::Vec2(_) => UniformKind::Vec2,
            UniformValue::Vec3(_) => UniformKind::Vec3,
            UniformValue::Vec4(_) => UniformKind::Vec4,
            UniformValue::Mat4(_) => UniformKind::Mat4,
        }
    }

    fn write(&self, dst: &mut [u8]) {
        match self {
            UniformValue::Bool(v) => dst.copy_from_slice(bytemuck::bytes_of(&(*v as u32))),
            UniformValue::Int(v) => dst.copy_from_slice(bytemuck::bytes_of(v)),
            UniformValue::Float(v) => dst.copy_from_slice(bytemuck::bytes_of(v)),
            UniformValue::Vec2(v) => dst.copy_from_slice(bytemuck::cast_slice(v)),
            UniformValue::Vec3(v) => dst.copy_from_slice(bytemuck::cast_slice(v)),
            UniformValue::Vec4(v) => dst.copy_from_slice(bytemuck::cast_slice(v)),
            UniformValue::Mat4(v) => dst.copy_from_slice(bytemuck::cast_slice(v)),
        }
    }

    fn read(kind: UniformKind, src: &[u8]) -> Self {
        let floats = |n: usize| -> Vec<f32> {
            src.chunks_exact(4)
                .take(n)
                .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
                .collect()
        };
        let word = || [src[0], src[1], src[2], src[3]];
        match kind {
            UniformKind::Bool => UniformValue::Bool(u32::from_ne_bytes(word()) != 0),
            UniformKind::Int => UniformValue::Int(i32::from_ne_bytes(word())),
            UniformKind::Float => UniformValue::Float(f32::from_ne_bytes(word())),
            UniformKind::Vec2 => {
                let f = floats(2);
                UniformValue::Vec2([f[0], f[1]])
            }
            UniformKind::Vec3 => {
                let f = floats(3);
                UniformValue::Vec3([f[0], f[1], f[2]])
            }
            UniformKind::Vec4 => {
                let f = floats(4);
                UniformValue::Vec4([f[0], f[1], f[2], f[3]])
            }
            UniformKind::Mat4 => {
                let f = floats(16);
                let mut m = [[0.0; 4]; 4];
                for (i, column) in m.iter_mut().enumerate() {
                    column.copy_from_slice(&f[i * 4..i * 4 + 4]);
                }
                UniformValue::Mat4(m)
            }
        }
    }
}

/// What a sampler slot expects to be bound to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SamplerKind {
    /// Filterable colour texture with a filtering sampler.
    Color,
    /// Depth texture with a comparison sampler.
    Depth,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UniformField {
    pub name: String,
    pub kind: UniformKind,
    pub offset: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SamplerSlot {
    pub name: String,
    pub kind: SamplerKind,
}

/**
 * Byte layout of a program's `var<uniform>` block plus its sampler slots.
 *
 * Built in declaration order, mirroring the WGSL struct field for field.
 * Nested structs (`material.*`) and arrays of structs (`lightSources[i].*`)
 * start on a 16 byte boundary and are padded to a multiple of 16, as WGSL
 * requires for uniform buffers. Sampler slot `k` is bound at group `k + 1`.
 */
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UniformLayout {
    fields: Vec<UniformField>,
    samplers: Vec<SamplerSlot>,
    cursor: u32,
}

fn round_up(value: u32, align: u32) -> u32 {
    value.div_ceil(align) * align
}

impl UniformLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &str, kind: UniformKind) -> Self {
        self.push(name.to_string(), kind);
        self
    }

    pub fn structure(mut self, name: &str, members: &[(&str, UniformKind)]) -> Self {
        self.push_struct(name, members);
        self
    }

    pub fn struct_array(
        mut self,
        name: &str,
        count: usize,
        members: &[(&str, UniformKind)],
    ) -> Self {
        for i in 0..count {
            self.push_struct(&format!("{name}[{i}]"), members);
        }
        self
    }

    pub fn sampler(mut self, name: &str, kind: SamplerKind) -> Self {
        self.samplers.push(SamplerSlot {
            name: name.to_string(),
            kind,
        });
        self
    }

    fn push(&mut self, name: String, kind: UniformKind) {
        let offset = round_up(self.cursor, kind.align());
        self.cursor = offset + kind.size();
        self.fields.push(UniformField { name, kind, offset });
    }

    fn push_struct(&mut self, name: &str, members: &[(&str, UniformKind)]) {
        self.cursor = round_up(self.cursor, 16);
        for (member, kind) in members {
            self.push(format!("{name}.{member}"), *kind);
        }
        self.cursor = round_up(self.cursor, 16);
    }

    /// Size of the whole block, rounded up to the struct alignment of 16.
    pub fn size(&self) -> u32 {
        round_up(self.cursor, 16).max(16)
    }

    pub fn find(&self, name: &str) -> Option<&UniformField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn fields(&self) -> &[UniformField] {
        &self.fields
    }

    pub fn samplers(&self) -> &[SamplerSlot] {
        &self.samplers
    }
}

/// Where a program's WGSL lives and how it is wired into the frame.
#[derive(Clone, Debug)]
pub struct ProgramDescriptor {
    pub label: String,
    pub path: PathBuf,
    pub pass: RenderPass,
    pub layout: UniformLayout,
}

/// A compiled program and the values currently assigned to its uniforms.
#[derive(Clone, Debug)]
pub struct ShaderProgram {
    id: ProgramId,
    label: String,
    layout: UniformLayout,
    block: Vec<u8>,
    sampler_units: Vec<i32>,
}

impl ShaderProgram {
    /// Read the WGSL file named by `descriptor` and compile it.
    ///
    /// Any failure here is meant to be fatal for the caller.
    pub fn load<B: GraphicsBackend>(
        backend: &mut B,
        descriptor: ProgramDescriptor,
    ) -> anyhow::Result<Self> {
        let source = std::fs::read_to_string(&descriptor.path).with_context(|| {
            format!(
                "could not read shader {} for program {}",
                descriptor.path.display(),
                descriptor.label
            )
        })?;
        Self::from_source(backend, descriptor, &source)
    }

    pub fn from_source<B: GraphicsBackend>(
        backend: &mut B,
        descriptor: ProgramDescriptor,
        source: &str,
    ) -> anyhow::Result<Self> {
        let id = backend
            .compile_program(&descriptor, source)
            .with_context(|| format!("could not compile program {}", descriptor.label))?;
        log::info!(
            "Compiled program {} ({} uniform bytes, {} samplers)",
            descriptor.label,
            descriptor.layout.size(),
            descriptor.layout.samplers().len()
        );
        let block = vec![0; descriptor.layout.size() as usize];
        let sampler_units = vec![-1; descriptor.layout.samplers().len()];
        Ok(Self {
            id,
            label: descriptor.label,
            layout: descriptor.layout,
            block,
            sampler_units,
        })
    }

    pub fn id(&self) -> ProgramId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn layout(&self) -> &UniformLayout {
        &self.layout
    }

    /// Make this the program subsequent draws render with.
    pub fn use_program<B: GraphicsBackend>(&self, backend: &mut B) {
        backend.use_program(self.id);
    }

    pub fn set_bool_value(&mut self, name: &str, value: bool) {
        self.set_value(name, UniformValue::Bool(value));
    }

    pub fn set_int_value(&mut self, name: &str, value: i32) {
        self.set_value(name, UniformValue::Int(value));
    }

    pub fn set_float_value(&mut self, name: &str, value: f32) {
        self.set_value(name, UniformValue::Float(value));
    }

    pub fn set_vec2_value(&mut self, name: &str, value: Vector2<f32>) {
        self.set_value(name, UniformValue::Vec2(value.into()));
    }

    pub fn set_vec3_value(&mut self, name: &str, value: Vector3<f32>) {
        self.set_value(name, UniformValue::Vec3(value.into()));
    }

    pub fn set_vec4_value(&mut self, name: &str, value: Vector4<f32>) {
        self.set_value(name, UniformValue::Vec4(value.into()));
    }

    pub fn set_mat4_value(&mut self, name: &str, value: Matrix4<f32>) {
        self.set_value(name, UniformValue::Mat4(value.into()));
    }

    /// Point the sampler `name` at a texture unit. Negative units select the
    /// backend's fallback texture.
    pub fn set_sampler2d_value(&mut self, name: &str, unit: i32) {
        match self.layout.samplers.iter().position(|s| s.name == name) {
            Some(slot) => self.sampler_units[slot] = unit,
            None => log::trace!("{}: no sampler named {name}", self.label),
        }
    }

    pub fn set_value(&mut self, name: &str, value: UniformValue) {
        let Some(field) = self.layout.find(name) else {
            log::trace!("{}: no uniform named {name}", self.label);
            return;
        };
        if field.kind != value.kind() {
            log::trace!(
                "{}: uniform {name} is {:?}, not {:?}",
                self.label,
                field.kind,
                value.kind()
            );
            return;
        }
        let start = field.offset as usize;
        let end = start + field.kind.size() as usize;
        value.write(&mut self.block[start..end]);
    }

    pub fn value(&self, name: &str) -> Option<UniformValue> {
        let field = self.layout.find(name)?;
        let start = field.offset as usize;
        let end = start + field.kind.size() as usize;
        Some(UniformValue::read(field.kind, &self.block[start..end]))
    }

    pub fn sampler_value(&self, name: &str) -> Option<i32> {
        let slot = self.layout.samplers.iter().position(|s| s.name == name)?;
        Some(self.sampler_units[slot])
    }

    /// Raw uniform block, `layout().size()` bytes long.
    pub fn uniform_bytes(&self) -> &[u8] {
        &self.block
    }

    /// Texture unit per sampler slot, in slot order.
    pub fn sampler_units(&self) -> &[i32] {
        &self.sampler_units
    }
}

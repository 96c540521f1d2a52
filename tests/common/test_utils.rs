use std::path::{Path, PathBuf};

use tempfile::TempDir;

use still_life::{
    backend::{GraphicsBackend, ProgramId, RenderPass},
    data_structures::mesh::MeshData,
    resources::texture::{TextureImage, Wrapping},
    shader::{ProgramDescriptor, ShaderProgram},
};

/// A mesh as the recorder saw it uploaded.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedMesh {
    pub label: String,
    pub vertex_count: usize,
    pub index_count: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecordedTexture {
    pub label: String,
    pub width: u32,
    pub height: u32,
    pub wrapping: Wrapping,
}

/// One draw call with a snapshot of the program's uniforms at that moment.
#[derive(Clone, Debug)]
pub struct RecordedDraw {
    pub pass: Option<RenderPass>,
    pub program: Option<ProgramId>,
    pub mesh: String,
    pub uniforms: ShaderProgram,
}

/// Backend that performs no GPU work and records every call instead.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub programs: Vec<String>,
    pub meshes: Vec<RecordedMesh>,
    pub textures: Vec<RecordedTexture>,
    pub binds: Vec<(u32, String)>,
    pub passes: Vec<RenderPass>,
    pub draws: Vec<RecordedDraw>,
    current_program: Option<ProgramId>,
    open_pass: Option<RenderPass>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draws_in(&self, pass: RenderPass) -> Vec<&RecordedDraw> {
        self.draws.iter().filter(|d| d.pass == Some(pass)).collect()
    }

    pub fn uploaded(&self, label: &str) -> Option<&RecordedMesh> {
        self.meshes.iter().find(|m| m.label == label)
    }
}

impl GraphicsBackend for RecordingBackend {
    type Mesh = RecordedMesh;
    type Texture = String;

    fn compile_program(
        &mut self,
        descriptor: &ProgramDescriptor,
        source: &str,
    ) -> anyhow::Result<ProgramId> {
        if !source.contains("vs_main") {
            anyhow::bail!("{} has no vertex entry point", descriptor.label);
        }
        self.programs.push(descriptor.label.clone());
        Ok(self.programs.len() - 1)
    }

    fn upload_mesh(&mut self, label: &str, data: &MeshData) -> RecordedMesh {
        let mesh = RecordedMesh {
            label: label.to_string(),
            vertex_count: data.vertex_count(),
            index_count: data.index_count(),
        };
        self.meshes.push(mesh.clone());
        mesh
    }

    fn create_texture(&mut self, label: &str, image: &TextureImage, wrapping: Wrapping) -> String {
        self.textures.push(RecordedTexture {
            label: label.to_string(),
            width: image.width,
            height: image.height,
            wrapping,
        });
        label.to_string()
    }

    fn shadow_map(&self) -> String {
        "shadow map".to_string()
    }

    fn bind_texture(&mut self, unit: u32, texture: &String) {
        self.binds.push((unit, texture.clone()));
    }

    fn use_program(&mut self, program: ProgramId) {
        self.current_program = Some(program);
    }

    fn begin_pass(&mut self, pass: RenderPass) {
        self.open_pass = Some(pass);
        self.passes.push(pass);
    }

    fn draw_indexed(&mut self, mesh: &RecordedMesh, program: &ShaderProgram) {
        self.draws.push(RecordedDraw {
            pass: self.open_pass,
            program: self.current_program,
            mesh: mesh.label.clone(),
            uniforms: program.clone(),
        });
    }

    fn end_pass(&mut self) {
        self.open_pass = None;
    }
}

/// A fresh directory under the system temp dir, removed on drop. Every
/// instance gets its own path, even for the same `name`.
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    pub fn new(name: &str) -> Self {
        let dir = tempfile::Builder::new()
            .prefix(&format!("still-life-{name}-"))
            .tempdir()
            .unwrap();
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a `width`x`height` image with the given channel count (3 or 4)
    /// under `relative` and return its full path.
    pub fn write_image(&self, relative: &str, width: u32, height: u32, channels: u8) -> PathBuf {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        match channels {
            3 => image::RgbImage::from_pixel(width, height, image::Rgb([200, 120, 40]))
                .save(&path)
                .unwrap(),
            4 => image::RgbaImage::from_pixel(width, height, image::Rgba([200, 120, 40, 255]))
                .save(&path)
                .unwrap(),
            1 => image::GrayImage::from_pixel(width, height, image::Luma([90]))
                .save(&path)
                .unwrap(),
            other => panic!("unsupported channel count {other}"),
        }
        path
    }

    /// Write the three WGSL programs the scene uses as minimal stand-ins.
    pub fn write_shaders(&self) {
        let dir = self.path().join("shaders");
        std::fs::create_dir_all(&dir).unwrap();
        for name in ["main.wgsl", "depth.wgsl", "debug_quad.wgsl"] {
            std::fs::write(dir.join(name), "@vertex fn vs_main() {}").unwrap();
        }
    }
}

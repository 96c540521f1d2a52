use std::path::{Path, PathBuf};

use cgmath::{Vector2, Vector3, Vector4};

use crate::{
    backend::{GraphicsBackend, RenderPass},
    config::resolve_asset,
    data_structures::{mesh::MeshData, transform::Transform},
    meshes::{BoxAlbumTextures, BoxPuzzleTextures, HalfCylinder, ShapeMeshes},
    resources::texture::{TextureImage, Wrapping},
    shader::ShaderProgram,
};

use super::{
    lights::{MAX_LIGHTS, scene_lights},
    materials::object_materials,
    registry::{Material, MaterialRegistry, TextureRegistry},
};

/// Tag the shadow map is registered under.
pub const DEPTH_MAP_TAG: &str = "depthMap";

/// Image files the scene samples, relative to the asset root.
pub const SCENE_TEXTURES: [(&str, &str, Wrapping); 6] = [
    ("Textures/album_back.jpg", "album_back", Wrapping::Repeat),
    ("Textures/album_atlas.jpg", "album", Wrapping::Repeat),
    ("Textures/album_pages.jpg", "album_pages", Wrapping::MirroredRepeat),
    ("Textures/marble.png", "marble", Wrapping::Repeat),
    ("Textures/cork.png", "cork", Wrapping::Repeat),
    ("Textures/puzzle_atlas_02.jpg", "puzzle", Wrapping::Repeat),
];

/// A full-screen quad in normalized device coordinates, `uv (0, 0)` at the
/// bottom-left.
pub fn debug_quad() -> MeshData {
    let mut mesh = MeshData::default();
    let normal = [0.0, 0.0, 1.0];
    mesh.push_vertex([-1.0, 1.0, 0.0], normal, [0.0, 1.0]);
    mesh.push_vertex([-1.0, -1.0, 0.0], normal, [0.0, 0.0]);
    mesh.push_vertex([1.0, 1.0, 0.0], normal, [1.0, 1.0]);
    mesh.push_vertex([1.0, -1.0, 0.0], normal, [1.0, 0.0]);
    mesh.push_triangle(0, 1, 2);
    mesh.push_triangle(2, 1, 3);
    mesh
}

/**
 * Owns everything the still life is drawn from: the meshes, the texture and
 * material registries and the lazily created debug quad.
 *
 * Registries are filled while preparing the scene (`&mut self`) and only read
 * while rendering (`&self`).
 */
pub struct SceneManager<B: GraphicsBackend> {
    asset_root: PathBuf,
    textures: TextureRegistry<B::Texture>,
    materials: MaterialRegistry,
    pub(super) basic_meshes: ShapeMeshes<B::Mesh>,
    pub(super) half_cylinder: HalfCylinder<B::Mesh>,
    pub(super) album_box: BoxAlbumTextures<B::Mesh>,
    pub(super) puzzle_box: BoxPuzzleTextures<B::Mesh>,
    quad: Option<B::Mesh>,
}

impl<B: GraphicsBackend> SceneManager<B> {
    pub fn new(asset_root: impl Into<PathBuf>) -> Self {
        Self {
            asset_root: asset_root.into(),
            textures: TextureRegistry::new(),
            materials: MaterialRegistry::new(),
            basic_meshes: ShapeMeshes::new(),
            half_cylinder: HalfCylinder::new(),
            album_box: BoxAlbumTextures::new(),
            puzzle_box: BoxPuzzleTextures::new(),
            quad: None,
        }
    }

    pub fn textures(&self) -> &TextureRegistry<B::Texture> {
        &self.textures
    }

    pub fn materials(&self) -> &MaterialRegistry {
        &self.materials
    }

    /// Decode the image at `path`, upload it with mipmaps and register it
    /// under `tag`.
    pub fn create_texture(
        &mut self,
        backend: &mut B,
        path: impl AsRef<Path>,
        tag: &str,
        wrapping: Wrapping,
    ) -> anyhow::Result<()> {
        self.textures.check_available(tag)?;
        let path = resolve_asset(&self.asset_root, path);
        let image = TextureImage::from_path(&path)?;
        log::info!(
            "Successfully loaded image:{}, width:{}, height:{}, channels:{}",
            path.display(),
            image.width,
            image.height,
            image.channels
        );
        let texture = backend.create_texture(tag, &image, wrapping);
        let unit = self.textures.register(tag, texture)?;
        log::debug!("Texture {tag} assigned to unit {unit}");
        Ok(())
    }

    /// Register an externally created depth texture as [`DEPTH_MAP_TAG`].
    pub fn load_depth_map_texture(&mut self, depth_map: B::Texture) -> anyhow::Result<()> {
        self.textures.register(DEPTH_MAP_TAG, depth_map)?;
        Ok(())
    }

    /// Bind every registered texture to its unit.
    pub fn bind_textures(&self, backend: &mut B) {
        for entry in self.textures.iter() {
            backend.bind_texture(entry.unit, &entry.texture);
        }
    }

    pub fn find_texture_id(&self, tag: &str) -> Option<&B::Texture> {
        self.textures.find(tag).map(|e| &e.texture)
    }

    pub fn find_texture_slot(&self, tag: &str) -> i32 {
        self.textures.slot(tag)
    }

    pub fn depth_map_slot(&self) -> i32 {
        self.find_texture_slot(DEPTH_MAP_TAG)
    }

    pub fn find_material(&self, tag: &str) -> Option<&Material> {
        self.materials.find(tag)
    }

    pub fn define_object_materials(&mut self) {
        for material in object_materials() {
            if let Err(e) = self.materials.add(material) {
                log::error!("{e}");
            }
        }
    }

    pub fn setup_scene_lights(&self, shader: &mut ShaderProgram) {
        shader.set_bool_value("bUseLighting", true);
        for (index, light) in scene_lights().iter().take(MAX_LIGHTS).enumerate() {
            light.write_to(index, shader);
        }
    }

    pub fn set_transformations(
        &self,
        scale: Vector3<f32>,
        x_rotation_degrees: f32,
        y_rotation_degrees: f32,
        z_rotation_degrees: f32,
        position: Vector3<f32>,
        shader: &mut ShaderProgram,
    ) {
        let transform = Transform::new(
            scale,
            x_rotation_degrees,
            y_rotation_degrees,
            z_rotation_degrees,
            position,
        );
        shader.set_mat4_value("model", transform.to_matrix());
    }

    pub fn set_shader_color(&self, color: Vector4<f32>, shader: &mut ShaderProgram) {
        shader.set_bool_value("bUseTexture", false);
        shader.set_sampler2d_value("objectTexture", -1);
        shader.set_vec4_value("objectColor", color);
    }

    pub fn set_shader_texture(&self, tag: &str, shader: &mut ShaderProgram) {
        let slot = self.find_texture_slot(tag);
        if slot < 0 {
            log::warn!("No texture tagged {tag}");
        }
        shader.set_bool_value("bUseTexture", true);
        shader.set_sampler2d_value("objectTexture", slot);
    }

    pub fn set_texture_uv_scale(&self, u: f32, v: f32, shader: &mut ShaderProgram) {
        shader.set_vec2_value("UVscale", Vector2::new(u, v));
    }

    pub fn set_shader_material(&self, tag: &str, shader: &mut ShaderProgram) {
        let Some(material) = self.find_material(tag) else {
            log::trace!("No material tagged {tag}");
            return;
        };
        shader.set_vec3_value("material.ambientColor", material.ambient_color);
        shader.set_float_value("material.ambientStrength", material.ambient_strength);
        shader.set_vec3_value("material.diffuseColor", material.diffuse_color);
        shader.set_vec3_value("material.specularColor", material.specular_color);
        shader.set_float_value("material.shininess", material.shininess);
    }

    pub fn set_depth_map_texture(&self, shader: &mut ShaderProgram) {
        shader.set_sampler2d_value(DEPTH_MAP_TAG, self.depth_map_slot());
    }

    /// Lights, materials and every mesh the scene draws. Run once.
    pub fn prepare_scene(&mut self, backend: &mut B, shader: &mut ShaderProgram) {
        self.setup_scene_lights(shader);
        self.define_object_materials();

        self.basic_meshes.load_plane_mesh(backend);
        self.basic_meshes.load_box_mesh(backend);
        self.basic_meshes.load_cylinder_mesh(backend);
        self.basic_meshes.load_torus_mesh(backend);
        self.basic_meshes.load_sphere_mesh(backend);
        self.basic_meshes.load_tapered_cylinder_mesh(backend);
        self.half_cylinder.load_cylinder_mesh(backend);
        self.album_box.load_box_mesh(backend);
        self.puzzle_box.load_box_mesh(backend);
    }

    /// Load the scene's image textures, register the shadow map and bind
    /// everything. Files that fail to load are logged and skipped.
    pub fn load_scene_textures(
        &mut self,
        backend: &mut B,
        depth_map: B::Texture,
        shader: &mut ShaderProgram,
    ) {
        for (path, tag, wrapping) in SCENE_TEXTURES {
            if let Err(e) = self.create_texture(backend, path, tag, wrapping) {
                log::error!("Texture {tag} was not loaded: {e:#}");
            }
        }
        if let Err(e) = self.load_depth_map_texture(depth_map) {
            log::error!("Shadow map was not registered: {e:#}");
        }
        self.bind_textures(backend);
        self.set_depth_map_texture(shader);
    }

    /// Light pass into the shadow map followed by the camera pass.
    pub fn render_scene(
        &self,
        backend: &mut B,
        main_shader: &mut ShaderProgram,
        depth_shader: &mut ShaderProgram,
    ) {
        depth_shader.use_program(backend);
        backend.begin_pass(RenderPass::Shadow);
        self.render_objects(backend, depth_shader, RenderPass::Shadow);
        backend.end_pass();

        main_shader.use_program(backend);
        backend.begin_pass(RenderPass::Main);
        self.render_objects(backend, main_shader, RenderPass::Main);
        backend.end_pass();
    }

    /// Draw a full-screen quad with `shader` over the finished frame. The
    /// quad mesh is created on first use.
    pub fn render_quad(&mut self, backend: &mut B, shader: &ShaderProgram) {
        if self.quad.is_none() {
            self.quad = Some(backend.upload_mesh("debug quad", &debug_quad()));
        }
        shader.use_program(backend);
        backend.begin_pass(RenderPass::Overlay);
        if let Some(quad) = &self.quad {
            backend.draw_indexed(quad, shader);
        }
        backend.end_pass();
    }
}

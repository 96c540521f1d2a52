//! The five objects of the still life and where they stand.
//!
//! Every render function writes `model` before each draw. Surface state
//! (texture or colour, material, UV scale) is only written in the main pass;
//! the light pass needs nothing but geometry.

use cgmath::{Vector3, Vector4};

use crate::{
    backend::{GraphicsBackend, RenderPass},
    shader::ShaderProgram,
};

use super::manager::SceneManager;

enum Surface<'a> {
    Texture(&'a str),
    Color(Vector4<f32>),
}

const BOTTLE_GLASS: Vector4<f32> = Vector4::new(0.36, 0.55, 0.42, 1.0);
const CAP_RED: Vector4<f32> = Vector4::new(0.7, 0.12, 0.1, 1.0);

impl<B: GraphicsBackend> SceneManager<B> {
    pub fn render_objects(&self, backend: &mut B, shader: &mut ShaderProgram, pass: RenderPass) {
        self.render_table(backend, shader, pass);
        self.render_album(backend, shader, pass);
        self.render_puzzle_box(backend, shader, pass);
        self.render_backdrop(backend, shader, pass);
        self.render_bottle(backend, shader, pass);
    }

    fn place(
        &self,
        shader: &mut ShaderProgram,
        scale: [f32; 3],
        rotation_degrees: [f32; 3],
        offset: Vector3<f32>,
        position: [f32; 3],
    ) {
        self.set_transformations(
            scale.into(),
            rotation_degrees[0],
            rotation_degrees[1],
            rotation_degrees[2],
            offset + Vector3::from(position),
            shader,
        );
    }

    fn surface(
        &self,
        shader: &mut ShaderProgram,
        pass: RenderPass,
        surface: Surface,
        material: &str,
        uv_scale: [f32; 2],
    ) {
        if pass != RenderPass::Main {
            return;
        }
        match surface {
            Surface::Texture(tag) => self.set_shader_texture(tag, shader),
            Surface::Color(color) => self.set_shader_color(color, shader),
        }
        self.set_texture_uv_scale(uv_scale[0], uv_scale[1], shader);
        self.set_shader_material(material, shader);
    }

    pub fn render_table(&self, backend: &mut B, shader: &mut ShaderProgram, pass: RenderPass) {
        let origin = Vector3::new(0.0, 0.0, 0.0);
        self.place(shader, [20.0, 1.0, 10.0], [0.0; 3], origin, [0.0, 0.0, 3.0]);
        self.surface(shader, pass, Surface::Texture("marble"), "marble", [1.0, 1.0]);
        self.basic_meshes.draw_plane_mesh(backend, shader);
    }

    /// A closed photo album lying flat, spine to the left.
    pub fn render_album(&self, backend: &mut B, shader: &mut ShaderProgram, pass: RenderPass) {
        let album = Vector3::new(-5.0, 0.0, 5.0);

        // back cover
        self.place(shader, [4.0, 0.08, 5.0], [0.0; 3], album, [0.0, 0.04, 0.0]);
        self.surface(shader, pass, Surface::Texture("album_back"), "cloth", [1.0, 1.0]);
        self.basic_meshes.draw_box_mesh(backend, shader);

        // pages
        self.place(shader, [3.8, 0.64, 4.8], [0.0; 3], album, [0.1, 0.4, 0.0]);
        self.surface(shader, pass, Surface::Texture("album_pages"), "puzzle", [2.0, 1.0]);
        self.basic_meshes.draw_box_mesh(backend, shader);

        // front cover
        self.place(shader, [4.0, 0.08, 5.0], [0.0; 3], album, [0.0, 0.76, 0.0]);
        self.surface(shader, pass, Surface::Texture("album"), "cloth", [1.0, 1.0]);
        self.album_box.draw_box_mesh(backend, shader);

        // spine
        self.place(shader, [0.4, 5.0, 0.4], [90.0, -90.0, 0.0], album, [-2.0, 0.4, 0.0]);
        self.surface(shader, pass, Surface::Texture("album_back"), "cloth", [1.0, 1.0]);
        self.half_cylinder.draw_cylinder_mesh(backend, shader);
    }

    pub fn render_puzzle_box(&self, backend: &mut B, shader: &mut ShaderProgram, pass: RenderPass) {
        let puzzle_box = Vector3::new(1.5, 0.0, 6.0);

        // lower section
        self.place(shader, [5.0, 0.3, 5.0], [0.0, 24.0, 0.0], puzzle_box, [0.0, 0.15, 0.0]);
        self.surface(shader, pass, Surface::Texture("puzzle"), "puzzle", [1.0, 1.0]);
        self.basic_meshes.draw_box_mesh(backend, shader);

        // upper section
        self.place(shader, [5.1, 1.3, 5.1], [0.0, 24.0, 0.0], puzzle_box, [0.0, 0.8, 0.0]);
        self.surface(shader, pass, Surface::Texture("puzzle"), "puzzle", [1.0, 1.0]);
        self.puzzle_box.draw_box_mesh(backend, shader);
    }

    /// Cork board standing along the back edge of the table.
    pub fn render_backdrop(&self, backend: &mut B, shader: &mut ShaderProgram, pass: RenderPass) {
        let origin = Vector3::new(0.0, 0.0, 0.0);
        self.place(shader, [20.0, 1.0, 7.0], [90.0, 0.0, 0.0], origin, [0.0, 7.0, -7.0]);
        self.surface(shader, pass, Surface::Texture("cork"), "cork", [4.0, 1.5]);
        self.basic_meshes.draw_plane_mesh(backend, shader);
    }

    pub fn render_bottle(&self, backend: &mut B, shader: &mut ShaderProgram, pass: RenderPass) {
        let bottle = Vector3::new(5.5, 0.0, 1.5);

        // body
        self.place(shader, [0.9, 3.0, 0.9], [0.0; 3], bottle, [0.0, 0.0, 0.0]);
        self.surface(shader, pass, Surface::Color(BOTTLE_GLASS), "glass", [1.0, 1.0]);
        self.basic_meshes.draw_cylinder_mesh(backend, shader);

        // shoulder
        self.place(shader, [0.9, 0.8, 0.9], [0.0; 3], bottle, [0.0, 3.0, 0.0]);
        self.surface(shader, pass, Surface::Color(BOTTLE_GLASS), "glass", [1.0, 1.0]);
        self.basic_meshes.draw_tapered_cylinder_mesh(backend, shader);

        // neck
        self.place(shader, [0.3, 1.0, 0.3], [0.0; 3], bottle, [0.0, 3.8, 0.0]);
        self.surface(shader, pass, Surface::Color(BOTTLE_GLASS), "glass", [1.0, 1.0]);
        self.basic_meshes.draw_cylinder_mesh(backend, shader);

        // lip
        self.place(shader, [0.3, 0.3, 0.3], [0.0; 3], bottle, [0.0, 4.8, 0.0]);
        self.surface(shader, pass, Surface::Color(BOTTLE_GLASS), "glass", [1.0, 1.0]);
        self.basic_meshes.draw_torus_mesh(backend, shader);

        // stopper
        self.place(shader, [0.25, 0.35, 0.25], [0.0; 3], bottle, [0.0, 4.7, 0.0]);
        self.surface(shader, pass, Surface::Texture("cork"), "cork", [1.0, 1.0]);
        self.basic_meshes.draw_cylinder_mesh(backend, shader);

        // cap
        self.place(shader, [0.28, 0.12, 0.28], [0.0; 3], bottle, [0.0, 5.05, 0.0]);
        self.surface(shader, pass, Surface::Color(CAP_RED), "plastic", [1.0, 1.0]);
        self.basic_meshes.draw_sphere_mesh(backend, shader);
    }
}

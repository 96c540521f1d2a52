mod common;

use cgmath::{Matrix4, SquareMatrix, Vector3, Vector4};
use common::test_utils::{RecordingBackend, ScratchDir};
use still_life::{
    backend::RenderPass,
    pipelines::{basic, shadow},
    resources::texture::Wrapping,
    scene::{DEPTH_MAP_TAG, SCENE_TEXTURES, SceneManager},
    shader::{ShaderProgram, UniformValue},
};

const STUB_WGSL: &str = "@vertex fn vs_main() {}";

fn programs(
    backend: &mut RecordingBackend,
    root: &std::path::Path,
) -> (ShaderProgram, ShaderProgram) {
    let main = ShaderProgram::from_source(backend, basic::main_program(root), STUB_WGSL).unwrap();
    let depth = ShaderProgram::from_source(backend, shadow::depth_program(root), STUB_WGSL).unwrap();
    (main, depth)
}

fn write_scene_textures(dir: &ScratchDir) {
    for (path, _, _) in SCENE_TEXTURES {
        let channels = if path.ends_with(".png") { 4 } else { 3 };
        dir.write_image(path, 8, 4, channels);
    }
}

#[test]
fn prepare_scene_uploads_every_mesh_once() {
    let dir = ScratchDir::new("prepare");
    let mut backend = RecordingBackend::new();
    let (mut main, _) = programs(&mut backend, dir.path());
    let mut scene = SceneManager::<RecordingBackend>::new(dir.path());

    scene.prepare_scene(&mut backend, &mut main);

    let labels: Vec<&str> = backend.meshes.iter().map(|m| m.label.as_str()).collect();
    for expected in [
        "plane",
        "box",
        "cylinder",
        "torus",
        "sphere",
        "tapered cylinder",
        "half cylinder",
        "album box",
        "puzzle box",
    ] {
        assert_eq!(labels.iter().filter(|l| **l == expected).count(), 1, "{expected}");
    }
    assert_eq!(backend.uploaded("puzzle box").unwrap().vertex_count, 24);
    assert_eq!(backend.uploaded("puzzle box").unwrap().index_count, 36);
    assert_eq!(scene.materials().len(), 6);
    assert_eq!(main.value("bUseLighting"), Some(UniformValue::Bool(true)));
    assert_eq!(
        main.value("lightSources[0].position"),
        Some(UniformValue::Vec3([-10.0, 4.0, 0.0]))
    );
}

#[test]
fn scene_textures_get_units_in_load_order() {
    let dir = ScratchDir::new("textures");
    write_scene_textures(&dir);
    let mut backend = RecordingBackend::new();
    let (mut main, _) = programs(&mut backend, dir.path());
    let mut scene = SceneManager::<RecordingBackend>::new(dir.path());

    let shadow_map = "shadow map".to_string();
    scene.load_scene_textures(&mut backend, shadow_map, &mut main);

    assert_eq!(scene.textures().len(), SCENE_TEXTURES.len() + 1);
    for (unit, (_, tag, _)) in SCENE_TEXTURES.iter().enumerate() {
        assert_eq!(scene.find_texture_slot(tag), unit as i32);
    }
    assert_eq!(scene.depth_map_slot(), SCENE_TEXTURES.len() as i32);
    assert_eq!(main.sampler_value("depthMap"), Some(SCENE_TEXTURES.len() as i32));

    let bound: Vec<(u32, &str)> = backend.binds.iter().map(|(u, t)| (*u, t.as_str())).collect();
    assert_eq!(bound[0], (0, "album_back"));
    assert_eq!(bound[6], (6, "shadow map"));

    let pages = backend.textures.iter().find(|t| t.label == "album_pages").unwrap();
    assert_eq!(pages.wrapping, Wrapping::MirroredRepeat);
    assert_eq!((pages.width, pages.height), (8, 4));
}

#[test]
fn missing_files_are_skipped_and_leave_the_registry_alone() {
    let dir = ScratchDir::new("missing");
    let mut backend = RecordingBackend::new();
    let mut scene = SceneManager::<RecordingBackend>::new(dir.path());

    let err = scene
        .create_texture(&mut backend, "Textures/nope.png", "nope", Wrapping::Repeat)
        .unwrap_err();
    assert!(format!("{err:#}").contains("nope.png"));
    assert!(scene.textures().is_empty());
    assert!(backend.textures.is_empty());

    // the shadow map still lands in the first free unit
    let (mut main, _) = programs(&mut backend, dir.path());
    scene.load_scene_textures(&mut backend, "shadow map".to_string(), &mut main);
    assert_eq!(scene.textures().len(), 1);
    assert_eq!(scene.depth_map_slot(), 0);
    assert_eq!(scene.find_texture_id(DEPTH_MAP_TAG).map(String::as_str), Some("shadow map"));
}

#[test]
fn single_channel_images_are_rejected() {
    let dir = ScratchDir::new("grey");
    dir.write_image("Textures/grey.png", 4, 4, 1);
    let mut backend = RecordingBackend::new();
    let mut scene = SceneManager::<RecordingBackend>::new(dir.path());

    let err = scene
        .create_texture(&mut backend, "Textures/grey.png", "grey", Wrapping::Repeat)
        .unwrap_err();
    assert!(format!("{err:#}").contains("1 channels"));
    assert_eq!(scene.find_texture_slot("grey"), -1);
}

#[test]
fn duplicate_tags_are_refused_before_decoding() {
    let dir = ScratchDir::new("duplicate");
    dir.write_image("a.png", 2, 2, 4);
    let mut backend = RecordingBackend::new();
    let mut scene = SceneManager::<RecordingBackend>::new(dir.path());

    scene.create_texture(&mut backend, "a.png", "a", Wrapping::Repeat).unwrap();
    assert!(scene.create_texture(&mut backend, "a.png", "a", Wrapping::Repeat).is_err());
    assert_eq!(backend.textures.len(), 1);
    assert_eq!(scene.textures().len(), 1);
}

#[test]
fn render_scene_draws_every_object_in_both_passes() {
    let dir = ScratchDir::new("render");
    write_scene_textures(&dir);
    let mut backend = RecordingBackend::new();
    let (mut main, mut depth) = programs(&mut backend, dir.path());
    let mut scene = SceneManager::<RecordingBackend>::new(dir.path());
    scene.prepare_scene(&mut backend, &mut main);
    scene.load_scene_textures(&mut backend, "shadow map".to_string(), &mut main);

    scene.render_scene(&mut backend, &mut main, &mut depth);

    assert_eq!(backend.passes, vec![RenderPass::Shadow, RenderPass::Main]);
    let shadow_draws = backend.draws_in(RenderPass::Shadow);
    let main_draws = backend.draws_in(RenderPass::Main);
    assert_eq!(shadow_draws.len(), 14);
    assert_eq!(main_draws.len(), 14);
    assert!(shadow_draws.iter().all(|d| d.program == Some(depth.id())));
    assert!(main_draws.iter().all(|d| d.program == Some(main.id())));

    let meshes: Vec<&str> = main_draws.iter().map(|d| d.mesh.as_str()).collect();
    let shadow_meshes: Vec<&str> = shadow_draws.iter().map(|d| d.mesh.as_str()).collect();
    assert_eq!(meshes, shadow_meshes);
    assert_eq!(meshes[0], "plane");
    assert_eq!(meshes[3], "album box");
    assert_eq!(meshes[4], "half cylinder");
    assert_eq!(meshes[6], "puzzle box");
    assert_eq!(meshes[13], "sphere");

    // table: T(0, 0, 3) * S(20, 1, 10), marble texture and material
    let table = &main_draws[0].uniforms;
    let Some(UniformValue::Mat4(model)) = table.value("model") else {
        panic!("table has no model matrix");
    };
    assert_eq!(model[0], [20.0, 0.0, 0.0, 0.0]);
    assert_eq!(model[3], [0.0, 0.0, 3.0, 1.0]);
    assert_eq!(table.value("bUseTexture"), Some(UniformValue::Bool(true)));
    assert_eq!(
        table.sampler_value("objectTexture"),
        Some(scene.find_texture_slot("marble"))
    );
    assert_eq!(table.value("material.shininess"), Some(UniformValue::Float(0.2)));

    // the light pass writes geometry only
    let table_depth = &shadow_draws[0].uniforms;
    assert_eq!(table_depth.value("model"), table.value("model"));
    assert!(table_depth.value("bUseTexture").is_none());

    // bottle body is flat coloured glass
    let body = &main_draws[8].uniforms;
    assert_eq!(main_draws[8].mesh, "cylinder");
    assert_eq!(body.value("bUseTexture"), Some(UniformValue::Bool(false)));
    assert!(matches!(body.value("objectColor"), Some(UniformValue::Vec4(_))));
    assert_eq!(body.value("material.shininess"), Some(UniformValue::Float(85.0)));
    assert_eq!(body.sampler_value("objectTexture"), Some(-1));

    // mesh, texture tag (None for flat colour), shininess per main draw
    let expected: [(&str, Option<&str>, f32); 14] = [
        ("plane", Some("marble"), 0.2),
        ("box", Some("album_back"), 0.5),
        ("box", Some("album_pages"), 0.5),
        ("album box", Some("album"), 0.5),
        ("half cylinder", Some("album_back"), 0.5),
        ("box", Some("puzzle"), 0.5),
        ("puzzle box", Some("puzzle"), 0.5),
        ("plane", Some("cork"), 0.5),
        ("cylinder", None, 85.0),
        ("tapered cylinder", None, 85.0),
        ("cylinder", None, 85.0),
        ("torus", None, 85.0),
        ("cylinder", Some("cork"), 0.5),
        ("sphere", None, 0.25),
    ];
    let identity = UniformValue::Mat4(Matrix4::<f32>::identity().into());
    for (index, (draw, (mesh, texture, shininess))) in main_draws.iter().zip(expected).enumerate() {
        let uniforms = &draw.uniforms;
        assert_eq!(draw.mesh, mesh, "draw {index}");
        let model = uniforms.value("model");
        assert!(matches!(model, Some(UniformValue::Mat4(_))), "draw {index} has no model");
        assert_ne!(model, Some(identity), "draw {index} was never placed");
        assert_eq!(shadow_draws[index].uniforms.value("model"), model, "draw {index}");
        assert_eq!(
            uniforms.value("bUseTexture"),
            Some(UniformValue::Bool(texture.is_some())),
            "draw {index}"
        );
        match texture {
            Some(tag) => {
                let slot = scene.find_texture_slot(tag);
                assert!(slot >= 0, "{tag} was not loaded");
                assert_eq!(uniforms.sampler_value("objectTexture"), Some(slot), "draw {index}");
            }
            None => {
                assert_eq!(uniforms.sampler_value("objectTexture"), Some(-1), "draw {index}");
                assert!(matches!(uniforms.value("objectColor"), Some(UniformValue::Vec4(_))));
            }
        }
        assert_eq!(
            uniforms.value("material.shininess"),
            Some(UniformValue::Float(shininess)),
            "draw {index}"
        );
    }
}

#[test]
fn debug_quad_is_created_once_and_drawn_in_the_overlay_pass() {
    let dir = ScratchDir::new("quad");
    let mut backend = RecordingBackend::new();
    let quad_program = still_life::pipelines::debug_quad::debug_quad_program(dir.path());
    let quad = ShaderProgram::from_source(&mut backend, quad_program, STUB_WGSL).unwrap();
    let mut scene = SceneManager::<RecordingBackend>::new(dir.path());

    scene.render_quad(&mut backend, &quad);
    scene.render_quad(&mut backend, &quad);

    let uploads = backend.meshes.iter().filter(|m| m.label == "debug quad").count();
    assert_eq!(uploads, 1);
    assert_eq!(backend.uploaded("debug quad").unwrap().vertex_count, 4);
    assert_eq!(backend.uploaded("debug quad").unwrap().index_count, 6);
    assert_eq!(backend.draws_in(RenderPass::Overlay).len(), 2);
}

#[test]
fn shader_state_helpers_write_named_uniforms() {
    let dir = ScratchDir::new("helpers");
    let mut backend = RecordingBackend::new();
    let (mut main, _) = programs(&mut backend, dir.path());
    let mut scene = SceneManager::<RecordingBackend>::new(dir.path());
    scene.define_object_materials();

    scene.set_shader_texture("never-loaded", &mut main);
    assert_eq!(main.sampler_value("objectTexture"), Some(-1));
    assert_eq!(main.value("bUseTexture"), Some(UniformValue::Bool(true)));

    main.set_sampler2d_value("objectTexture", 3);
    scene.set_shader_color(Vector4::new(1.0, 0.0, 0.0, 1.0), &mut main);
    assert_eq!(main.value("bUseTexture"), Some(UniformValue::Bool(false)));
    assert_eq!(main.sampler_value("objectTexture"), Some(-1));
    assert_eq!(main.value("objectColor"), Some(UniformValue::Vec4([1.0, 0.0, 0.0, 1.0])));

    scene.set_texture_uv_scale(3.0, 1.5, &mut main);
    assert_eq!(main.value("UVscale"), Some(UniformValue::Vec2([3.0, 1.5])));

    scene.set_shader_material("cork", &mut main);
    scene.set_shader_material("unobtainium", &mut main);
    assert_eq!(main.value("material.shininess"), Some(UniformValue::Float(0.5)));
    assert_eq!(
        main.value("material.ambientColor"),
        Some(UniformValue::Vec3([0.2, 0.2, 0.2]))
    );

    scene.set_transformations(
        Vector3::new(1.0, 1.0, 1.0),
        0.0,
        0.0,
        0.0,
        Vector3::new(4.0, 5.0, 6.0),
        &mut main,
    );
    let Some(UniformValue::Mat4(model)) = main.value("model") else {
        panic!("no model matrix");
    };
    assert_eq!(model[3], [4.0, 5.0, 6.0, 1.0]);
}

#[test]
fn scratch_dirs_with_the_same_name_are_independent() {
    let first = ScratchDir::new("shared");
    let second = ScratchDir::new("shared");
    assert_ne!(first.path(), second.path());

    let image = second.write_image("Textures/kept.png", 2, 2, 4);
    drop(first);

    assert!(image.exists());
    assert!(second.path().exists());
}

#[cfg(feature = "integration-tests")]
mod common;

#[cfg(feature = "integration-tests")]
mod gpu {
    use std::{path::Path, time::Duration};

    use still_life::{
        backend::{GraphicsBackend, gpu::WgpuBackend},
        camera::ViewManager,
        config::SceneConfig,
        data_structures::texture::Texture,
        pipelines::{basic, debug_quad, shadow},
        scene::SceneManager,
        shader::ShaderProgram,
    };

    const WIDTH: u32 = 64;
    const HEIGHT: u32 = 64;
    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
    const MAGENTA: wgpu::Color = wgpu::Color {
        r: 1.0,
        g: 0.0,
        b: 1.0,
        a: 1.0,
    };

    /// Headless device, or `None` on machines without any adapter.
    fn device() -> Option<(wgpu::Device, wgpu::Queue)> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        futures::executor::block_on(async {
            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions::default())
                .await
                .ok()?;
            adapter
                .request_device(&wgpu::DeviceDescriptor::default())
                .await
                .ok()
        })
    }

    fn target(device: &wgpu::Device) -> wgpu::Texture {
        device.create_texture(&wgpu::TextureDescriptor {
            label: Some("offscreen target"),
            size: wgpu::Extent3d {
                width: WIDTH,
                height: HEIGHT,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        })
    }

    fn read_back(device: &wgpu::Device, queue: &wgpu::Queue, texture: &wgpu::Texture) -> Vec<[u8; 4]> {
        let bytes_per_row = 4 * WIDTH;
        let output_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            size: (bytes_per_row * HEIGHT) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            label: None,
            mapped_at_creation: false,
        });
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &output_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(bytes_per_row),
                    rows_per_image: Some(HEIGHT),
                },
            },
            texture.size(),
        );
        queue.submit(std::iter::once(encoder.finish()));

        futures::executor::block_on(async {
            let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
            let buffer_slice = output_buffer.slice(..);
            buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
                tx.send(result).unwrap();
            });
            device
                .poll(wgpu::PollType::Wait {
                    submission_index: None,
                    timeout: Some(Duration::from_secs(3)),
                })
                .unwrap();
            rx.receive().await.unwrap().unwrap();
            let data = buffer_slice.get_mapped_range();
            data.chunks_exact(4)
                .map(|px| [px[0], px[1], px[2], px[3]])
                .collect()
        })
    }

    #[test]
    fn an_empty_frame_is_cleared() {
        let Some((device, queue)) = device() else {
            eprintln!("no graphics adapter, skipping");
            return;
        };
        let mut backend = WgpuBackend::new(device.clone(), queue.clone(), FORMAT, 256);
        let texture = target(&device);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let depth = Texture::create_depth_texture(&device, [WIDTH, HEIGHT], "depth");

        backend.finish_frame(&view, &depth.view, MAGENTA);

        let pixels = read_back(&device, &queue, &texture);
        assert!(pixels.iter().all(|px| *px == [255, 0, 255, 255]));
    }

    #[test]
    fn the_scene_renders_with_the_shipped_shaders() {
        let Some((device, queue)) = device() else {
            eprintln!("no graphics adapter, skipping");
            return;
        };
        let config = SceneConfig::default();
        let root = Path::new(env!("CARGO_MANIFEST_DIR"));
        let mut backend = WgpuBackend::new(device.clone(), queue.clone(), FORMAT, config.shadow_map_size);

        let mut main = ShaderProgram::load(&mut backend, basic::main_program(root)).unwrap();
        let mut depth_program = ShaderProgram::load(&mut backend, shadow::depth_program(root)).unwrap();
        let mut quad = ShaderProgram::load(&mut backend, debug_quad::debug_quad_program(root)).unwrap();
        let light_space = shadow::light_space_matrix(&config.light);
        main.set_mat4_value("lightSpaceMatrix", light_space);
        depth_program.set_mat4_value("lightSpaceMatrix", light_space);
        quad.set_float_value("near_plane", config.light.near_plane);
        quad.set_float_value("far_plane", config.light.far_plane);

        // no textures on disk here; textured objects sample the white fallback
        let scratch = crate::common::test_utils::ScratchDir::new("gpu");
        let mut scene = SceneManager::new(scratch.path());
        scene.prepare_scene(&mut backend, &mut main);
        let shadow_map = backend.shadow_map();
        scene.load_scene_textures(&mut backend, shadow_map, &mut main);
        quad.set_sampler2d_value("depthMap", scene.depth_map_slot());

        let view_manager = ViewManager::new(config.camera_position, WIDTH, HEIGHT);
        view_manager.prepare_scene_view(&mut main);
        scene.render_scene(&mut backend, &mut main, &mut depth_program);
        assert_eq!(backend.queued_draws(), 28);
        scene.render_quad(&mut backend, &quad);
        assert_eq!(backend.queued_draws(), 29);

        let texture = target(&device);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let depth = Texture::create_depth_texture(&device, [WIDTH, HEIGHT], "depth");
        backend.finish_frame(&view, &depth.view, MAGENTA);
        assert_eq!(backend.queued_draws(), 0);

        let pixels = read_back(&device, &queue, &texture);
        assert!(pixels.iter().any(|px| *px != [255, 0, 255, 255]));
    }
}

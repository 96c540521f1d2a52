//! Application event loop.
//!
//! [`run`] opens the window, builds the GPU context, compiles the three
//! programs and prepares the scene, then renders a frame per redraw until the
//! window is closed or Escape is pressed.
//!
//! # Controls
//!
//! - W/S, A/D, Q/E move the camera; hold the right mouse button to look around
//! - the scroll wheel changes the movement speed
//! - P and O switch between perspective and orthographic projection
//! - M shows or hides the shadow map over the scene

use std::sync::Arc;

use instant::Instant;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use crate::{
    backend::{GraphicsBackend, gpu::WgpuBackend},
    camera::ViewManager,
    config::SceneConfig,
    context::Context,
    pipelines::{basic, debug_quad, shadow},
    scene::SceneManager,
    shader::ShaderProgram,
};

/// Everything that lives as long as the window.
pub struct AppState {
    ctx: Context,
    backend: WgpuBackend,
    scene: SceneManager<WgpuBackend>,
    view: ViewManager,
    main_shader: ShaderProgram,
    depth_shader: ShaderProgram,
    quad_shader: ShaderProgram,
    clear_colour: wgpu::Color,
    show_depth_map: bool,
    looking_around: bool,
    is_surface_configured: bool,
}

impl AppState {
    async fn new(window: Arc<Window>, config: &SceneConfig) -> anyhow::Result<Self> {
        let ctx = Context::new(window).await?;
        let mut backend = WgpuBackend::new(
            ctx.device.clone(),
            ctx.queue.clone(),
            ctx.config.format,
            config.shadow_map_size,
        );

        let root = config.asset_root.as_path();
        let mut main_shader = ShaderProgram::load(&mut backend, basic::main_program(root))?;
        let mut depth_shader = ShaderProgram::load(&mut backend, shadow::depth_program(root))?;
        let mut quad_shader =
            ShaderProgram::load(&mut backend, debug_quad::debug_quad_program(root))?;

        let light_space = shadow::light_space_matrix(&config.light);
        main_shader.set_mat4_value("lightSpaceMatrix", light_space);
        depth_shader.set_mat4_value("lightSpaceMatrix", light_space);
        quad_shader.set_float_value("near_plane", config.light.near_plane);
        quad_shader.set_float_value("far_plane", config.light.far_plane);

        let mut scene = SceneManager::new(root);
        scene.prepare_scene(&mut backend, &mut main_shader);
        let shadow_map = backend.shadow_map();
        scene.load_scene_textures(&mut backend, shadow_map, &mut main_shader);
        quad_shader.set_sampler2d_value("depthMap", scene.depth_map_slot());

        let view = ViewManager::new(config.camera_position, ctx.config.width, ctx.config.height);

        Ok(Self {
            ctx,
            backend,
            scene,
            view,
            main_shader,
            depth_shader,
            quad_shader,
            clear_colour: config.clear_colour,
            show_depth_map: config.show_depth_map,
            looking_around: false,
            is_surface_configured: false,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.resize(width, height);
            self.view.resize(width, height);
            self.is_surface_configured = true;
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.ctx.window.request_redraw();

        if !self.is_surface_configured {
            return Ok(());
        }

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.view.prepare_scene_view(&mut self.main_shader);
        self.scene.render_scene(
            &mut self.backend,
            &mut self.main_shader,
            &mut self.depth_shader,
        );
        if self.show_depth_map {
            self.scene.render_quad(&mut self.backend, &self.quad_shader);
        }
        self.backend
            .finish_frame(&view, &self.ctx.depth_texture.view, self.clear_colour);

        output.present();
        Ok(())
    }
}

pub struct App {
    async_runtime: tokio::runtime::Runtime,
    config: SceneConfig,
    state: Option<AppState>,
    last_time: Instant,
    init_error: Option<anyhow::Error>,
}

impl App {
    fn new(config: SceneConfig) -> anyhow::Result<Self> {
        Ok(Self {
            async_runtime: tokio::runtime::Runtime::new()?,
            config,
            state: None,
            last_time: Instant::now(),
            init_error: None,
        })
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        let attributes = Window::default_attributes().with_title(self.config.window_title.clone());
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.init_error = Some(anyhow::Error::new(e).context("could not open a window"));
                event_loop.exit();
                return;
            }
        };

        let init = AppState::new(window, &self.config);
        match self.async_runtime.block_on(init) {
            Ok(mut state) => {
                let size = state.ctx.window().inner_size();
                state.resize(size.width, size.height);
                state.ctx.window().request_redraw();
                self.last_time = Instant::now();
                self.state = Some(state);
            }
            Err(e) => {
                log::error!("Initialization failed: {e:#}");
                self.init_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            if state.looking_around {
                state.view.handle_mouse(dx, dy);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        state.view.handle_window_events(&event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match key {
                KeyCode::Escape => event_loop.exit(),
                KeyCode::KeyM => {
                    state.show_depth_map = !state.show_depth_map;
                    log::info!("Shadow map overlay {}", if state.show_depth_map { "on" } else { "off" });
                }
                _ => (),
            },
            WindowEvent::MouseInput {
                state: button_state,
                button: MouseButton::Right,
                ..
            } => state.looking_around = button_state.is_pressed(),
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();
                state.view.update(dt);

                match state.render() {
                    Ok(()) => (),
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window().inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Open the window and run the still life until it is closed.
pub fn run(config: SceneConfig) -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    }

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config)?;
    event_loop.run_app(&mut app)?;

    match app.init_error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

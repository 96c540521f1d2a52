//! Fly camera, projection and the controller that drives them from window
//! input.
//!
//! [`ViewManager`] bundles the three and writes the camera uniforms of the
//! main program each frame.

use std::time::Duration;

use cgmath::{EuclideanSpace, InnerSpace, Matrix4, Point3, Rad, Vector3, perspective};
use winit::{
    event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use crate::shader::ShaderProgram;

/// cgmath builds OpenGL clip space (z in -1..1); wgpu expects z in 0..1.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

const SAFE_FRAC_PI_2: f32 = std::f32::consts::FRAC_PI_2 - 0.0001;
const MIN_SPEED: f32 = 0.5;
const MAX_SPEED: f32 = 50.0;

#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    yaw: Rad<f32>,
    pitch: Rad<f32>,
}

impl Camera {
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
    ) -> Self {
        Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
        }
    }

    pub fn forward(&self) -> Vector3<f32> {
        let (sin_pitch, cos_pitch) = self.pitch.0.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.0.sin_cos();
        Vector3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw).normalize()
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.forward(), Vector3::unit_y())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionKind {
    Perspective,
    Orthographic,
}

#[derive(Debug, Clone)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
    /// Half the visible height in world units when orthographic.
    ortho_half_height: f32,
    pub kind: ProjectionKind,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
            ortho_half_height: 10.0,
            kind: ProjectionKind::Perspective,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        let projection = match self.kind {
            ProjectionKind::Perspective => perspective(self.fovy, self.aspect, self.znear, self.zfar),
            ProjectionKind::Orthographic => {
                let h = self.ortho_half_height;
                let w = h * self.aspect;
                cgmath::ortho(-w, w, -h, h, self.znear, self.zfar)
            }
        };
        OPENGL_TO_WGPU_MATRIX * projection
    }
}

#[derive(Debug)]
pub struct CameraController {
    amount_left: f32,
    amount_right: f32,
    amount_forward: f32,
    amount_backward: f32,
    amount_up: f32,
    amount_down: f32,
    rotate_horizontal: f32,
    rotate_vertical: f32,
    scroll: f32,
    speed: f32,
    sensitivity: f32,
    requested_projection: Option<ProjectionKind>,
}

impl CameraController {
    pub fn new(speed: f32, sensitivity: f32) -> Self {
        Self {
            amount_left: 0.0,
            amount_right: 0.0,
            amount_forward: 0.0,
            amount_backward: 0.0,
            amount_up: 0.0,
            amount_down: 0.0,
            rotate_horizontal: 0.0,
            rotate_vertical: 0.0,
            scroll: 0.0,
            speed,
            sensitivity,
            requested_projection: None,
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Returns whether the key was consumed.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) -> bool {
        let amount = if state == ElementState::Pressed { 1.0 } else { 0.0 };
        match key {
            KeyCode::KeyW => self.amount_forward = amount,
            KeyCode::KeyS => self.amount_backward = amount,
            KeyCode::KeyA => self.amount_left = amount,
            KeyCode::KeyD => self.amount_right = amount,
            KeyCode::KeyE => self.amount_up = amount,
            KeyCode::KeyQ => self.amount_down = amount,
            KeyCode::KeyP if state == ElementState::Pressed => {
                self.requested_projection = Some(ProjectionKind::Perspective)
            }
            KeyCode::KeyO if state == ElementState::Pressed => {
                self.requested_projection = Some(ProjectionKind::Orthographic)
            }
            _ => return false,
        }
        true
    }

    pub fn process_scroll(&mut self, delta: &MouseScrollDelta) {
        self.scroll += match delta {
            MouseScrollDelta::LineDelta(_, lines) => *lines,
            MouseScrollDelta::PixelDelta(position) => position.y as f32 / 20.0,
        };
    }

    pub fn handle_window_events(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state,
                        ..
                    },
                ..
            } => self.process_keyboard(*key, *state),
            WindowEvent::MouseWheel { delta, .. } => {
                self.process_scroll(delta);
                true
            }
            _ => false,
        }
    }

    pub fn handle_mouse(&mut self, mouse_dx: f64, mouse_dy: f64) {
        self.rotate_horizontal += mouse_dx as f32;
        self.rotate_vertical += mouse_dy as f32;
    }

    pub fn take_projection_request(&mut self) -> Option<ProjectionKind> {
        self.requested_projection.take()
    }

    pub fn update(&mut self, camera: &mut Camera, dt: Duration) {
        let dt = dt.as_secs_f32();

        if self.scroll != 0.0 {
            self.speed = (self.speed * 1.1f32.powf(self.scroll)).clamp(MIN_SPEED, MAX_SPEED);
            self.scroll = 0.0;
        }

        let (yaw_sin, yaw_cos) = camera.yaw.0.sin_cos();
        let forward = Vector3::new(yaw_cos, 0.0, yaw_sin).normalize();
        let right = Vector3::new(-yaw_sin, 0.0, yaw_cos).normalize();
        camera.position += forward * (self.amount_forward - self.amount_backward) * self.speed * dt;
        camera.position += right * (self.amount_right - self.amount_left) * self.speed * dt;
        camera.position.y += (self.amount_up - self.amount_down) * self.speed * dt;

        camera.yaw += Rad(self.rotate_horizontal) * self.sensitivity * dt;
        camera.pitch += Rad(-self.rotate_vertical) * self.sensitivity * dt;
        self.rotate_horizontal = 0.0;
        self.rotate_vertical = 0.0;

        camera.pitch.0 = camera.pitch.0.clamp(-SAFE_FRAC_PI_2, SAFE_FRAC_PI_2);
    }
}

/// The camera side of the frame: where we look from and how it is projected.
#[derive(Debug)]
pub struct ViewManager {
    pub camera: Camera,
    pub projection: Projection,
    pub controller: CameraController,
}

impl ViewManager {
    /// A camera at `position` looking down the -Z axis, tilted towards the
    /// table.
    pub fn new(position: Point3<f32>, width: u32, height: u32) -> Self {
        Self {
            camera: Camera::new(position, cgmath::Deg(-90.0), cgmath::Deg(-30.0)),
            projection: Projection::new(width, height, cgmath::Deg(45.0), 0.1, 100.0),
            controller: CameraController::new(4.0, 0.4),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.projection.resize(width, height);
    }

    pub fn handle_window_events(&mut self, event: &WindowEvent) -> bool {
        self.controller.handle_window_events(event)
    }

    pub fn handle_mouse(&mut self, dx: f64, dy: f64) {
        self.controller.handle_mouse(dx, dy);
    }

    pub fn update(&mut self, dt: Duration) {
        if let Some(kind) = self.controller.take_projection_request() {
            log::info!("Switching to {kind:?} projection");
            self.projection.kind = kind;
        }
        self.controller.update(&mut self.camera, dt);
    }

    /// Write `view`, `projection` and `viewPosition` into `shader`.
    pub fn prepare_scene_view(&self, shader: &mut ShaderProgram) {
        shader.set_mat4_value("view", self.camera.calc_matrix());
        shader.set_mat4_value("projection", self.projection.calc_matrix());
        shader.set_vec3_value("viewPosition", self.camera.position.to_vec());
    }
}

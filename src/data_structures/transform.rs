//! Per-draw model transformation.
//!
//! Every object placement in the scene is a literal scale, three Euler angles
//! in degrees and a position, composed as `T * Rx * Ry * Rz * S`.

use cgmath::{Deg, Matrix4, Vector3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub scale: Vector3<f32>,
    pub x_rotation_degrees: f32,
    pub y_rotation_degrees: f32,
    pub z_rotation_degrees: f32,
    pub position: Vector3<f32>,
}

impl Transform {
    pub fn new(
        scale: Vector3<f32>,
        x_rotation_degrees: f32,
        y_rotation_degrees: f32,
        z_rotation_degrees: f32,
        position: Vector3<f32>,
    ) -> Self {
        Self {
            scale,
            x_rotation_degrees,
            y_rotation_degrees,
            z_rotation_degrees,
            position,
        }
    }

    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_x(Deg(self.x_rotation_degrees))
            * Matrix4::from_angle_y(Deg(self.y_rotation_degrees))
            * Matrix4::from_angle_z(Deg(self.z_rotation_degrees))
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(Vector3::new(1.0, 1.0, 1.0), 0.0, 0.0, 0.0, Vector3::new(0.0, 0.0, 0.0))
    }
}

impl From<Transform> for Matrix4<f32> {
    fn from(transform: Transform) -> Self {
        transform.to_matrix()
    }
}

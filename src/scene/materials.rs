use cgmath::Vector3;

use super::registry::Material;

fn grey(value: f32) -> Vector3<f32> {
    Vector3::new(value, value, value)
}

fn material(
    tag: &str,
    ambient_color: Vector3<f32>,
    ambient_strength: f32,
    diffuse_color: Vector3<f32>,
    specular_color: Vector3<f32>,
    shininess: f32,
) -> Material {
    Material {
        tag: tag.to_string(),
        ambient_color,
        ambient_strength,
        diffuse_color,
        specular_color,
        shininess,
    }
}

/// The surfaces the still life is made of.
pub fn object_materials() -> Vec<Material> {
    vec![
        material("glass", grey(0.4), 0.3, grey(0.3), grey(0.6), 85.0),
        material("cork", grey(0.2), 0.3, grey(0.5), grey(0.3), 0.5),
        material("puzzle", grey(0.1), 0.6, grey(0.5), grey(0.3), 0.5),
        material("cloth", grey(0.1), 0.6, grey(0.5), grey(0.3), 0.5),
        material("plastic", grey(0.1), 0.6, grey(0.55), grey(0.7), 0.25),
        material(
            "marble",
            grey(0.1),
            0.6,
            Vector3::new(0.7, 0.4, 0.4),
            grey(0.296648),
            0.2,
        ),
    ]
}

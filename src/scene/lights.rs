use cgmath::Vector3;

use crate::shader::ShaderProgram;

/// Slots declared in the main program's `lightSources` array.
pub const MAX_LIGHTS: usize = 4;

#[derive(Clone, Debug, PartialEq)]
pub struct LightSource {
    pub position: Vector3<f32>,
    pub ambient_color: Vector3<f32>,
    pub diffuse_color: Vector3<f32>,
    pub specular_color: Vector3<f32>,
    pub focal_strength: f32,
    pub specular_intensity: f32,
}

impl LightSource {
    pub fn write_to(&self, index: usize, shader: &mut ShaderProgram) {
        let name = |field: &str| format!("lightSources[{index}].{field}");
        shader.set_vec3_value(&name("position"), self.position);
        shader.set_vec3_value(&name("ambientColor"), self.ambient_color);
        shader.set_vec3_value(&name("diffuseColor"), self.diffuse_color);
        shader.set_vec3_value(&name("specularColor"), self.specular_color);
        shader.set_float_value(&name("focalStrength"), self.focal_strength);
        shader.set_float_value(&name("specularIntensity"), self.specular_intensity);
    }
}

/// Warm late-afternoon sun coming in from the left of the table.
pub fn scene_lights() -> Vec<LightSource> {
    let sunlight = Vector3::new(1.0, 0.832_031_25, 0.148_437_5);
    vec![LightSource {
        position: Vector3::new(-10.0, 4.0, 0.0),
        ambient_color: Vector3::new(0.429_687_5, 0.558_593_75, 0.648_437_5),
        diffuse_color: sunlight,
        specular_color: sunlight,
        focal_strength: 1.0,
        specular_intensity: 0.1,
    }]
}

//! The still life itself: what is on the table, what it is made of and how
//! it is lit.
//!
//! [`SceneManager`] prepares meshes, textures, materials and lights once and
//! then renders the scene every frame, first into the shadow map and then
//! from the camera.

pub mod lights;
pub mod manager;
pub mod materials;
pub mod objects;
pub mod registry;

pub use lights::{LightSource, MAX_LIGHTS, scene_lights};
pub use manager::{DEPTH_MAP_TAG, SCENE_TEXTURES, SceneManager, debug_quad};
pub use materials::object_materials;
pub use registry::{MAX_TEXTURES, Material, MaterialRegistry, TextureEntry, TextureRegistry};

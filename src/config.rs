//! Runtime knobs for the still-life application.
//!
//! Everything here has a sensible default; the only environment override is
//! `STILL_LIFE_ASSETS`, which relocates the directory that `shaders/` and
//! `Textures/` are resolved against.

use std::path::{Path, PathBuf};

use cgmath::Point3;

pub const ASSET_ROOT_ENV: &str = "STILL_LIFE_ASSETS";

/// Parameters of the orthographic light used to render the shadow map.
#[derive(Clone, Debug, PartialEq)]
pub struct LightSpaceConfig {
    pub eye: Point3<f32>,
    pub target: Point3<f32>,
    pub half_extent: f32,
    pub near_plane: f32,
    pub far_plane: f32,
}

impl Default for LightSpaceConfig {
    fn default() -> Self {
        Self {
            eye: Point3::new(-10.0, 4.0, 0.0),
            target: Point3::new(0.0, 0.0, 0.0),
            half_extent: 10.0,
            near_plane: 0.0,
            far_plane: 9.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SceneConfig {
    pub window_title: String,
    pub asset_root: PathBuf,
    pub shadow_map_size: u32,
    pub clear_colour: wgpu::Color,
    pub light: LightSpaceConfig,
    /// Draw the shadow map onto a full-screen quad after the scene.
    pub show_depth_map: bool,
    pub camera_position: Point3<f32>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            window_title: "7-1 FinalProject and Milestones".to_string(),
            asset_root: PathBuf::from("."),
            shadow_map_size: 1024,
            clear_colour: wgpu::Color::BLACK,
            light: LightSpaceConfig::default(),
            show_depth_map: false,
            camera_position: Point3::new(0.0, 5.5, 12.0),
        }
    }
}

impl SceneConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(root) = std::env::var(ASSET_ROOT_ENV) {
            if !root.is_empty() {
                log::info!("Using asset root {root} from {ASSET_ROOT_ENV}");
                config.asset_root = PathBuf::from(root);
            }
        }
        config
    }

    /// Resolve a path relative to the asset root. Absolute paths pass through.
    pub fn asset_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        resolve_asset(&self.asset_root, relative)
    }
}

pub(crate) fn resolve_asset(root: &Path, relative: impl AsRef<Path>) -> PathBuf {
    let relative = relative.as_ref();
    if relative.is_absolute() {
        relative.to_path_buf()
    } else {
        root.join(relative)
    }
}

//! Tag-addressed texture and material registries.
//!
//! Both are small append-only lists searched linearly. Tags are unique; a
//! second registration under a known tag is rejected.

use anyhow::bail;
use cgmath::Vector3;

use crate::backend::TEXTURE_UNITS;

pub const MAX_TEXTURES: usize = TEXTURE_UNITS as usize;

#[derive(Clone, Debug)]
pub struct TextureEntry<T> {
    pub tag: String,
    pub texture: T,
    /// Texture unit the entry is bound to.
    pub unit: u32,
}

#[derive(Clone, Debug)]
pub struct TextureRegistry<T> {
    entries: Vec<TextureEntry<T>>,
    next_unit: u32,
}

impl<T> Default for TextureRegistry<T> {
    fn default() -> Self {
        Self {
            entries: Vec::with_capacity(MAX_TEXTURES),
            next_unit: 0,
        }
    }
}

impl<T> TextureRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails when the tag is taken or all units are in use.
    pub fn check_available(&self, tag: &str) -> anyhow::Result<()> {
        if self.contains(tag) {
            bail!("a texture tagged {tag:?} is already registered");
        }
        if self.entries.len() >= MAX_TEXTURES {
            bail!("no free texture slot for {tag:?}, all {MAX_TEXTURES} are in use");
        }
        Ok(())
    }

    /// Append `texture` under `tag` and return the unit assigned to it.
    pub fn register(&mut self, tag: &str, texture: T) -> anyhow::Result<u32> {
        self.check_available(tag)?;
        let unit = self.next_unit;
        self.next_unit += 1;
        self.entries.push(TextureEntry {
            tag: tag.to_string(),
            texture,
            unit,
        });
        Ok(unit)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.find(tag).is_some()
    }

    pub fn find(&self, tag: &str) -> Option<&TextureEntry<T>> {
        self.entries.iter().find(|e| e.tag == tag)
    }

    /// Unit of the texture registered under `tag`, `-1` if there is none.
    pub fn slot(&self, tag: &str) -> i32 {
        self.find(tag).map_or(-1, |e| e.unit as i32)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TextureEntry<T>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Phong reflectance constants for one kind of surface.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub tag: String,
    pub ambient_color: Vector3<f32>,
    pub ambient_strength: f32,
    pub diffuse_color: Vector3<f32>,
    pub specular_color: Vector3<f32>,
    pub shininess: f32,
}

#[derive(Clone, Debug, Default)]
pub struct MaterialRegistry {
    materials: Vec<Material>,
}

impl MaterialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, material: Material) -> anyhow::Result<()> {
        if self.find(&material.tag).is_some() {
            bail!("a material tagged {:?} is already defined", material.tag);
        }
        self.materials.push(material);
        Ok(())
    }

    pub fn find(&self, tag: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.tag == tag)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_follow_insertion_order() {
        let mut registry = TextureRegistry::new();
        for tag in ["album_back", "album", "marble"] {
            registry.register(tag, ()).unwrap();
        }
        assert_eq!(registry.slot("album_back"), 0);
        assert_eq!(registry.slot("album"), 1);
        assert_eq!(registry.slot("marble"), 2);
        assert_eq!(registry.slot("cork"), -1);
    }

    #[test]
    fn duplicate_tags_are_rejected() {
        let mut registry = TextureRegistry::new();
        registry.register("marble", 1).unwrap();
        let err = registry.register("marble", 2).unwrap_err();
        assert!(err.to_string().contains("already registered"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.find("marble").unwrap().texture, 1);
    }

    #[test]
    fn capacity_is_sixteen() {
        let mut registry = TextureRegistry::new();
        for i in 0..MAX_TEXTURES {
            assert_eq!(registry.register(&format!("t{i}"), i).unwrap(), i as u32);
        }
        assert!(registry.register("one_too_many", 99).is_err());
        assert_eq!(registry.len(), MAX_TEXTURES);
    }

    #[test]
    fn empty_material_registry_finds_nothing() {
        let registry = MaterialRegistry::new();
        assert!(registry.find("glass").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn materials_are_found_by_tag() {
        let mut registry = MaterialRegistry::new();
        let cork = Material {
            tag: "cork".into(),
            ambient_color: Vector3::new(0.2, 0.2, 0.2),
            ambient_strength: 0.3,
            diffuse_color: Vector3::new(0.5, 0.5, 0.5),
            specular_color: Vector3::new(0.3, 0.3, 0.3),
            shininess: 0.5,
        };
        registry.add(cork.clone()).unwrap();
        assert_eq!(registry.find("cork"), Some(&cork));
        assert!(registry.add(cork).is_err());
        assert_eq!(registry.len(), 1);
    }
}

//! Material system
//!
//! Provides material definitions and centralized management. Materials are
//! stored in [`MaterialManager`] and objects reference them by ID, so
//! swapping an object's material (highlighting, restoring) is a cheap ID
//! swap and never copies material data.

use std::collections::HashMap;

use serde::Serialize;

/// Material ID for referencing materials
pub type MaterialId = String;

/// ID of the material every manager starts with
pub const DEFAULT_MATERIAL: &str = "default";

/// Converts a packed `0xRRGGBB` color to linear-ish float RGB.
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Material definition with PBR properties
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Material {
    pub name: String,
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    pub emissive: [f32; 3],
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: DEFAULT_MATERIAL.to_string(),
            base_color: [0.8, 0.8, 0.8, 1.0],
            metallic: 0.0,
            roughness: 0.5,
            emissive: [0.0, 0.0, 0.0],
        }
    }
}

impl Material {
    /// Creates a new material with basic PBR properties
    ///
    /// # Arguments
    /// * `name` - Unique name for this material
    /// * `base_color` - RGBA base color
    /// * `metallic` - Metallic factor (0.0 = dielectric, 1.0 = metallic)
    /// * `roughness` - Surface roughness (0.0 = mirror, 1.0 = rough)
    pub fn new(name: &str, base_color: [f32; 4], metallic: f32, roughness: f32) -> Self {
        Self {
            name: name.to_string(),
            base_color,
            metallic: metallic.clamp(0.0, 1.0),
            roughness: roughness.clamp(0.0, 1.0),
            emissive: [0.0, 0.0, 0.0],
        }
    }

    /// Matte, fully opaque material from a packed `0xRRGGBB` color
    pub fn from_hex(name: &str, hex: u32) -> Self {
        let [r, g, b] = hex_to_rgb(hex);
        Self::new(name, [r, g, b, 1.0], 0.0, 1.0)
    }

    /// Builder pattern: Set base color from RGB values
    pub fn with_color(mut self, r: f32, g: f32, b: f32) -> Self {
        self.base_color = [r, g, b, self.base_color[3]];
        self
    }

    /// Builder pattern: Set alpha transparency
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.base_color[3] = alpha.clamp(0.0, 1.0);
        self
    }

    /// Builder pattern: Set roughness factor
    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    /// Builder pattern: Set emissive color
    pub fn with_emission(mut self, r: f32, g: f32, b: f32) -> Self {
        self.emissive = [r, g, b];
        self
    }
}

/// Manages all materials of a scene
///
/// Centralized storage for all materials. Objects reference materials by ID
/// rather than storing material data directly.
#[derive(Debug, Clone)]
pub struct MaterialManager {
    materials: HashMap<MaterialId, Material>,
}

impl MaterialManager {
    /// Creates a new material manager with a default material
    pub fn new() -> Self {
        let mut materials = HashMap::new();
        materials.insert(DEFAULT_MATERIAL.to_string(), Material::default());
        Self { materials }
    }

    /// Adds a material under its own name, replacing any material with that
    /// name, and returns the ID it is stored under.
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        let id = material.name.clone();
        self.materials.insert(id.clone(), material);
        id
    }

    /// Gets a material by ID
    pub fn get_material(&self, id: &str) -> Option<&Material> {
        self.materials.get(id)
    }

    /// Gets a mutable material by ID
    pub fn get_material_mut(&mut self, id: &str) -> Option<&mut Material> {
        self.materials.get_mut(id)
    }

    /// Gets the default material
    pub fn get_default_material(&self) -> Option<&Material> {
        self.materials.get(DEFAULT_MATERIAL)
    }

    /// Gets material for an object with fallback to default
    ///
    /// This is the lookup a renderer uses, handling objects whose material
    /// was never registered.
    pub fn get_material_for_object(&self, material_id: &str) -> Option<&Material> {
        self.get_material(material_id)
            .or_else(|| self.get_default_material())
    }

    /// Removes a material. The default material cannot be removed.
    pub fn remove_material(&mut self, id: &str) -> Option<Material> {
        if id == DEFAULT_MATERIAL {
            return None;
        }
        self.materials.remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.materials.contains_key(id)
    }

    /// Lists all material IDs
    pub fn list_materials(&self) -> Vec<&MaterialId> {
        self.materials.keys().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.materials.values()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Returns `desired` if unused, otherwise the first free `"desired (n)"`.
    pub fn unique_id(&self, desired: &str) -> MaterialId {
        let mut counter = 0;
        let mut candidate = desired.to_string();

        while self.materials.contains_key(&candidate) {
            counter += 1;
            candidate = format!("{} ({})", desired, counter);
        }

        candidate
    }
}

impl Default for MaterialManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_colors() {
        assert_eq!(hex_to_rgb(0xff0000), [1.0, 0.0, 0.0]);
        assert_eq!(hex_to_rgb(0xffffff), [1.0, 1.0, 1.0]);
        let highlight = Material::from_hex("highlight", 0x4f9ef4);
        assert!((highlight.base_color[0] - 79.0 / 255.0).abs() < 1e-6);
        assert_eq!(highlight.base_color[3], 1.0);
    }

    #[test]
    fn test_default_material_survives() {
        let mut manager = MaterialManager::new();
        assert!(manager.remove_material(DEFAULT_MATERIAL).is_none());
        assert_eq!(
            manager.get_material_for_object("missing").map(|m| m.name.as_str()),
            Some(DEFAULT_MATERIAL)
        );
    }

    #[test]
    fn test_unique_ids() {
        let mut manager = MaterialManager::new();
        assert_eq!(manager.unique_id("steel"), "steel");
        manager.add_material(Material::from_hex("steel", 0x888888));
        assert_eq!(manager.unique_id("steel"), "steel (1)");
        manager.add_material(Material::from_hex("steel (1)", 0x888888));
        assert_eq!(manager.unique_id("steel"), "steel (2)");
    }
}

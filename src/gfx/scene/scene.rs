use std::collections::HashMap;

use log::debug;

use super::{
    light::Light,
    object::{Object, ObjectId},
};
use crate::gfx::{
    picking::{Intersection, MaterialSlots, Ray, Raycast},
    resources::material::{hex_to_rgb, Material, MaterialId, MaterialManager},
};

/// Scene graph: renderable objects, lights and the materials they use
pub struct Scene {
    objects: HashMap<ObjectId, Object>,
    order: Vec<ObjectId>, // insertion order, also the hit tie-break order
    pub lights: Vec<Light>,
    pub material_manager: MaterialManager, // Centralized material storage
    pub background: [f32; 3],
}

impl Scene {
    /// Creates an empty scene with a white background and the default material
    pub fn new() -> Self {
        Self {
            objects: HashMap::new(),
            order: Vec::new(),
            lights: Vec::new(),
            material_manager: MaterialManager::new(),
            background: hex_to_rgb(0xffffff),
        }
    }

    /// Inserts an object and returns its ID. Re-inserting an ID replaces the object.
    pub fn add_object(&mut self, object: Object) -> ObjectId {
        let id = object.id();
        if self.objects.insert(id, object).is_none() {
            self.order.push(id);
        }
        id
    }

    pub fn remove_object(&mut self, id: ObjectId) -> Option<Object> {
        let removed = self.objects.remove(&id)?;
        self.order.retain(|other| *other != id);
        Some(removed)
    }

    /// Gets immutable reference to an object by ID
    pub fn object(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(&id)
    }

    /// Gets mutable reference to an object by ID
    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        self.objects.get_mut(&id)
    }

    pub fn contains_object(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    /// Objects in insertion order
    pub fn objects(&self) -> impl Iterator<Item = &Object> {
        self.order.iter().filter_map(|id| self.objects.get(id))
    }

    /// Gets the total number of objects
    pub fn get_object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn light_mut(&mut self, name: &str) -> Option<&mut Light> {
        self.lights.iter_mut().find(|light| light.name() == name)
    }

    /// Adds a material to the material manager and returns its ID
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.material_manager.add_material(material)
    }

    /// Gets material for rendering an object
    ///
    /// Returns the material assigned to the object, or the default material
    /// if the assigned material doesn't exist.
    pub fn get_material_for_object(&self, object: &Object) -> Option<&Material> {
        self.material_manager.get_material_for_object(object.material())
    }

    /// Gets statistics about the scene
    pub fn get_statistics(&self) -> SceneStatistics {
        SceneStatistics {
            object_count: self.objects.len(),
            material_count: self.material_manager.len(),
            light_count: self.lights.len(),
            total_triangles: self.objects().map(|obj| obj.mesh.triangle_count()).sum(),
            total_vertices: self.objects().map(|obj| obj.mesh.vertex_count()).sum(),
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Raycast for Scene {
    fn intersect_ray(&self, ray: &Ray) -> Vec<Intersection> {
        let mut hits: Vec<Intersection> = self
            .objects()
            .filter(|object| object.visible)
            .filter_map(|object| {
                let distance = object.intersect_ray(ray)?;
                Some(Intersection {
                    object: object.id(),
                    distance,
                    point: ray.point_at(distance),
                })
            })
            .collect();

        // Stable: equal distances keep insertion order
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

impl MaterialSlots for Scene {
    fn material(&self, id: ObjectId) -> Option<&MaterialId> {
        self.objects.get(&id).map(Object::material_id)
    }

    fn set_material(&mut self, id: ObjectId, material: MaterialId) -> bool {
        match self.objects.get_mut(&id) {
            Some(object) => {
                object.set_material(material);
                true
            }
            None => {
                debug!("material change for unknown object {}", id);
                false
            }
        }
    }
}

/// Scene statistics for debugging and UI display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneStatistics {
    pub object_count: usize,
    pub material_count: usize,
    pub light_count: usize,
    pub total_triangles: usize,
    pub total_vertices: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_cube;
    use cgmath::Vector3;

    fn cube_at(scene: &mut Scene, z: f32) -> ObjectId {
        let mut cube = Object::from_geometry("cube", &generate_cube());
        cube.set_translation(Vector3::new(0.0, 0.0, z));
        scene.add_object(cube)
    }

    #[test]
    fn test_hits_sorted_nearest_first() {
        let mut scene = Scene::new();
        let far = cube_at(&mut scene, -10.0);
        let near = cube_at(&mut scene, -5.0);
        let _aside = {
            let mut cube = Object::from_geometry("aside", &generate_cube());
            cube.set_translation(Vector3::new(5.0, 0.0, -5.0));
            scene.add_object(cube)
        };

        let ray = Ray::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, -1.0));
        let hits = scene.intersect_ray(&ray);

        assert_eq!(hits.iter().map(|h| h.object).collect::<Vec<_>>(), vec![near, far]);
        assert!((hits[0].distance - 4.5).abs() < 1e-4);
        assert!((hits[0].point.z + 4.5).abs() < 1e-4);
    }

    #[test]
    fn test_hidden_objects_are_skipped() {
        let mut scene = Scene::new();
        let id = cube_at(&mut scene, -5.0);
        scene.object_mut(id).unwrap().visible = false;

        let ray = Ray::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(scene.intersect_ray(&ray).is_empty());
    }

    #[test]
    fn test_material_slots() {
        let mut scene = Scene::new();
        let id = cube_at(&mut scene, 0.0);

        assert_eq!(scene.material(id).map(String::as_str), Some("default"));
        assert!(scene.set_material(id, "steel".to_string()));
        assert_eq!(scene.object(id).unwrap().material(), "steel");

        scene.remove_object(id);
        assert!(!scene.set_material(id, "steel".to_string()));
        assert!(scene.material(id).is_none());
        assert_eq!(scene.get_statistics().object_count, 0);
    }

    #[test]
    fn test_statistics() {
        let mut scene = Scene::new();
        cube_at(&mut scene, 0.0);
        cube_at(&mut scene, 2.0);

        let stats = scene.get_statistics();
        assert_eq!(stats.object_count, 2);
        assert_eq!(stats.total_triangles, 24);
        assert_eq!(stats.total_vertices, 48);
        assert_eq!(stats.material_count, 1);
    }
}

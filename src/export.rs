//! Scene export.
//!
//! A [`SceneSnapshot`] is a plain, serializable copy of what the viewer
//! shows. The highlight is not part of it: a selected object is exported
//! with the material it had before it was highlighted.

use std::io::Write;

use serde::Serialize;

use crate::gfx::{
    camera::camera_utils::convert_matrix4_to_array,
    picking::Selection,
    resources::material::Material,
    scene::{light::Light, EntityMeta, EntityRegistry, ObjectId, Scene},
};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySnapshot {
    pub meta: EntityMeta,
    pub selectable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectSnapshot {
    pub id: ObjectId,
    pub name: String,
    pub material: String,
    pub transform: [[f32; 4]; 4],
    pub visible: bool,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    pub vertices: usize,
    pub triangles: usize,
    /// Absent for objects that are not registered entities
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<EntitySnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneSnapshot {
    pub background: [f32; 3],
    pub objects: Vec<ObjectSnapshot>,
    /// Sorted by name
    pub materials: Vec<Material>,
    pub lights: Vec<Light>,
}

impl SceneSnapshot {
    pub fn capture(scene: &Scene, registry: &EntityRegistry, selection: &Selection) -> Self {
        let objects = scene
            .objects()
            .map(|object| {
                let id = object.id();
                let material = match (selection.selected(), selection.original_material()) {
                    (Some(selected), Some(original)) if selected == id => original.clone(),
                    _ => object.material().to_string(),
                };

                ObjectSnapshot {
                    id,
                    name: object.name.clone(),
                    material,
                    transform: convert_matrix4_to_array(object.transform),
                    visible: object.visible,
                    cast_shadow: object.cast_shadow,
                    receive_shadow: object.receive_shadow,
                    vertices: object.mesh.vertex_count(),
                    triangles: object.mesh.triangle_count(),
                    entity: registry.lookup(id).map(|entity| EntitySnapshot {
                        meta: entity.meta().clone(),
                        selectable: entity.is_selectable(),
                    }),
                }
            })
            .collect();

        let mut materials: Vec<Material> = scene.material_manager.iter().cloned().collect();
        materials.sort_by(|a, b| a.name.cmp(&b.name));

        Self {
            background: scene.background,
            objects,
            materials,
            lights: scene.lights.clone(),
        }
    }

    /// Writes pretty-printed JSON
    pub fn write_json<W: Write>(&self, mut writer: W) -> Result<(), ExportError> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        geometry::generate_cube,
        scene::{Entity, Object},
    };

    #[test]
    fn test_highlight_not_exported() {
        let mut scene = Scene::new();
        let mut registry = EntityRegistry::new();
        let mut selection = Selection::new();

        let wood = scene.add_material(Material::from_hex("wood", 0x8b5a2b));
        let highlight = scene.add_material(Material::from_hex("highlight", 0x4f9ef4));

        let mut crate_box = Object::from_geometry("crate", &generate_cube());
        crate_box.set_material(wood.clone());
        let id = scene.add_object(crate_box);
        let helper = scene.add_object(Object::from_geometry("helper", &generate_cube()));

        let mut entity = Entity::new(id, EntityMeta::named("Crate").with_tag("storage"));
        entity.set_selectable(true);
        registry.register(entity);

        selection.set_selected(id, &highlight, &mut scene);

        let snapshot = SceneSnapshot::capture(&scene, &registry, &selection);
        assert_eq!(snapshot.objects.len(), 2);

        let exported = &snapshot.objects[0];
        assert_eq!(exported.id, id);
        assert_eq!(exported.material, wood);
        assert_eq!(exported.triangles, 12);
        let entity = exported.entity.as_ref().unwrap();
        assert_eq!(entity.meta.tags, vec!["storage".to_string()]);
        assert!(entity.selectable);

        assert_eq!(snapshot.objects[1].id, helper);
        assert!(snapshot.objects[1].entity.is_none());

        let names: Vec<_> = snapshot.materials.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["default", "highlight", "wood"]);
    }

    #[test]
    fn test_write_json() {
        let mut scene = Scene::new();
        let registry = EntityRegistry::new();
        scene.add_object(Object::from_geometry("cube", &generate_cube()));

        let mut buffer = Vec::new();
        SceneSnapshot::capture(&scene, &registry, &Selection::new())
            .write_json(&mut buffer)
            .unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["objects"][0]["name"], "cube");
        assert_eq!(value["objects"][0]["material"], "default");
        assert!(value["objects"][0].get("entity").is_none());
        assert_eq!(value["background"][0], 1.0);
    }
}

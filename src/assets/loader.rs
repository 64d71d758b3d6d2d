//! Installing parsed assets into a scene.
//!
//! Every mesh becomes one scene object plus one registry entity. Per mesh the
//! steps are always: wrap, customize, register, insert.

use std::collections::HashMap;

use log::debug;

use super::{Asset, MeshNode};
use crate::{
    animation::AnimationClip,
    gfx::{
        resources::material::{Material, MaterialId, MaterialManager},
        scene::{Entity, EntityMeta, EntityRegistry, Object, ObjectId, Scene},
    },
};

/// What the customization callback gets to see for each mesh
pub struct MeshSetup<'a> {
    pub entity: &'a mut Entity,
    pub object: &'a mut Object,
    pub materials: &'a mut MaterialManager,
}

/// Result of a successful load
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedAsset {
    /// Entities created, in traversal order
    pub entities: Vec<ObjectId>,
    pub animations: Vec<AnimationClip>,
}

/// Customizes, registers and inserts one object. Returns its id.
pub fn install_object<F>(
    mut object: Object,
    meta: EntityMeta,
    scene: &mut Scene,
    registry: &mut EntityRegistry,
    customize: &mut F,
) -> ObjectId
where
    F: FnMut(&mut MeshSetup<'_>) + ?Sized,
{
    let mut entity = Entity::new(object.id(), meta);

    customize(&mut MeshSetup {
        entity: &mut entity,
        object: &mut object,
        materials: &mut scene.material_manager,
    });

    let id = object.id();
    if registry.register(entity).is_some() {
        debug!("entity {} re-registered", id);
    }
    scene.add_object(object);
    id
}

/// Installs every mesh of `asset`, then adds its lights to the scene.
///
/// Meshes take `meta` when given, otherwise their own node name.
pub fn install_asset<F>(
    asset: Asset,
    meta: Option<&EntityMeta>,
    scene: &mut Scene,
    registry: &mut EntityRegistry,
    customize: &mut F,
) -> LoadedAsset
where
    F: FnMut(&mut MeshSetup<'_>) + ?Sized,
{
    let (meshes, lights) = asset.root.flatten();
    let mut interned = HashMap::new();

    let entities = meshes
        .into_iter()
        .map(|node| {
            let meta = meta.cloned().unwrap_or_else(|| EntityMeta {
                name: node.name.clone(),
                tags: Vec::new(),
            });
            let object = wrap_mesh(node, &mut interned, &mut scene.material_manager);
            install_object(object, meta, scene, registry, customize)
        })
        .collect();

    for light in lights {
        scene.add_light(light);
    }

    LoadedAsset {
        entities,
        animations: asset.animations,
    }
}

fn wrap_mesh(
    node: MeshNode,
    interned: &mut HashMap<String, MaterialId>,
    materials: &mut MaterialManager,
) -> Object {
    let name = node.name.unwrap_or_else(|| "mesh".to_string());
    let mut object = Object::new(name, node.mesh);
    object.transform = node.transform;
    if let Some(material) = node.material {
        let source_name = material.name.clone();
        let id = match interned.get(&source_name) {
            Some(id) => id.clone(),
            None => intern_material(material, materials),
        };
        interned.insert(source_name, id.clone());
        object.set_material(id);
    }
    object
}

/// Adds `material` under its own name unless an identical material is
/// already there; a different material with the same name gets a fresh ID.
fn intern_material(mut material: Material, materials: &mut MaterialManager) -> MaterialId {
    match materials.get_material(&material.name) {
        Some(existing) if *existing == material => material.name,
        Some(_) => {
            material.name = materials.unique_id(&material.name);
            materials.add_material(material)
        }
        None => materials.add_material(material),
    }
}

//! Entity registry.
//!
//! Maps scene object IDs to the metadata that makes them pickable. Objects
//! without an entry (ground helpers, gizmos, anything never registered) are
//! never selected.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::object::ObjectId;

/// Caller-supplied description of an entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMeta {
    pub name: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl EntityMeta {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            tags: Vec::new(),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}

/// A registered scene object.
///
/// The entity's material lives on the scene object itself; see
/// [`MaterialSlots`](crate::gfx::picking::MaterialSlots).
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    id: ObjectId,
    meta: EntityMeta,
    selectable: bool,
}

impl Entity {
    /// Wraps object `id`. Entities start out not selectable.
    pub fn new(id: ObjectId, meta: EntityMeta) -> Self {
        Self {
            id,
            meta,
            selectable: false,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    pub fn name(&self) -> Option<&str> {
        self.meta.name.as_deref()
    }

    pub fn is_selectable(&self) -> bool {
        self.selectable
    }

    pub fn set_selectable(&mut self, selectable: bool) {
        self.selectable = selectable;
    }
}

#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entities: HashMap<ObjectId, Entity>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `entity` under its ID, returning the entry it replaced.
    pub fn register(&mut self, entity: Entity) -> Option<Entity> {
        self.entities.insert(entity.id(), entity)
    }

    pub fn lookup(&self, id: ObjectId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn lookup_mut(&mut self, id: ObjectId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn unregister(&mut self, id: ObjectId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

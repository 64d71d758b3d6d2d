//! # Scene Management Module
//!
//! The scene graph and the entity registry layered over it.
//!
//! ## Key Components
//!
//! - [`Scene`] - objects, lights and materials; answers ray queries
//! - [`Object`] - one renderable mesh with transform, material and shadow flags
//! - [`EntityRegistry`] - which objects are entities, with metadata and selectability
//! - [`Light`] - ambient, directional and point lights
//!
//! Objects get their [`ObjectId`] when they are constructed. An object only
//! becomes pickable once an [`Entity`] for that ID is registered.
//!
//! ```
//! use sceneview::gfx::geometry::generate_cube;
//! use sceneview::gfx::scene::{Entity, EntityMeta, EntityRegistry, Object, Scene};
//!
//! let mut scene = Scene::new();
//! let mut registry = EntityRegistry::new();
//!
//! let id = scene.add_object(Object::from_geometry("crate", &generate_cube()));
//! let mut entity = Entity::new(id, EntityMeta::named("Crate"));
//! entity.set_selectable(true);
//! registry.register(entity);
//!
//! assert!(registry.lookup(id).is_some_and(|e| e.is_selectable()));
//! ```

pub mod light;
pub mod object;
pub mod registry;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use light::Light;
pub use object::{Mesh, Object, ObjectId};
pub use registry::{Entity, EntityMeta, EntityRegistry};
pub use scene::{Scene, SceneStatistics};
pub use vertex::Vertex3D;

//! # Graphics Module
//!
//! Scene-side graphics state for the viewer: cameras, procedural geometry,
//! materials, the scene graph and object picking.
//!
//! ## Architecture Overview
//!
//! - **Camera System** ([`camera`]) - Orthographic and orbit cameras, ray unprojection
//! - **Geometry** ([`geometry`]) - Procedural cube, box and plane meshes
//! - **Picking** ([`picking`]) - Rays, intersections, pointer tracking and selection
//! - **Resource Management** ([`resources`]) - Materials keyed by name
//! - **Scene Management** ([`scene`]) - Objects, lights and the entity registry
//!
//! ## Usage
//!
//! ```
//! use sceneview::gfx::{geometry::generate_cube, scene::{Object, Scene}};
//!
//! let mut scene = Scene::new();
//! scene.add_object(Object::from_geometry("cube", &generate_cube()));
//! assert_eq!(scene.get_object_count(), 1);
//! ```

pub mod camera;
pub mod geometry;
pub mod picking;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::{Camera, OrbitCamera, OrthographicCamera};
pub use picking::{PickingEngine, Selection};
pub use scene::Scene;

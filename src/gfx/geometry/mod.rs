//! # Procedural Geometry Generation
//!
//! Box and plane generators for meshes that do not come from an asset file:
//! the ground plane and directly added props.
//!
//! ## Usage
//!
//! ```
//! use sceneview::gfx::geometry::{generate_box, generate_plane};
//!
//! let crate_box = generate_box(2.0, 1.0, 1.0);
//! assert_eq!(crate_box.triangle_count(), 12);
//!
//! let ground = generate_plane(200.0, 200.0, 1, 1);
//! assert_eq!(ground.vertex_count(), 4);
//! ```

pub mod primitives;

pub use primitives::*;

/// Generated geometry, one normal per vertex
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Appends a quad given its four corners in counter-clockwise order.
    fn push_quad(&mut self, corners: [[f32; 3]; 4], normal: [f32; 3]) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&corners);
        self.normals.extend_from_slice(&[normal; 4]);
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
}

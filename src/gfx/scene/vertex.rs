//! # Vertex Data Structures
//!
//! Vertex layout shared by loaded and procedural meshes.

/// A 3D vertex with position and normal data.
///
/// `#[repr(C)]` keeps the layout identical to what a GPU vertex buffer
/// expects, so a renderer can upload [`Mesh::vertices`](super::object::Mesh::vertices)
/// without repacking.
///
/// # Examples
///
/// ```
/// use sceneview::gfx::scene::vertex::Vertex3D;
///
/// let vertex = Vertex3D {
///     position: [0.0, 1.0, 0.0],
///     normal: [0.0, 1.0, 0.0],
/// };
/// assert_eq!(vertex.position[1], 1.0);
/// ```
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vertex3D {
    /// 3D position coordinates [x, y, z]
    pub position: [f32; 3],
    /// 3D normal vector [nx, ny, nz] for lighting calculations
    pub normal: [f32; 3],
}

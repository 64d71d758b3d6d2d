use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use cgmath::{Deg, EuclideanSpace, InnerSpace, Matrix4, Point3, SquareMatrix, Transform, Vector3};
use serde::Serialize;

use super::vertex::Vertex3D;
use crate::gfx::{
    geometry::GeometryData,
    picking::{Ray, AABB},
    resources::material::{MaterialId, DEFAULT_MATERIAL},
};

static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// Identifier assigned to every object when it is created. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ObjectId(u64);

impl ObjectId {
    pub(crate) fn next() -> Self {
        Self(NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    bounds: AABB,
}

impl Mesh {
    pub fn new(positions: Vec<f32>, normals: Vec<f32>, indices: Vec<u32>) -> Self {
        let vertices: Vec<Vertex3D> = positions
            .chunks_exact(3)
            .zip(normals.chunks_exact(3))
            .map(|(p, n)| Vertex3D {
                position: [p[0], p[1], p[2]],
                normal: [n[0], n[1], n[2]],
            })
            .collect();

        let corners: Vec<[f32; 3]> = vertices.iter().map(|v| v.position).collect();
        let bounds = AABB::from_vertices(&corners);

        Self {
            vertices,
            indices,
            bounds,
        }
    }

    /// Builds a mesh from positions and indices, computing smooth normals.
    pub fn from_positions(positions: Vec<f32>, indices: Vec<u32>) -> Self {
        let normals = Self::calculate_face_normals(&positions, &indices);
        Self::new(positions, normals, indices)
    }

    pub fn from_geometry(geometry: &GeometryData) -> Self {
        let positions: Vec<f32> = geometry.vertices.iter().flatten().copied().collect();
        if geometry.normals.len() == geometry.vertices.len() {
            let normals = geometry.normals.iter().flatten().copied().collect();
            Self::new(positions, normals, geometry.indices.clone())
        } else {
            Self::from_positions(positions, geometry.indices.clone())
        }
    }

    pub fn vertices(&self) -> &[Vertex3D] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Bounds in the mesh's local space
    pub fn bounds(&self) -> AABB {
        self.bounds
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    // Helper function to calculate face normals if the source has none
    pub fn calculate_face_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
        let vertex_count = positions.len() / 3;
        let mut normals = vec![0.0; positions.len()]; // Same length as positions

        let position = |i: usize| {
            Vector3::new(positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2])
        };

        // For each triangle, calculate face normal and add to vertices
        for triangle in indices.chunks_exact(3) {
            let [i0, i1, i2] = [
                triangle[0] as usize,
                triangle[1] as usize,
                triangle[2] as usize,
            ];
            if i0.max(i1).max(i2) >= vertex_count {
                continue;
            }

            let v0 = position(i0);
            let face_normal = (position(i1) - v0).cross(position(i2) - v0);

            for vertex_idx in [i0, i1, i2] {
                normals[vertex_idx * 3] += face_normal.x;
                normals[vertex_idx * 3 + 1] += face_normal.y;
                normals[vertex_idx * 3 + 2] += face_normal.z;
            }
        }

        for normal in normals.chunks_exact_mut(3) {
            let n = Vector3::new(normal[0], normal[1], normal[2]);
            let length = n.magnitude();
            if length > 0.0 {
                let unit: [f32; 3] = (n / length).into();
                normal.copy_from_slice(&unit);
            }
        }

        normals
    }
}

/// One renderable mesh in the scene: geometry, transform, material and
/// shadow flags.
#[derive(Debug, Clone)]
pub struct Object {
    id: ObjectId,
    pub name: String,
    pub mesh: Mesh,
    pub transform: Matrix4<f32>, // cgmath 4x4 transformation matrix
    material: MaterialId,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    pub visible: bool,
}

impl Object {
    /// Create a new Object with identity transformation and the default material
    pub fn new(name: impl Into<String>, mesh: Mesh) -> Self {
        Self {
            id: ObjectId::next(),
            name: name.into(),
            mesh,
            transform: Matrix4::identity(),
            material: DEFAULT_MATERIAL.to_string(),
            cast_shadow: false,
            receive_shadow: false,
            visible: true,
        }
    }

    pub fn from_geometry(name: impl Into<String>, geometry: &GeometryData) -> Self {
        Self::new(name, Mesh::from_geometry(geometry))
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn material(&self) -> &str {
        &self.material
    }

    pub(crate) fn material_id(&self) -> &MaterialId {
        &self.material
    }

    pub fn set_material(&mut self, material: impl Into<MaterialId>) {
        self.material = material.into();
    }

    /// Set translation
    pub fn set_translation(&mut self, translation: Vector3<f32>) {
        self.transform = Matrix4::from_translation(translation);
    }

    /// Set uniform scale
    pub fn set_scale(&mut self, scale: f32) {
        self.transform = Matrix4::from_scale(scale);
    }

    /// Apply rotation around X axis
    pub fn rotate_x(&mut self, angle: Deg<f32>) {
        self.transform = self.transform * Matrix4::from_angle_x(angle);
    }

    pub fn world_bounds(&self) -> AABB {
        self.mesh.bounds().transform(&self.transform)
    }

    /// Distance along `ray` to the nearest triangle of this object.
    ///
    /// The world-space bounds are checked first; triangles are only visited
    /// when the box is hit.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        self.world_bounds().intersect_ray(ray)?;

        let world: Vec<Vector3<f32>> = self
            .mesh
            .vertices()
            .iter()
            .map(|v| {
                self.transform
                    .transform_point(Point3::from(v.position))
                    .to_vec()
            })
            .collect();

        self.mesh
            .indices()
            .chunks_exact(3)
            .filter_map(|tri| {
                let a = world.get(tri[0] as usize)?;
                let b = world.get(tri[1] as usize)?;
                let c = world.get(tri[2] as usize)?;
                ray.intersect_triangle(*a, *b, *c)
            })
            .min_by(|a, b| a.total_cmp(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::{generate_cube, generate_plane};

    #[test]
    fn test_ids_are_unique() {
        let a = Object::from_geometry("a", &generate_cube());
        let b = Object::from_geometry("b", &generate_cube());
        assert_ne!(a.id(), b.id());
        assert!(b.id() > a.id());
    }

    #[test]
    fn test_face_normals_for_flat_triangle() {
        let positions = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let normals = Mesh::calculate_face_normals(&positions, &[0, 1, 2]);
        assert_eq!(normals, vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_intersect_translated_cube() {
        let mut cube = Object::from_geometry("cube", &generate_cube());
        cube.set_translation(Vector3::new(0.0, 0.0, -10.0));

        let ray = Ray::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, -1.0));
        let distance = cube.intersect_ray(&ray).expect("cube is in front of the ray");
        assert!((distance - 9.5).abs() < 1e-4);

        let miss = Ray::new(Vector3::new(3.0, 0.0, 0.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(cube.intersect_ray(&miss).is_none());
    }

    #[test]
    fn test_rotated_plane_lies_flat() {
        let mut ground = Object::from_geometry("ground", &generate_plane(10.0, 10.0, 1, 1));
        ground.set_translation(Vector3::new(0.0, -0.1, 0.0));
        ground.rotate_x(Deg(-90.0));

        let bounds = ground.world_bounds();
        assert!((bounds.min.y + 0.1).abs() < 1e-5);
        assert!((bounds.max.y + 0.1).abs() < 1e-5);

        let down = Ray::new(Vector3::new(1.0, 5.0, 1.0), Vector3::new(0.0, -1.0, 0.0));
        let distance = ground.intersect_ray(&down).expect("ray points at the ground");
        assert!((distance - 5.1).abs() < 1e-4);
    }
}

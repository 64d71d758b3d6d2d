//! # Object Picking System
//!
//! This module resolves the pointer to the entity under it. It is split into
//! four pieces that run in a fixed order every frame:
//!
//! 1. **Pointer** ([`pointer`]) - raw pointer coordinates to normalized device coordinates
//! 2. **Ray** ([`Ray`]) - normalized device coordinates to a world-space ray through the camera
//! 3. **Intersection** ([`Raycast`]) - the ray against scene objects, nearest hit first
//! 4. **Selection** ([`selection`]) - exclusive highlight of the nearest selectable entity
//!
//! [`engine::PickingEngine`] ties the last three together.
//!
//! ## Usage
//!
//! ```no_run
//! use sceneview::gfx::picking::{Ray, Raycast};
//! use cgmath::Vector3;
//!
//! # fn run(scene: &sceneview::gfx::scene::Scene) {
//! let ray = Ray::new(Vector3::new(0.0, 0.0, 10.0), Vector3::new(0.0, 0.0, -1.0));
//! for hit in scene.intersect_ray(&ray) {
//!     println!("{} at {:.2}", hit.object, hit.distance);
//! }
//! # }
//! ```

pub mod engine;
pub mod pointer;
pub mod selection;

pub use engine::{PickOutcome, PickingEngine};
pub use pointer::{ObserverId, PointerEvent, PointerObservers, PointerTracker};
pub use selection::{MaterialSlots, Selection};

use cgmath::{
    InnerSpace, Matrix4, SquareMatrix, Vector2, Vector3, Vector4, Zero,
};

use crate::gfx::scene::ObjectId;

/// Determinant threshold below which a ray is treated as parallel to a triangle.
const TRIANGLE_EPSILON: f32 = 1e-7;

/// A 3D ray for intersection testing
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Ray origin point in world space
    pub origin: Vector3<f32>,
    /// Ray direction (normalized)
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Create a new ray
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Unprojects a normalized device coordinate through the inverse of
    /// `view_proj`.
    ///
    /// The origin lies on the near plane and the ray points at the matching
    /// far-plane point, so the same code serves perspective and orthographic
    /// projections. Returns `None` when `view_proj` has no inverse.
    pub fn from_ndc(ndc: Vector2<f32>, view_proj: Matrix4<f32>) -> Option<Self> {
        let inv_view_proj = view_proj.invert()?;

        let near_point = Vector4::new(ndc.x, ndc.y, -1.0, 1.0);
        let far_point = Vector4::new(ndc.x, ndc.y, 1.0, 1.0);

        let near_3d = dehomogenize(inv_view_proj * near_point);
        let far_3d = dehomogenize(inv_view_proj * far_point);

        Some(Ray::new(near_3d, far_3d - near_3d))
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }

    /// Möller–Trumbore ray/triangle test. Both windings count as a hit.
    ///
    /// Returns the distance along the ray, or `None` when the triangle is
    /// missed, parallel, or behind the origin.
    pub fn intersect_triangle(
        &self,
        a: Vector3<f32>,
        b: Vector3<f32>,
        c: Vector3<f32>,
    ) -> Option<f32> {
        let edge1 = b - a;
        let edge2 = c - a;
        let h = self.direction.cross(edge2);
        let det = edge1.dot(h);
        if det.abs() < TRIANGLE_EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        let s = self.origin - a;
        let u = inv_det * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = inv_det * self.direction.dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = inv_det * edge2.dot(q);
        (t > TRIANGLE_EPSILON).then_some(t)
    }
}

fn dehomogenize(v: Vector4<f32>) -> Vector3<f32> {
    Vector3::new(v.x / v.w, v.y / v.w, v.z / v.w)
}

/// Axis-aligned bounds of a mesh, in whatever space its vertices live in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl AABB {
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Bounds enclosing every vertex. An empty slice gives a degenerate box
    /// at the origin.
    pub fn from_vertices(vertices: &[[f32; 3]]) -> Self {
        let mut points = vertices.iter().map(|&[x, y, z]| Vector3::new(x, y, z));
        let Some(first) = points.next() else {
            return Self::new(Vector3::zero(), Vector3::zero());
        };

        points.fold(Self::new(first, first), |bounds, p| {
            Self::new(
                Vector3::new(bounds.min.x.min(p.x), bounds.min.y.min(p.y), bounds.min.z.min(p.z)),
                Vector3::new(bounds.max.x.max(p.x), bounds.max.y.max(p.y), bounds.max.z.max(p.z)),
            )
        })
    }

    /// Slab test. Returns the entry distance, or the exit distance when the
    /// ray starts inside the box.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let mut near = f32::NEG_INFINITY;
        let mut far = f32::INFINITY;

        for axis in 0..3 {
            let inv = 1.0 / ray.direction[axis];
            let a = (self.min[axis] - ray.origin[axis]) * inv;
            let b = (self.max[axis] - ray.origin[axis]) * inv;
            near = near.max(a.min(b));
            far = far.min(a.max(b));
        }

        if near > far || far < 0.0 {
            return None;
        }
        Some(if near >= 0.0 { near } else { far })
    }

    /// Bounds of this box after `matrix` is applied to its eight corners.
    pub fn transform(&self, matrix: &Matrix4<f32>) -> Self {
        let corners: Vec<[f32; 3]> = (0..8)
            .map(|i| {
                let corner = Vector3::new(
                    if i & 1 == 0 { self.min.x } else { self.max.x },
                    if i & 2 == 0 { self.min.y } else { self.max.y },
                    if i & 4 == 0 { self.min.z } else { self.max.z },
                );
                dehomogenize(matrix * corner.extend(1.0)).into()
            })
            .collect();

        Self::from_vertices(&corners)
    }
}

/// One ray hit against a scene object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Object that was hit
    pub object: ObjectId,
    /// Distance from the ray origin to the hit
    pub distance: f32,
    /// World space intersection point
    pub point: Vector3<f32>,
}

/// Ray queries against a collection of renderable objects.
pub trait Raycast {
    /// Returns every hit along `ray`, sorted nearest first.
    fn intersect_ray(&self, ray: &Ray) -> Vec<Intersection>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{ortho, Point3};

    #[test]
    fn test_aabb_creation() {
        let vertices = vec![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [-1.0, -1.0, -1.0]];
        let aabb = AABB::from_vertices(&vertices);

        assert_eq!(aabb.min, Vector3::new(-1.0, -1.0, -1.0));
        assert_eq!(aabb.max, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_ray_aabb_intersection() {
        let aabb = AABB::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0));

        // Ray hitting the box
        let ray = Ray::new(Vector3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        let distance = aabb.intersect_ray(&ray).expect("ray should hit");
        assert!((distance - 4.0).abs() < 1e-5);

        // Ray missing the box
        let ray_miss = Ray::new(Vector3::new(5.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(aabb.intersect_ray(&ray_miss).is_none());
    }

    #[test]
    fn test_aabb_transform_translates_bounds() {
        let aabb = AABB::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0));
        let moved = aabb.transform(&Matrix4::from_translation(Vector3::new(10.0, 0.0, 0.0)));

        assert_eq!(moved.min, Vector3::new(9.0, -1.0, -1.0));
        assert_eq!(moved.max, Vector3::new(11.0, 1.0, 1.0));
    }

    #[test]
    fn test_triangle_hit_reports_distance() {
        let ray = Ray::new(Vector3::new(0.25, 0.25, 5.0), Vector3::new(0.0, 0.0, -1.0));
        let t = ray.intersect_triangle(
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        );
        assert!((t.expect("ray should hit") - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_triangle_back_face_and_miss() {
        // Same triangle, reversed winding, still counts
        let ray = Ray::new(Vector3::new(0.25, 0.25, 5.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(ray
            .intersect_triangle(
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
                Vector3::new(1.0, 0.0, 0.0),
            )
            .is_some());

        let outside = Ray::new(Vector3::new(2.0, 2.0, 5.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(outside
            .intersect_triangle(
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
            )
            .is_none());

        // Triangle behind the origin
        let behind = Ray::new(Vector3::new(0.25, 0.25, -5.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(behind
            .intersect_triangle(
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
            )
            .is_none());
    }

    #[test]
    fn test_ray_from_ndc_orthographic_center() {
        let view = Matrix4::look_at_rh(
            Point3::new(0.0, 0.0, 10.0),
            Point3::new(0.0, 0.0, 0.0),
            Vector3::unit_y(),
        );
        let proj = ortho(-5.0, 5.0, -5.0, 5.0, 0.1, 100.0);
        let ray = Ray::from_ndc(Vector2::new(0.0, 0.0), proj * view).unwrap();

        assert!((ray.origin.z - 9.9).abs() < 1e-3);
        assert!(ray.origin.x.abs() < 1e-4 && ray.origin.y.abs() < 1e-4);
        assert!((ray.direction - Vector3::new(0.0, 0.0, -1.0)).magnitude() < 1e-4);

        // Edge of the viewport maps to the edge of the view volume
        let corner = Ray::from_ndc(Vector2::new(1.0, -1.0), proj * view).unwrap();
        assert!((corner.origin.x - 5.0).abs() < 1e-3);
        assert!((corner.origin.y + 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_ray_from_singular_matrix() {
        let flattened = Matrix4::from_nonuniform_scale(1.0, 1.0, 0.0);
        assert!(Ray::from_ndc(Vector2::new(0.0, 0.0), flattened).is_none());
    }
}

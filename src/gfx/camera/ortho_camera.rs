use cgmath::{
    ortho, EuclideanSpace, InnerSpace, Matrix4, Point3, Quaternion, Rad, Rotation, Rotation3,
    Vector3, Zero,
};

use super::camera_utils::Camera;

/// Orthographic camera looking at a target.
///
/// The view volume spans `half_extent` above and below the view axis and
/// `half_extent * aspect` to either side, divided by `zoom`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthographicCamera {
    pub half_extent: f32,
    pub aspect: f32,
    pub zoom: f32,
    pub znear: f32,
    pub zfar: f32,
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
}

impl OrthographicCamera {
    pub fn new(half_extent: f32, aspect: f32, eye: Vector3<f32>) -> Self {
        Self {
            half_extent,
            aspect,
            zoom: 1.0,
            znear: 0.1,
            zfar: 200.0,
            eye,
            target: Vector3::zero(),
            up: Vector3::unit_y(),
        }
    }

    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.set_zoom(zoom);
        self
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.max(f32::EPSILON);
    }

    /// Sets how far the view volume reaches from the view axis
    pub fn set_half_extent(&mut self, half_extent: f32) {
        self.half_extent = half_extent.max(f32::EPSILON);
    }
}

impl Camera for OrthographicCamera {
    fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(
            Point3::from_vec(self.eye),
            Point3::from_vec(self.target),
            self.up,
        )
    }

    fn projection_matrix(&self) -> Matrix4<f32> {
        let top = self.half_extent / self.zoom;
        let right = top * self.aspect;
        ortho(-right, right, -top, top, self.znear, self.zfar)
    }

    fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    fn orbit(&mut self, axis: Vector3<f32>, angle: Rad<f32>) {
        if axis.magnitude2() == 0.0 {
            return;
        }
        let rotation = Quaternion::from_axis_angle(axis.normalize(), angle);
        self.eye = self.target + rotation.rotate_vector(self.eye - self.target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector2;

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = OrthographicCamera::new(27.0, 1.5, Vector3::new(50.0, 47.0, 50.0))
            .with_zoom(0.95);
        let ray = camera.ray_from_ndc(Vector2::new(0.0, 0.0)).unwrap();

        let to_target = (camera.target - camera.eye).normalize();
        assert!((ray.direction - to_target).magnitude() < 1e-4);

        // Closest approach of the ray to the target is ~0
        let offset = camera.target - ray.origin;
        let along = offset.dot(ray.direction);
        assert!((offset - ray.direction * along).magnitude() < 1e-3);
    }

    #[test]
    fn test_orthographic_rays_are_parallel() {
        let camera = OrthographicCamera::new(10.0, 1.0, Vector3::new(0.0, 0.0, 20.0));
        let a = camera.ray_from_ndc(Vector2::new(-0.5, 0.5)).unwrap();
        let b = camera.ray_from_ndc(Vector2::new(0.9, -0.2)).unwrap();

        assert!((a.direction - b.direction).magnitude() < 1e-5);
        assert!((a.origin.x + 5.0).abs() < 1e-3);
        assert!((a.origin.y - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_zoom_shrinks_view_volume() {
        let camera = OrthographicCamera::new(10.0, 1.0, Vector3::new(0.0, 0.0, 20.0)).with_zoom(2.0);
        let edge = camera.ray_from_ndc(Vector2::new(1.0, 1.0)).unwrap();
        assert!((edge.origin.x - 5.0).abs() < 1e-3);
        assert!((edge.origin.y - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_orbit_keeps_distance() {
        let mut camera = OrthographicCamera::new(27.0, 1.0, Vector3::new(50.0, 47.0, 50.0));
        let before = (camera.eye - camera.target).magnitude();

        camera.orbit(Vector3::new(1.0, 1.0, 1.0), Rad(0.008));
        let after = (camera.eye - camera.target).magnitude();

        assert!((before - after).abs() < 1e-3);
        assert_ne!(camera.eye, Vector3::new(50.0, 47.0, 50.0));

        // A zero axis is ignored
        let eye = camera.eye;
        camera.orbit(Vector3::zero(), Rad(1.0));
        assert_eq!(camera.eye, eye);
    }
}

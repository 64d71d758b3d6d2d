use cgmath::{Matrix4, Rad, Vector2, Vector3};

use crate::gfx::picking::Ray;

/// View and projection of a viewpoint, and the pointer rays it produces.
pub trait Camera {
    fn view_matrix(&self) -> Matrix4<f32>;

    fn projection_matrix(&self) -> Matrix4<f32>;

    /// Updates the projection for a new surface aspect ratio (width / height)
    fn set_aspect(&mut self, aspect: f32);

    /// Rotates the viewpoint around `axis` through the look-at target
    fn orbit(&mut self, axis: Vector3<f32>, angle: Rad<f32>);

    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    /// World-space ray through a normalized device coordinate, if the
    /// view-projection can be inverted
    fn ray_from_ndc(&self, ndc: Vector2<f32>) -> Option<Ray> {
        Ray::from_ndc(ndc, self.build_view_projection_matrix())
    }
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    matrix4.into()
}

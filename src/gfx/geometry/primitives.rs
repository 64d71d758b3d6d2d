//! # Primitive Shape Generation
//!
//! All shapes are centered at the origin with outward-facing normals.

use super::GeometryData;

/// Generate a unit cube centered at the origin
///
/// Returns a cube with vertices from -0.5 to 0.5 on all axes.
pub fn generate_cube() -> GeometryData {
    generate_box(1.0, 1.0, 1.0)
}

/// Generate an axis-aligned box with the given extents.
///
/// Each face gets its own four vertices so normals stay flat.
pub fn generate_box(width: f32, height: f32, depth: f32) -> GeometryData {
    let (x, y, z) = (width * 0.5, height * 0.5, depth * 0.5);
    let mut data = GeometryData::new();

    // +Z, -Z
    data.push_quad([[-x, -y, z], [x, -y, z], [x, y, z], [-x, y, z]], [0.0, 0.0, 1.0]);
    data.push_quad([[x, -y, -z], [-x, -y, -z], [-x, y, -z], [x, y, -z]], [0.0, 0.0, -1.0]);
    // +X, -X
    data.push_quad([[x, -y, z], [x, -y, -z], [x, y, -z], [x, y, z]], [1.0, 0.0, 0.0]);
    data.push_quad([[-x, -y, -z], [-x, -y, z], [-x, y, z], [-x, y, -z]], [-1.0, 0.0, 0.0]);
    // +Y, -Y
    data.push_quad([[-x, y, z], [x, y, z], [x, y, -z], [-x, y, -z]], [0.0, 1.0, 0.0]);
    data.push_quad([[-x, -y, -z], [x, -y, -z], [x, -y, z], [-x, -y, z]], [0.0, -1.0, 0.0]);

    data
}

/// Generate a plane in the XY plane facing +Z.
///
/// # Arguments
/// * `width` - Width of the plane (X direction)
/// * `height` - Height of the plane (Y direction)
/// * `width_segments` - Number of subdivisions along width
/// * `height_segments` - Number of subdivisions along height
///
/// Rotate by -90° around X to lay it flat as a ground.
pub fn generate_plane(
    width: f32,
    height: f32,
    width_segments: u32,
    height_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let w_segs = width_segments.max(1);
    let h_segs = height_segments.max(1);

    for row in 0..=h_segs {
        let pos_y = (row as f32 / h_segs as f32 - 0.5) * height;
        for col in 0..=w_segs {
            let pos_x = (col as f32 / w_segs as f32 - 0.5) * width;
            data.vertices.push([pos_x, pos_y, 0.0]);
            data.normals.push([0.0, 0.0, 1.0]);
        }
    }

    let stride = w_segs + 1;
    for row in 0..h_segs {
        for col in 0..w_segs {
            let i = row * stride + col;
            let above = i + stride;
            data.indices
                .extend_from_slice(&[i, i + 1, above + 1, above + 1, above, i]);
        }
    }

    data
}

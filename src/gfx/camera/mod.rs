pub mod camera_utils;
pub mod orbit_camera;
pub mod ortho_camera;

// Re-export main types
pub use camera_utils::Camera;
pub use orbit_camera::OrbitCamera;
pub use ortho_camera::OrthographicCamera;

// src/lib.rs
//! Sceneview
//!
//! Scene management and object picking for an interactive 3D scene viewer:
//! asynchronous OBJ/glTF loading into an entity registry, pointer-driven ray
//! picking and exclusive highlight selection, with JSON scene export.

pub mod animation;
pub mod app;
pub mod assets;
pub mod config;
pub mod export;
pub mod gfx;

// Re-export main types for convenience
pub use app::Viewer;
pub use config::ViewerConfig;

/// Creates a viewer with the default configuration
pub fn default() -> Viewer {
    Viewer::new(ViewerConfig::default())
}

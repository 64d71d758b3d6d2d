//! Viewer configuration.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```
//! use sceneview::config::{Projection, ViewerConfig};
//!
//! let config = ViewerConfig::from_json_str(r#"{ "projection": "perspective", "ambient": 0.5 }"#)?;
//! assert_eq!(config.projection, Projection::Perspective);
//! assert_eq!(config.surface_width, 1200);
//! # Ok::<(), sceneview::config::ConfigError>(())
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    Orthographic,
    Perspective,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundConfig {
    pub size: f32,
    pub color: u32,
    pub height: f32,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            size: 200.0,
            color: 0xc5c5c5,
            height: -0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub surface_width: u32,
    pub surface_height: u32,
    pub projection: Projection,
    /// Orthographic half-extent, or orbit distance for the perspective camera
    pub camera_distance: f32,
    pub camera_zoom: f32,
    pub camera_position: [f32; 3],
    /// Radians per frame around the (1, 1, 1) axis; 0 disables the turntable
    pub rotation_speed: f32,
    pub ambient: f32,
    pub ambient_total: f32,
    pub background: u32,
    pub highlight_color: u32,
    /// `null` leaves the ground plane out
    pub ground: Option<GroundConfig>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            surface_width: 1200,
            surface_height: 800,
            projection: Projection::Orthographic,
            camera_distance: 27.0,
            camera_zoom: 0.95,
            camera_position: [50.0, 47.0, 50.0],
            rotation_speed: 0.008,
            ambient: 0.67,
            ambient_total: 1.05,
            background: 0xffffff,
            highlight_color: 0x4f9ef4,
            ground: Some(GroundConfig::default()),
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn aspect(&self) -> f32 {
        if self.surface_height == 0 {
            1.0
        } else {
            self.surface_width as f32 / self.surface_height as f32
        }
    }
}

// src/gfx/resources/mod.rs
//! Scene resources
//!
//! Materials shared between objects, referenced by ID.

pub mod material;

// Re-export main types
pub use material::{hex_to_rgb, Material, MaterialId, MaterialManager, DEFAULT_MATERIAL};

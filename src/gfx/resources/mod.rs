//! Materials and GPU resources
//!
//! Per-object material state (including the interaction indicator channels)
//! and the textures the renderer allocates.

pub mod material;
pub mod texture_resource;

// Re-export main types
pub use material::{Indicator, Material};
pub use texture_resource::TextureResource;

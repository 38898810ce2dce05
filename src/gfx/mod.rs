//! # Graphics Module
//!
//! Scene data, picking and rendering for the grab scene.
//!
//! ## Architecture Overview
//!
//! - **Camera** ([`camera`]) - Fixed viewer camera and cursor rays
//! - **Geometry** ([`geometry`]) - Procedural meshes for shapes, floor and rays
//! - **Picking** ([`picking`]) - Ray casting against pickable meshes
//! - **Rendering** ([`rendering`]) - Frame snapshot contract and the wgpu renderer
//! - **Resources** ([`resources`]) - Materials with indicator channels, depth textures
//! - **Scene** ([`scene`]) - Shape pool, transforms and ownership

pub mod camera;
pub mod geometry;
pub mod picking;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::FixedCamera;
pub use rendering::render_engine::RenderEngine;

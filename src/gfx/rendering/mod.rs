// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! The per-frame [`SceneView`] contract, a headless [`NullRenderer`], the
//! shadow light and the wgpu [`RenderEngine`] used by the desktop viewer.

pub mod frame;
pub mod render_engine;
pub mod shadow;

// Re-export main types
pub use frame::{DeviceView, FrameRenderer, NullRenderer, ObjectView, SceneView};
pub use render_engine::RenderEngine;
pub use shadow::ShadowLight;

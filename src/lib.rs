// src/lib.rs
//! grabscene
//!
//! Two-device ray picking and grab/drop over a randomly populated 3D scene,
//! with a wgpu/winit desktop viewer.
//!
//! The interaction core ([`interaction`]) is independent of any window or
//! GPU: feed it poses and press/release events through a
//! [`input::PointerSource`] and hand it any [`gfx::rendering::FrameRenderer`].

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod input;
pub mod interaction;
pub mod prelude;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::GrabApp;
pub use config::SessionConfig;
pub use error::{GrabError, Result};

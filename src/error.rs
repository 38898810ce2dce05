//! Crate-level error types.

use std::path::PathBuf;

use crate::gfx::scene::object::{ObjectId, Owner};

/// Errors produced by the grabscene crate.
///
/// Interaction faults (a release while idle, a press with nothing under the
/// ray, an untracked device) are not errors and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum GrabError {
    /// TOML configuration could not be parsed.
    #[error("failed to parse configuration {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Configuration parsed but holds values the session cannot use.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown object {0}")]
    UnknownObject(ObjectId),

    /// The target owner's frame has no inverse (zero or non-finite scale).
    #[error("cannot move object {0} into the degenerate frame of {1}")]
    DegenerateFrame(ObjectId, Owner),

    /// Surface, adapter or device failure in the viewer.
    #[error("render error: {0}")]
    Render(String),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

pub type Result<T, E = GrabError> = std::result::Result<T, E>;

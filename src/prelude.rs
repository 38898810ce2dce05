//! # grabscene Prelude
//!
//! Commonly used types in one import.
//!
//! ```rust
//! use grabscene::prelude::*;
//!
//! let config = SessionConfig::default().with_seed(7).with_shape_count(10);
//! let mut driver = FrameDriver::from_config(&config).unwrap();
//! let stats = driver
//!     .tick(&mut ScriptedPointers::new(), &mut NullRenderer::default())
//!     .unwrap();
//! assert_eq!(stats.frame, 1);
//! ```

pub use crate::app::GrabApp;
pub use crate::config::{InteractionConfig, SceneConfig, SessionConfig, ViewerConfig};
pub use crate::error::{GrabError, Result};

pub use crate::gfx::camera::FixedCamera;
pub use crate::gfx::geometry::{GeometryData, ShapeKind};
pub use crate::gfx::picking::{PickResult, Ray, RayCaster};
pub use crate::gfx::rendering::{FrameRenderer, NullRenderer, SceneView};
pub use crate::gfx::resources::{Indicator, Material};
pub use crate::gfx::scene::{ObjectId, Owner, PickableObject, ShapePool, Transform};

pub use crate::input::{DeviceId, PointerEvent, PointerEventKind, PointerSource, ScriptedPointers};

pub use crate::interaction::{
    AttachmentState, DeviceState, EventOutcome, FrameDriver, FrameStats, HighlightTracker,
};

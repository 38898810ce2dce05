//! # Interaction Core
//!
//! Ray highlighting and grab/drop for two independent devices.
//!
//! - [`HighlightTracker`] - which objects are under a ray this frame
//! - [`DeviceState`] - per-device idle/holding state machine
//! - [`FrameDriver`] - runs poses, events, highlights and rendering once per frame
//!
//! ## Usage
//!
//! ```rust
//! use grabscene::prelude::*;
//! use cgmath::Vector3;
//!
//! let mut pool = ShapePool::new();
//! pool.insert(
//!     ShapeKind::Box,
//!     Transform::from_position(Vector3::new(0.0, 1.6, 1.0)),
//!     Material::default(),
//! );
//! let mut driver = FrameDriver::new(pool, 5.0);
//!
//! let mut pointers = ScriptedPointers::new();
//! pointers.set_pose(DeviceId::Left, Some(Transform::from_position(Vector3::new(0.0, 1.6, 3.0))));
//!
//! let stats = driver.tick(&mut pointers, &mut NullRenderer::default()).unwrap();
//! assert_eq!(stats.highlighted, 1);
//! ```

pub mod attachment;
pub mod driver;
pub mod highlight;

pub use attachment::{AttachmentState, DeviceState, EventOutcome};
pub use driver::{FrameDriver, FrameStats};
pub use highlight::HighlightTracker;

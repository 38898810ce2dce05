//! # Scene Module
//!
//! The pickable objects and the frames they live in.
//!
//! ## Key Components
//!
//! - [`ShapePool`] - owns every pickable object and the shared per-kind meshes
//! - [`PickableObject`] - one shape instance with its owner and material
//! - [`Transform`] - position, rotation and uniform scale relative to a parent frame
//! - [`Vertex3D`] - GPU vertex format
//!
//! ## Ownership
//!
//! Each object is owned either by the pool (its transform is in world
//! space) or by one device (its transform is relative to that device's
//! pose). [`ShapePool::reparent`] switches owner while keeping the world
//! transform fixed.

pub mod object;
pub mod pool;
pub mod transform;
pub mod vertex;

pub use object::{ObjectId, Owner, PickableObject};
pub use pool::{OwnerCounts, ShapeMesh, ShapePool};
pub use transform::Transform;
pub use vertex::Vertex3D;

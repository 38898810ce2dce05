//! # Pickable Objects
//!
//! A pickable object is one shape instance in the pool: a mesh kind, a
//! transform relative to its current owner, a material carrying the
//! indicator channels, and the owner itself.

use std::fmt;

use crate::gfx::geometry::ShapeKind;
use crate::gfx::resources::Material;
use crate::gfx::scene::transform::Transform;
use crate::input::DeviceId;

/// Stable identity of a pickable object (its slot in the pool)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub usize);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Frame an object's transform is expressed relative to
///
/// An object has exactly one owner at any time. Pool-owned objects are in
/// world space; device-owned objects move with that device's pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    Pool,
    Device(DeviceId),
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Owner::Pool => write!(f, "pool"),
            Owner::Device(device) => write!(f, "{}", device),
        }
    }
}

/// A shape instance that can be highlighted, grabbed and dropped
#[derive(Debug, Clone)]
pub struct PickableObject {
    pub id: ObjectId,
    pub name: String,
    pub kind: ShapeKind,
    /// Transform relative to [`PickableObject::owner`]
    pub local: Transform,
    pub material: Material,
    pub owner: Owner,
}

impl PickableObject {
    /// Whether the object currently belongs to the shared pool
    pub fn in_pool(&self) -> bool {
        self.owner == Owner::Pool
    }

    /// Device holding the object, if any
    pub fn holder(&self) -> Option<DeviceId> {
        match self.owner {
            Owner::Pool => None,
            Owner::Device(device) => Some(device),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_queries() {
        let mut object = PickableObject {
            id: ObjectId(3),
            name: "Box 3".to_string(),
            kind: ShapeKind::Box,
            local: Transform::identity(),
            material: Material::default(),
            owner: Owner::Pool,
        };
        assert!(object.in_pool());
        assert_eq!(object.holder(), None);

        object.owner = Owner::Device(DeviceId::Right);
        assert!(!object.in_pool());
        assert_eq!(object.holder(), Some(DeviceId::Right));
        assert_eq!(object.owner.to_string(), "device 1");
        assert_eq!(object.id.to_string(), "#3");
    }
}

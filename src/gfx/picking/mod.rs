//! # Object Picking System
//!
//! Ray-casting against the pickable shapes. Device poses are turned into
//! world-space rays, and [`RayCaster`] reports the nearest shape a ray hits.
//!
//! ## How it works
//!
//! 1. **Pose to Ray**: origin at the device position, direction along its forward axis
//! 2. **Broad phase**: the ray is moved into each object's local frame and tested against the mesh bounds
//! 3. **Narrow phase**: front-facing mesh triangles are tested; the closest hit wins
//!
//! ## Usage
//!
//! ```rust
//! use grabscene::gfx::picking::{Ray, RayCaster};
//! use cgmath::Vector3;
//!
//! let ray = Ray::new(Vector3::new(0.0, 1.6, 3.0), Vector3::new(0.0, 0.0, -1.0));
//! let caster = RayCaster::default();
//! assert!(caster.intersect(&ray, std::iter::empty()).is_none());
//! ```

pub mod caster;

pub use caster::{Candidate, RayCaster};

use cgmath::{InnerSpace, Vector3, Zero};

use crate::gfx::scene::object::ObjectId;
use crate::gfx::scene::transform::Transform;

/// A 3D ray for intersection testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Ray origin point
    pub origin: Vector3<f32>,
    /// Ray direction (normalized for world-space rays)
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Create a new ray
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Ray leaving a device: from its position along its forward axis.
    ///
    /// Only the rotation affects the direction, never translation or scale.
    pub fn from_pose(pose: &Transform) -> Self {
        Self::new(pose.position, pose.forward())
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }

    /// Finite origin and a finite, non-zero direction
    pub fn is_valid(&self) -> bool {
        let finite = |v: Vector3<f32>| v.x.is_finite() && v.y.is_finite() && v.z.is_finite();
        finite(self.origin) && finite(self.direction) && self.direction.magnitude2() > 0.0
    }

    /// The same ray expressed in another frame, given that frame's inverse.
    ///
    /// The direction is deliberately left unnormalized so parameter values
    /// along the returned ray equal distances along `self`.
    pub(crate) fn to_local(self, inverse: &Transform) -> Ray {
        Ray {
            origin: inverse.transform_point(self.origin),
            direction: inverse.transform_vector(self.direction),
        }
    }
}

/// Axis-aligned bounding box for intersection testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vector3<f32>,
    /// Maximum corner of the bounding box
    pub max: Vector3<f32>,
}

impl Aabb {
    /// Create a new AABB
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Create AABB from a set of vertices
    pub fn from_vertices(vertices: &[[f32; 3]]) -> Self {
        let Some(first) = vertices.first() else {
            return Self::new(Vector3::zero(), Vector3::zero());
        };

        let mut min = Vector3::from(*first);
        let mut max = min;

        for vertex in vertices.iter().skip(1) {
            let v = Vector3::from(*vertex);
            min.x = min.x.min(v.x);
            min.y = min.y.min(v.y);
            min.z = min.z.min(v.z);
            max.x = max.x.max(v.x);
            max.y = max.y.max(v.y);
            max.z = max.z.max(v.z);
        }

        Self::new(min, max)
    }

    /// Test ray-AABB intersection
    /// Returns the ray parameter of the entry point (or exit point when the
    /// origin is inside), or None if the box is missed or behind the ray.
    ///
    /// An axis the ray does not move along is handled on its own: the ray
    /// is inside that slab for every `t` when its origin lies within the
    /// slab (boundary included) and outside it otherwise.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;

        for axis in 0..3 {
            let origin = ray.origin[axis];
            let direction = ray.direction[axis];
            let (min, max) = (self.min[axis], self.max[axis]);

            if direction == 0.0 {
                if origin < min || origin > max {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / direction;
            let t0 = (min - origin) * inv;
            let t1 = (max - origin) * inv;
            t_near = t_near.max(t0.min(t1));
            t_far = t_far.min(t0.max(t1));
        }

        if t_near <= t_far && t_far >= 0.0 {
            Some(if t_near >= 0.0 { t_near } else { t_far })
        } else {
            None
        }
    }

    /// Box center
    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }
}

/// Result of a ray cast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickResult {
    /// The object hit
    pub object: ObjectId,
    /// World-space distance from the ray origin to the hit point
    pub distance: f32,
    /// World space intersection point
    pub point: Vector3<f32>,
}

//! Per-device grab/drop state machine
//!
//! Each device is either idle or holding exactly one object. A press while
//! idle grabs whatever the device's ray hits first; a release while holding
//! hands the object back to the pool. Every other combination is a no-op.
//! Ownership moves through [`ShapePool::reparent`], so an object never jumps
//! in world space when it is grabbed or dropped.

use log::{debug, info};

use crate::error::Result;
use crate::gfx::picking::{Ray, RayCaster};
use crate::gfx::resources::Indicator;
use crate::gfx::scene::object::{ObjectId, Owner};
use crate::gfx::scene::pool::ShapePool;
use crate::gfx::scene::transform::Transform;
use crate::input::DeviceId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttachmentState {
    #[default]
    Idle,
    Holding(ObjectId),
}

/// What an event did to the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Grabbed(ObjectId),
    Dropped(ObjectId),
    /// The event had no effect
    Ignored,
}

/// State of one tracked device
#[derive(Debug, Clone, Copy)]
pub struct DeviceState {
    pub id: DeviceId,
    /// Last valid world pose
    pub pose: Transform,
    /// Whether the most recent pose sample was usable
    pub tracked: bool,
    pub state: AttachmentState,
    /// Length of the ray visual
    pub ray_length: f32,
}

impl DeviceState {
    pub fn new(id: DeviceId, ray_length: f32) -> Self {
        Self {
            id,
            pose: Transform::identity(),
            tracked: false,
            state: AttachmentState::Idle,
            ray_length,
        }
    }

    /// Takes a pose sample. Missing or malformed samples (non-finite,
    /// zero rotation, non-positive scale) leave the last valid pose in
    /// place and mark the device untracked.
    pub fn update_pose(&mut self, sample: Option<Transform>) {
        let Some(pose) = sample else {
            self.tracked = false;
            return;
        };
        match pose.validated() {
            Some(pose) => {
                self.pose = pose;
                self.tracked = true;
            }
            None => {
                debug!("Rejected malformed pose for {}: {:?}", self.id, pose);
                self.tracked = false;
            }
        }
    }

    /// Current ray, if the device is tracked and its pose yields one
    pub fn ray(&self) -> Option<Ray> {
        if !self.tracked {
            return None;
        }
        Some(Ray::from_pose(&self.pose)).filter(Ray::is_valid)
    }

    pub fn held(&self) -> Option<ObjectId> {
        match self.state {
            AttachmentState::Idle => None,
            AttachmentState::Holding(id) => Some(id),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state == AttachmentState::Idle
    }

    /// Press: grab the nearest pool object under the ray.
    ///
    /// `device_poses` must already contain this device's current pose. If
    /// reparenting fails the device stays idle and the error is returned.
    pub fn press(
        &mut self,
        pool: &mut ShapePool,
        caster: &RayCaster,
        device_poses: &[Transform; 2],
    ) -> Result<EventOutcome> {
        if let AttachmentState::Holding(id) = self.state {
            debug!("{} pressed while holding {}; ignored", self.id, id);
            return Ok(EventOutcome::Ignored);
        }
        let Some(ray) = self.ray() else {
            debug!("{} pressed while untracked; ignored", self.id);
            return Ok(EventOutcome::Ignored);
        };
        let Some(hit) = caster.intersect(&ray, pool.pool_candidates()) else {
            debug!("{} pressed with nothing under the ray", self.id);
            return Ok(EventOutcome::Ignored);
        };

        pool.reparent(hit.object, Owner::Device(self.id), device_poses)?;
        if let Some(object) = pool.get_mut(hit.object) {
            object.material.set_indicator(Indicator::Held, true);
            info!("{} grabbed {} at {:.3}", self.id, object.name, hit.distance);
        }
        self.state = AttachmentState::Holding(hit.object);
        self.ray_length = hit.distance;
        Ok(EventOutcome::Grabbed(hit.object))
    }

    /// Release: return the held object to the pool.
    pub fn release(&mut self, pool: &mut ShapePool, device_poses: &[Transform; 2]) -> Result<EventOutcome> {
        let AttachmentState::Holding(id) = self.state else {
            debug!("{} released while idle; ignored", self.id);
            return Ok(EventOutcome::Ignored);
        };

        pool.reparent(id, Owner::Pool, device_poses)?;
        if let Some(object) = pool.get_mut(id) {
            object.material.set_indicator(Indicator::Held, false);
            info!("{} dropped {}", self.id, object.name);
        }
        self.state = AttachmentState::Idle;
        Ok(EventOutcome::Dropped(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::ShapeKind;
    use crate::gfx::resources::Material;
    use cgmath::{InnerSpace, Vector3};

    fn eye() -> Transform {
        Transform::from_position(Vector3::new(0.0, 1.6, 3.0))
    }

    fn single_box() -> (ShapePool, ObjectId) {
        let mut pool = ShapePool::new();
        let id = pool.insert(
            ShapeKind::Box,
            Transform::from_position(Vector3::new(0.0, 1.6, 1.0)),
            Material::default(),
        );
        (pool, id)
    }

    #[test]
    fn test_pose_rejection_keeps_last_valid() {
        let mut device = DeviceState::new(DeviceId::Left, 5.0);
        assert!(device.ray().is_none());

        device.update_pose(Some(eye()));
        assert!(device.tracked);

        let mut broken = eye();
        broken.position.y = f32::INFINITY;
        device.update_pose(Some(broken));
        assert!(!device.tracked);
        assert_eq!(device.pose, eye());
        assert!(device.ray().is_none());

        device.update_pose(None);
        assert!(!device.tracked);
    }

    #[test]
    fn test_zero_rotation_pose_is_untracked() {
        let mut device = DeviceState::new(DeviceId::Right, 5.0);
        device.update_pose(Some(eye()));

        let mut degenerate = eye();
        degenerate.rotation = cgmath::Quaternion::new(0.0, 0.0, 0.0, 0.0);
        device.update_pose(Some(degenerate));

        assert!(!device.tracked);
        assert_eq!(device.pose, eye());
        assert!(device.ray().is_none());
    }

    #[test]
    fn test_press_grabs_and_release_drops() {
        let (mut pool, id) = single_box();
        let caster = RayCaster::default();
        let mut device = DeviceState::new(DeviceId::Left, 5.0);
        device.update_pose(Some(eye()));
        let poses = [eye(), Transform::identity()];

        let outcome = device.press(&mut pool, &caster, &poses).unwrap();
        assert_eq!(outcome, EventOutcome::Grabbed(id));
        assert_eq!(device.held(), Some(id));
        assert!((device.ray_length - 1.9).abs() < 1e-4);

        let object = pool.get(id).unwrap();
        assert_eq!(object.owner, Owner::Device(DeviceId::Left));
        assert_eq!(object.material.indicator(Indicator::Held), 1.0);
        assert!((object.local.position - Vector3::new(0.0, 0.0, -2.0)).magnitude() < 1e-5);

        let outcome = device.release(&mut pool, &poses).unwrap();
        assert_eq!(outcome, EventOutcome::Dropped(id));
        assert!(device.is_idle());

        let object = pool.get(id).unwrap();
        assert!(object.in_pool());
        assert_eq!(object.material.indicator(Indicator::Held), 0.0);
        assert!((object.local.position.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_noop_transitions() {
        let (mut pool, id) = single_box();
        let caster = RayCaster::default();
        let mut device = DeviceState::new(DeviceId::Right, 5.0);
        let poses = [Transform::identity(), eye()];

        // Untracked press
        assert_eq!(device.press(&mut pool, &caster, &poses).unwrap(), EventOutcome::Ignored);

        // Release while idle
        assert_eq!(device.release(&mut pool, &poses).unwrap(), EventOutcome::Ignored);

        // Second press while holding
        device.update_pose(Some(eye()));
        device.press(&mut pool, &caster, &poses).unwrap();
        assert_eq!(device.press(&mut pool, &caster, &poses).unwrap(), EventOutcome::Ignored);
        assert_eq!(device.held(), Some(id));
        assert_eq!(pool.owner_counts().devices, [0, 1]);
    }

    #[test]
    fn test_press_with_nothing_under_ray() {
        let (mut pool, _) = single_box();
        let mut device = DeviceState::new(DeviceId::Left, 5.0);
        let aside = Transform::from_position(Vector3::new(1.0, 1.6, 3.0));
        device.update_pose(Some(aside));

        let outcome = device
            .press(&mut pool, &RayCaster::default(), &[aside, Transform::identity()])
            .unwrap();
        assert_eq!(outcome, EventOutcome::Ignored);
        assert!(device.is_idle());
        assert_eq!(device.ray_length, 5.0);
    }
}

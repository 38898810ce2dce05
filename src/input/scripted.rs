//! In-memory pointer source
//!
//! Poses are set directly and events are queued in FIFO order. Used by the
//! tests and by hosts that receive device data from elsewhere.

use std::collections::VecDeque;

use super::{DeviceId, PointerEvent, PointerSource};
use crate::gfx::scene::transform::Transform;

#[derive(Debug, Default)]
pub struct ScriptedPointers {
    poses: [Option<Transform>; 2],
    events: VecDeque<PointerEvent>,
}

impl ScriptedPointers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets (or clears, with `None`) the pose reported for a device
    pub fn set_pose(&mut self, device: DeviceId, pose: Option<Transform>) {
        self.poses[device.index()] = pose;
    }

    /// Queues a press for the device
    pub fn press(&mut self, device: DeviceId) {
        self.events.push_back(PointerEvent::press(device));
    }

    /// Queues a release for the device
    pub fn release(&mut self, device: DeviceId) {
        self.events.push_back(PointerEvent::release(device));
    }

    /// Queues an arbitrary event
    pub fn push_event(&mut self, event: PointerEvent) {
        self.events.push_back(event);
    }

    /// Number of events not yet consumed
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }
}

impl PointerSource for ScriptedPointers {
    fn device_pose(&self, device: DeviceId) -> Option<Transform> {
        self.poses[device.index()]
    }

    fn poll_event(&mut self) -> Option<PointerEvent> {
        self.events.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::PointerEventKind;
    use cgmath::Vector3;

    #[test]
    fn test_events_drain_in_order() {
        let mut pointers = ScriptedPointers::new();
        pointers.press(DeviceId::Right);
        pointers.release(DeviceId::Left);
        assert_eq!(pointers.pending_events(), 2);

        let first = pointers.poll_event().unwrap();
        assert_eq!(first.device, DeviceId::Right);
        assert_eq!(first.kind, PointerEventKind::Press);

        let second = pointers.poll_event().unwrap();
        assert_eq!(second, PointerEvent::release(DeviceId::Left));
        assert!(pointers.poll_event().is_none());
    }

    #[test]
    fn test_poses_are_per_device() {
        let mut pointers = ScriptedPointers::new();
        let pose = Transform::from_position(Vector3::new(0.0, 1.6, 3.0));
        pointers.set_pose(DeviceId::Left, Some(pose));

        assert_eq!(pointers.device_pose(DeviceId::Left), Some(pose));
        assert_eq!(pointers.device_pose(DeviceId::Right), None);
    }
}

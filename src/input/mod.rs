//! # Pointer Input
//!
//! Abstraction over the two tracked pointing devices. A [`PointerSource`]
//! reports a world-space pose per device every frame and queues discrete
//! press/release events; the frame driver consumes both.
//!
//! - [`ScriptedPointers`] - in-memory source for tests and headless hosts
//! - [`DesktopPointers`] - emulates both devices with a mouse in the viewer

pub mod desktop;
pub mod scripted;

pub use desktop::DesktopPointers;
pub use scripted::ScriptedPointers;

use std::fmt;

use crate::gfx::scene::transform::Transform;

/// One of the two tracked input devices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeviceId {
    /// Device 0
    Left,
    /// Device 1
    Right,
}

impl DeviceId {
    /// Both devices, in per-frame processing order
    pub const ALL: [DeviceId; 2] = [DeviceId::Left, DeviceId::Right];

    /// Numeric index (0 or 1)
    pub const fn index(self) -> usize {
        match self {
            DeviceId::Left => 0,
            DeviceId::Right => 1,
        }
    }

    /// Looks up a device by numeric index
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(DeviceId::Left),
            1 => Some(DeviceId::Right),
            _ => None,
        }
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "device {}", self.index())
    }
}

/// Discrete trigger transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventKind {
    Press,
    Release,
}

/// A press or release reported by one device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub device: DeviceId,
    pub kind: PointerEventKind,
}

impl PointerEvent {
    pub fn press(device: DeviceId) -> Self {
        Self {
            device,
            kind: PointerEventKind::Press,
        }
    }

    pub fn release(device: DeviceId) -> Self {
        Self {
            device,
            kind: PointerEventKind::Release,
        }
    }
}

/// Source of device poses and trigger events
///
/// Implemented by whatever host runtime tracks the devices. Poses are
/// sampled once per frame; events are drained in arrival order before the
/// frame's highlight pass.
pub trait PointerSource {
    /// World-space pose of a device, or `None` while it is not tracked
    fn device_pose(&self, device: DeviceId) -> Option<Transform>;

    /// Next pending event, oldest first
    fn poll_event(&mut self) -> Option<PointerEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_indices() {
        for (i, device) in DeviceId::ALL.iter().enumerate() {
            assert_eq!(device.index(), i);
            assert_eq!(DeviceId::from_index(i), Some(*device));
        }
        assert_eq!(DeviceId::from_index(2), None);
        assert_eq!(DeviceId::Right.to_string(), "device 1");
    }
}

//! Mouse emulation of the two tracked devices
//!
//! Both devices aim along the ray under the cursor. Device 0 sits a little
//! to the left of the eye and device 1 a little to the right, so their rays
//! are visible. The left mouse button drives device 0 and the right button
//! device 1. While the cursor is outside the window neither device is
//! tracked.

use std::collections::VecDeque;

use cgmath::{InnerSpace, Quaternion, Vector3};
use winit::event::{ElementState, MouseButton, WindowEvent};

use super::{DeviceId, PointerEvent, PointerSource};
use crate::gfx::camera::FixedCamera;
use crate::gfx::scene::transform::{Transform, FORWARD};

/// Vertical drop of the emulated devices below the eye
const HAND_DROP: f32 = 0.2;

#[derive(Debug)]
pub struct DesktopPointers {
    cursor: Option<(f32, f32)>,
    screen_size: (f32, f32),
    offset: f32,
    poses: [Option<Transform>; 2],
    events: VecDeque<PointerEvent>,
}

impl DesktopPointers {
    pub fn new(width: u32, height: u32, offset: f32) -> Self {
        Self {
            cursor: None,
            screen_size: (width as f32, height as f32),
            offset,
            poses: [None, None],
            events: VecDeque::new(),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.screen_size = (width as f32, height as f32);
    }

    /// Maps a mouse button to the device it emulates
    pub fn button_device(button: MouseButton) -> Option<DeviceId> {
        match button {
            MouseButton::Left => Some(DeviceId::Left),
            MouseButton::Right => Some(DeviceId::Right),
            _ => None,
        }
    }

    /// Feeds a window event; returns true when it was consumed
    pub fn process_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Some((position.x as f32, position.y as f32));
                true
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                true
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let Some(device) = Self::button_device(*button) else {
                    return false;
                };
                self.events.push_back(match state {
                    ElementState::Pressed => PointerEvent::press(device),
                    ElementState::Released => PointerEvent::release(device),
                });
                true
            }
            _ => false,
        }
    }

    /// Recomputes both device poses from the cursor; call once per frame
    pub fn update(&mut self, camera: &FixedCamera) {
        let Some(ray) = self
            .cursor
            .and_then(|cursor| camera.screen_to_ray(cursor, self.screen_size))
        else {
            self.poses = [None, None];
            return;
        };

        let rotation = Quaternion::from_arc(FORWARD, ray.direction, None).normalize();
        let right = camera.right();
        let base = camera.eye - Vector3::unit_y() * HAND_DROP;

        for device in DeviceId::ALL {
            let side = match device {
                DeviceId::Left => -self.offset,
                DeviceId::Right => self.offset,
            };
            self.poses[device.index()] =
                Some(Transform::from_position_rotation(base + right * side, rotation));
        }
    }
}

impl PointerSource for DesktopPointers {
    fn device_pose(&self, device: DeviceId) -> Option<Transform> {
        self.poses[device.index()]
    }

    fn poll_event(&mut self) -> Option<PointerEvent> {
        self.events.pop_front()
    }
}

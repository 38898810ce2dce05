//! Per-frame scene snapshot handed to a renderer
//!
//! [`SceneView`] is rebuilt by the frame driver each tick and borrows the
//! pool's materials, so nothing is copied except transforms.

use crate::error::GrabError;
use crate::gfx::geometry::ShapeKind;
use crate::gfx::resources::Material;
use crate::gfx::scene::object::{ObjectId, Owner};
use crate::gfx::scene::transform::Transform;
use crate::input::DeviceId;

/// One object as it should appear this frame
#[derive(Debug, Clone, Copy)]
pub struct ObjectView<'a> {
    pub id: ObjectId,
    pub kind: ShapeKind,
    pub world: Transform,
    pub material: &'a Material,
    pub owner: Owner,
}

/// One device as it should appear this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceView {
    pub id: DeviceId,
    /// Last valid pose
    pub pose: Transform,
    pub tracked: bool,
    pub ray_length: f32,
    pub holding: Option<ObjectId>,
}

/// Everything a renderer needs to draw a frame
#[derive(Debug, Clone)]
pub struct SceneView<'a> {
    pub frame: u64,
    pub objects: Vec<ObjectView<'a>>,
    pub devices: [DeviceView; 2],
}

/// Draws one frame from a [`SceneView`]
pub trait FrameRenderer {
    fn render_frame(&mut self, view: &SceneView<'_>) -> Result<(), GrabError>;
}

/// Renderer that draws nothing, for headless runs and tests
#[derive(Debug, Default)]
pub struct NullRenderer {
    /// Frames received so far
    pub frames: u64,
}

impl FrameRenderer for NullRenderer {
    fn render_frame(&mut self, _view: &SceneView<'_>) -> Result<(), GrabError> {
        self.frames += 1;
        Ok(())
    }
}

//! Directional shadow light
//!
//! The scene has one overhead directional light. Its shadow camera is an
//! orthographic box looking straight down over the placement area; the
//! depth pre-pass renders every shape through [`ShadowLight::view_proj`]
//! and the main pass compares against that depth map.

use cgmath::{InnerSpace, Matrix4, Point3, Vector3};

use crate::gfx::camera::fixed_camera::OPENGL_TO_WGPU_MATRIX;

/// Shadow-casting directional light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowLight {
    /// Light position; it shines towards `target`
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    /// Half width and half height of the orthographic shadow box
    pub half_extent: f32,
    pub near: f32,
    pub far: f32,
    /// Shadow map resolution (square)
    pub map_size: u32,
}

impl Default for ShadowLight {
    fn default() -> Self {
        Self {
            position: Point3::new(0.0, 6.0, 0.0),
            target: Point3::new(0.0, 0.0, 0.0),
            half_extent: 2.0,
            near: 0.5,
            far: 20.0,
            map_size: 4096,
        }
    }
}

impl ShadowLight {
    /// Unit vector pointing from the target towards the light
    pub fn direction(&self) -> Vector3<f32> {
        (self.position - self.target).normalize()
    }

    /// Light-space view-projection with wgpu's `[0, 1]` depth range
    pub fn view_proj(&self) -> Matrix4<f32> {
        // Straight-down view: world -Z is "up" in the map
        let view = Matrix4::look_at_rh(self.position, self.target, -Vector3::unit_z());
        let e = self.half_extent;
        let proj = cgmath::ortho(-e, e, -e, e, self.near, self.far);
        OPENGL_TO_WGPU_MATRIX * proj * view
    }
}

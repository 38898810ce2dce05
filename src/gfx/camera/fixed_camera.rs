use cgmath::*;

use super::camera_utils::{convert_matrix4_to_array, Camera, CameraUniform};
use crate::config::ViewerConfig;
use crate::gfx::picking::Ray;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Stationary viewer camera looking down -Z from a fixed eye
#[derive(Debug, Clone, Copy)]
pub struct FixedCamera {
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub uniform: CameraUniform,
}

impl Camera for FixedCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.eye);
        let target = Point3::from_vec(self.target);
        let view = Matrix4::look_at_rh(eye, target, self.up);
        let proj =
            OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }
}

impl FixedCamera {
    pub fn new(eye: Vector3<f32>, fov_degrees: f32, aspect: f32) -> Self {
        let mut camera = Self {
            eye,
            target: eye - Vector3::unit_z(),
            up: Vector3::unit_y(),
            aspect,
            fovy: Deg(fov_degrees).into(),
            znear: 0.1,
            zfar: 10.0,
            uniform: CameraUniform::default(),
        };
        camera.update_view_proj();
        camera
    }

    pub fn from_config(config: &ViewerConfig) -> Self {
        Self::new(
            Vector3::from(config.eye),
            config.fov_degrees,
            config.width as f32 / config.height.max(1) as f32,
        )
    }

    /// Unit vector pointing to the camera's right
    pub fn right(&self) -> Vector3<f32> {
        (self.target - self.eye).cross(self.up).normalize()
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
            self.update_view_proj();
        }
    }

    pub fn update_view_proj(&mut self) {
        self.uniform.view_position = [self.eye.x, self.eye.y, self.eye.z, 1.0];
        self.uniform.view_proj = convert_matrix4_to_array(self.build_view_projection_matrix());
    }

    /// Convert screen coordinates to a world-space ray
    ///
    /// Returns `None` when the screen size is empty or the projection
    /// cannot be inverted.
    pub fn screen_to_ray(&self, screen_pos: (f32, f32), screen_size: (f32, f32)) -> Option<Ray> {
        let (mouse_x, mouse_y) = screen_pos;
        let (screen_width, screen_height) = screen_size;
        if screen_width <= 0.0 || screen_height <= 0.0 {
            return None;
        }

        // Convert screen coordinates to normalized device coordinates (-1 to 1)
        let ndc_x = (2.0 * mouse_x) / screen_width - 1.0;
        let ndc_y = 1.0 - (2.0 * mouse_y) / screen_height; // Flip Y axis

        let eye = Point3::from_vec(self.eye);
        let target = Point3::from_vec(self.target);
        let view_matrix = Matrix4::look_at_rh(eye, target, self.up);
        let proj_matrix = perspective(self.fovy, self.aspect, self.znear, self.zfar);
        let inv_view_proj = (proj_matrix * view_matrix).invert()?;

        // Near and far plane points from NDC to world space
        let world_near = inv_view_proj * Vector4::new(ndc_x, ndc_y, -1.0, 1.0);
        let world_far = inv_view_proj * Vector4::new(ndc_x, ndc_y, 1.0, 1.0);

        let near_3d = world_near.truncate() / world_near.w;
        let far_3d = world_far.truncate() / world_far.w;

        let ray = Ray::new(near_3d, far_3d - near_3d);
        ray.is_valid().then_some(ray)
    }
}

//! # Transforms
//!
//! Every pickable object and every tracked device pose is described by a
//! [`Transform`]: a translation, a unit rotation and a uniform scale.
//!
//! Uniform scale keeps the set of transforms closed under composition and
//! inversion, so moving an object from one parent frame to another can be
//! done exactly: the world transform before and after the move is the same
//! value, not an approximation recovered from a matrix decomposition.

use cgmath::{InnerSpace, Matrix4, Quaternion, Rad, Rotation3, Vector3, Zero};

/// Local forward axis of a device frame (right-handed, -Z forward).
pub const FORWARD: Vector3<f32> = Vector3 {
    x: 0.0,
    y: 0.0,
    z: -1.0,
};

/// Rotations with a smaller norm than this carry no usable orientation.
const MIN_ROTATION_NORM: f32 = 1e-6;

/// Translation, rotation and uniform scale.
///
/// A point `p` is mapped to `position + rotation * (scale * p)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation relative to the parent frame
    pub position: Vector3<f32>,
    /// Unit quaternion rotation relative to the parent frame
    pub rotation: Quaternion<f32>,
    /// Uniform scale factor
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// The identity transform
    pub fn identity() -> Self {
        Self {
            position: Vector3::zero(),
            rotation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
            scale: 1.0,
        }
    }

    /// Creates a transform, normalizing the rotation
    pub fn new(position: Vector3<f32>, rotation: Quaternion<f32>, scale: f32) -> Self {
        Self {
            position,
            rotation: rotation.normalize(),
            scale,
        }
    }

    /// Creates an unscaled transform, as reported for a tracked device
    pub fn from_position_rotation(position: Vector3<f32>, rotation: Quaternion<f32>) -> Self {
        Self::new(position, rotation, 1.0)
    }

    /// Creates a pure translation
    pub fn from_position(position: Vector3<f32>) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Builds a rotation from Euler angles applied in X, Y, Z order
    /// (intrinsic), with each angle in radians.
    pub fn rotation_from_euler_xyz(x: f32, y: f32, z: f32) -> Quaternion<f32> {
        let q = Quaternion::from_angle_x(Rad(x))
            * Quaternion::from_angle_y(Rad(y))
            * Quaternion::from_angle_z(Rad(z));
        q.normalize()
    }

    /// Composes `self` (the parent) with `child`.
    ///
    /// The result maps a point in the child's frame straight into the
    /// parent's parent frame: `self.concat(child).transform_point(p) ==
    /// self.transform_point(child.transform_point(p))`.
    pub fn concat(&self, child: &Transform) -> Transform {
        Transform {
            position: self.position + self.rotation * (child.position * self.scale),
            rotation: (self.rotation * child.rotation).normalize(),
            scale: self.scale * child.scale,
        }
    }

    /// Returns the inverse transform, or `None` for a zero or non-finite scale
    pub fn inverse(&self) -> Option<Transform> {
        if !self.scale.is_finite() || self.scale.abs() <= f32::EPSILON {
            return None;
        }

        let inv_rotation = self.rotation.conjugate();
        let inv_scale = 1.0 / self.scale;

        Some(Transform {
            position: inv_rotation * (-self.position * inv_scale),
            rotation: inv_rotation,
            scale: inv_scale,
        })
    }

    /// Maps a point from this transform's local frame into its parent frame
    pub fn transform_point(&self, point: Vector3<f32>) -> Vector3<f32> {
        self.position + self.rotation * (point * self.scale)
    }

    /// Maps a direction from the local frame into the parent frame (no translation)
    pub fn transform_vector(&self, vector: Vector3<f32>) -> Vector3<f32> {
        self.rotation * (vector * self.scale)
    }

    /// Local -Z rotated into the parent frame, using the rotation only.
    pub fn forward(&self) -> Vector3<f32> {
        (self.rotation * FORWARD).normalize()
    }

    /// Column-major matrix for GPU upload: `T * R * S`
    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from(self.rotation)
            * Matrix4::from_scale(self.scale)
    }

    /// True when every component is a finite number
    pub fn is_finite(&self) -> bool {
        let p = self.position;
        let q = self.rotation;
        p.x.is_finite()
            && p.y.is_finite()
            && p.z.is_finite()
            && q.s.is_finite()
            && q.v.x.is_finite()
            && q.v.y.is_finite()
            && q.v.z.is_finite()
            && self.scale.is_finite()
    }

    /// Checks a pose reported from outside the scene.
    ///
    /// Returns `None` if any component is non-finite, the rotation has
    /// (near) zero norm or the scale is not positive. Otherwise returns the
    /// pose with its rotation renormalized.
    pub fn validated(&self) -> Option<Transform> {
        if !self.is_finite() || self.scale <= f32::EPSILON {
            return None;
        }
        let norm = self.rotation.magnitude();
        if !norm.is_finite() || norm < MIN_ROTATION_NORM {
            return None;
        }
        Some(Transform {
            rotation: self.rotation / norm,
            ..*self
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn close(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a - b).magnitude() < 1e-5
    }

    fn sample() -> Transform {
        Transform::new(
            Vector3::new(0.3, -1.2, 2.0),
            Transform::rotation_from_euler_xyz(0.4, 1.1, -0.7),
            1.3,
        )
    }

    #[test]
    fn test_concat_matches_sequential_application() {
        let parent = sample();
        let child = Transform::new(
            Vector3::new(-0.5, 0.25, 0.1),
            Transform::rotation_from_euler_xyz(2.0, 0.1, 0.3),
            0.7,
        );
        let p = Vector3::new(0.1, 0.2, 0.3);

        let composed = parent.concat(&child).transform_point(p);
        let sequential = parent.transform_point(child.transform_point(p));
        assert!(close(composed, sequential));
    }

    #[test]
    fn test_inverse_round_trip() {
        let t = sample();
        let inv = t.inverse().unwrap();
        let p = Vector3::new(4.0, -3.0, 0.5);

        assert!(close(inv.transform_point(t.transform_point(p)), p));

        let identity = t.concat(&inv);
        assert!(close(identity.position, Vector3::zero()));
        assert!((identity.scale - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_scale_has_no_inverse() {
        let t = Transform::new(Vector3::zero(), Quaternion::new(1.0, 0.0, 0.0, 0.0), 0.0);
        assert!(t.inverse().is_none());
    }

    #[test]
    fn test_forward_ignores_translation_and_scale() {
        let t = Transform::new(
            Vector3::new(10.0, 20.0, 30.0),
            Quaternion::from_angle_y(Rad(FRAC_PI_2)),
            3.0,
        );
        // Yawing -Z by +90 degrees about Y points it along -X.
        assert!(close(t.forward(), Vector3::new(-1.0, 0.0, 0.0)));
        assert!(close(Transform::identity().forward(), FORWARD));
    }

    #[test]
    fn test_matrix_agrees_with_transform_point() {
        let t = sample();
        let p = Vector3::new(0.5, -0.25, 1.0);
        let m = t.to_matrix() * p.extend(1.0);
        assert!(close(m.truncate(), t.transform_point(p)));
    }

    #[test]
    fn test_non_finite_detection() {
        let mut t = sample();
        assert!(t.is_finite());
        t.position.y = f32::NAN;
        assert!(!t.is_finite());
    }

    #[test]
    fn test_validated_rejects_degenerate_rotation_and_scale() {
        let mut t = sample();
        t.rotation = Quaternion::new(0.0, 0.0, 0.0, 0.0);
        assert!(t.is_finite());
        assert!(t.validated().is_none());

        let mut t = sample();
        t.scale = 0.0;
        assert!(t.validated().is_none());

        let mut t = sample();
        t.rotation.s = f32::INFINITY;
        assert!(t.validated().is_none());
    }

    #[test]
    fn test_validated_renormalizes_rotation() {
        let mut t = sample();
        let unit = t.rotation;
        t.rotation = unit * 3.0;

        let checked = t.validated().unwrap();
        assert!((checked.rotation.magnitude() - 1.0).abs() < 1e-6);
        assert!(checked.rotation.dot(unit) > 1.0 - 1e-6);
        assert_eq!(checked.position, t.position);
    }
}

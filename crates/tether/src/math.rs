//! Math types, glam re-exports and frame helpers.
//!
//! We re-export [glam](https://docs.rs/glam) types so users don't need to
//! depend on it directly. [`Transform`] is the local pose stored per scene
//! node; the free functions convert between frames and apply per-axis locks.
//!
//! ## Euler Convention
//!
//! Euler angles are `(x, y, z)` in **degrees**, composed as `Ry * Rx * Rz`
//! (z is applied first, then x, then y) and normalized into `[0, 360)` when
//! extracted. Locking one component and recomposing is order-sensitive and
//! degenerates near x = ±90° (gimbal lock).

use serde::{Deserialize, Serialize};

pub use glam::{BVec3, EulerRot, Mat4, Quat, Vec3};

/// A 3D transform: position, rotation, and scale, relative to the parent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    /// Identity transform (origin, no rotation, uniform scale of 1).
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Create a transform at the given position.
    pub fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        Self::from_translation(Vec3::new(x, y, z))
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Return a copy with the given rotation.
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Return a copy rotated by Euler angles in degrees (see module docs).
    pub fn with_euler_angles(self, degrees: Vec3) -> Self {
        self.with_rotation(from_euler_angles(degrees))
    }

    /// Return a copy with uniform scale applied.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    /// Compute the 4x4 model matrix.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Decompose a model matrix back into a transform.
    ///
    /// Shear (from non-uniform scale under rotation) cannot be represented and
    /// is lost.
    pub fn from_matrix(matrix: Mat4) -> Self {
        let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
        Self {
            translation,
            rotation: rotation.normalize(),
            scale,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Extract Euler angles in degrees, each in `[0, 360)`.
pub fn euler_angles(rotation: Quat) -> Vec3 {
    let (y, x, z) = rotation.to_euler(EulerRot::YXZ);
    Vec3::new(
        wrap_degrees(x.to_degrees()),
        wrap_degrees(y.to_degrees()),
        wrap_degrees(z.to_degrees()),
    )
}

/// Compose a rotation from Euler angles in degrees.
pub fn from_euler_angles(degrees: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        degrees.y.to_radians(),
        degrees.x.to_radians(),
        degrees.z.to_radians(),
    )
}

fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Express a world `rotation` in the frame whose world rotation is `reference`.
pub fn rotation_in_frame(reference: Quat, rotation: Quat) -> Quat {
    reference.inverse() * rotation
}

/// Replace the components of `current` selected by `mask` with `locked`.
pub fn lock_axes(current: Vec3, locked: Vec3, mask: BVec3) -> Vec3 {
    Vec3::select(mask, locked, current)
}

/// Overwrite the Euler components of `rotation` selected by `mask` with the
/// matching components of `locked_degrees`.
///
/// An empty mask returns `rotation` untouched, without an Euler round trip.
pub fn lock_euler(rotation: Quat, locked_degrees: Vec3, mask: BVec3) -> Quat {
    if !mask.any() {
        return rotation;
    }
    let current = euler_angles(rotation);
    from_euler_angles(lock_axes(current, locked_degrees, mask)).normalize()
}

/// Angle between two rotations in radians, ignoring quaternion sign.
pub fn rotation_distance(a: Quat, b: Quat) -> f32 {
    // atan2 stays accurate for tiny angles, where acos of a dot near 1 does not.
    let delta = a.normalize().inverse() * b.normalize();
    2.0 * delta.xyz().length().atan2(delta.w.abs())
}

/// Compare Euler angles component-wise, modulo 360°.
#[cfg(test)]
pub(crate) fn angles_close(a: Vec3, b: Vec3) -> bool {
    (a - b).to_array().iter().all(|d| {
        let wrapped = d.rem_euclid(360.0);
        wrapped < 1e-3 || wrapped > 360.0 - 1e-3
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-3
    }

    #[test]
    fn euler_round_trip() {
        let degrees = Vec3::new(30.0, 45.0, 60.0);
        let q = from_euler_angles(degrees);
        assert!(angles_close(euler_angles(q), degrees));
    }

    #[test]
    fn euler_order_is_z_then_x_then_y() {
        let q = from_euler_angles(Vec3::new(10.0, 20.0, 30.0));
        let expected = Quat::from_rotation_y(20f32.to_radians())
            * Quat::from_rotation_x(10f32.to_radians())
            * Quat::from_rotation_z(30f32.to_radians());
        assert!(rotation_distance(q, expected) < 1e-5);
    }

    #[test]
    fn euler_angles_are_wrapped_positive() {
        let q = from_euler_angles(Vec3::new(-10.0, -90.0, 0.0));
        let e = euler_angles(q);
        assert!(angles_close(e, Vec3::new(350.0, 270.0, 0.0)));
        assert!(e.min_element() >= 0.0 && e.max_element() < 360.0);
    }

    #[test]
    fn wrap_handles_negative_zero_rounding() {
        assert_eq!(wrap_degrees(-1e-9), 0.0);
        assert_eq!(wrap_degrees(720.0), 0.0);
        assert!((wrap_degrees(-30.0) - 330.0).abs() < 1e-4);
    }

    #[test]
    fn lock_axes_selects_per_component() {
        let out = lock_axes(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(10.0, 20.0, 30.0),
            BVec3::new(true, false, true),
        );
        assert_eq!(out, Vec3::new(10.0, 2.0, 30.0));
    }

    #[test]
    fn lock_euler_with_empty_mask_is_exact() {
        let q = Quat::from_rotation_x(0.3) * Quat::from_rotation_y(1.1);
        assert_eq!(lock_euler(q, Vec3::ZERO, BVec3::FALSE), q);
    }

    #[test]
    fn lock_euler_keeps_free_yaw() {
        let q = from_euler_angles(Vec3::new(25.0, 70.0, 15.0));
        let locked = lock_euler(q, Vec3::ZERO, BVec3::new(true, false, true));
        assert!(angles_close(euler_angles(locked), Vec3::new(0.0, 70.0, 0.0)));
    }

    #[test]
    fn rotation_in_frame_inverts_composition() {
        let parent = Quat::from_rotation_y(0.7);
        let local = Quat::from_rotation_x(0.2);
        let world = parent * local;
        assert!(rotation_distance(rotation_in_frame(parent, world), local) < 1e-5);
    }

    #[test]
    fn rotation_distance_resolves_small_angles() {
        let a = Quat::from_rotation_y(0.5);
        let b = a * Quat::from_rotation_x(1e-5);
        assert!((rotation_distance(a, b) - 1e-5).abs() < 1e-6);
        assert!((rotation_distance(a, -b) - 1e-5).abs() < 1e-6);
        assert!((rotation_distance(Quat::IDENTITY, Quat::from_rotation_z(2.0)) - 2.0).abs() < 1e-5);
    }

    #[test]
    fn matrix_round_trip() {
        let t = Transform::from_xyz(1.0, 2.0, 3.0)
            .with_euler_angles(Vec3::new(0.0, 90.0, 0.0))
            .with_scale(2.0);
        let back = Transform::from_matrix(t.matrix());
        assert!(close(back.translation, t.translation));
        assert!(close(back.scale, t.scale));
        assert!(rotation_distance(back.rotation, t.rotation) < 1e-4);
    }
}

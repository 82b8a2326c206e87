//! Ground-plane helpers for lane-offset directions.
//!
//! Lane changes are animated as lateral offsets orthogonal to the vehicle's
//! travel direction. The right-hand vector is derived from the velocity when
//! the vehicle is moving, and from the heading yaw as a fallback when it is
//! (nearly) stationary.

use crate::geom::Vec3;

/// Minimum ground-plane speed (m/s) below which the velocity direction is
/// considered unreliable and the heading yaw is used instead.
pub const MIN_VELOCITY_XZ: f32 = 0.1;

/// Rotates a vector by 90 degrees clockwise in the XZ plane (viewed from above).
///
/// For a forward vector this yields the right-hand direction of travel.
///
/// # Example
/// ```
/// use traffic_ai_core::geom::{Vec3, rotate90_xz};
/// let forward = Vec3::new(0.0, 0.0, 1.0);
/// let right = rotate90_xz(forward);
/// assert!((right.x - 1.0).abs() < 1e-6);
/// assert!(right.z.abs() < 1e-6);
/// ```
pub fn rotate90_xz(v: Vec3) -> Vec3 {
    Vec3::new(v.z, 0.0, -v.x)
}

/// Derives the right-hand vector from a velocity.
///
/// Returns `None` when the ground-plane speed is below [`MIN_VELOCITY_XZ`];
/// callers should fall back to [`right_vector_from_yaw`].
pub fn right_vector_from_velocity(velocity: Vec3) -> Option<Vec3> {
    if velocity.length_xz() <= MIN_VELOCITY_XZ {
        return None;
    }
    velocity.normalized_xz().map(rotate90_xz)
}

/// Derives the right-hand vector from a heading yaw (radians).
///
/// The forward direction for yaw `y` is `(sin y, 0, cos y)`; its quarter turn
/// in the XZ plane is the right-hand vector.
pub fn right_vector_from_yaw(yaw: f32) -> Vec3 {
    rotate90_xz(Vec3::new(yaw.sin(), 0.0, yaw.cos()))
}

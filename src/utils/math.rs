//! Math helpers layered on top of `glam`.

use glam::{Mat3, Quat, Vec3};

/// Integrates an orientation by one step of the quaternion derivative
/// `dq/dt = 0.5 * (ω, 0) * q`, renormalising the result.
pub fn integrate_orientation(orientation: Quat, angular: Vec3, dt: f32) -> Quat {
    let half = angular * (0.5 * dt);
    let spin = Quat::from_xyzw(half.x, half.y, half.z, 0.0);
    let next = orientation + spin * orientation;
    let len_sq = next.length_squared();
    if len_sq <= f32::EPSILON || !len_sq.is_finite() {
        return orientation;
    }
    next.normalize()
}

/// Rotates a diagonal local-space tensor into world space: `R * D * Rᵀ`.
pub fn rotate_diagonal_tensor(orientation: Quat, diagonal: Vec3) -> Mat3 {
    let rotation = Mat3::from_quat(orientation);
    rotation * Mat3::from_diagonal(diagonal) * rotation.transpose()
}

/// Frame-rate independent damping multiplier `(1 - decay)^dt`.
pub fn damping_factor(decay: f32, dt: f32) -> f32 {
    (1.0 - decay).clamp(0.0, 1.0).powf(dt)
}

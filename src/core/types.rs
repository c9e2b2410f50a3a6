use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position, orientation, and non-uniform scale of a body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

/// Linear and angular velocity of a rigid body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub linear: Vec3,
    pub angular: Vec3,
}

/// Material coefficients that drive collision response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Restitution in `[0, 1]`; a pair bounces with the product of both.
    pub elasticity: f32,
    /// Spring constant used by penalty resolution.
    pub stiffness: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            elasticity: 0.8,
            stiffness: 10.0,
        }
    }
}

impl Material {
    pub fn new(elasticity: f32, stiffness: f32) -> Self {
        Self {
            elasticity: elasticity.clamp(0.0, 1.0),
            stiffness,
        }
    }

    /// Lively, soft material for the player character.
    pub fn feathers() -> Self {
        Self::new(0.7, 200.0)
    }

    /// Dead, stiff material for scenery.
    pub fn wood() -> Self {
        Self::new(0.2, 500.0)
    }

    pub fn combined_elasticity(&self, other: &Self) -> f32 {
        self.elasticity * other.elasticity
    }
}

/// Diagonal inverse inertia for a solid sphere: `5 / (2 m r²)`.
pub fn inverse_inertia_sphere(radius: f32, inverse_mass: f32) -> Vec3 {
    let r_sq = radius * radius;
    if r_sq <= f32::EPSILON {
        return Vec3::ZERO;
    }
    Vec3::splat(2.5 * inverse_mass / r_sq)
}

/// Diagonal inverse inertia for a solid box: `12 / (m (d_j² + d_k²))`.
pub fn inverse_inertia_box(half_extents: Vec3, inverse_mass: f32) -> Vec3 {
    let d_sq = (half_extents * 2.0) * (half_extents * 2.0);
    let axis = |a: f32, b: f32| {
        let sum = a + b;
        if sum <= f32::EPSILON {
            0.0
        } else {
            12.0 * inverse_mass / sum
        }
    };
    Vec3::new(
        axis(d_sq.y, d_sq.z),
        axis(d_sq.x, d_sq.z),
        axis(d_sq.x, d_sq.y),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sphere_inverse_inertia_matches_closed_form() {
        // m = 2, r = 0.5 => I = 0.4 * 2 * 0.25 = 0.2
        let inv = inverse_inertia_sphere(0.5, 0.5);
        assert_relative_eq!(inv.x, 1.0 / 0.2, epsilon = 1e-4);
    }

    #[test]
    fn cube_inverse_inertia_is_isotropic() {
        let inv = inverse_inertia_box(Vec3::splat(0.5), 1.0);
        assert_relative_eq!(inv.x, 6.0, epsilon = 1e-5);
        assert_relative_eq!(inv.x, inv.y);
        assert_relative_eq!(inv.y, inv.z);
    }

    #[test]
    fn infinite_mass_has_no_rotational_response() {
        assert_eq!(inverse_inertia_box(Vec3::ONE, 0.0), Vec3::ZERO);
        assert_eq!(inverse_inertia_sphere(1.0, 0.0), Vec3::ZERO);
    }

    #[test]
    fn elasticity_is_clamped_and_multiplied() {
        let bouncy = Material::new(1.4, 1.0);
        let dull = Material::new(0.5, 1.0);
        assert_relative_eq!(bouncy.elasticity, 1.0);
        assert_relative_eq!(bouncy.combined_elasticity(&dull), 0.5);
    }
}

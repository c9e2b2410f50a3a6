use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::ops::{BitAnd, BitOr};

/// Collision volume attached to exactly one body.
///
/// Boxes are axis aligned in world space; body orientation does not affect
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Collider {
    Sphere { radius: f32 },
    Aabb { half_extents: Vec3 },
}

impl Collider {
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere { radius }
    }

    pub fn cuboid(half_extents: Vec3) -> Self {
        Self::Aabb { half_extents }
    }

    /// Half sizes of the box used by the broadphase.
    pub fn broadphase_half_sizes(&self) -> Vec3 {
        match self {
            Collider::Sphere { radius } => Vec3::splat(*radius),
            Collider::Aabb { half_extents } => *half_extents,
        }
    }
}

/// Bitmask selecting which resolution models a body takes part in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollisionType(u8);

impl CollisionType {
    pub const NONE: CollisionType = CollisionType(0);
    pub const IMPULSE: CollisionType = CollisionType(0b01);
    pub const SPRING: CollisionType = CollisionType(0b10);
    pub const ALL: CollisionType = CollisionType(0b11);

    pub fn contains(self, other: CollisionType) -> bool {
        self.0 & other.0 == other.0
    }
}

impl Default for CollisionType {
    fn default() -> Self {
        Self::IMPULSE
    }
}

impl BitOr for CollisionType {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for CollisionType {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

/// Response chosen for a confirmed pair, resolved once from both masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionBehavior {
    Impulse,
    Spring,
    Both,
    None,
}

impl CollisionBehavior {
    pub fn for_pair(a: CollisionType, b: CollisionType) -> Self {
        let shared = a & b;
        match (
            shared.contains(CollisionType::IMPULSE),
            shared.contains(CollisionType::SPRING),
        ) {
            (true, true) => Self::Both,
            (true, false) => Self::Impulse,
            (false, true) => Self::Spring,
            (false, false) => Self::None,
        }
    }
}

//! Core types describing bodies, their volumes, and shared data.

pub mod collider;
pub mod rigidbody;
pub mod types;

pub use collider::{Collider, CollisionBehavior, CollisionType};
pub use rigidbody::{RigidBody, SleepState};
pub use types::{Material, Transform, Velocity};

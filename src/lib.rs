//! Pond Physics – a compact rigid body pipeline for Rust games.
//!
//! Dynamic bodies are paired against each other and against a static world
//! through XZ quadtrees, tested exactly as spheres and axis-aligned boxes,
//! resolved with restitution impulses or penalty springs and integrated with
//! a damped semi-implicit Euler step that lets resting bodies fall asleep.

pub mod collision;
pub mod config;
pub mod core;
pub mod dynamics;
pub mod error;
pub mod utils;
pub mod world;

pub use glam::{Mat3, Quat, Vec2, Vec3};

pub use collision::{
    contact::{CollisionEvent, CollisionEventKind, CollisionPair, CollisionRecord, ContactPoint},
    queries::{RaycastHit, RaycastQuery},
};
pub use config::{QuadTreeParams, SleepSettings, WorldConfig};
pub use crate::core::{
    collider::{Collider, CollisionBehavior, CollisionType},
    rigidbody::RigidBody,
    types::{Material, Transform, Velocity},
};
pub use error::{PhysicsError, Result};
pub use utils::allocator::BodyHandle;
pub use world::{CollisionListener, PhysicsWorld, SharedCollisionListener};

//! Collision detection: the quadtree broadphase, exact narrowphase tests,
//! persistent contact records and ray queries.

pub mod broadphase;
pub mod contact;
pub mod narrowphase;
pub mod quadtree;
pub mod queries;

pub use broadphase::BroadPhase;
pub use contact::{
    CollisionEvent, CollisionEventKind, CollisionPair, CollisionRecord, ContactCache, ContactPoint,
};
pub use narrowphase::NarrowPhase;
pub use quadtree::{QuadTree, QuadTreeEntry};
pub use queries::{Raycast, RaycastHit, RaycastQuery};

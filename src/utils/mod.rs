//! Utility helpers: the body arena, logging, profiling and math extensions.

pub mod allocator;
pub mod logging;
pub mod math;
pub mod profiling;

pub use allocator::{Arena, BodyHandle};
pub use math::*;
pub use profiling::PhysicsProfiler;

//! Simulation dynamics: collision response and integration.

pub mod integrator;
pub mod resolution;

pub use integrator::Integrator;
pub use resolution::{resolve, resolve_impulse, resolve_spring, ImpulseOutcome};

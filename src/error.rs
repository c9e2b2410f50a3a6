//! Error types for the physics subsystem.
//!
//! Simulation itself never fails: bodies that cannot take part in a phase are
//! skipped. [`PhysicsError`] covers the API surface around it, i.e. loading
//! configuration and addressing bodies by handle.

use std::fmt;

use crate::utils::allocator::BodyHandle;

#[derive(Debug)]
pub enum PhysicsError {
    /// A configuration value is out of its allowed range.
    InvalidConfig(String),
    /// Configuration text could not be parsed.
    ConfigParse(serde_json::Error),
    /// The handle does not refer to a live body.
    UnknownBody(BodyHandle),
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "invalid physics config: {msg}"),
            Self::ConfigParse(err) => write!(f, "failed to parse physics config: {err}"),
            Self::UnknownBody(handle) => write!(f, "unknown body handle {handle}"),
        }
    }
}

impl std::error::Error for PhysicsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConfigParse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for PhysicsError {
    fn from(err: serde_json::Error) -> Self {
        Self::ConfigParse(err)
    }
}

pub type Result<T> = std::result::Result<T, PhysicsError>;

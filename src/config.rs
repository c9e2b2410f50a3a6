//! Configuration for the physics world.
//!
//! Every tunable lives in [`WorldConfig`]; the constants below are its
//! defaults.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{PhysicsError, Result};

/// Default gravity vector applied in the physics world (Y-up).
pub const DEFAULT_GRAVITY: [f32; 3] = [0.0, -9.8, 0.0];

/// Default integration timestep (in seconds).
pub const DEFAULT_TIME_STEP: f32 = 1.0 / 60.0;

/// Upper bound on substeps run by a single frame update.
pub const DEFAULT_MAX_SUBSTEPS: u32 = 4;

/// Half extent of the square XZ region covered by the quadtrees.
pub const DEFAULT_WORLD_HALF_EXTENT: f32 = 512.0;

pub const DEFAULT_QUADTREE_MAX_DEPTH: u32 = 7;

pub const DEFAULT_QUADTREE_MAX_ENTRIES: usize = 6;

/// Frames a collision record survives without being re-confirmed.
pub const DEFAULT_COLLISION_FRAMES: u32 = 5;

/// Velocity integration calls averaged before a sleep decision.
pub const DEFAULT_SLEEP_WINDOW: u32 = 60;

/// Average per-call distance below which a body falls asleep.
pub const DEFAULT_SLEEP_THRESHOLD: f32 = 0.01;

/// Fraction of velocity lost per second.
pub const DEFAULT_DAMPING_DECAY: f32 = 0.95;

/// Frame time above which a warning is logged, in milliseconds.
pub const DEFAULT_FRAME_BUDGET_MS: f32 = 16.0;

/// Quadtree parameters, fixed for the lifetime of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadTreeParams {
    /// Half size of the root region on X and Z.
    pub world_half_extent: Vec2,
    pub max_depth: u32,
    /// Entry count a leaf may hold before it splits.
    pub max_entries: usize,
}

impl Default for QuadTreeParams {
    fn default() -> Self {
        Self {
            world_half_extent: Vec2::splat(DEFAULT_WORLD_HALF_EXTENT),
            max_depth: DEFAULT_QUADTREE_MAX_DEPTH,
            max_entries: DEFAULT_QUADTREE_MAX_ENTRIES,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SleepSettings {
    pub window: u32,
    pub threshold: f32,
}

impl Default for SleepSettings {
    fn default() -> Self {
        Self {
            window: DEFAULT_SLEEP_WINDOW,
            threshold: DEFAULT_SLEEP_THRESHOLD,
        }
    }
}

/// Everything the world needs at construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub gravity: Vec3,
    pub use_gravity: bool,
    pub time_step: f32,
    pub max_substeps: u32,
    pub quadtree: QuadTreeParams,
    pub collision_frames: u32,
    pub sleep: SleepSettings,
    pub damping_decay: f32,
    /// Set to zero to disable the budget warning.
    pub frame_budget_ms: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::from_array(DEFAULT_GRAVITY),
            use_gravity: true,
            time_step: DEFAULT_TIME_STEP,
            max_substeps: DEFAULT_MAX_SUBSTEPS,
            quadtree: QuadTreeParams::default(),
            collision_frames: DEFAULT_COLLISION_FRAMES,
            sleep: SleepSettings::default(),
            damping_decay: DEFAULT_DAMPING_DECAY,
            frame_budget_ms: DEFAULT_FRAME_BUDGET_MS,
        }
    }
}

impl WorldConfig {
    /// Parses a JSON document; missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: WorldConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.gravity.is_finite() {
            return Err(PhysicsError::InvalidConfig(format!(
                "gravity must be finite, got {}",
                self.gravity
            )));
        }
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(PhysicsError::InvalidConfig(format!(
                "time_step must be positive, got {}",
                self.time_step
            )));
        }
        if self.max_substeps == 0 {
            return Err(PhysicsError::InvalidConfig(
                "max_substeps must be at least 1".to_string(),
            ));
        }
        let extent = self.quadtree.world_half_extent;
        if !(extent.is_finite() && extent.x > 0.0 && extent.y > 0.0) {
            return Err(PhysicsError::InvalidConfig(format!(
                "quadtree world_half_extent must be positive, got {extent}"
            )));
        }
        if self.quadtree.max_entries == 0 {
            return Err(PhysicsError::InvalidConfig(
                "quadtree max_entries must be at least 1".to_string(),
            ));
        }
        if self.collision_frames == 0 {
            return Err(PhysicsError::InvalidConfig(
                "collision_frames must be at least 1".to_string(),
            ));
        }
        if self.sleep.window == 0 {
            return Err(PhysicsError::InvalidConfig(
                "sleep window must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.damping_decay) {
            return Err(PhysicsError::InvalidConfig(format!(
                "damping_decay must lie in [0, 1], got {}",
                self.damping_decay
            )));
        }
        Ok(())
    }
}

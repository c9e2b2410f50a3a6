use std::time::{Duration, Instant};

/// Per-frame timings and counters for the physics pipeline.
#[derive(Debug, Default, Clone, Copy)]
pub struct PhysicsProfiler {
    pub integrate_accel_time: Duration,
    pub broad_phase_time: Duration,
    pub narrow_phase_time: Duration,
    pub integrate_velocity_time: Duration,
    pub total_frame_time: Duration,

    pub substeps: u32,
    pub body_count: usize,
    pub dynamic_count: usize,
    pub candidate_pairs: usize,
    pub confirmed_collisions: usize,
    pub sleeping_count: usize,
}

impl PhysicsProfiler {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn share(part: Duration, total_us: f32) -> f32 {
        (part.as_micros() as f32 / total_us) * 100.0
    }

    /// Logs the frame breakdown at debug level.
    pub fn report(&self) {
        let total_us = self.total_frame_time.as_micros() as f32;
        if total_us < 1.0 {
            return;
        }

        log::debug!(
            "physics frame {:.2} ms over {} substeps: bodies={} dynamic={} sleeping={} pairs={} collisions={}",
            self.total_frame_time.as_secs_f32() * 1000.0,
            self.substeps,
            self.body_count,
            self.dynamic_count,
            self.sleeping_count,
            self.candidate_pairs,
            self.confirmed_collisions,
        );
        log::debug!(
            "  accel {:.1}% | broad {:.1}% | narrow {:.1}% | velocity {:.1}%",
            Self::share(self.integrate_accel_time, total_us),
            Self::share(self.broad_phase_time, total_us),
            Self::share(self.narrow_phase_time, total_us),
            Self::share(self.integrate_velocity_time, total_us),
        );
    }
}

/// Adds the lifetime of the guard to the referenced duration.
pub struct PhaseTimer<'a> {
    start: Instant,
    output: &'a mut Duration,
}

impl<'a> PhaseTimer<'a> {
    pub fn new(output: &'a mut Duration) -> Self {
        Self {
            start: Instant::now(),
            output,
        }
    }
}

impl Drop for PhaseTimer<'_> {
    fn drop(&mut self) {
        *self.output += self.start.elapsed();
    }
}

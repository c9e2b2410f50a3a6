use glam::Vec3;

use crate::{
    config::{SleepSettings, WorldConfig},
    core::rigidbody::RigidBody,
    utils::{
        allocator::Arena,
        math::{damping_factor, integrate_orientation},
    },
};

/// Semi-implicit Euler integrator split into the two passes that bracket
/// collision handling in each substep.
#[derive(Debug, Clone)]
pub struct Integrator {
    pub gravity: Vec3,
    pub use_gravity: bool,
    pub sleep: SleepSettings,
    pub damping_decay: f32,
}

impl Default for Integrator {
    fn default() -> Self {
        Self::from_config(&WorldConfig::default())
    }
}

impl Integrator {
    pub fn from_config(config: &WorldConfig) -> Self {
        Self {
            gravity: config.gravity,
            use_gravity: config.use_gravity,
            sleep: config.sleep,
            damping_decay: config.damping_decay,
        }
    }

    /// Turns accumulated force and torque into velocity.
    pub fn integrate_accelerations(&self, bodies: &mut Arena<RigidBody>, dt: f32) {
        for (_, body) in bodies.iter_mut() {
            if body.is_simulated() {
                self.accelerate(body, dt);
            }
        }
    }

    /// Moves bodies by their velocity, tracks sleep, damps and spins.
    /// Returns how many bodies fell asleep during this pass.
    pub fn integrate_velocities(&self, bodies: &mut Arena<RigidBody>, dt: f32) -> usize {
        let damping = damping_factor(self.damping_decay, dt);
        let mut fell_asleep = 0;
        for (_, body) in bodies.iter_mut() {
            if !body.is_simulated() {
                continue;
            }
            if self.advance(body, dt, damping) {
                fell_asleep += 1;
            }
        }
        fell_asleep
    }

    fn accelerate(&self, body: &mut RigidBody, dt: f32) {
        let inverse_mass = body.inverse_mass();
        let mut acceleration = body.force * inverse_mass;
        if self.use_gravity && inverse_mass > 0.0 {
            acceleration += self.gravity;
        }
        body.velocity.linear += acceleration * dt;

        body.update_inertia_tensor();
        let angular_acceleration = body.inverse_inertia() * body.torque;
        body.velocity.angular += angular_acceleration * dt;
    }

    fn advance(&self, body: &mut RigidBody, dt: f32, damping: f32) -> bool {
        let position = body.transform.position;
        body.previous_position = position;
        body.transform.position = position + body.velocity.linear * dt;

        let fell_asleep = self.track_sleep(body);

        body.velocity.linear *= damping;
        body.velocity.angular *= damping;

        body.transform.rotation =
            integrate_orientation(body.transform.rotation, body.velocity.angular, dt);

        fell_asleep
    }

    fn track_sleep(&self, body: &mut RigidBody) -> bool {
        let moved = (body.transform.position - body.previous_position).length();
        body.sleep.amount_moved += moved;
        body.sleep.poll_count += 1;
        if body.sleep.poll_count < self.sleep.window.max(1) {
            return false;
        }

        let average = body.sleep.amount_moved / body.sleep.poll_count as f32;
        body.sleep.reset_window();
        if average < self.sleep.threshold {
            body.sleep.is_sleeping = true;
            return true;
        }
        false
    }
}

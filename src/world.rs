mod collision_manager;

use std::{collections::HashMap, sync::Arc, time::Instant};

use glam::Vec3;
use parking_lot::Mutex;

use collision_manager::CollisionManager;

use crate::{
    collision::{
        contact::{CollisionEvent, CollisionEventKind, CollisionRecord},
        queries::{Raycast, RaycastHit, RaycastQuery},
    },
    config::WorldConfig,
    core::rigidbody::RigidBody,
    dynamics::integrator::Integrator,
    error::{PhysicsError, Result},
    utils::{
        allocator::{Arena, BodyHandle},
        logging::{warn_if_frame_budget_exceeded, ScopedTimer},
        profiling::{PhaseTimer, PhysicsProfiler},
    },
};

/// Gameplay hook notified when the body it is registered for starts or stops
/// touching another body.
pub trait CollisionListener {
    fn on_collision_begin(&mut self, _body: &mut RigidBody, _other: &RigidBody) {}

    fn on_collision_end(&mut self, _body: &mut RigidBody, _other: &RigidBody) {}
}

pub type SharedCollisionListener = Arc<Mutex<dyn CollisionListener + Send>>;

/// Central simulation container: owns the bodies and runs the fixed-step
/// pipeline over them.
pub struct PhysicsWorld {
    config: WorldConfig,
    bodies: Arena<RigidBody>,
    collisions: CollisionManager,
    integrator: Integrator,
    listeners: HashMap<BodyHandle, SharedCollisionListener>,
    events: Vec<CollisionEvent>,
    time_accumulated: f32,
    profiler: PhysicsProfiler,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self::build(WorldConfig::default())
    }

    /// Creates a world from a validated configuration.
    pub fn with_config(config: WorldConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: WorldConfig) -> Self {
        Self {
            bodies: Arena::new(),
            collisions: CollisionManager::new(&config),
            integrator: Integrator::from_config(&config),
            listeners: HashMap::new(),
            events: Vec::new(),
            time_accumulated: 0.0,
            profiler: PhysicsProfiler::default(),
            config,
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn add_body(&mut self, body: RigidBody) -> BodyHandle {
        let is_static = body.is_static();
        let handle = self.bodies.insert(body);
        if let Some(body) = self.bodies.get_mut(handle) {
            body.id = handle;
        }
        if is_static {
            self.collisions.mark_static_dirty();
        }
        handle
    }

    /// Removes a body together with its listener and contact records. No end
    /// event is raised for records dropped this way.
    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<RigidBody> {
        let body = self
            .bodies
            .remove(handle)
            .ok_or(PhysicsError::UnknownBody(handle))?;
        if body.is_static() {
            self.collisions.mark_static_dirty();
        }
        self.listeners.remove(&handle);
        self.collisions.contacts.forget_body(handle);
        Ok(body)
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle)
    }

    /// Mutable access between steps. Moving a static body this way does not
    /// refresh the static tree; call [`Self::rebuild_static_tree`] afterwards.
    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle)
    }

    /// Bodies in stable arena order.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &RigidBody)> + '_ {
        self.bodies.iter()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn apply_force(&mut self, handle: BodyHandle, force: Vec3) -> Result<()> {
        self.known_body_mut(handle)?.apply_force(force);
        Ok(())
    }

    pub fn apply_torque(&mut self, handle: BodyHandle, torque: Vec3) -> Result<()> {
        self.known_body_mut(handle)?.apply_torque(torque);
        Ok(())
    }

    pub fn set_sleeping(&mut self, handle: BodyHandle, sleeping: bool) -> Result<()> {
        self.known_body_mut(handle)?.set_sleeping(sleeping);
        Ok(())
    }

    fn known_body_mut(&mut self, handle: BodyHandle) -> Result<&mut RigidBody> {
        self.bodies
            .get_mut(handle)
            .ok_or(PhysicsError::UnknownBody(handle))
    }

    pub fn use_gravity(&mut self, enabled: bool) {
        self.config.use_gravity = enabled;
        self.integrator.use_gravity = enabled;
    }

    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.config.gravity = gravity;
        self.integrator.gravity = gravity;
    }

    pub fn gravity(&self) -> Vec3 {
        self.config.gravity
    }

    /// Rebuilds the static quadtree from the current static bodies.
    pub fn rebuild_static_tree(&mut self) {
        self.collisions.rebuild_static_tree(&self.bodies);
    }

    pub fn set_collision_listener(
        &mut self,
        handle: BodyHandle,
        listener: SharedCollisionListener,
    ) -> Result<()> {
        if !self.bodies.contains(handle) {
            log::warn!("collision listener registered for unknown body {handle}");
            return Err(PhysicsError::UnknownBody(handle));
        }
        self.listeners.insert(handle, listener);
        Ok(())
    }

    pub fn remove_collision_listener(
        &mut self,
        handle: BodyHandle,
    ) -> Option<SharedCollisionListener> {
        self.listeners.remove(&handle)
    }

    /// Advances the simulation by `frame_dt` seconds of wall time, running as
    /// many fixed substeps as fit (bounded by `max_substeps`). Contact records
    /// are aged once per call that ran at least one substep.
    pub fn step(&mut self, frame_dt: f32) {
        let _timer = ScopedTimer::new("physics step");
        let frame_start = Instant::now();
        self.profiler.reset();

        if frame_dt.is_finite() && frame_dt > 0.0 {
            self.time_accumulated += frame_dt;
        }

        let dt = self.config.time_step;
        while self.time_accumulated >= dt {
            if self.profiler.substeps >= self.config.max_substeps {
                log::warn!(
                    "physics fell behind: dropping {:.3} s after {} substeps",
                    self.time_accumulated,
                    self.profiler.substeps
                );
                self.time_accumulated = 0.0;
                break;
            }
            self.step_once(dt);
            self.time_accumulated -= dt;
            self.profiler.substeps += 1;
        }

        // Records age per simulated frame, not per render frame.
        if self.profiler.substeps > 0 {
            self.update_collision_list();
        }

        self.profiler.total_frame_time = frame_start.elapsed();
        self.profiler.body_count = self.bodies.len();
        self.profiler.sleeping_count = self
            .bodies
            .iter()
            .filter(|(_, body)| body.is_sleeping())
            .count();
        self.profiler.report();
        warn_if_frame_budget_exceeded(self.profiler.total_frame_time, self.config.frame_budget_ms);
    }

    /// Runs exactly one fixed substep of `dt` seconds, ignoring the
    /// accumulator and without aging contact records.
    ///
    /// Accumulated forces are consumed by the acceleration pass and cleared
    /// right after it, sleeping bodies included. Forces added later in the
    /// substep (spring contacts, listeners) act on the next substep.
    pub fn step_once(&mut self, dt: f32) {
        {
            let _phase = PhaseTimer::new(&mut self.profiler.integrate_accel_time);
            self.integrator.integrate_accelerations(&mut self.bodies, dt);
            for (_, body) in self.bodies.iter_mut() {
                body.clear_forces();
            }
        }
        {
            let _phase = PhaseTimer::new(&mut self.profiler.broad_phase_time);
            self.profiler.candidate_pairs += self.collisions.broad_phase(&self.bodies);
        }
        self.profiler.dynamic_count = self.collisions.broadphase.dynamic_count();
        {
            let _phase = PhaseTimer::new(&mut self.profiler.narrow_phase_time);
            self.profiler.confirmed_collisions += self.collisions.narrow_phase(&mut self.bodies);
        }
        {
            let _phase = PhaseTimer::new(&mut self.profiler.integrate_velocity_time);
            let fell_asleep = self.integrator.integrate_velocities(&mut self.bodies, dt);
            if fell_asleep > 0 {
                log::trace!("{fell_asleep} bodies fell asleep");
            }
        }
    }

    fn update_collision_list(&mut self) {
        let events = self.collisions.update_collision_list();
        for event in &events {
            log::debug!(
                "collision {:?}: {} <-> {}",
                event.kind,
                event.pair.a(),
                event.pair.b()
            );
            self.notify(event.kind, event.pair.a(), event.pair.b());
            self.notify(event.kind, event.pair.b(), event.pair.a());
        }
        self.events.extend(events);
    }

    fn notify(&mut self, kind: CollisionEventKind, handle: BodyHandle, other: BodyHandle) {
        let Some(listener) = self.listeners.get(&handle) else {
            return;
        };
        let Some((body, other)) = self.bodies.get_pair_mut(handle, other) else {
            return;
        };
        let mut listener = listener.lock();
        match kind {
            CollisionEventKind::Begin => listener.on_collision_begin(body, other),
            CollisionEventKind::End => listener.on_collision_end(body, other),
        }
    }

    /// Takes every begin/end event queued since the last drain.
    pub fn drain_collision_events(&mut self) -> Vec<CollisionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn collisions(&self) -> impl Iterator<Item = &CollisionRecord> + '_ {
        self.collisions.contacts.iter()
    }

    pub fn is_colliding(&self, a: BodyHandle, b: BodyHandle) -> bool {
        self.collisions.contacts.is_colliding(a, b)
    }

    /// Removes every body, listener and record, leaving configuration intact.
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.listeners.clear();
        self.events.clear();
        self.collisions.clear();
        self.time_accumulated = 0.0;
        self.profiler.reset();
    }

    pub fn raycast(&self, query: &RaycastQuery) -> Option<RaycastHit> {
        Raycast::cast_closest(query, &self.bodies)
    }

    pub fn raycast_all(&self, query: &RaycastQuery) -> Vec<RaycastHit> {
        Raycast::cast_all(query, &self.bodies)
    }

    /// Timings and counters of the most recent [`Self::step`].
    pub fn profiler(&self) -> &PhysicsProfiler {
        &self.profiler
    }
}

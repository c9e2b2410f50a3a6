use crate::{
    collision::{
        broadphase::BroadPhase,
        contact::{CollisionEvent, ContactCache},
        narrowphase::NarrowPhase,
    },
    config::WorldConfig,
    core::{collider::CollisionBehavior, rigidbody::RigidBody},
    dynamics::resolution,
    utils::allocator::Arena,
};

/// Owns everything between "where are the bodies" and "who touched whom":
/// the broadphase trees, the persistent contact records and the static tree
/// dirty flag.
pub struct CollisionManager {
    pub broadphase: BroadPhase,
    pub contacts: ContactCache,
    collision_frames: u32,
    static_dirty: bool,
}

impl CollisionManager {
    pub fn new(config: &WorldConfig) -> Self {
        Self {
            broadphase: BroadPhase::new(config.quadtree),
            contacts: ContactCache::new(),
            collision_frames: config.collision_frames,
            static_dirty: true,
        }
    }

    pub fn mark_static_dirty(&mut self) {
        self.static_dirty = true;
    }

    pub fn rebuild_static_tree(&mut self, bodies: &Arena<RigidBody>) {
        self.broadphase.rebuild_static(bodies);
        self.static_dirty = false;
    }

    /// Refreshes the candidate set, rebuilding the static tree first if a
    /// static body was added or removed since the last pass.
    pub fn broad_phase(&mut self, bodies: &Arena<RigidBody>) -> usize {
        if self.static_dirty {
            self.rebuild_static_tree(bodies);
        }
        self.broadphase.update(bodies).len()
    }

    /// Tests every candidate exactly, resolves hits and records them.
    /// Returns the number of confirmed collisions.
    pub fn narrow_phase(&mut self, bodies: &mut Arena<RigidBody>) -> usize {
        let mut confirmed = 0;
        for pair in self.broadphase.candidates() {
            let Some((body_a, body_b)) = bodies.get_pair_mut(pair.a(), pair.b()) else {
                continue;
            };
            let Some(contact) = NarrowPhase::intersect(body_a, body_b) else {
                continue;
            };

            wake_on_impact(body_a, body_b);
            wake_on_impact(body_b, body_a);
            // Sleepers left are touching statics or other sleepers.
            if !body_a.is_sleeping() && !body_b.is_sleeping() {
                let behavior =
                    CollisionBehavior::for_pair(body_a.collision_type, body_b.collision_type);
                resolution::resolve(behavior, body_a, body_b, &contact);
            }
            self.contacts.confirm(*pair, contact, self.collision_frames);
            confirmed += 1;
        }
        confirmed
    }

    /// Ages the contact records by one frame.
    pub fn update_collision_list(&mut self) -> Vec<CollisionEvent> {
        self.contacts.advance_frame()
    }

    pub fn clear(&mut self) {
        self.broadphase.clear();
        self.contacts.clear();
        self.static_dirty = true;
    }
}

/// A sleeping body struck by an awake, integrated body wakes up.
fn wake_on_impact(body: &mut RigidBody, other: &RigidBody) {
    if body.is_sleeping() && other.is_simulated() {
        log::trace!("{} woken by {}", body.id, other.id);
        body.wake();
    }
}

use crate::utils::{allocator::BodyHandle, math::rotate_diagonal_tensor};

use super::{
    collider::{Collider, CollisionType},
    types::{inverse_inertia_box, inverse_inertia_sphere, Material, Transform, Velocity},
};
use glam::{Mat3, Quat, Vec3};

/// Rolling movement window used to decide when a body may sleep.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SleepState {
    pub is_sleeping: bool,
    pub amount_moved: f32,
    pub poll_count: u32,
}

impl SleepState {
    pub fn reset_window(&mut self) {
        self.amount_moved = 0.0;
        self.poll_count = 0;
    }
}

/// A participant in the simulation: dynamic or static, with an optional
/// collision volume.
///
/// A body with `is_enabled == false` is treated as having no physics object:
/// it is neither integrated nor collided.
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub id: BodyHandle,
    pub transform: Transform,
    pub previous_position: Vec3,
    pub velocity: Velocity,
    pub force: Vec3,
    pub torque: Vec3,
    pub material: Material,
    pub collision_type: CollisionType,
    pub collider: Option<Collider>,
    pub is_enabled: bool,
    pub sleep: SleepState,
    is_static: bool,
    inverse_mass: f32,
    inverse_inertia_local: Vec3,
    inverse_inertia: Mat3,
}

impl Default for RigidBody {
    fn default() -> Self {
        let mut body = Self {
            id: BodyHandle::default(),
            transform: Transform::default(),
            previous_position: Vec3::ZERO,
            velocity: Velocity::default(),
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
            material: Material::default(),
            collision_type: CollisionType::default(),
            collider: None,
            is_enabled: true,
            sleep: SleepState::default(),
            is_static: false,
            inverse_mass: 1.0,
            inverse_inertia_local: Vec3::ZERO,
            inverse_inertia: Mat3::ZERO,
        };
        body.recompute_inertia();
        body
    }
}

impl RigidBody {
    /// Dynamic body with the given inverse mass; `0.0` makes it immovable.
    pub fn dynamic(inverse_mass: f32) -> Self {
        let mut body = Self::default();
        body.set_inverse_mass(inverse_mass);
        body
    }

    /// Permanently static body. Static bodies never integrate and always
    /// have zero inverse mass.
    pub fn new_static() -> Self {
        let mut body = Self {
            is_static: true,
            ..Self::default()
        };
        body.set_inverse_mass(0.0);
        body
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self.previous_position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.transform.rotation = rotation;
        self.update_inertia_tensor();
        self
    }

    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.collider = Some(collider);
        self.recompute_inertia();
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn with_collision_type(mut self, collision_type: CollisionType) -> Self {
        self.collision_type = collision_type;
        self
    }

    pub fn with_velocity(mut self, linear: Vec3, angular: Vec3) -> Self {
        self.set_velocity(linear, angular);
        self
    }

    pub fn sleeping(mut self) -> Self {
        self.set_sleeping(true);
        self
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleep.is_sleeping
    }

    /// Bodies that take part in integration this frame.
    pub fn is_simulated(&self) -> bool {
        self.is_enabled && !self.is_static && !self.sleep.is_sleeping
    }

    pub fn inverse_mass(&self) -> f32 {
        self.inverse_mass
    }

    /// World-space inverse inertia tensor as of the last orientation update.
    pub fn inverse_inertia(&self) -> Mat3 {
        self.inverse_inertia
    }

    pub fn set_inverse_mass(&mut self, inverse_mass: f32) {
        self.inverse_mass = if self.is_static {
            0.0
        } else {
            inverse_mass.max(0.0)
        };
        self.recompute_inertia();
    }

    /// Puts the body to sleep or wakes it, restarting the movement window.
    pub fn set_sleeping(&mut self, sleeping: bool) {
        self.sleep.is_sleeping = sleeping;
        self.sleep.reset_window();
    }

    pub fn wake(&mut self) {
        self.set_sleeping(false);
    }

    pub fn set_velocity(&mut self, linear: Vec3, angular: Vec3) {
        self.velocity.linear = linear;
        self.velocity.angular = angular;
    }

    /// Broadphase half sizes, or `None` when the body cannot collide.
    pub fn broadphase_half_sizes(&self) -> Option<Vec3> {
        if !self.is_enabled {
            return None;
        }
        self.collider.map(|collider| collider.broadphase_half_sizes())
    }

    pub fn apply_force(&mut self, force: Vec3) {
        self.force += force;
    }

    pub fn apply_torque(&mut self, torque: Vec3) {
        self.torque += torque;
    }

    /// Adds a force acting at `local_point`, relative to the centre of mass.
    pub fn apply_force_at_local_point(&mut self, force: Vec3, local_point: Vec3) {
        self.force += force;
        self.torque += local_point.cross(force);
    }

    /// Changes velocity directly. Static and sleeping bodies keep their
    /// velocity.
    pub fn apply_linear_impulse(&mut self, impulse: Vec3) {
        if self.is_static || self.sleep.is_sleeping {
            return;
        }
        self.velocity.linear += impulse * self.inverse_mass;
    }

    pub fn apply_angular_impulse(&mut self, impulse: Vec3) {
        if self.is_static || self.sleep.is_sleeping {
            return;
        }
        self.velocity.angular += self.inverse_inertia * impulse;
    }

    pub fn clear_forces(&mut self) {
        self.force = Vec3::ZERO;
        self.torque = Vec3::ZERO;
    }

    /// Re-derives the world inverse inertia from the current orientation.
    pub fn update_inertia_tensor(&mut self) {
        self.inverse_inertia =
            rotate_diagonal_tensor(self.transform.rotation, self.inverse_inertia_local);
    }

    fn recompute_inertia(&mut self) {
        self.inverse_inertia_local = match self.collider {
            _ if self.inverse_mass == 0.0 => Vec3::ZERO,
            Some(Collider::Sphere { radius }) => inverse_inertia_sphere(radius, self.inverse_mass),
            Some(Collider::Aabb { half_extents }) => {
                inverse_inertia_box(half_extents, self.inverse_mass)
            }
            None => inverse_inertia_sphere(1.0, self.inverse_mass),
        };
        self.update_inertia_tensor();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_bodies_ignore_mass_and_impulses() {
        let mut wall = RigidBody::new_static().with_collider(Collider::cuboid(Vec3::ONE));
        wall.set_inverse_mass(3.0);
        wall.apply_linear_impulse(Vec3::X * 100.0);
        wall.apply_angular_impulse(Vec3::Y * 100.0);

        assert_eq!(wall.inverse_mass(), 0.0);
        assert_eq!(wall.velocity, Velocity::default());
        assert_eq!(wall.inverse_inertia(), Mat3::ZERO);
    }

    #[test]
    fn off_centre_force_adds_torque() {
        let mut body = RigidBody::dynamic(1.0);
        body.apply_force_at_local_point(Vec3::Z, Vec3::X);
        assert_eq!(body.force, Vec3::Z);
        assert_eq!(body.torque, Vec3::X.cross(Vec3::Z));

        body.clear_forces();
        assert_eq!(body.torque, Vec3::ZERO);
    }

    #[test]
    fn sleeping_bodies_keep_their_velocity() {
        let mut body = RigidBody::dynamic(1.0)
            .with_velocity(Vec3::X, Vec3::ZERO)
            .sleeping();
        body.apply_linear_impulse(Vec3::new(0.0, 5.0, 0.0));
        body.apply_angular_impulse(Vec3::Z);
        assert_eq!(body.velocity.linear, Vec3::X);
        assert_eq!(body.velocity.angular, Vec3::ZERO);

        body.wake();
        body.apply_linear_impulse(Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(body.velocity.linear, Vec3::new(1.0, 5.0, 0.0));
    }

    #[test]
    fn waking_restarts_the_movement_window() {
        let mut body = RigidBody::dynamic(1.0).sleeping();
        body.sleep.amount_moved = 3.0;
        body.sleep.poll_count = 12;
        body.wake();

        assert!(!body.is_sleeping());
        assert_eq!(body.sleep.poll_count, 0);
        assert!(body.is_simulated());
    }

    #[test]
    fn rotation_turns_the_world_inertia() {
        let plank = Collider::cuboid(Vec3::new(2.0, 0.5, 0.5));
        let flat = RigidBody::dynamic(1.0).with_collider(plank);
        let turned = RigidBody::dynamic(1.0)
            .with_collider(plank)
            .with_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));

        let flat = flat.inverse_inertia();
        let turned = turned.inverse_inertia();
        assert!(flat.x_axis.x > flat.z_axis.z);
        approx::assert_relative_eq!(turned.x_axis.x, flat.z_axis.z, epsilon = 1e-4);
        approx::assert_relative_eq!(turned.z_axis.z, flat.x_axis.x, epsilon = 1e-4);
    }

    #[test]
    fn disabled_bodies_have_no_broadphase_box() {
        let mut body = RigidBody::dynamic(1.0).with_collider(Collider::sphere(1.0));
        assert!(body.broadphase_half_sizes().is_some());
        body.is_enabled = false;
        assert!(body.broadphase_half_sizes().is_none());
    }
}

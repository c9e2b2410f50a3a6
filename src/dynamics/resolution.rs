use glam::Vec3;

use crate::{
    collision::contact::ContactPoint,
    core::{collider::CollisionBehavior, rigidbody::RigidBody},
};

/// Outcome of an impulse resolution, mostly useful to tests and profiling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImpulseOutcome {
    /// Both bodies are immovable.
    Immovable,
    /// Bodies were separated but already moving apart.
    Separating,
    /// An impulse of the given magnitude was exchanged.
    Applied(f32),
}

/// Dispatches a confirmed contact to the resolvers selected by `behavior`.
pub fn resolve(
    behavior: CollisionBehavior,
    body_a: &mut RigidBody,
    body_b: &mut RigidBody,
    contact: &ContactPoint,
) {
    match behavior {
        CollisionBehavior::Impulse => {
            resolve_impulse(body_a, body_b, contact);
        }
        CollisionBehavior::Spring => resolve_spring(body_a, body_b, contact),
        CollisionBehavior::Both => {
            resolve_impulse(body_a, body_b, contact);
            resolve_spring(body_a, body_b, contact);
        }
        CollisionBehavior::None => {}
    }
}

/// Projects the bodies apart, then exchanges a restitution impulse.
pub fn resolve_impulse(
    body_a: &mut RigidBody,
    body_b: &mut RigidBody,
    contact: &ContactPoint,
) -> ImpulseOutcome {
    let inv_a = body_a.inverse_mass();
    let inv_b = body_b.inverse_mass();
    let total_inverse_mass = inv_a + inv_b;
    if total_inverse_mass == 0.0 {
        return ImpulseOutcome::Immovable;
    }

    let correction = contact.normal * contact.penetration;
    body_a.transform.position -= correction * (inv_a / total_inverse_mass);
    body_b.transform.position += correction * (inv_b / total_inverse_mass);

    let r_a = contact.local_a;
    let r_b = contact.local_b;
    let velocity_a = body_a.velocity.linear + body_a.velocity.angular.cross(r_a);
    let velocity_b = body_b.velocity.linear + body_b.velocity.angular.cross(r_b);
    let approach = (velocity_b - velocity_a).dot(contact.normal);
    if approach > 0.0 {
        return ImpulseOutcome::Separating;
    }

    let inertia_a = (body_a.inverse_inertia() * r_a.cross(contact.normal)).cross(r_a);
    let inertia_b = (body_b.inverse_inertia() * r_b.cross(contact.normal)).cross(r_b);
    let angular_effect = (inertia_a + inertia_b).dot(contact.normal);

    let restitution = body_a.material.combined_elasticity(&body_b.material);
    let magnitude = -(1.0 + restitution) * approach / (total_inverse_mass + angular_effect);
    let impulse = contact.normal * magnitude;

    body_a.apply_linear_impulse(-impulse);
    body_b.apply_linear_impulse(impulse);
    body_a.apply_angular_impulse(r_a.cross(-impulse));
    body_b.apply_angular_impulse(r_b.cross(impulse));

    ImpulseOutcome::Applied(magnitude)
}

/// Penalty response: a Hooke's-law force pair at the contact points. Each
/// side is pushed by the other's stiffness.
pub fn resolve_spring(body_a: &mut RigidBody, body_b: &mut RigidBody, contact: &ContactPoint) {
    let extension: Vec3 = contact.normal * contact.penetration;
    let force_a = -extension * body_b.material.stiffness;
    let force_b = extension * body_a.material.stiffness;

    if !body_a.is_static() {
        body_a.apply_force_at_local_point(force_a, contact.local_a);
    }
    if !body_b.is_static() {
        body_b.apply_force_at_local_point(force_b, contact.local_b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        collision::narrowphase::NarrowPhase,
        core::{collider::Collider, types::Material},
    };
    use approx::assert_relative_eq;

    fn ball(position: Vec3, velocity: Vec3, elasticity: f32) -> RigidBody {
        RigidBody::dynamic(1.0)
            .with_collider(Collider::sphere(1.0))
            .with_material(Material::new(elasticity, 100.0))
            .with_position(position)
            .with_velocity(velocity, Vec3::ZERO)
    }

    #[test]
    fn head_on_elastic_spheres_swap_velocities() {
        let mut a = ball(Vec3::new(-0.95, 0.0, 0.0), Vec3::new(5.0, 0.0, 0.0), 1.0);
        let mut b = ball(Vec3::new(0.95, 0.0, 0.0), Vec3::new(-5.0, 0.0, 0.0), 1.0);
        let contact = NarrowPhase::intersect(&a, &b).expect("penetrating by 0.1");
        assert_relative_eq!(contact.penetration, 0.1, epsilon = 1e-5);

        let momentum_before = a.velocity.linear + b.velocity.linear;
        let outcome = resolve_impulse(&mut a, &mut b, &contact);

        assert!(matches!(outcome, ImpulseOutcome::Applied(_)));
        assert_relative_eq!(a.velocity.linear.x, -5.0, epsilon = 1e-4);
        assert_relative_eq!(b.velocity.linear.x, 5.0, epsilon = 1e-4);
        let momentum_after = a.velocity.linear + b.velocity.linear;
        assert_relative_eq!(momentum_before.x, momentum_after.x, epsilon = 1e-4);

        let gap = (b.transform.position - a.transform.position).length();
        assert!(gap >= 2.0 - 1e-4, "still overlapping, gap = {gap}");
    }

    #[test]
    fn oblique_hit_conserves_momentum_and_reverses_approach() {
        let mut a = ball(Vec3::new(0.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 1.0), 1.0);
        let mut b = ball(Vec3::new(1.6, 0.0, 0.8), Vec3::new(-1.0, 0.0, 0.0), 1.0);
        let contact = NarrowPhase::intersect(&a, &b).expect("overlap");

        let approach_before = (b.velocity.linear - a.velocity.linear).dot(contact.normal);
        let momentum_before = a.velocity.linear + b.velocity.linear;
        resolve_impulse(&mut a, &mut b, &contact);
        let approach_after = (b.velocity.linear - a.velocity.linear).dot(contact.normal);
        let momentum_after = a.velocity.linear + b.velocity.linear;

        assert!(approach_before < 0.0);
        assert!(approach_after > 0.0);
        assert_relative_eq!(approach_after, -approach_before, epsilon = 1e-3);
        assert!((momentum_before - momentum_after).length() < 1e-4);
    }

    #[test]
    fn static_body_never_moves() {
        let mut wall = RigidBody::new_static()
            .with_collider(Collider::cuboid(Vec3::new(1.0, 5.0, 5.0)))
            .with_position(Vec3::ZERO);
        let mut heavy = RigidBody::dynamic(0.001)
            .with_collider(Collider::sphere(1.0))
            .with_position(Vec3::new(1.5, 0.0, 0.0))
            .with_velocity(Vec3::new(-20.0, 0.0, 0.0), Vec3::ZERO);
        let contact = NarrowPhase::intersect(&wall, &heavy).expect("overlap");

        resolve_impulse(&mut wall, &mut heavy, &contact);

        assert_eq!(wall.transform.position, Vec3::ZERO);
        assert_eq!(wall.velocity.linear, Vec3::ZERO);
        assert_eq!(wall.velocity.angular, Vec3::ZERO);
        assert_relative_eq!(heavy.transform.position.x, 2.0, epsilon = 1e-5);
        assert!(heavy.velocity.linear.x > 0.0);
    }

    #[test]
    fn immovable_pairs_are_left_alone() {
        let mut a = RigidBody::dynamic(0.0)
            .with_collider(Collider::sphere(1.0))
            .with_position(Vec3::ZERO);
        let mut b = RigidBody::new_static()
            .with_collider(Collider::sphere(1.0))
            .with_position(Vec3::new(1.0, 0.0, 0.0));
        let contact = NarrowPhase::intersect(&a, &b).expect("geometry is still tested");

        assert_eq!(
            resolve_impulse(&mut a, &mut b, &contact),
            ImpulseOutcome::Immovable
        );
        assert_eq!(a.transform.position, Vec3::ZERO);
    }

    #[test]
    fn separating_contacts_get_no_impulse() {
        let mut a = ball(Vec3::ZERO, Vec3::new(-1.0, 0.0, 0.0), 1.0);
        let mut b = ball(Vec3::new(1.8, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), 1.0);
        let contact = NarrowPhase::intersect(&a, &b).expect("overlap");

        assert_eq!(
            resolve_impulse(&mut a, &mut b, &contact),
            ImpulseOutcome::Separating
        );
        assert_eq!(a.velocity.linear, Vec3::new(-1.0, 0.0, 0.0));
        // Positional correction still happened.
        assert_relative_eq!(a.transform.position.x, -0.1, epsilon = 1e-5);
    }

    #[test]
    fn spring_pushes_apart_without_touching_velocity() {
        let mut a = ball(Vec3::ZERO, Vec3::ZERO, 0.5);
        let mut b = ball(Vec3::new(1.5, 0.0, 0.0), Vec3::ZERO, 0.5);
        b.material.stiffness = 40.0;
        let contact = NarrowPhase::intersect(&a, &b).expect("overlap");

        resolve_spring(&mut a, &mut b, &contact);

        // 0.5 penetration: A feels B's stiffness, B feels A's.
        assert_relative_eq!(a.force.x, -20.0, epsilon = 1e-4);
        assert_relative_eq!(b.force.x, 50.0, epsilon = 1e-4);
        assert_eq!(a.velocity.linear, Vec3::ZERO);
        assert_eq!(a.transform.position, Vec3::ZERO);
        // Forces act along the line of centres, so no torque.
        assert!(a.torque.length() < 1e-5);
    }

    #[test]
    fn no_behavior_means_no_response() {
        let mut a = ball(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), 1.0);
        let mut b = ball(Vec3::new(1.5, 0.0, 0.0), Vec3::ZERO, 1.0);
        let contact = NarrowPhase::intersect(&a, &b).expect("overlap");

        resolve(CollisionBehavior::None, &mut a, &mut b, &contact);
        assert_eq!(a.velocity.linear, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(a.force, Vec3::ZERO);
    }
}

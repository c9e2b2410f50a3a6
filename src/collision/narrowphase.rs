use glam::Vec3;

use crate::{
    collision::contact::ContactPoint,
    core::{collider::Collider, rigidbody::RigidBody},
};

/// Exact intersection tests between the supported collider pairs.
///
/// Boxes are treated as world axis-aligned. Every returned normal points from
/// the first shape toward the second.
pub struct NarrowPhase;

impl NarrowPhase {
    const EPSILON: f32 = 1e-6;

    /// Tests two bodies' volumes. Bodies without a collider never intersect.
    pub fn intersect(body_a: &RigidBody, body_b: &RigidBody) -> Option<ContactPoint> {
        let collider_a = body_a.collider.as_ref()?;
        let collider_b = body_b.collider.as_ref()?;
        Self::collide(
            collider_a,
            body_a.transform.position,
            collider_b,
            body_b.transform.position,
        )
    }

    pub fn collide(
        collider_a: &Collider,
        position_a: Vec3,
        collider_b: &Collider,
        position_b: Vec3,
    ) -> Option<ContactPoint> {
        match (collider_a, collider_b) {
            (Collider::Sphere { radius: ra }, Collider::Sphere { radius: rb }) => {
                Self::sphere_sphere(*ra, position_a, *rb, position_b)
            }
            (Collider::Aabb { half_extents: ha }, Collider::Aabb { half_extents: hb }) => {
                Self::aabb_aabb(*ha, position_a, *hb, position_b)
            }
            (Collider::Aabb { half_extents }, Collider::Sphere { radius }) => {
                Self::aabb_sphere(*half_extents, position_a, *radius, position_b)
            }
            (Collider::Sphere { radius }, Collider::Aabb { half_extents }) => {
                Self::aabb_sphere(*half_extents, position_b, *radius, position_a)
                    .map(|contact| contact.flipped())
            }
        }
    }

    pub fn sphere_sphere(
        radius_a: f32,
        position_a: Vec3,
        radius_b: f32,
        position_b: Vec3,
    ) -> Option<ContactPoint> {
        let radii = radius_a + radius_b;
        let delta = position_b - position_a;
        let distance = delta.length();
        if distance >= radii {
            return None;
        }

        // Concentric spheres have no preferred axis; push along +Y.
        let normal = if distance > Self::EPSILON {
            delta / distance
        } else {
            Vec3::Y
        };

        Some(ContactPoint {
            normal,
            penetration: radii - distance,
            local_a: normal * radius_a,
            local_b: -normal * radius_b,
        })
    }

    pub fn aabb_aabb(
        half_a: Vec3,
        position_a: Vec3,
        half_b: Vec3,
        position_b: Vec3,
    ) -> Option<ContactPoint> {
        let delta = position_b - position_a;
        let total = half_a + half_b;
        if !delta.abs().cmplt(total).all() {
            return None;
        }

        let max_a = position_a + half_a;
        let min_a = position_a - half_a;
        let max_b = position_b + half_b;
        let min_b = position_b - half_b;

        let faces = [
            (-Vec3::X, max_b.x - min_a.x),
            (Vec3::X, max_a.x - min_b.x),
            (-Vec3::Y, max_b.y - min_a.y),
            (Vec3::Y, max_a.y - min_b.y),
            (-Vec3::Z, max_b.z - min_a.z),
            (Vec3::Z, max_a.z - min_b.z),
        ];

        let (normal, penetration) = faces
            .into_iter()
            .fold((Vec3::Y, f32::MAX), |best, face| {
                if face.1 < best.1 {
                    face
                } else {
                    best
                }
            });

        Some(ContactPoint {
            normal,
            penetration,
            local_a: Vec3::ZERO,
            local_b: Vec3::ZERO,
        })
    }

    /// Box first, sphere second.
    pub fn aabb_sphere(
        half_extents: Vec3,
        box_position: Vec3,
        radius: f32,
        sphere_position: Vec3,
    ) -> Option<ContactPoint> {
        let delta = sphere_position - box_position;
        let closest = delta.clamp(-half_extents, half_extents);
        let offset = delta - closest;
        let distance = offset.length();

        if distance >= radius {
            return None;
        }

        if distance > Self::EPSILON {
            let normal = offset / distance;
            return Some(ContactPoint {
                normal,
                penetration: radius - distance,
                // Off-centre arm: a dynamic box can spin though its volume stays axis-aligned.
                local_a: closest,
                local_b: -normal * radius,
            });
        }

        // Centre inside the box: leave through the nearest face.
        let depth = half_extents - delta.abs();
        let (axis, face_depth) = if depth.x <= depth.y && depth.x <= depth.z {
            (Vec3::X * delta.x.signum(), depth.x)
        } else if depth.y <= depth.z {
            (Vec3::Y * delta.y.signum(), depth.y)
        } else {
            (Vec3::Z * delta.z.signum(), depth.z)
        };

        Some(ContactPoint {
            normal: axis,
            penetration: face_depth + radius,
            local_a: delta,
            local_b: -axis * radius,
        })
    }
}

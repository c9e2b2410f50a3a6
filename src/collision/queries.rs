use glam::Vec3;

use crate::{
    core::{collider::Collider, rigidbody::RigidBody},
    utils::allocator::{Arena, BodyHandle},
};

/// Result of a ray cast against body volumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub body: BodyHandle,
    pub point: Vec3,
    pub normal: Vec3,
    pub distance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastQuery {
    pub origin: Vec3,
    /// Need not be normalised; a zero direction hits nothing.
    pub direction: Vec3,
    pub max_distance: f32,
    /// Body skipped by the cast, typically the caster itself.
    pub ignore: Option<BodyHandle>,
}

impl RaycastQuery {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction,
            max_distance: f32::INFINITY,
            ignore: None,
        }
    }

    pub fn with_max_distance(mut self, max_distance: f32) -> Self {
        self.max_distance = max_distance;
        self
    }

    pub fn ignoring(mut self, body: BodyHandle) -> Self {
        self.ignore = Some(body);
        self
    }
}

pub struct Raycast;

impl Raycast {
    /// Every hit along the ray, nearest first. Rays starting inside a volume
    /// hit it at distance zero.
    pub fn cast_all(query: &RaycastQuery, bodies: &Arena<RigidBody>) -> Vec<RaycastHit> {
        let Some(direction) = query.direction.try_normalize() else {
            return Vec::new();
        };

        let mut hits: Vec<RaycastHit> = bodies
            .iter()
            .filter(|(handle, body)| body.is_enabled && query.ignore != Some(*handle))
            .filter_map(|(handle, body)| {
                let collider = body.collider.as_ref()?;
                Self::ray_collider(query, direction, collider, body.transform.position).map(
                    |(distance, normal)| RaycastHit {
                        body: handle,
                        point: query.origin + direction * distance,
                        normal,
                        distance,
                    },
                )
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    /// The nearest hit, if any.
    pub fn cast_closest(query: &RaycastQuery, bodies: &Arena<RigidBody>) -> Option<RaycastHit> {
        Self::cast_all(query, bodies).into_iter().next()
    }

    fn ray_collider(
        query: &RaycastQuery,
        direction: Vec3,
        collider: &Collider,
        centre: Vec3,
    ) -> Option<(f32, Vec3)> {
        match collider {
            Collider::Sphere { radius } => {
                Self::ray_sphere(query.origin, direction, query.max_distance, centre, *radius)
            }
            Collider::Aabb { half_extents } => {
                Self::ray_aabb(query.origin, direction, query.max_distance, centre, *half_extents)
            }
        }
    }

    fn ray_sphere(
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        centre: Vec3,
        radius: f32,
    ) -> Option<(f32, Vec3)> {
        let offset = origin - centre;
        let c = offset.length_squared() - radius * radius;
        if c <= 0.0 {
            return Some((0.0, -direction));
        }

        let b = offset.dot(direction);
        if b > 0.0 {
            // Outside and pointing away.
            return None;
        }
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        let t = -b - discriminant.sqrt();
        if t > max_distance {
            return None;
        }
        let normal = (origin + direction * t - centre) / radius;
        Some((t, normal))
    }

    fn ray_aabb(
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        centre: Vec3,
        half_extents: Vec3,
    ) -> Option<(f32, Vec3)> {
        let mut t_min = 0.0_f32;
        let mut t_max = max_distance;
        let mut normal = -direction;

        for axis in 0..3 {
            let min = centre[axis] - half_extents[axis];
            let max = centre[axis] + half_extents[axis];
            let o = origin[axis];
            let d = direction[axis];

            if d.abs() < 1e-6 {
                if o < min || o > max {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let (near, far) = if inv >= 0.0 {
                ((min - o) * inv, (max - o) * inv)
            } else {
                ((max - o) * inv, (min - o) * inv)
            };

            if near > t_min {
                t_min = near;
                normal = Vec3::ZERO;
                normal[axis] = -d.signum();
            }
            t_max = t_max.min(far);
            if t_min > t_max {
                return None;
            }
        }

        Some((t_min, normal))
    }
}

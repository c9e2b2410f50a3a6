use pond_physics::{
    collision::{BroadPhase, CollisionPair, NarrowPhase},
    utils::Arena,
    Collider, QuadTreeParams, RigidBody, Vec3,
};

/// Deterministic scatter of mixed shapes, with a handful of statics.
fn crowded_arena(count: u32) -> Arena<RigidBody> {
    let mut bodies = Arena::new();
    for i in 0..count {
        let x = ((i * 73) % 97) as f32 * 0.6 - 29.0;
        let z = ((i * 31) % 89) as f32 * 0.6 - 26.0;
        let position = Vec3::new(x, (i % 5) as f32 * 0.4, z);
        let collider = if i % 3 == 0 {
            Collider::cuboid(Vec3::new(0.8, 0.5, 1.1))
        } else {
            Collider::sphere(0.6 + (i % 4) as f32 * 0.3)
        };
        let body = if i % 11 == 0 {
            RigidBody::new_static()
        } else {
            RigidBody::dynamic(1.0)
        };
        bodies.insert(body.with_collider(collider).with_position(position));
    }
    bodies
}

fn splitting_params() -> QuadTreeParams {
    QuadTreeParams {
        world_half_extent: pond_physics::Vec2::splat(64.0),
        max_depth: 5,
        max_entries: 2,
    }
}

#[test]
fn candidates_cover_every_touching_pair() {
    let bodies = crowded_arena(160);
    let mut broadphase = BroadPhase::new(splitting_params());
    broadphase.rebuild_static(&bodies);
    let candidates = broadphase.update(&bodies).clone();

    let all: Vec<_> = bodies.iter().collect();
    let mut touching = 0;
    for (i, (ha, a)) in all.iter().enumerate() {
        for (hb, b) in &all[i + 1..] {
            if a.is_static() && b.is_static() {
                continue;
            }
            if NarrowPhase::intersect(a, b).is_some() {
                touching += 1;
                let pair = CollisionPair::new(*ha, *hb).expect("distinct handles");
                assert!(candidates.contains(&pair), "missing candidate {ha} / {hb}");
            }
        }
    }
    assert!(touching > 0, "scatter should produce some contacts");
}

#[test]
fn candidates_are_unique_and_never_static_only() {
    let bodies = crowded_arena(160);
    let mut broadphase = BroadPhase::new(splitting_params());
    broadphase.rebuild_static(&bodies);
    let candidates: Vec<CollisionPair> = broadphase.update(&bodies).iter().copied().collect();

    for pair in &candidates {
        assert!(pair.a() < pair.b());
        let a = bodies.get(pair.a()).expect("live body");
        let b = bodies.get(pair.b()).expect("live body");
        assert!(!(a.is_static() && b.is_static()));
    }

    let mut deduped = candidates.clone();
    deduped.dedup();
    assert_eq!(deduped.len(), candidates.len());
}

#[test]
fn repeated_updates_are_stable() {
    let bodies = crowded_arena(90);
    let mut broadphase = BroadPhase::new(splitting_params());
    broadphase.rebuild_static(&bodies);

    let first = broadphase.update(&bodies).clone();
    let second = broadphase.update(&bodies).clone();
    assert_eq!(first, second);
}

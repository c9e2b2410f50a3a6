use pond_physics::*;

fn lane() -> (PhysicsWorld, BodyHandle, BodyHandle, BodyHandle) {
    let mut world = PhysicsWorld::new();
    let goose = world.add_body(
        RigidBody::dynamic(1.0)
            .with_collider(Collider::sphere(0.5))
            .with_position(Vec3::new(0.0, 1.0, 0.0)),
    );
    let fence = world.add_body(
        RigidBody::new_static()
            .with_collider(Collider::cuboid(Vec3::new(0.2, 2.0, 4.0)))
            .with_position(Vec3::new(6.0, 1.0, 0.0)),
    );
    let apple = world.add_body(
        RigidBody::dynamic(1.0)
            .with_collider(Collider::sphere(0.25))
            .with_position(Vec3::new(3.0, 1.0, 0.0)),
    );
    (world, goose, fence, apple)
}

#[test]
fn closest_hit_skips_the_caster() {
    let (world, goose, _, apple) = lane();
    let query = RaycastQuery::new(Vec3::new(0.0, 1.0, 0.0), Vec3::X).ignoring(goose);

    let hit = world.raycast(&query).expect("apple is in the way");
    assert_eq!(hit.body, apple);
    assert!((hit.distance - 2.75).abs() < 1e-4);
    assert!((hit.point - Vec3::new(2.75, 1.0, 0.0)).length() < 1e-4);
}

#[test]
fn without_ignore_the_caster_is_hit_first() {
    let (world, goose, _, _) = lane();
    let hit = world
        .raycast(&RaycastQuery::new(Vec3::new(0.0, 1.0, 0.0), Vec3::X))
        .expect("origin inside the goose");
    assert_eq!(hit.body, goose);
    assert_eq!(hit.distance, 0.0);
}

#[test]
fn all_hits_come_back_nearest_first() {
    let (world, goose, fence, apple) = lane();
    let query = RaycastQuery::new(Vec3::new(0.0, 1.0, 0.0), Vec3::X).ignoring(goose);

    let hits = world.raycast_all(&query);
    let order: Vec<_> = hits.iter().map(|hit| hit.body).collect();
    assert_eq!(order, vec![apple, fence]);
    assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
    assert_eq!(hits[1].normal, -Vec3::X);
}

#[test]
fn rays_miss_outside_range_or_off_line() {
    let (world, goose, _, _) = lane();
    let short = RaycastQuery::new(Vec3::new(0.0, 1.0, 0.0), Vec3::X)
        .ignoring(goose)
        .with_max_distance(1.0);
    assert!(world.raycast(&short).is_none());

    let above = RaycastQuery::new(Vec3::new(0.0, 10.0, 0.0), Vec3::X);
    assert!(world.raycast_all(&above).is_empty());
}

#[test]
fn disabled_bodies_are_invisible_to_rays() {
    let (mut world, goose, fence, apple) = lane();
    if let Some(body) = world.body_mut(apple) {
        body.is_enabled = false;
    }
    let query = RaycastQuery::new(Vec3::new(0.0, 1.0, 0.0), Vec3::X).ignoring(goose);
    assert_eq!(world.raycast(&query).map(|hit| hit.body), Some(fence));
}

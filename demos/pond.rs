//! A goose drops into a pond garden: static ground and a fence, a few
//! bouncing apples, a springy haystack the goose reacts to, and a ray cast
//! from the goose's beak.

use std::sync::Arc;

use parking_lot::Mutex;
use pond_physics::*;

#[derive(Default)]
struct GooseReactions {
    honks: u32,
}

impl CollisionListener for GooseReactions {
    fn on_collision_begin(&mut self, goose: &mut RigidBody, other: &RigidBody) {
        if other.collision_type.contains(CollisionType::SPRING) {
            self.honks += 1;
            goose.apply_force(Vec3::new(0.0, 400.0, 0.0));
            println!("goose bounced off {} and honked", other.id);
        }
    }
}

fn main() {
    let mut world = PhysicsWorld::new();

    world.add_body(
        RigidBody::new_static()
            .with_collider(Collider::cuboid(Vec3::new(50.0, 0.5, 50.0)))
            .with_material(Material::wood()),
    );
    let fence = world.add_body(
        RigidBody::new_static()
            .with_collider(Collider::cuboid(Vec3::new(0.2, 1.5, 6.0)))
            .with_position(Vec3::new(8.0, 2.0, 0.0)),
    );
    world.add_body(
        RigidBody::new_static()
            .with_collider(Collider::cuboid(Vec3::new(1.5, 0.75, 1.5)))
            .with_position(Vec3::new(0.0, 1.25, 0.0))
            .with_material(Material::feathers())
            .with_collision_type(CollisionType::ALL),
    );

    let goose = world.add_body(
        RigidBody::dynamic(0.5)
            .with_collider(Collider::sphere(0.6))
            .with_position(Vec3::new(0.0, 6.0, 0.0))
            .with_collision_type(CollisionType::ALL),
    );
    for i in 0..4 {
        world.add_body(
            RigidBody::dynamic(4.0)
                .with_collider(Collider::sphere(0.2))
                .with_position(Vec3::new(3.0 + i as f32, 4.0 + i as f32, -1.0)),
        );
    }

    let reactions = Arc::new(Mutex::new(GooseReactions::default()));
    let listener: SharedCollisionListener = reactions.clone();
    if let Err(err) = world.set_collision_listener(goose, listener) {
        eprintln!("could not watch the goose: {err}");
        return;
    }

    for frame in 0..300 {
        world.step(1.0 / 60.0);
        for event in world.drain_collision_events() {
            println!("frame {frame}: {:?} {} <-> {}", event.kind, event.pair.a(), event.pair.b());
        }
    }

    if let Some(body) = world.body(goose) {
        println!(
            "goose rests at {:?} (asleep: {})",
            body.transform.position,
            body.is_sleeping()
        );
    }
    println!("honks: {}", reactions.lock().honks);

    if let Some(position) = world.body(goose).map(|body| body.transform.position) {
        let beak = RaycastQuery::new(position, Vec3::X).ignoring(goose);
        match world.raycast(&beak) {
            Some(hit) if hit.body == fence => {
                println!("goose sees the fence {:.2} m away", hit.distance)
            }
            Some(hit) => println!("goose sees {} at {:.2} m", hit.body, hit.distance),
            None => println!("goose sees open water"),
        }
    }
}

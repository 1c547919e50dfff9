// Whole-tick behaviour of the physics world

use approx::{assert_abs_diff_eq, assert_relative_eq};
use glam::Vec2;

use rusted_physics::engine::physics::resolve_box_pair;
use rusted_physics::{
    BodyBuilder, BoxCollider, ComponentStore, EntityId, EntityStore, PhysicsConfig, PhysicsWorld,
    Rect, ResolverSettings, RigidBody, Transform,
};

fn weightless_world() -> PhysicsWorld {
    PhysicsWorld::new(PhysicsConfig {
        gravity: Vec2::ZERO,
        ..PhysicsConfig::default()
    })
    .unwrap()
}

fn spawn_box(store: &mut EntityStore, pos: Vec2, size: f32, body: RigidBody) -> EntityId {
    store.spawn_with([
        Transform::at(pos).with_scale(Vec2::splat(size)).into(),
        BoxCollider::square(Vec2::splat(size)).into(),
        body.into(),
    ])
}

fn frictionless(mass: f32, vx: f32) -> RigidBody {
    BodyBuilder::new_dynamic()
        .mass(mass)
        .drag(0.0)
        .restitution(0.5)
        .velocity(vx, 0.0)
        .build()
}

#[test]
fn test_head_on_collision_after_one_tick() {
    let mut world = weightless_world();
    let mut store = EntityStore::new();
    let a = spawn_box(&mut store, Vec2::new(100.0, 100.0), 10.0, frictionless(1.0, 50.0));
    let b = spawn_box(&mut store, Vec2::new(110.0, 100.0), 10.0, frictionless(1.0, -50.0));

    // Edge to edge: the resolver sees no overlap yet
    assert!(resolve_box_pair(&mut store, a, b, &ResolverSettings::default()).is_none());

    // One tick moves both by 1 unit, giving 2 units of overlap
    world.step(0.02, &mut store);

    let events = world.events();
    assert_eq!(events.len(), 1, "the reverse pair is already separating");
    assert_eq!((events[0].a, events[0].b), (a, b));
    assert_relative_eq!(events[0].impulse, 75.0, epsilon = 1e-3);

    let va = store.rigid_body(a).unwrap().velocity;
    let vb = store.rigid_body(b).unwrap().velocity;
    assert_relative_eq!(va.x, -25.0 * 0.98, epsilon = 1e-3);
    assert_relative_eq!(vb.x, 25.0 * 0.98, epsilon = 1e-3);
    assert_abs_diff_eq!(va.x + vb.x, 0.0, epsilon = 1e-4);

    let correction: f32 = (2.0 - 0.01) / 2.0 * 0.8;
    assert_relative_eq!(store.transform(a).unwrap().position.x, 101.0 - correction, epsilon = 1e-3);
    assert_relative_eq!(store.transform(b).unwrap().position.x, 109.0 + correction, epsilon = 1e-3);
}

#[test]
fn test_unequal_masses_follow_impulse_formula() {
    let mut store = EntityStore::new();
    let a = spawn_box(&mut store, Vec2::new(100.0, 100.0), 10.0, frictionless(2.0, 50.0));
    let b = spawn_box(&mut store, Vec2::new(108.0, 100.0), 10.0, frictionless(1.0, -50.0));

    let contact = resolve_box_pair(&mut store, a, b, &ResolverSettings::default()).unwrap();

    // j = 1.5 * 100 / (0.5 + 1)
    assert_relative_eq!(contact.impulse, 100.0, epsilon = 1e-4);
    // A: 50 - 100 * 0.5 = 0 after the impulse, stays at rest
    assert_eq!(store.rigid_body(a).unwrap().velocity, Vec2::ZERO);
    // B: -50 + 100 = 50, then damped
    assert_relative_eq!(store.rigid_body(b).unwrap().velocity.x, 49.0, epsilon = 1e-4);

    // Heavier body moves half as far during correction
    let shift_a = 100.0 - store.transform(a).unwrap().position.x;
    let shift_b = store.transform(b).unwrap().position.x - 108.0;
    assert_relative_eq!(shift_b, 2.0 * shift_a, epsilon = 1e-4);
}

#[test]
fn test_static_floor_survives_many_ticks() {
    let mut world = PhysicsWorld::new(PhysicsConfig {
        world_bounds: Rect::new(0.0, 0.0, 640.0, 480.0),
        ..PhysicsConfig::default()
    })
    .unwrap();
    let mut store = EntityStore::new();

    let floor = store.spawn_with([
        Transform::at(Vec2::new(320.0, 440.0))
            .with_scale(Vec2::new(600.0, 40.0))
            .into(),
        BoxCollider::square(Vec2::new(600.0, 40.0)).into(),
        BodyBuilder::new_static().restitution(0.2).build().into(),
    ]);
    let crate_box = spawn_box(
        &mut store,
        Vec2::new(320.0, 300.0),
        32.0,
        BodyBuilder::new_dynamic().build(),
    );
    store
        .rigid_body_mut(floor)
        .unwrap()
        .add_force(Vec2::new(1_000.0, -1_000.0));

    let mut touched = false;
    for _ in 0..300 {
        world.step(1.0 / 60.0, &mut store);
        touched |= !world.events().is_empty();

        assert_eq!(store.transform(floor).unwrap().position, Vec2::new(320.0, 440.0));
        assert_eq!(store.rigid_body(floor).unwrap().velocity, Vec2::ZERO);
    }

    assert!(touched);
    let y = store.transform(crate_box).unwrap().position.y;
    assert!((398.0..=408.0).contains(&y), "crate settled at y={y}");
}

#[test]
fn test_no_spurious_resolution_on_a_grid() {
    let mut world = weightless_world();
    let mut store = EntityStore::new();

    let mut ids = Vec::new();
    for row in 0..10 {
        for col in 0..10 {
            let pos = Vec2::new(40.0 + col as f32 * 20.0, 40.0 + row as f32 * 20.0);
            ids.push((pos, spawn_box(&mut store, pos, 10.0, frictionless(1.0, 0.0))));
        }
    }

    for _ in 0..5 {
        world.step(1.0 / 60.0, &mut store);
        assert!(world.events().is_empty());
    }

    for (pos, id) in ids {
        assert_eq!(store.transform(id).unwrap().position, pos);
        assert_eq!(store.rigid_body(id).unwrap().velocity, Vec2::ZERO);
    }
    assert!(world.stats().candidate_pairs > 0);
}

#[test]
fn test_every_indexed_collider_is_found() {
    let mut world = weightless_world();
    let mut store = EntityStore::new();
    let bounds = world.world_bounds();

    let mut inside = Vec::new();
    for i in 0..300u32 {
        let x = (i * 97 % 1281) as f32;
        let y = (i * 61 % 721) as f32;
        inside.push(store.spawn_with([
            Transform::at(Vec2::new(x, y)).into(),
            BoxCollider::square(Vec2::splat(1.0)).into(),
        ]));
    }
    let outside = store.spawn_with([
        Transform::at(Vec2::new(-50.0, 10.0)).into(),
        BoxCollider::square(Vec2::splat(1.0)).into(),
    ]);

    world.step(1.0 / 60.0, &mut store);
    assert_eq!(world.stats().insert_rejections, 1);

    let mut found = Vec::new();
    world.tree().query(&bounds, &mut found);
    for id in &inside {
        assert!(found.contains(id), "{id} missing from the broad phase");
    }
    assert!(!found.contains(&outside));
}

#[test]
fn test_debug_snapshot_readable_while_stepping() {
    let mut world = PhysicsWorld::new(PhysicsConfig {
        publish_debug: true,
        ..PhysicsConfig::default()
    })
    .unwrap();
    let mut store = EntityStore::new();
    for i in 0..40 {
        spawn_box(
            &mut store,
            Vec2::new(50.0 + (i % 10) as f32 * 40.0, 50.0 + (i / 10) as f32 * 40.0),
            16.0,
            BodyBuilder::new_dynamic().build(),
        );
    }

    let handle = world.debug_handle();
    std::thread::scope(|scope| {
        let reader = scope.spawn(|| {
            let mut seen = 0;
            for _ in 0..200 {
                seen = seen.max(handle.read().nodes.len());
            }
            seen
        });

        for _ in 0..60 {
            world.step(1.0 / 60.0, &mut store);
        }
        reader.join().unwrap()
    });

    assert_eq!(handle.read(), world.tree().snapshot());
    assert!(handle.read().nodes[0].subdivided);
}

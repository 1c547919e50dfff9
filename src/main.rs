use std::time::Duration;

use anyhow::Result;
use glam::Vec2;
use log::info;

use rusted_physics::engine::physics::DebugLines;
use rusted_physics::{
    BodyBuilder, BoxCollider, ComponentStore, EntityStore, FixedStep, PhysicsConfig, PhysicsWorld,
    Rect, Transform,
};

/// Simulated frame time: a renderer running at 30 FPS
const FRAME_TIME: Duration = Duration::from_micros(33_333);
const FRAMES: u32 = 180;

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting headless physics demo...");

    let config = PhysicsConfig {
        world_bounds: Rect::new(0.0, 0.0, 640.0, 480.0),
        publish_debug: true,
        ..PhysicsConfig::default()
    };
    let mut world = PhysicsWorld::new(config)?;
    let debug_handle = world.debug_handle();

    let mut store = EntityStore::new();

    // Floor
    store.spawn_with([
        Transform::at(Vec2::new(320.0, 440.0))
            .with_scale(Vec2::new(600.0, 40.0))
            .into(),
        BoxCollider::square(Vec2::new(600.0, 40.0)).into(),
        BodyBuilder::new_static().restitution(0.2).build().into(),
    ]);

    // A column of falling crates
    let crates: Vec<_> = (0..8)
        .map(|i| {
            let size = Vec2::splat(32.0);
            store.spawn_with([
                Transform::at(Vec2::new(200.0 + 30.0 * i as f32, 40.0 + 10.0 * i as f32))
                    .with_scale(size)
                    .into(),
                BoxCollider::square(size).into(),
                BodyBuilder::new_dynamic()
                    .mass(1.0 + i as f32 * 0.25)
                    .restitution(0.5)
                    .velocity(20.0 * (i as f32 - 3.5), 0.0)
                    .build()
                    .into(),
            ])
        })
        .collect();

    let mut stepper = FixedStep::new();
    for frame in 0..FRAMES {
        for _ in 0..stepper.advance(FRAME_TIME) {
            world.step(stepper.dt(), &mut store);
        }

        if frame % 30 == 0 {
            let stats = world.stats();
            info!(
                "Frame {}: tick {}, {} bodies, {} contacts, {} quadtree nodes",
                frame,
                world.tick_count(),
                stats.bodies_integrated,
                stats.contacts,
                world.tree().node_count()
            );
        }
    }

    for id in &crates {
        if let (Some(transform), Some(body)) = (store.transform(*id), store.rigid_body(*id)) {
            info!(
                "Crate {} rests at ({:.1}, {:.1}) moving ({:.1}, {:.1})",
                id, transform.position.x, transform.position.y, body.velocity.x, body.velocity.y
            );
        }
    }

    let mut lines = DebugLines::new();
    lines.set_enabled(true);
    lines.add_quadtree(&debug_handle.read());
    lines.add_colliders(&store);
    info!(
        "Debug geometry: {} vertices ({} bytes)",
        lines.vertices().len(),
        lines.vertex_bytes().len()
    );

    Ok(())
}

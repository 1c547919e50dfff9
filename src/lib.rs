//! 2D rigid-body physics core.
//!
//! Per-tick force integration, a quadtree broad phase rebuilt every frame,
//! and axis-aligned box collision resolution with restitution, positional
//! correction and damping. Body data lives in a [`ComponentStore`]; the
//! [`PhysicsWorld`] only reads and writes it in place.
//!
//! ```no_run
//! use glam::Vec2;
//! use rusted_physics::{BodyBuilder, BoxCollider, EntityStore, PhysicsConfig, PhysicsWorld, Transform};
//!
//! let mut store = EntityStore::new();
//! store.spawn_with([
//!     Transform::at(Vec2::new(100.0, 100.0)).into(),
//!     BoxCollider::square(Vec2::splat(32.0)).into(),
//!     BodyBuilder::new_dynamic().build().into(),
//! ]);
//!
//! let mut world = PhysicsWorld::new(PhysicsConfig::default()).unwrap();
//! world.step(1.0 / 60.0, &mut store);
//! ```

pub mod core;
pub mod engine;

pub use crate::core::math::Rect;
pub use engine::ecs::{
    Component, ComponentKind, ComponentStore, EcsError, EntityId, EntityStore, Transform,
};
pub use engine::game_loop::FixedStep;
pub use engine::physics::{
    BodyBuilder, BoxCollider, ColliderShape, CollisionSystem, Contact, PhysicsConfig,
    PhysicsError, PhysicsWorld, QuadTree, ResolverSettings, RigidBody, RigidBodySystem,
};

// Physics system: force integration, quadtree broad phase, box narrow phase
//
// One tick runs strictly in this order:
//
// 1. `RigidBodySystem` integrates forces into velocities and positions.
// 2. `CollisionSystem` rebuilds the quadtree from the new positions.
// 3. Each collider queries its neighbourhood and the resolver mutates the
//    colliding pairs in place.
//
// `PhysicsWorld` wires the three together behind one `step` call.

pub mod body;
mod collider;
mod collision;
mod config;
mod debug;
mod integrator;
pub mod quadtree;
mod resolver;
mod world;

use crate::engine::ecs::{ComponentKind, EntityId};

pub use body::{BodyBuilder, RigidBody};
pub use collider::{BoxCollider, ColliderShape};
pub use collision::{CollisionSystem, QuadTreeDebugHandle, TickStats};
pub use config::{PhysicsConfig, DEFAULT_GRAVITY, DEFAULT_WORLD_HEIGHT, DEFAULT_WORLD_WIDTH};
pub use debug::{DebugLines, DebugVertex};
pub use integrator::RigidBodySystem;
pub use quadtree::{NodeId, NodeOutline, NodeView, QuadTree, QuadTreeSnapshot};
pub use resolver::{box_overlap, resolve_box_pair, Contact, ResolverSettings};
pub use world::PhysicsWorld;

/// Physics configuration and lookup errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PhysicsError {
    #[error("Invalid physics configuration: {0}")]
    InvalidConfig(String),

    #[error("Entity {entity} is missing its {kind} component")]
    MissingComponent {
        entity: EntityId,
        kind: ComponentKind,
    },
}

use glam::Vec2;
use log::{debug, error, info, warn};

use super::collision::{CollisionSystem, QuadTreeDebugHandle, TickStats};
use super::config::PhysicsConfig;
use super::integrator::RigidBodySystem;
use super::quadtree::QuadTree;
use super::resolver::Contact;
use super::PhysicsError;
use crate::core::math::Rect;
use crate::engine::ecs::{ComponentKind, ComponentStore, EntityId};

/// Physics world that runs one simulation tick at a time
///
/// Owns only configuration and per-tick scratch state; all body data stays
/// in the caller's `ComponentStore`.
pub struct PhysicsWorld {
    config: PhysicsConfig,

    /// Force and velocity integration
    integrator: RigidBodySystem,

    /// Quadtree broad phase and box resolution
    collisions: CollisionSystem,

    stats: TickStats,

    /// Completed ticks
    tick_count: u64,
}

impl PhysicsWorld {
    /// Create a physics world from a validated configuration
    pub fn new(config: PhysicsConfig) -> Result<Self, PhysicsError> {
        config.validate()?;

        let integrator = RigidBodySystem::new(config.gravity);
        let collisions = CollisionSystem::new(config.node_capacity, config.max_depth)
            .with_settings(config.resolver)
            .with_pair_dedup(config.dedup_pairs)
            .with_debug_publishing(config.publish_debug);

        info!(
            "Physics world created: bounds={:?} capacity={} max_depth={} gravity={:?}",
            config.world_bounds, config.node_capacity, config.max_depth, config.gravity
        );

        Ok(Self {
            config,
            integrator,
            collisions,
            stats: TickStats::default(),
            tick_count: 0,
        })
    }

    /// Advance the simulation by `dt` seconds
    ///
    /// Integration runs first, then the collision pass over the updated
    /// positions. Returns `false` (and leaves the store untouched) when `dt`
    /// is negative or not finite.
    pub fn step<S: ComponentStore + ?Sized>(&mut self, dt: f32, store: &mut S) -> bool {
        if !dt.is_finite() || dt < 0.0 {
            warn!("PhysicsWorld: ignoring tick with invalid dt {}", dt);
            return false;
        }

        let bounds = self.config.world_bounds;
        let integrated = self.integrator.update(dt, &bounds, store);
        self.collisions.update(&bounds, store);

        self.stats = TickStats {
            bodies_integrated: integrated,
            ..*self.collisions.stats()
        };
        self.tick_count += 1;

        debug!(
            "Tick {}: {} bodies integrated, {} contacts",
            self.tick_count, integrated, self.stats.contacts
        );
        true
    }

    /// Like `step`, but tolerates a missing component store
    ///
    /// A missing store is logged and the tick is skipped.
    pub fn step_with<S: ComponentStore + ?Sized>(&mut self, dt: f32, store: Option<&mut S>) -> bool {
        match store {
            Some(store) => self.step(dt, store),
            None => {
                error!("PhysicsWorld: component store is missing, skipping tick");
                false
            }
        }
    }

    /// Queue a force on a body for the next tick
    pub fn apply_force<S: ComponentStore + ?Sized>(
        &self,
        store: &mut S,
        entity: EntityId,
        force: Vec2,
    ) -> Result<(), PhysicsError> {
        let body = store
            .rigid_body_mut(entity)
            .ok_or(PhysicsError::MissingComponent {
                entity,
                kind: ComponentKind::RigidBody,
            })?;
        body.add_force(force);
        Ok(())
    }

    /// Change a body's velocity immediately by `impulse * inv_mass`
    pub fn apply_impulse<S: ComponentStore + ?Sized>(
        &self,
        store: &mut S,
        entity: EntityId,
        impulse: Vec2,
    ) -> Result<(), PhysicsError> {
        let body = store
            .rigid_body_mut(entity)
            .ok_or(PhysicsError::MissingComponent {
                entity,
                kind: ComponentKind::RigidBody,
            })?;
        body.apply_impulse(impulse);
        Ok(())
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn gravity(&self) -> Vec2 {
        self.config.gravity
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.config.gravity = gravity;
        self.integrator.set_gravity(gravity);
    }

    pub fn world_bounds(&self) -> Rect {
        self.config.world_bounds
    }

    /// Resize the world, e.g. after the window changed size
    pub fn set_world_bounds(&mut self, bounds: Rect) {
        if bounds.is_degenerate() {
            warn!("World bounds {:?} have no area; no collider will be indexed", bounds);
        }
        self.config.world_bounds = bounds;
    }

    /// Contacts resolved during the last tick
    pub fn events(&self) -> &[Contact] {
        self.collisions.events()
    }

    pub fn stats(&self) -> &TickStats {
        &self.stats
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// The quadtree built during the last tick
    pub fn tree(&self) -> &QuadTree {
        self.collisions.tree()
    }

    /// Handle for renderers that want the quadtree outline
    ///
    /// Snapshots are only published when `publish_debug` is set.
    pub fn debug_handle(&self) -> QuadTreeDebugHandle {
        self.collisions.debug_handle()
    }
}

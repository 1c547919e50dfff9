// Force accumulation and explicit Euler integration

use glam::Vec2;
use log::trace;

use crate::core::math::{clamp, Rect};
use crate::engine::ecs::{ComponentKind, ComponentStore, Transform};

use super::RigidBody;

/// Integrates every non-static rigid body once per tick
#[derive(Debug, Clone)]
pub struct RigidBodySystem {
    gravity: Vec2,
}

impl RigidBodySystem {
    pub fn new(gravity: Vec2) -> Self {
        Self { gravity }
    }

    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    /// Advance all rigid bodies by `dt` seconds
    ///
    /// Bodies with a Transform are clamped into `world_bounds` (inset by half
    /// their visual size) before this tick's displacement is applied, so a
    /// fast body may end a tick up to one step outside the bounds. Bodies
    /// without a Transform still have their velocity integrated.
    ///
    /// Returns the number of bodies integrated.
    pub fn update<S: ComponentStore + ?Sized>(
        &self,
        dt: f32,
        world_bounds: &Rect,
        store: &mut S,
    ) -> usize {
        let mut integrated = 0;

        for entity in store.entities_with(&[ComponentKind::RigidBody]) {
            let Some(mut body) = store.rigid_body(entity).copied() else {
                continue;
            };
            if body.is_static() {
                continue;
            }

            self.integrate_velocity(&mut body, dt);

            if let Some(transform) = store.transform_mut(entity) {
                clamp_to_bounds(transform, &mut body, world_bounds);
                transform.position += body.velocity * dt;
            } else {
                trace!("Entity {} has no Transform, velocity only", entity);
            }

            body.force = Vec2::ZERO;
            if let Some(slot) = store.rigid_body_mut(entity) {
                *slot = body;
            }
            integrated += 1;
        }

        integrated
    }

    fn integrate_velocity(&self, body: &mut RigidBody, dt: f32) {
        if !body.is_kinematic {
            body.force += self.gravity * body.mass();
        }

        // Linear drag: F = -drag * v
        body.force += body.velocity * -body.drag;

        body.acceleration = if body.mass() != 0.0 {
            body.force / body.mass()
        } else {
            Vec2::ZERO
        };
        body.refresh_inv_mass();

        body.velocity += body.acceleration * dt;
    }
}

/// Keep the body inside `bounds`, killing velocity on any clamped axis
fn clamp_to_bounds(transform: &mut Transform, body: &mut RigidBody, bounds: &Rect) {
    let margin = transform.half_extents();
    let min = bounds.min() + margin;
    let max = bounds.max() - margin;
    let pos = transform.position;

    let clamped = Vec2::new(clamp(pos.x, min.x, max.x), clamp(pos.y, min.y, max.y));
    if clamped.x != pos.x {
        body.velocity.x = 0.0;
    }
    if clamped.y != pos.y {
        body.velocity.y = 0.0;
    }
    transform.position = clamped;
}

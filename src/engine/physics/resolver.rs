// Narrow phase: box-to-box overlap and impulse resolution

use glam::Vec2;
use log::trace;

use super::collider::ColliderShape;
use super::RigidBody;
use crate::core::math::sign_or_positive;
use crate::engine::ecs::{ComponentStore, EntityId};

/// Tunable constants for contact resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolverSettings {
    /// Penetration depth tolerated before positional correction kicks in
    pub slop: f32,

    /// Speeds below this are snapped to zero after damping
    pub velocity_threshold: f32,

    /// Uniform velocity multiplier applied to both bodies of a contact
    pub damping_factor: f32,

    /// Fraction of the remaining penetration removed per resolution
    pub percent_correction: f32,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            slop: 0.01,
            velocity_threshold: 0.1,
            damping_factor: 0.98,
            percent_correction: 0.8,
        }
    }
}

/// A contact that was resolved
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub a: EntityId,
    pub b: EntityId,

    /// Unit axis pointing from `a` towards `b`
    pub normal: Vec2,

    pub penetration: f32,

    /// Impulse magnitude applied along `normal`
    pub impulse: f32,
}

/// Overlap of two centred boxes along the axis of least penetration
///
/// Returns `(normal, penetration)` with the normal pointing from A to B, or
/// `None` if the boxes only touch or are apart.
pub fn box_overlap(pos_a: Vec2, half_a: Vec2, pos_b: Vec2, half_b: Vec2) -> Option<(Vec2, f32)> {
    let delta = pos_b - pos_a;
    let overlap_x = (half_a.x + half_b.x) - delta.x.abs();
    let overlap_y = (half_a.y + half_b.y) - delta.y.abs();

    if overlap_x <= 0.0 || overlap_y <= 0.0 {
        return None;
    }

    if overlap_x < overlap_y {
        Some((Vec2::new(sign_or_positive(delta.x), 0.0), overlap_x))
    } else {
        Some((Vec2::new(0.0, sign_or_positive(delta.y)), overlap_y))
    }
}

/// Resolve the ordered pair `(a, b)` in place
///
/// Pairs missing a Transform, BoxCollider or RigidBody on either side are
/// skipped, as are pairs where both bodies are immovable. Overlapping pairs
/// that are already separating keep their velocities and positions.
pub fn resolve_box_pair<S: ComponentStore + ?Sized>(
    store: &mut S,
    a: EntityId,
    b: EntityId,
    settings: &ResolverSettings,
) -> Option<Contact> {
    let (transform_a, collider_a, body_a) = (
        *store.transform(a)?,
        *store.box_collider(a)?,
        *store.rigid_body(a)?,
    );
    let (transform_b, collider_b, body_b) = (
        *store.transform(b)?,
        *store.box_collider(b)?,
        *store.rigid_body(b)?,
    );

    match (collider_a.shape, collider_b.shape) {
        (ColliderShape::Square, ColliderShape::Square) => {}
    }

    let (normal, penetration) = box_overlap(
        transform_a.position,
        collider_a.half_extents(),
        transform_b.position,
        collider_b.half_extents(),
    )?;

    let rel_vel = body_b.velocity - body_a.velocity;
    let vel_along_normal = rel_vel.dot(normal);
    if vel_along_normal > 0.0 {
        return None;
    }

    let inv_a = body_a.inv_mass();
    let inv_b = body_b.inv_mass();
    let inv_sum = inv_a + inv_b;
    if inv_sum == 0.0 {
        return None;
    }

    let restitution = body_a.restitution.min(body_b.restitution);
    let impulse_scalar = -(1.0 + restitution) * vel_along_normal / inv_sum;
    let impulse = normal * impulse_scalar;

    let correction_mag =
        (penetration - settings.slop).max(0.0) / inv_sum * settings.percent_correction;
    let correction = normal * correction_mag;

    if let Some(body) = store.rigid_body_mut(a) {
        body.velocity -= impulse * inv_a;
        settle(body, settings);
    }
    if let Some(body) = store.rigid_body_mut(b) {
        body.velocity += impulse * inv_b;
        settle(body, settings);
    }

    if inv_a != 0.0 {
        if let Some(transform) = store.transform_mut(a) {
            transform.position -= correction * inv_a;
        }
    }
    if inv_b != 0.0 {
        if let Some(transform) = store.transform_mut(b) {
            transform.position += correction * inv_b;
        }
    }

    trace!(
        "Resolved {} -> {}: normal={:?} depth={:.3} j={:.3}",
        a,
        b,
        normal,
        penetration,
        impulse_scalar
    );

    Some(Contact {
        a,
        b,
        normal,
        penetration,
        impulse: impulse_scalar,
    })
}

/// Damp, then snap slow bodies to rest
fn settle(body: &mut RigidBody, settings: &ResolverSettings) {
    if body.is_static() {
        return;
    }
    body.velocity *= settings.damping_factor;
    if body.velocity.length() < settings.velocity_threshold {
        body.velocity = Vec2::ZERO;
    }
}

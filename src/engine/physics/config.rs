use glam::Vec2;
use log::warn;

use super::{PhysicsError, ResolverSettings};
use crate::core::math::Rect;

/// Default world size, matching a 1280x720 window
pub const DEFAULT_WORLD_WIDTH: f32 = 1280.0;
pub const DEFAULT_WORLD_HEIGHT: f32 = 720.0;

/// Gravity in pixels per second squared, y pointing down
pub const DEFAULT_GRAVITY: Vec2 = Vec2::new(0.0, 980.0);

/// Physics world configuration
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsConfig {
    /// Region bodies are clamped into and the quadtree root covers
    pub world_bounds: Rect,

    /// Entities a quadtree node holds before subdividing
    pub node_capacity: usize,

    /// Deepest level a quadtree node may subdivide to
    pub max_depth: u32,

    pub gravity: Vec2,

    pub resolver: ResolverSettings,

    /// Resolve each unordered colliding pair at most once per tick
    ///
    /// Off by default: both `(a, b)` and `(b, a)` are resolved, which
    /// compounds damping and correction for that pair.
    pub dedup_pairs: bool,

    /// Publish a quadtree snapshot for debug renderers after every tick
    pub publish_debug: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            world_bounds: Rect::new(0.0, 0.0, DEFAULT_WORLD_WIDTH, DEFAULT_WORLD_HEIGHT),
            node_capacity: 4,
            max_depth: 5,
            gravity: DEFAULT_GRAVITY,
            resolver: ResolverSettings::default(),
            dedup_pairs: false,
            publish_debug: false,
        }
    }
}

impl PhysicsConfig {
    /// Check the configuration for values the simulation cannot work with
    ///
    /// A zero-sized world boundary is allowed; every insertion into the
    /// quadtree is then rejected and logged.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if self.node_capacity == 0 {
            return Err(PhysicsError::InvalidConfig(
                "node_capacity must be at least 1".to_string(),
            ));
        }

        if !self.gravity.is_finite() {
            return Err(PhysicsError::InvalidConfig(format!(
                "gravity must be finite, got {:?}",
                self.gravity
            )));
        }

        let bounds = &self.world_bounds;
        if !bounds.position.is_finite()
            || !bounds.width.is_finite()
            || !bounds.height.is_finite()
            || bounds.width < 0.0
            || bounds.height < 0.0
        {
            return Err(PhysicsError::InvalidConfig(format!(
                "world_bounds must be finite with non-negative size, got {:?}",
                bounds
            )));
        }
        if bounds.is_degenerate() {
            warn!("World bounds {:?} have no area; no collider will be indexed", bounds);
        }

        let r = &self.resolver;
        let non_negative = [
            ("slop", r.slop),
            ("velocity_threshold", r.velocity_threshold),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(PhysicsError::InvalidConfig(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }

        let unit = [
            ("damping_factor", r.damping_factor),
            ("percent_correction", r.percent_correction),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(PhysicsError::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }

        Ok(())
    }
}

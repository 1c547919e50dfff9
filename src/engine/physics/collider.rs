use glam::Vec2;

/// Collider shape tag
///
/// Only axis-aligned boxes are resolved today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColliderShape {
    Square,
}

/// Axis-aligned box collider centred on the entity position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxCollider {
    pub shape: ColliderShape,

    /// Full width and height
    pub size: Vec2,
}

impl BoxCollider {
    pub fn square(size: Vec2) -> Self {
        Self {
            shape: ColliderShape::Square,
            size,
        }
    }

    pub fn half_extents(&self) -> Vec2 {
        self.size * 0.5
    }
}

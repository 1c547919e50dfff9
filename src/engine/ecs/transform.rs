use glam::Vec2;

/// Position, rotation and visual size of an entity
///
/// `rotation` is carried for other systems; the physics core is
/// axis-aligned and ignores it. `scale` is the visual size used by the
/// world-bound clamp, independent of any collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
}

impl Transform {
    pub fn new(position: Vec2, rotation: f32, scale: Vec2) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Unrotated transform with zero visual size
    pub fn at(position: Vec2) -> Self {
        Self::new(position, 0.0, Vec2::ZERO)
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    /// Half of the visual size on each axis
    pub fn half_extents(&self) -> Vec2 {
        self.scale * 0.5
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(Vec2::ZERO, 0.0, Vec2::ONE)
    }
}

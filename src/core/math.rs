// Math utilities and helper functions

use glam::Vec2;

/// Clamp a value between min and max
///
/// Unlike `f32::clamp` this does not panic when `min > max`; `min` wins.
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Sign of `x`, where zero counts as positive
pub fn sign_or_positive(x: f32) -> f32 {
    if x >= 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// Axis-aligned rectangle anchored at its top-left corner
///
/// Used both as quadtree node boundary and as broad-phase query range.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            width,
            height,
        }
    }

    /// Build a rectangle spanning `center - half .. center + half`
    pub fn from_center_half_extents(center: Vec2, half: Vec2) -> Self {
        Self {
            position: center - half,
            width: half.x * 2.0,
            height: half.y * 2.0,
        }
    }

    pub fn min(&self) -> Vec2 {
        self.position
    }

    pub fn max(&self) -> Vec2 {
        self.position + Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.position + Vec2::new(self.width, self.height) * 0.5
    }

    /// True when the rectangle has no area to partition
    pub fn is_degenerate(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }

    /// Inclusive point containment on all four edges
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.position.x
            && point.x <= self.position.x + self.width
            && point.y >= self.position.y
            && point.y <= self.position.y + self.height
    }

    /// Separating-axis overlap test; touching edges count as intersecting
    pub fn intersects(&self, other: &Rect) -> bool {
        !(other.position.x > self.position.x + self.width
            || other.position.x + other.width < self.position.x
            || other.position.y > self.position.y + self.height
            || other.position.y + other.height < self.position.y)
    }

    /// Split into four quadrants, ordered NE, NW, SE, SW
    ///
    /// "North" is the low-y half, matching screen coordinates. The east and
    /// south quadrants are sized from the parent's far edges, so they end
    /// exactly where the parent ends even when `x + width / 2` rounds.
    pub fn quadrants(&self) -> [Rect; 4] {
        let Vec2 { x, y } = self.position;
        let far = self.max();
        let mid_x = x + self.width / 2.0;
        let mid_y = y + self.height / 2.0;

        let west_w = mid_x - x;
        let east_w = far.x - mid_x;
        let north_h = mid_y - y;
        let south_h = far.y - mid_y;

        [
            Rect::new(mid_x, y, east_w, north_h),
            Rect::new(x, y, west_w, north_h),
            Rect::new(mid_x, mid_y, east_w, south_h),
            Rect::new(x, mid_y, west_w, south_h),
        ]
    }
}

//! Axis-aligned rectangle geometry for enemy boxes and playfield bounds
//!
//! A rectangle is defined by its top-left corner and its size, in screen
//! coordinates (y grows downward).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Square of side `size` centered on `center`
    pub fn centered(center: Vec2, size: f32) -> Self {
        let half = size / 2.0;
        Self::new(center.x - half, center.y - half, size, size)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Shrink by `margin` on every side (negative grows)
    pub const fn inset(&self, margin: f32) -> Self {
        Self::new(
            self.x + margin,
            self.y + margin,
            self.width - 2.0 * margin,
            self.height - 2.0 * margin,
        )
    }

    /// Point containment (left/top edges inclusive, right/bottom exclusive)
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Overlap test between two rectangles
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Closest point inside (or on the edge of) the rectangle
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.clamp(self.x, self.right()),
            point.y.clamp(self.y, self.bottom()),
        )
    }
}

/// Circle vs circle overlap (touching counts)
#[inline]
pub fn circles_overlap(c1: Vec2, r1: f32, c2: Vec2, r2: f32) -> bool {
    let reach = r1 + r2;
    c1.distance_squared(c2) <= reach * reach
}

/// Circle vs axis-aligned rectangle overlap (touching counts)
#[inline]
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let closest = rect.closest_point(center);
    center.distance_squared(closest) <= radius * radius
}

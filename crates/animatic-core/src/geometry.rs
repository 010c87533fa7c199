//! Geometric primitives for frame composition.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in surface pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from center and size.
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        Self {
            x: center.x - size.x * 0.5,
            y: center.y - size.y * 0.5,
            width: size.x,
            height: size.y,
        }
    }

    /// Center point.
    #[inline]
    pub fn center(self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Size as a vector.
    #[inline]
    pub fn size(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub fn contains(self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }

    /// Compute intersection with another rectangle.
    pub fn intersection(self, other: Self) -> Option<Self> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = (self.x + self.width).min(other.x + other.width);
        let y2 = (self.y + self.height).min(other.y + other.height);

        if x1 < x2 && y1 < y2 {
            Some(Self::new(x1, y1, x2 - x1, y2 - y1))
        } else {
            None
        }
    }

    /// Largest rectangle of aspect `content_w : content_h` centered inside
    /// `self`, preserving aspect ratio. This is the letterbox/pillarbox
    /// fit every panel image is drawn into.
    pub fn fit_aspect(self, content_w: f32, content_h: f32) -> Self {
        if content_w <= 0.0 || content_h <= 0.0 || self.width <= 0.0 || self.height <= 0.0 {
            return Self::new(self.center().x, self.center().y, 0.0, 0.0);
        }
        let scale = (self.width / content_w).min(self.height / content_h);
        let w = content_w * scale;
        let h = content_h * scale;
        Self::from_center_size(self.center(), Vec2::new(w, h))
    }
}

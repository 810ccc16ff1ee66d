//! Physical-body primitive shared by every simulated entity
//!
//! A `Body` is a positioned axis-aligned rectangle with a velocity. Position
//! is the top-left corner in screen space (+y points down). All movement in
//! the simulation goes through `Body::integrate` - subtypes layer their own
//! logic around it but never replace it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Strict overlap on both axes; rectangles that only touch at an edge
    /// or corner do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// A movable rectangle: position, fixed size, velocity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    /// Fixed after construction; both components strictly positive
    size: Vec2,
    pub vel: Vec2,
}

impl Body {
    /// Panics if either size component is not strictly positive; a
    /// non-positive size is a programmer error, not a runtime condition.
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        assert!(
            size.x > 0.0 && size.y > 0.0,
            "body size must be positive, got {size}"
        );
        Self {
            pos,
            size,
            vel: Vec2::ZERO,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.y
    }

    /// Advance position by `vel * dt`. The single physics primitive.
    #[inline]
    pub fn integrate(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    /// Current bounding rectangle
    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb {
            min: self.pos,
            max: self.pos + self.size,
        }
    }

    /// Strict rectangle intersection with another body
    #[inline]
    pub fn intersects(&self, other: &Body) -> bool {
        self.aabb().overlaps(&other.aabb())
    }
}

//! Looping ground strips
//!
//! A fixed number of strips are pre-placed one strip-width apart and scroll
//! left with the pipes. A strip whose trailing edge leaves the world wraps to
//! the back of the line, so the terrain tiles forever without allocation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Aabb, Body};
use crate::consts::*;

/// One tile of scrolling terrain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundStrip {
    body: Body,
}

impl GroundStrip {
    pub fn new(x: f32, velocity_x: f32) -> Self {
        let mut body = Body::new(Vec2::new(x, GROUND_Y), Vec2::new(GROUND_W, GROUND_H));
        body.vel = Vec2::new(velocity_x, 0.0);
        Self { body }
    }

    #[inline]
    pub fn body(&self) -> &Body {
        &self.body
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.body.pos.x
    }

    /// Top edge of the terrain; birds die here
    #[inline]
    pub fn y(&self) -> f32 {
        self.body.pos.y
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        self.body.aabb()
    }

    /// Integrate, then wrap once the trailing edge passes the left boundary.
    /// The wrap distance is the full ring (`GROUND_SEGMENTS * GROUND_W`), so
    /// strip spacing is preserved forever.
    pub fn update(&mut self, dt: f32) {
        self.body.integrate(dt);

        if self.body.pos.x + self.body.width() <= 0.0 {
            self.body.pos.x += GROUND_SEGMENTS as f32 * GROUND_W;
        }
    }

    pub fn collides(&self, other: &Body) -> bool {
        self.body.intersects(other)
    }
}

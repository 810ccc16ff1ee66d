//! Pipes and the gap-locked pipe pair
//!
//! A `PipePair` is the single collidable facade over its two halves. The two
//! pipes share x and velocity; their vertical offsets are locked so that
//! `bottom.y == top.y + PIPE_H + PIPE_GAP` holds across every mutation.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::Body;
use crate::consts::*;

/// Which way a pipe's mouth faces (down = hangs from above)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipeOrientation {
    Up,
    Down,
}

/// One half of a pipe pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipe {
    body: Body,
    orientation: PipeOrientation,
}

impl Pipe {
    fn new(x: f32, y: f32, orientation: PipeOrientation) -> Self {
        let mut body = Body::new(Vec2::new(x, y), Vec2::new(PIPE_W, PIPE_H));
        body.vel = Vec2::new(PIPE_VELOCITY_X, 0.0);
        Self { body, orientation }
    }

    #[inline]
    pub fn body(&self) -> &Body {
        &self.body
    }

    #[inline]
    pub fn orientation(&self) -> PipeOrientation {
        self.orientation
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.body.pos.y
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.body.height()
    }
}

/// Two vertically offset pipes scrolling as one obstacle
///
/// Delegation is explicit: everything callers may touch is enumerated here,
/// and the setters keep both halves in lockstep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipePair {
    top: Pipe,
    bottom: Pipe,
}

impl PipePair {
    /// Spawn at `x` with the top pipe's offset drawn uniformly from
    /// `heights`. The RNG is caller-supplied so spawns replay under a seed.
    ///
    /// Panics on an empty height set; config validation rejects that before
    /// any spawn happens.
    pub fn spawn<R: Rng>(x: f32, heights: &[f32], rng: &mut R) -> Self {
        assert!(!heights.is_empty(), "pipe height set is empty");
        let start_y = -heights[rng.random_range(0..heights.len())];

        Self {
            top: Pipe::new(x, start_y, PipeOrientation::Down),
            bottom: Pipe::new(x, start_y + PIPE_H + PIPE_GAP, PipeOrientation::Up),
        }
    }

    #[inline]
    pub fn top(&self) -> &Pipe {
        &self.top
    }

    #[inline]
    pub fn bottom(&self) -> &Pipe {
        &self.bottom
    }

    /// Shared horizontal position
    #[inline]
    pub fn x(&self) -> f32 {
        self.top.body.pos.x
    }

    /// Top pipe's vertical position
    #[inline]
    pub fn y(&self) -> f32 {
        self.top.body.pos.y
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.top.body.width()
    }

    /// Shared velocity
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.top.body.vel
    }

    /// Move both halves to the same x
    pub fn set_x(&mut self, x: f32) {
        self.top.body.pos.x = x;
        self.bottom.body.pos.x = x;
    }

    /// Move the top pipe to `y`; the bottom pipe follows at the locked gap
    pub fn set_y(&mut self, y: f32) {
        self.top.body.pos.y = y;
        self.bottom.body.pos.y = y + PIPE_H + PIPE_GAP;
    }

    /// Set the shared velocity on both halves
    pub fn set_velocity(&mut self, vel: Vec2) {
        self.top.body.vel = vel;
        self.bottom.body.vel = vel;
    }

    /// Integrate both halves by the shared velocity
    pub fn update(&mut self, dt: f32) {
        self.top.body.integrate(dt);
        self.bottom.body.integrate(dt);
    }

    /// True iff either half strictly overlaps `other`
    pub fn collides(&self, other: &Body) -> bool {
        self.top.body.intersects(other) || self.bottom.body.intersects(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn gap_of(pair: &PipePair) -> f32 {
        pair.bottom.y() - pair.top.y()
    }

    #[test]
    fn test_spawn_draws_height_from_set() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..50 {
            let pair = PipePair::spawn(500.0, &PIPE_HEIGHTS, &mut rng);
            assert!(PIPE_HEIGHTS.contains(&-pair.y()));
            assert_eq!(gap_of(&pair), PIPE_H + PIPE_GAP);
        }
    }

    #[test]
    fn test_spawn_is_reproducible_under_a_seed() {
        let mut a = Pcg32::seed_from_u64(99);
        let mut b = Pcg32::seed_from_u64(99);
        for _ in 0..20 {
            let pa = PipePair::spawn(500.0, &PIPE_HEIGHTS, &mut a);
            let pb = PipePair::spawn(500.0, &PIPE_HEIGHTS, &mut b);
            assert_eq!(pa.y(), pb.y());
        }
    }

    #[test]
    fn test_setters_propagate_to_both_halves() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut pair = PipePair::spawn(500.0, &PIPE_HEIGHTS, &mut rng);

        pair.set_x(123.0);
        assert_eq!(pair.top.body().pos.x, 123.0);
        assert_eq!(pair.bottom.body().pos.x, 123.0);

        pair.set_y(-40.0);
        assert_eq!(pair.top.y(), -40.0);
        assert_eq!(pair.bottom.y(), -40.0 + PIPE_H + PIPE_GAP);

        pair.set_velocity(Vec2::new(-55.0, 0.0));
        assert_eq!(pair.top.body().vel, pair.bottom.body().vel);
    }

    #[test]
    fn test_collides_against_either_half() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut pair = PipePair::spawn(100.0, &PIPE_HEIGHTS, &mut rng);
        pair.set_y(-100.0);

        // Inside the top pipe
        let in_top = Body::new(Vec2::new(110.0, 50.0), Vec2::new(10.0, 10.0));
        // Inside the bottom pipe (top.y = -100, bottom.y = 310)
        let in_bottom = Body::new(Vec2::new(110.0, 320.0), Vec2::new(10.0, 10.0));
        // Inside the gap
        let in_gap = Body::new(Vec2::new(110.0, 250.0), Vec2::new(10.0, 10.0));

        assert!(pair.collides(&in_top));
        assert!(pair.collides(&in_bottom));
        assert!(!pair.collides(&in_gap));
    }

    #[test]
    fn test_edge_touch_on_gap_boundary_is_no_collision() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut pair = PipePair::spawn(100.0, &PIPE_HEIGHTS, &mut rng);
        pair.set_y(-100.0);

        // Top edge exactly on the top pipe's lower lip (y = 220): zero-area
        // contact, so no kill
        let touching = Body::new(Vec2::new(110.0, 220.0), Vec2::new(10.0, 10.0));
        assert!(!pair.collides(&touching));
    }

    proptest! {
        /// The gap invariant survives any interleaving of writes and updates.
        #[test]
        fn prop_gap_invariant_holds(
            seed in any::<u64>(),
            ops in prop::collection::vec((0u8..3, -400.0f32..400.0, 0.0f32..0.2), 0..64),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut pair = PipePair::spawn(500.0, &PIPE_HEIGHTS, &mut rng);
            prop_assert_eq!(gap_of(&pair), PIPE_H + PIPE_GAP);

            for (op, value, dt) in ops {
                match op {
                    0 => pair.set_x(value),
                    1 => pair.set_y(value),
                    _ => pair.update(dt),
                }
                // f32 rounding on arbitrary y writes, hence the tolerance
                prop_assert!((gap_of(&pair) - (PIPE_H + PIPE_GAP)).abs() < 1e-3);
            }
        }
    }
}

//! Bird agent: gravity, flapping, and the one-way Alive -> Dead state
//!
//! Once a bird is dead it is inert: every externally callable mutator opens
//! with the same liveness guard, so position, velocity, cooldown and rotation
//! are all frozen at the moment of death.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Aabb, Body};
use crate::consts::*;

/// A controllable falling body driven by flap impulses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bird {
    body: Body,
    /// Unique within one world; assigned monotonically at spawn
    id: u32,
    alive: bool,
    /// Seconds since the last flap
    flap_cooldown: f32,
    /// Degrees, derived from vertical velocity; visual only
    rotation: f32,
    /// Wing-sprite animation phase; visual only
    flap_phase: f32,
    /// Downward acceleration; fixed per episode
    gravity: f32,
}

impl Bird {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self::with_params(
            id,
            pos,
            Vec2::new(BIRD_W, BIRD_H),
            Vec2::new(0.0, FLAP_VELOCITY),
            GRAVITY,
        )
    }

    /// Construct with explicit size, spawn velocity and gravity; the World
    /// wires these through from its validated config.
    pub fn with_params(id: u32, pos: Vec2, size: Vec2, vel: Vec2, gravity: f32) -> Self {
        let mut body = Body::new(pos, size);
        // Birds hatch mid-flap
        body.vel = vel;
        Self {
            body,
            id,
            alive: true,
            flap_cooldown: 0.0,
            rotation: 0.0,
            flap_phase: 0.0,
            gravity,
        }
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    #[inline]
    pub fn body(&self) -> &Body {
        &self.body
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        self.body.aabb()
    }

    /// Current rotation in degrees, saturated to [-90, +35]
    #[inline]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Animation phase for the rendering collaborator
    #[inline]
    pub fn flap_phase(&self) -> f32 {
        self.flap_phase
    }

    /// Advance one tick: gravity (clamped at terminal fall speed), then the
    /// shared integration primitive, then bookkeeping. No-op when dead.
    pub fn update(&mut self, dt: f32) {
        if !self.alive {
            return;
        }

        // Clamped accumulation: never past terminal, never a naive sum
        self.body.vel.y = (self.body.vel.y + self.gravity * dt).min(TERMINAL_VELOCITY);

        self.body.integrate(dt);

        self.flap_cooldown += dt;
        self.rotation = (-self.body.vel.y / 3.0).clamp(ROTATION_MIN, ROTATION_MAX);
        self.flap_phase += 5.0 * dt;
    }

    /// Kick the bird upward. Silently ignored while the cooldown window is
    /// still open, and always ignored when dead.
    pub fn flap(&mut self) {
        if !self.alive {
            return;
        }

        if self.flap_cooldown < FLAP_COOLDOWN {
            return;
        }

        self.body.vel.y = FLAP_VELOCITY;
        self.flap_cooldown = 0.0;
    }

    /// Alive -> Dead, unconditional and idempotent.
    pub fn kill(&mut self) {
        self.alive = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bird() -> Bird {
        Bird::new(0, Vec2::new(232.5, 250.0))
    }

    #[test]
    fn test_update_applies_gravity_then_integrates() {
        let mut b = bird();
        let y0 = b.body().pos.y;
        b.update(0.1);
        // Velocity picks up gravity before the position step
        let expected_vy = FLAP_VELOCITY + GRAVITY * 0.1;
        assert!((b.body().vel.y - expected_vy).abs() < 1e-4);
        assert!((b.body().pos.y - (y0 + expected_vy * 0.1)).abs() < 1e-4);
    }

    #[test]
    fn test_gravity_clamps_at_terminal_velocity() {
        let mut b = bird();
        // Fall long enough to exceed terminal many times over
        for _ in 0..1_000 {
            b.update(0.1);
        }
        assert_eq!(b.body().vel.y, TERMINAL_VELOCITY);
    }

    #[test]
    fn test_rotation_saturates_at_both_bounds() {
        let mut b = bird();
        b.update(1.0 / 60.0);
        // Rising right after spawn: nose up, capped at +35
        assert_eq!(b.rotation(), ROTATION_MAX);

        for _ in 0..600 {
            b.update(0.1);
        }
        // Plummeting: nose down, capped at -90
        assert_eq!(b.rotation(), ROTATION_MIN);
    }

    #[test]
    fn test_flap_within_cooldown_is_ignored() {
        let mut b = bird();
        b.update(FLAP_COOLDOWN + 0.01);
        b.flap();
        assert_eq!(b.body().vel.y, FLAP_VELOCITY);

        // Fall a little, then try to flap again inside the window
        b.update(0.1);
        let vel_before = b.body().vel.y;
        b.flap();
        assert_eq!(b.body().vel.y, vel_before);
    }

    #[test]
    fn test_flap_after_cooldown_resets_velocity_and_timer() {
        let mut b = bird();
        b.update(FLAP_COOLDOWN);
        b.flap();
        assert_eq!(b.body().vel.y, FLAP_VELOCITY);

        // Cooldown restarted: an immediate second flap is a no-op
        b.update(0.05);
        b.flap();
        assert!((b.body().vel.y - (FLAP_VELOCITY + GRAVITY * 0.05)).abs() < 1e-4);
    }

    #[test]
    fn test_dead_bird_is_inert() {
        let mut b = bird();
        b.update(0.3);
        b.kill();
        assert!(!b.is_alive());

        let frozen = b.clone();
        b.update(1.0);
        b.flap();
        b.kill();
        assert_eq!(b.body().pos, frozen.body().pos);
        assert_eq!(b.body().vel, frozen.body().vel);
        assert_eq!(b.rotation(), frozen.rotation());
        assert_eq!(b.flap_phase(), frozen.flap_phase());
    }

    proptest! {
        /// For any partition of a total fall time into steps, the final
        /// vertical velocity is min(v0 + g*T, terminal), not a naive sum.
        #[test]
        fn prop_clamped_accumulation(steps in prop::collection::vec(0.0f32..0.25, 1..200)) {
            let mut b = bird();
            let mut total = 0.0f32;
            for dt in &steps {
                b.update(*dt);
                total += dt;
            }
            let expected = (FLAP_VELOCITY + GRAVITY * total).min(TERMINAL_VELOCITY);
            // Loose bound: f32 accumulation differs from the closed form,
            // while a naive unclamped sum would be off by thousands
            prop_assert!((b.body().vel.y - expected).abs() < 0.5);
        }
    }
}

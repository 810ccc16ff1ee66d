//! Decision policies and the observation vector that feeds them
//!
//! A policy sees a fixed six-number snapshot of the world from one bird's
//! point of view and answers with a single scalar; the harness flaps the
//! bird when that scalar clears the activation threshold. Policies never
//! touch world state themselves.

use serde::{Deserialize, Serialize};

use crate::sim::{Bird, PipePair};

/// Number of inputs every policy receives
pub const OBSERVATION_LEN: usize = 6;

/// Fixed-shape input vector for one bird on one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Horizontal distance to the nearest not-yet-passed pipe pair
    pub pipe_dx: f32,
    /// Vertical distance to the top pipe's lower lip (gap ceiling)
    pub gap_top_dy: f32,
    /// Vertical distance to the bottom pipe's upper lip (gap floor)
    pub gap_bottom_dy: f32,
    /// Vertical distance to the ground
    pub ground_dy: f32,
    /// The bird's vertical velocity
    pub bird_vy: f32,
    /// The pair's horizontal velocity
    pub pipe_vx: f32,
}

impl Observation {
    /// Snapshot one bird against its nearest pair
    pub fn capture(bird: &Bird, pair: &PipePair, ground_y: f32) -> Self {
        let bird_pos = bird.body().pos;
        Self {
            pipe_dx: (pair.x() - bird_pos.x).abs(),
            gap_top_dy: pair.top().y() + pair.top().height() - bird_pos.y,
            gap_bottom_dy: pair.bottom().y() - bird_pos.y,
            ground_dy: ground_y - bird_pos.y,
            bird_vy: bird.body().vel.y,
            pipe_vx: pair.velocity().x,
        }
    }

    /// Flattened network-input order
    pub fn as_array(&self) -> [f32; OBSERVATION_LEN] {
        [
            self.pipe_dx,
            self.gap_top_dy,
            self.gap_bottom_dy,
            self.ground_dy,
            self.bird_vy,
            self.pipe_vx,
        ]
    }
}

/// One bird's controller for one episode
///
/// `decide` is synchronous and must be side-effect-free with respect to the
/// world; requesting a flap (by exceeding the threshold) is its only lever.
pub trait DecisionPolicy {
    fn decide(&mut self, obs: &Observation) -> f32;
}

/// Wraps a closure as a policy; handy for tests and scripted behavior
pub struct FnPolicy<F>(pub F);

impl<F: FnMut(&Observation) -> f32> DecisionPolicy for FnPolicy<F> {
    fn decide(&mut self, obs: &Observation) -> f32 {
        (self.0)(obs)
    }
}

/// Boxed policies forward, so heterogeneous batches can mix policy types
impl<'a> DecisionPolicy for Box<dyn DecisionPolicy + 'a> {
    fn decide(&mut self, obs: &Observation) -> f32 {
        (**self).decide(obs)
    }
}

/// Minimal serializable policy: a logistic unit over the observation
///
/// Stands in for whatever the external evolution subsystem produces, and
/// proves the persisted-policy boundary: a `LinearPolicy` reloaded from JSON
/// drives exactly the decisions the original did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearPolicy {
    pub weights: [f32; OBSERVATION_LEN],
    pub bias: f32,
}

impl LinearPolicy {
    pub fn zeroed() -> Self {
        Self {
            weights: [0.0; OBSERVATION_LEN],
            bias: 0.0,
        }
    }

    /// Logistic squash of the weighted observation, in (0, 1)
    pub fn activate(&self, obs: &Observation) -> f32 {
        let inputs = obs.as_array();
        let sum: f32 = self
            .weights
            .iter()
            .zip(inputs.iter())
            .map(|(w, x)| w * x)
            .sum::<f32>()
            + self.bias;
        1.0 / (1.0 + (-sum).exp())
    }
}

impl DecisionPolicy for LinearPolicy {
    fn decide(&mut self, obs: &Observation) -> f32 {
        self.activate(obs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::{World, WorldConfig};
    use glam::Vec2;

    fn obs() -> Observation {
        Observation {
            pipe_dx: 267.5,
            gap_top_dy: -30.0,
            gap_bottom_dy: 60.0,
            ground_dy: 194.0,
            bird_vy: -150.0,
            pipe_vx: -100.0,
        }
    }

    #[test]
    fn test_capture_measures_from_the_bird() {
        let config = WorldConfig {
            gravity: 0.0,
            spawn_velocity: Vec2::ZERO,
            pipe_heights: vec![100.0],
            ..WorldConfig::default()
        };
        let world = World::new(config, 1, 1).unwrap();
        let bird = &world.birds()[0];
        let pair = world.nearest_pipe(bird.body().pos.x).unwrap();
        let obs = Observation::capture(bird, pair, world.ground_y());

        // Bird at (232.5, 250); pair at 500 with start_y = -100
        assert_eq!(obs.pipe_dx, 267.5);
        assert_eq!(obs.gap_top_dy, -100.0 + PIPE_H - 250.0);
        assert_eq!(obs.gap_bottom_dy, -100.0 + PIPE_H + PIPE_GAP - 250.0);
        assert_eq!(obs.ground_dy, GROUND_Y - 250.0);
        assert_eq!(obs.bird_vy, 0.0);
        assert_eq!(obs.pipe_vx, PIPE_VELOCITY_X);
    }

    #[test]
    fn test_closures_are_policies() {
        let mut always = FnPolicy(|_: &Observation| 1.0f32);
        assert_eq!(always.decide(&obs()), 1.0);
    }

    #[test]
    fn test_linear_policy_output_is_a_probability() {
        let mut policy = LinearPolicy::zeroed();
        // Zero weights: logistic(0) = 0.5 exactly
        assert_eq!(policy.decide(&obs()), 0.5);

        policy.weights = [0.01, -0.02, 0.005, 0.0, 0.03, -0.01];
        policy.bias = 0.2;
        let out = policy.decide(&obs());
        assert!(out > 0.0 && out < 1.0);
    }

    #[test]
    fn test_json_round_trip_preserves_decisions() {
        let policy = LinearPolicy {
            weights: [0.1, -0.4, 0.25, -0.033, 0.9, -1.5],
            bias: 0.75,
        };
        let json = serde_json::to_string(&policy).unwrap();
        let mut reloaded: LinearPolicy = serde_json::from_str(&json).unwrap();

        assert_eq!(policy, reloaded);
        assert_eq!(reloaded.decide(&obs()), policy.activate(&obs()));
    }
}

//! World: entity ownership and the per-tick simulation pipeline
//!
//! One `World` backs one episode. Each `step(dt)` runs the same phase order:
//! integrate every entity, contain non-finite state, recycle scrolled-out
//! terrain and pipes, then resolve collisions as one-directional kills.
//! Once no bird is alive, `step` is a no-op reporting `EpisodeOver`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bird::Bird;
use super::ground::GroundStrip;
use super::pipe::PipePair;
use crate::consts::*;
use crate::error::ConfigError;

/// Per-episode world configuration; validated before any entity exists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Bird rectangle; both components strictly positive
    pub bird_size: Vec2,
    /// Downward acceleration applied to birds
    pub gravity: f32,
    /// Top-left spawn corner of the first bird
    pub spawn_pos: Vec2,
    /// Initial bird velocity
    pub spawn_velocity: Vec2,
    /// Extra vertical offset per bird index; staggers mass spawns
    pub spawn_stagger: f32,
    /// Discrete set of top-pipe offsets the spawn RNG draws from
    pub pipe_heights: Vec<f32>,
    /// First pair spawns here; respawn spacing scales from it
    pub pipe_initial_x: f32,
    /// Shared horizontal scroll velocity for pipes and ground; negative
    pub scroll_velocity_x: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            bird_size: Vec2::new(BIRD_W, BIRD_H),
            gravity: GRAVITY,
            spawn_pos: Vec2::new(WORLD_W / 2.0 - BIRD_W / 2.0, WORLD_H / 2.0),
            spawn_velocity: Vec2::new(0.0, FLAP_VELOCITY),
            spawn_stagger: 0.0,
            pipe_heights: PIPE_HEIGHTS.to_vec(),
            pipe_initial_x: PIPE_INITIAL_X,
            scroll_velocity_x: PIPE_VELOCITY_X,
        }
    }
}

impl WorldConfig {
    /// Reject bad configuration up front; nothing here is coerced.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.bird_size.x > 0.0 && self.bird_size.y > 0.0) || !self.bird_size.is_finite() {
            return Err(ConfigError::NonPositiveSize {
                what: "bird",
                w: self.bird_size.x,
                h: self.bird_size.y,
            });
        }
        if self.pipe_heights.is_empty() {
            return Err(ConfigError::EmptyPipeHeights);
        }
        for &h in &self.pipe_heights {
            if !h.is_finite() {
                return Err(ConfigError::NonFinite {
                    what: "pipe height",
                    value: h,
                });
            }
        }
        // Documented precondition: scrolling must move left, or pairs never
        // leave the world and recycling cannot terminate them.
        if !(self.scroll_velocity_x < 0.0) || !self.scroll_velocity_x.is_finite() {
            return Err(ConfigError::NonLeftwardPipeVelocity(self.scroll_velocity_x));
        }
        if !self.gravity.is_finite() {
            return Err(ConfigError::NonFinite {
                what: "gravity",
                value: self.gravity,
            });
        }
        if !self.spawn_pos.is_finite() || !self.spawn_velocity.is_finite() {
            return Err(ConfigError::NonFinite {
                what: "bird spawn",
                value: f32::NAN,
            });
        }
        if !self.spawn_stagger.is_finite() {
            return Err(ConfigError::NonFinite {
                what: "spawn stagger",
                value: self.spawn_stagger,
            });
        }
        if !(self.pipe_initial_x > 0.0) || !self.pipe_initial_x.is_finite() {
            return Err(ConfigError::NonPositive {
                what: "pipe initial x",
                value: self.pipe_initial_x,
            });
        }
        Ok(())
    }
}

/// What a single `step` observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Running { birds_alive: usize },
    EpisodeOver,
}

/// All live entities for one episode, plus the seeded spawn RNG
#[derive(Debug, Clone)]
pub struct World {
    config: WorldConfig,
    rng: Pcg32,
    birds: Vec<Bird>,
    pipes: Vec<PipePair>,
    ground: Vec<GroundStrip>,
    /// Simulated seconds since episode start
    elapsed: f32,
    next_bird_id: u32,
}

impl World {
    /// Build a fresh episode world: `bird_count` birds staggered from the
    /// spawn point, two pipe pairs ahead of them, and the ground ring.
    pub fn new(config: WorldConfig, seed: u64, bird_count: usize) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut world = Self {
            rng: Pcg32::seed_from_u64(seed),
            birds: Vec::with_capacity(bird_count),
            pipes: Vec::with_capacity(2),
            ground: Vec::with_capacity(GROUND_SEGMENTS),
            elapsed: 0.0,
            next_bird_id: 0,
            config,
        };

        for i in 0..bird_count {
            let id = world.next_bird_id;
            world.next_bird_id += 1;
            let pos = world.config.spawn_pos
                + Vec2::new(0.0, world.config.spawn_stagger * i as f32);
            world.birds.push(Bird::with_params(
                id,
                pos,
                world.config.bird_size,
                world.config.spawn_velocity,
                world.config.gravity,
            ));
        }

        let first_x = world.config.pipe_initial_x;
        world.spawn_pipe(first_x);
        world.spawn_pipe(first_x * 2.0);

        for i in 0..GROUND_SEGMENTS {
            world.ground.push(GroundStrip::new(
                GROUND_START_X + i as f32 * GROUND_W,
                world.config.scroll_velocity_x,
            ));
        }

        Ok(world)
    }

    fn spawn_pipe(&mut self, x: f32) {
        let mut pair = PipePair::spawn(x, &self.config.pipe_heights, &mut self.rng);
        pair.set_velocity(Vec2::new(self.config.scroll_velocity_x, 0.0));
        self.pipes.push(pair);
    }

    #[inline]
    pub fn birds(&self) -> &[Bird] {
        &self.birds
    }

    #[inline]
    pub fn birds_mut(&mut self) -> &mut [Bird] {
        &mut self.birds
    }

    #[inline]
    pub fn pipes(&self) -> &[PipePair] {
        &self.pipes
    }

    #[inline]
    pub fn ground(&self) -> &[GroundStrip] {
        &self.ground
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn birds_alive(&self) -> usize {
        self.birds.iter().filter(|b| b.is_alive()).count()
    }

    /// Top edge of the terrain, for observations
    pub fn ground_y(&self) -> f32 {
        self.ground.first().map_or(GROUND_Y, GroundStrip::y)
    }

    /// The pair nearest to `x` among those whose trailing edge has not yet
    /// passed it; first such pair wins ties.
    pub fn nearest_pipe(&self, x: f32) -> Option<&PipePair> {
        let mut best: Option<&PipePair> = None;
        for pair in &self.pipes {
            if pair.x() + pair.width() <= x {
                continue;
            }
            match best {
                Some(b) if (pair.x() - x).abs() >= (b.x() - x).abs() => {}
                _ => best = Some(pair),
            }
        }
        best
    }

    /// Advance the episode by one tick. Accepts any non-negative `dt`; no
    /// substepping, so a huge `dt` can tunnel thin obstacles.
    pub fn step(&mut self, dt: f32) -> StepOutcome {
        debug_assert!(dt >= 0.0, "dt must be non-negative, got {dt}");

        if self.birds_alive() == 0 {
            return StepOutcome::EpisodeOver;
        }

        self.elapsed += dt;

        for bird in &mut self.birds {
            bird.update(dt);
        }
        for pair in &mut self.pipes {
            pair.update(dt);
        }
        for strip in &mut self.ground {
            strip.update(dt);
        }

        // Contain runtime anomalies: a bird whose state went non-finite is
        // dead this tick, not a source of NaN for everyone else.
        for bird in &mut self.birds {
            if bird.is_alive()
                && !(bird.body().pos.is_finite() && bird.body().vel.is_finite())
            {
                log::debug!("bird {} state went non-finite, killing", bird.id());
                bird.kill();
            }
        }

        self.recycle_pipes();
        self.resolve_collisions();

        match self.birds_alive() {
            0 => StepOutcome::EpisodeOver,
            n => StepOutcome::Running { birds_alive: n },
        }
    }

    /// Replace any pair that scrolled out on the left with a fresh one
    /// spawned at `pipe_initial_x * (count_after_removal + 1)`, so spacing
    /// grows with each recycle.
    fn recycle_pipes(&mut self) {
        let mut i = 0;
        while i < self.pipes.len() {
            if self.pipes[i].x() + self.pipes[i].width() <= 0.0 {
                self.pipes.remove(i);
                let x = self.config.pipe_initial_x * (self.pipes.len() + 1) as f32;
                log::debug!("pipe pair scrolled out, respawning at x={x}");
                self.spawn_pipe(x);
            } else {
                i += 1;
            }
        }
    }

    /// Birds die on contact; obstacles and ground never react.
    fn resolve_collisions(&mut self) {
        for bird in &mut self.birds {
            if !bird.is_alive() {
                continue;
            }
            let body = bird.body();
            let hit = self.ground.iter().any(|s| s.collides(body))
                || self.pipes.iter().any(|p| p.collides(body));
            if hit {
                bird.kill();
            }
        }
    }
}

//! Episode and generation evaluation harness
//!
//! Binds a batch of decision policies to a fresh world, runs the episode to
//! completion, and reports per-policy fitness. Baseline fitness is survival
//! time; anything richer hangs off the pluggable bonus hook. Generations are
//! strictly sequential - one world, one mutator, no overlap.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::policy::{DecisionPolicy, Observation};
use crate::sim::{StepOutcome, World, WorldConfig};

/// Per-tick fitness bonus: (current fitness, dt) -> extra fitness
pub type FitnessBonus = dyn FnMut(f32, f32) -> f32 + Send;

/// Episode-level configuration; world physics nests inside
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeConfig {
    /// Seconds simulated per tick
    pub dt: f32,
    /// Policy output must exceed this to trigger a flap
    pub activation_threshold: f32,
    /// Force-kill ceiling: a bird whose fitness crosses it is culled before
    /// any physics on its next tick. Guards against run-forever policies.
    pub fitness_limit: Option<f32>,
    /// Hard episode cutoff in ticks
    pub max_ticks: Option<u64>,
    /// World RNG seed; same seed + same dt sequence replays exactly
    pub seed: u64,
    pub world: WorldConfig,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            dt: SIM_DT,
            activation_threshold: ACTIVATION_THRESHOLD,
            fitness_limit: None,
            max_ticks: None,
            seed: 0,
            world: WorldConfig::default(),
        }
    }
}

impl EpisodeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.dt.is_finite() || self.dt < 0.0 {
            return Err(ConfigError::InvalidTimestep(self.dt));
        }
        if !self.activation_threshold.is_finite() {
            return Err(ConfigError::NonFinite {
                what: "activation threshold",
                value: self.activation_threshold,
            });
        }
        if let Some(limit) = self.fitness_limit {
            if !limit.is_finite() || limit <= 0.0 {
                return Err(ConfigError::NonPositive {
                    what: "fitness limit",
                    value: limit,
                });
            }
        }
        self.world.validate()
    }
}

/// Discrete intents from the input collaborator, one batch per tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Flap every alive bird this tick (human play)
    pub flap: bool,
    /// Abandon the episode
    pub quit: bool,
    /// Abandon the episode and move on to the next generation
    pub skip: bool,
}

/// Where tick intents come from; the core never reads devices itself
pub trait InputSource {
    fn poll(&mut self) -> TickInput;
}

/// No input at all - the usual case for headless evaluation
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn poll(&mut self) -> TickInput {
        TickInput::default()
    }
}

/// How an episode finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpisodeEnd {
    /// Every bird died
    AllDead,
    /// Input collaborator quit
    Quit,
    /// Input collaborator skipped ahead
    Skipped,
    /// `max_ticks` reached
    TickLimit,
}

/// One policy's outcome for one episode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BirdRecord {
    pub policy_id: u64,
    /// Survival time plus any configured bonus
    pub fitness: f32,
    /// Still alive when the episode ended (possible on quit/skip/cutoff)
    pub alive: bool,
}

/// Fitness map for one episode, written once and returned by value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeReport {
    /// One record per supplied policy, in batch order
    pub records: Vec<BirdRecord>,
    pub ticks: u64,
    /// Simulated seconds
    pub elapsed: f32,
    pub end: EpisodeEnd,
}

impl EpisodeReport {
    pub fn record(&self, policy_id: u64) -> Option<&BirdRecord> {
        self.records.iter().find(|r| r.policy_id == policy_id)
    }

    /// Highest-fitness record, if any
    pub fn best(&self) -> Option<&BirdRecord> {
        self.records
            .iter()
            .reduce(|a, b| if b.fitness > a.fitness { b } else { a })
    }
}

/// Evolutionary-algorithm collaborator seam
///
/// Supplies one `(id, policy)` batch per generation and reads back the
/// fitness map. Crossover, mutation and the rest stay on the far side.
pub trait Evolver {
    type Policy: DecisionPolicy;

    fn next_population(&mut self) -> Vec<(u64, Self::Policy)>;
    fn record(&mut self, report: &EpisodeReport);
}

/// Drives episodes: the single entry point the outside world gets
pub struct Harness {
    config: EpisodeConfig,
    bonus: Option<Box<FitnessBonus>>,
}

impl Harness {
    /// Fails fast on bad configuration; nothing is simulated yet.
    pub fn new(config: EpisodeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            bonus: None,
        })
    }

    /// Install a per-tick fitness bonus on top of the survival-time baseline
    pub fn with_bonus(mut self, bonus: Box<FitnessBonus>) -> Self {
        self.bonus = Some(bonus);
        self
    }

    #[inline]
    pub fn config(&self) -> &EpisodeConfig {
        &self.config
    }

    /// Evaluate one batch headless: no input collaborator.
    pub fn evaluate<P: DecisionPolicy>(
        &mut self,
        batch: Vec<(u64, P)>,
    ) -> Result<EpisodeReport, ConfigError> {
        self.evaluate_with_input(batch, &mut NoInput)
    }

    /// Evaluate one batch of policies for one episode and report fitness.
    ///
    /// Tick order: fitness-ceiling cull, input intents, `world.step(dt)`,
    /// then per-bird fitness accrual and decision evaluation. The ceiling
    /// check runs before any physics touches the bird that tick.
    pub fn evaluate_with_input<P: DecisionPolicy>(
        &mut self,
        batch: Vec<(u64, P)>,
        input: &mut dyn InputSource,
    ) -> Result<EpisodeReport, ConfigError> {
        self.config.validate()?;
        if batch.is_empty() {
            return Err(ConfigError::EmptyBatch);
        }

        let dt = self.config.dt;
        let threshold = self.config.activation_threshold;
        let mut world = World::new(self.config.world.clone(), self.config.seed, batch.len())?;
        let mut policies = batch;
        let mut fitness = vec![0.0f32; policies.len()];
        let mut ticks: u64 = 0;

        let end = 'episode: loop {
            // Ceiling cull first: a capped bird sees no gravity, physics or
            // impulse at all this tick
            if let Some(limit) = self.config.fitness_limit {
                for (i, bird) in world.birds_mut().iter_mut().enumerate() {
                    if bird.is_alive() && fitness[i] >= limit {
                        log::debug!("bird {} hit the fitness ceiling, culling", bird.id());
                        bird.kill();
                    }
                }
            }

            let intents = input.poll();
            if intents.quit {
                break 'episode EpisodeEnd::Quit;
            }
            if intents.skip {
                break 'episode EpisodeEnd::Skipped;
            }
            if intents.flap {
                for bird in world.birds_mut() {
                    bird.flap();
                }
            }

            let outcome = world.step(dt);
            ticks += 1;

            if outcome == StepOutcome::EpisodeOver {
                break 'episode EpisodeEnd::AllDead;
            }

            // Survivors earn their tick and take their decision
            for (i, (_, policy)) in policies.iter_mut().enumerate() {
                if !world.birds()[i].is_alive() {
                    continue;
                }

                fitness[i] += dt;
                if let Some(bonus) = &mut self.bonus {
                    fitness[i] += bonus(fitness[i], dt);
                }

                let bird = &world.birds()[i];
                let obs = world
                    .nearest_pipe(bird.body().pos.x)
                    .map(|pair| Observation::capture(bird, pair, world.ground_y()));
                if let Some(obs) = obs {
                    if policy.decide(&obs) > threshold {
                        world.birds_mut()[i].flap();
                    }
                }
            }

            if let Some(max) = self.config.max_ticks {
                if ticks >= max {
                    break 'episode EpisodeEnd::TickLimit;
                }
            }
        };

        let records = policies
            .iter()
            .enumerate()
            .map(|(i, (policy_id, _))| BirdRecord {
                policy_id: *policy_id,
                fitness: fitness[i],
                alive: world.birds()[i].is_alive(),
            })
            .collect();

        Ok(EpisodeReport {
            records,
            ticks,
            elapsed: world.elapsed(),
            end,
        })
    }

    /// Run `generations` sequential episodes under an external evolver.
    pub fn run_generations<E: Evolver>(
        &mut self,
        evolver: &mut E,
        generations: u32,
    ) -> Result<Vec<EpisodeReport>, ConfigError> {
        if generations == 0 {
            return Err(ConfigError::ZeroGenerations);
        }

        let mut reports = Vec::with_capacity(generations as usize);
        for generation in 0..generations {
            let batch = evolver.next_population();
            let report = self.evaluate(batch)?;
            let best = report.best().map_or(0.0, |r| r.fitness);
            log::info!(
                "generation {}: {} policies, best fitness {:.2}, ended {:?}",
                generation + 1,
                report.records.len(),
                best,
                report.end
            );
            evolver.record(&report);
            reports.push(report);
        }
        Ok(reports)
    }
}

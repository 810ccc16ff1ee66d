//! Flappy Evo entry point
//!
//! Headless trainer demo: a seeded random-search evolver over `LinearPolicy`
//! stands in for a real neuroevolution subsystem, driving the evaluation
//! harness for a fixed number of generations. The best policy found is
//! serialized to JSON and replayed once from its deserialized form.

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use flappy_evo::{EpisodeConfig, EpisodeReport, Evolver, Harness, LinearPolicy};

const POPULATION: usize = 50;
const GENERATIONS: u32 = 30;
const TRAINER_SEED: u64 = 2024;

/// Elite-plus-mutants random search; the simplest possible stand-in for the
/// external evolutionary-algorithm collaborator.
struct RandomSearch {
    rng: Pcg32,
    best: Option<(f32, LinearPolicy)>,
    last_batch: Vec<(u64, LinearPolicy)>,
}

impl RandomSearch {
    fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            best: None,
            last_batch: Vec::new(),
        }
    }

    fn fresh(&mut self) -> LinearPolicy {
        let mut policy = LinearPolicy::zeroed();
        for w in &mut policy.weights {
            *w = self.rng.random_range(-1.0..1.0);
        }
        policy.bias = self.rng.random_range(-1.0..1.0);
        policy
    }

    fn mutated(&mut self, base: &LinearPolicy) -> LinearPolicy {
        let mut policy = base.clone();
        for w in &mut policy.weights {
            *w += self.rng.random_range(-0.25..0.25);
        }
        policy.bias += self.rng.random_range(-0.25..0.25);
        policy
    }
}

impl Evolver for RandomSearch {
    type Policy = LinearPolicy;

    fn next_population(&mut self) -> Vec<(u64, LinearPolicy)> {
        let base = self.best.as_ref().map(|(_, p)| p.clone());
        let mut batch = Vec::with_capacity(POPULATION);
        for i in 0..POPULATION {
            let policy = match (&base, i) {
                // Keep the elite untouched in slot 0
                (Some(b), 0) => b.clone(),
                (Some(b), _) => self.mutated(b),
                (None, _) => self.fresh(),
            };
            batch.push((i as u64, policy));
        }
        self.last_batch = batch.clone();
        batch
    }

    fn record(&mut self, report: &EpisodeReport) {
        for record in &report.records {
            let improved = match &self.best {
                None => true,
                Some((f, _)) => record.fitness > *f,
            };
            if improved {
                if let Some((_, policy)) = self
                    .last_batch
                    .iter()
                    .find(|(id, _)| *id == record.policy_id)
                {
                    self.best = Some((record.fitness, policy.clone()));
                }
            }
        }
    }
}

fn main() {
    env_logger::init();
    log::info!("Flappy Evo trainer starting (seed {TRAINER_SEED})...");

    let config = EpisodeConfig {
        // Cull anything that has clearly mastered the course
        fitness_limit: Some(120.0),
        seed: TRAINER_SEED,
        ..EpisodeConfig::default()
    };

    let mut harness = Harness::new(config.clone()).expect("trainer config is valid");
    let mut evolver = RandomSearch::new(TRAINER_SEED);

    harness
        .run_generations(&mut evolver, GENERATIONS)
        .expect("generation run");

    let Some((fitness, best)) = evolver.best.take() else {
        log::warn!("no policy was ever evaluated");
        return;
    };
    log::info!("best fitness after {GENERATIONS} generations: {fitness:.2}");

    // Persisted-policy boundary: serialize, reload, replay single-agent
    let json = serde_json::to_string_pretty(&best).expect("policy serializes");
    if let Err(e) = std::fs::write("best_policy.json", &json) {
        log::warn!("could not write best_policy.json: {e}");
    }

    let reloaded: LinearPolicy = serde_json::from_str(&json).expect("policy deserializes");

    let mut replay = Harness::new(config).expect("replay config is valid");
    let report = replay
        .evaluate(vec![(0u64, reloaded)])
        .expect("replay episode");
    log::info!(
        "replayed best policy: fitness {:.2}, ended {:?}",
        report.records[0].fitness,
        report.end
    );

    println!("{json}");
}

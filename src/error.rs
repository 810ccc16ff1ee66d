//! Configuration-error taxonomy
//!
//! Bad configuration is rejected at construction/setup time, never coerced
//! or patched up mid-simulation. `World::step` itself is infallible.

use thiserror::Error;

/// Rejected configuration, surfaced before any simulation runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Entity sizes must be strictly positive on both axes.
    #[error("{what} size must be positive, got {w}x{h}")]
    NonPositiveSize { what: &'static str, w: f32, h: f32 },

    /// The spawn-height set the pipe RNG draws from cannot be empty.
    #[error("pipe height set is empty")]
    EmptyPipeHeights,

    /// Pairs only recycle if obstacles scroll leftward.
    #[error("pipe x-velocity must be negative (leftward), got {0}")]
    NonLeftwardPipeVelocity(f32),

    /// Timestep must be a finite, non-negative number of seconds.
    #[error("invalid timestep: {0}")]
    InvalidTimestep(f32),

    /// A configured value must be finite.
    #[error("{what} must be finite, got {value}")]
    NonFinite { what: &'static str, value: f32 },

    /// A configured value must be strictly positive.
    #[error("{what} must be positive, got {value}")]
    NonPositive { what: &'static str, value: f32 },

    /// At least one generation must be requested.
    #[error("generation count must be positive")]
    ZeroGenerations,

    /// An episode needs at least one policy to evaluate.
    #[error("policy batch is empty")]
    EmptyBatch,
}

//! Flappy Evo - headless Flappy Bird with an evolutionary evaluation harness
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, world state)
//! - `policy`: Decision-policy interface fed by a fixed observation vector
//! - `harness`: Episode/generation evaluation and fitness bookkeeping
//! - `error`: Configuration-error taxonomy
//!
//! The crate emits no pixels and reads no devices: rendering, input sources
//! and the evolutionary algorithm itself are external collaborators wired in
//! through the `harness` seams.

pub mod error;
pub mod harness;
pub mod policy;
pub mod sim;

pub use error::ConfigError;
pub use harness::{
    BirdRecord, EpisodeConfig, EpisodeEnd, EpisodeReport, Evolver, Harness, InputSource, NoInput,
    TickInput,
};
pub use policy::{DecisionPolicy, FnPolicy, LinearPolicy, Observation, OBSERVATION_LEN};
pub use sim::{Bird, GroundStrip, PipePair, StepOutcome, World, WorldConfig};

/// Game configuration constants
pub mod consts {
    /// Reference fixed simulation timestep (60 Hz); callers may pass any dt
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// World dimensions (screen-space, +y down)
    pub const WORLD_W: f32 = 500.0;
    pub const WORLD_H: f32 = 500.0;

    /// Bird defaults
    pub const BIRD_W: f32 = 35.0;
    pub const BIRD_H: f32 = 35.0;
    /// Downward acceleration (pixels/s²)
    pub const GRAVITY: f32 = 250.0;
    /// Vertical velocity set by a flap (upward, so negative)
    pub const FLAP_VELOCITY: f32 = -150.0;
    /// Maximum fall speed; gravity never accumulates past this
    pub const TERMINAL_VELOCITY: f32 = 2_000.0;
    /// Minimum seconds between flaps
    pub const FLAP_COOLDOWN: f32 = 0.25;
    /// Rotation saturates at these bounds (degrees; visual only)
    pub const ROTATION_MIN: f32 = -90.0;
    pub const ROTATION_MAX: f32 = 35.0;

    /// Pipe defaults
    pub const PIPE_W: f32 = 52.0;
    pub const PIPE_H: f32 = 320.0;
    /// Vertical opening between the top and bottom pipe
    pub const PIPE_GAP: f32 = 90.0;
    /// First pair spawns here; respawn spacing scales from it
    pub const PIPE_INITIAL_X: f32 = WORLD_W;
    /// Horizontal scroll speed; must stay negative for pairs to recycle
    pub const PIPE_VELOCITY_X: f32 = -100.0;
    /// Allowed top-pipe offsets; spawn height is drawn from this set
    pub const PIPE_HEIGHTS: [f32; 11] = [
        0.0, 25.0, 50.0, 75.0, 100.0, 125.0, 150.0, 175.0, 200.0, 225.0, 250.0,
    ];

    /// Ground strip defaults
    pub const GROUND_W: f32 = 336.0;
    pub const GROUND_H: f32 = 112.0;
    /// Top edge of the ground strips
    pub const GROUND_Y: f32 = WORLD_H - GROUND_H / 2.0;
    /// Number of pre-placed strips; also sets the wrap distance
    pub const GROUND_SEGMENTS: usize = 4;
    /// Leftmost strip starts slightly off-screen
    pub const GROUND_START_X: f32 = -10.0;

    /// Policy output above this value triggers a flap
    pub const ACTIVATION_THRESHOLD: f32 = 0.5;
}

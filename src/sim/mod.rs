//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (construction order)
//! - No rendering or platform dependencies

pub mod bird;
pub mod entity;
pub mod ground;
pub mod pipe;
pub mod world;

pub use bird::Bird;
pub use entity::{Aabb, Body};
pub use ground::GroundStrip;
pub use pipe::{Pipe, PipeOrientation, PipePair};
pub use world::{StepOutcome, World, WorldConfig};

//! CivSim Core - Grid Civilization Simulation Engine
//!
//! A population of anonymous agents wanders a fixed 2D grid, eats
//! regenerating food, shares health altruistically, reproduces and dies,
//! advanced one discrete tick at a time.
//!
//! # Architecture
//!
//! Agents are stored struct-of-arrays style in [`Population`]: one column per
//! attribute, all columns the same length, index `i` naming the same agent in
//! every column. Systems are bulk transforms over those columns:
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Tunable parameters and construction-time validation |
//! | [`population`] | Column storage and whole-population transforms |
//! | [`world`] | Dense food grid with stochastic regeneration |
//! | [`systems`] | Movement, hunger, food, sharing, reproduction, death filter |
//! | [`engine`] | Fixed-order tick orchestrator owning state and RNG |
//! | [`metrics`] | Per-tick statistics and run summaries |
//! | [`rng`] | Seeded RNG handle and Gaussian sampling |
//!
//! # Example
//!
//! ```rust,no_run
//! use civsim_core::prelude::*;
//!
//! let mut engine = SimulationEngine::new(SimConfig::default()).unwrap();
//!
//! while !engine.is_finished() {
//!     let stats = engine.tick();
//!     println!("tick {} population {}", stats.tick, stats.population);
//! }
//! ```

pub mod config;
pub mod engine;
pub mod metrics;
pub mod population;
pub mod rng;
pub mod systems;
pub mod world;

pub use config::{ConfigError, SimConfig};
pub use engine::{SimulationEngine, Snapshot};
pub use metrics::{RunSummary, TickStats};
pub use population::{AgentRecord, Population, PopulationError};
pub use world::FoodGrid;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::config::{ConfigError, SimConfig};
    pub use crate::engine::{SimulationEngine, Snapshot};
    pub use crate::metrics::{RunSummary, TickStats};
    pub use crate::population::{AgentRecord, Population};
    pub use crate::world::FoodGrid;
}

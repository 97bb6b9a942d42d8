//! Simulation configuration - every tunable the pipeline reads.
//!
//! The pipeline treats a [`SimConfig`] as immutable input. Inconsistent values
//! are rejected here, at construction time, so the stepping code never has to
//! handle a bad parameter.

use serde::{Deserialize, Serialize};

/// Tunable parameters for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Grid width in cells (x axis).
    pub world_width: u32,
    /// Grid height in cells (y axis).
    pub world_height: u32,
    /// Agents alive at tick 0.
    pub initial_agents: usize,
    /// Tick budget for a full run.
    pub max_ticks: u64,
    /// Log population every N ticks (0 disables).
    pub log_interval: u64,

    /// Hunger added per tick.
    pub hunger_rate: f32,
    /// Health lost per tick to metabolism.
    pub hunger_health_loss: f32,
    /// Hunger above which an agent receives from the sharing pool.
    pub hunger_threshold: f32,

    /// Chance per empty cell per tick of growing food.
    pub food_spawn_prob: f32,
    /// Health gained by eating.
    pub food_health_gain: f32,

    /// Fraction of health a donor gives up.
    pub share_fraction: f32,
    /// Health a candidate donor must exceed to actually donate.
    pub share_min_health: f32,

    /// Health at or above which an agent splits.
    pub reproduction_health_threshold: f32,
    /// Standard deviation of altruism mutation in children.
    pub reproduction_mutation_std: f32,

    /// Starting health of every initial agent.
    pub initial_health: f32,
    /// Mean of the initial altruism distribution (clipped to [0, 1]).
    pub initial_altruism_mean: f32,
    /// Standard deviation of the initial altruism distribution.
    pub initial_altruism_std: f32,

    /// RNG seed; identical seeds reproduce identical runs.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world_width: 64,
            world_height: 64,
            initial_agents: 500,
            max_ticks: 500,
            log_interval: 50,
            hunger_rate: 0.5,
            hunger_health_loss: 0.2,
            hunger_threshold: 8.0,
            food_spawn_prob: 0.02,
            food_health_gain: 5.0,
            share_fraction: 0.1,
            share_min_health: 2.0,
            reproduction_health_threshold: 12.0,
            reproduction_mutation_std: 0.05,
            initial_health: 10.0,
            initial_altruism_mean: 0.3,
            initial_altruism_std: 0.1,
            seed: 123,
        }
    }
}

/// A violated configuration precondition.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Width or height of zero.
    #[error("grid dimensions must be positive, got {width}x{height}")]
    EmptyGrid { width: u32, height: u32 },

    /// A dimension that cannot be addressed by a signed cell coordinate.
    #[error("grid dimension {0} exceeds the largest addressable coordinate")]
    GridTooLarge(u32),

    /// A probability outside [0, 1].
    #[error("{name} must be a probability in [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f32 },

    /// A rate or amount that must be a finite, non-negative number.
    #[error("{name} must be finite and non-negative, got {value}")]
    NegativeParameter { name: &'static str, value: f32 },

    /// A threshold that must be strictly positive.
    #[error("{name} must be finite and positive, got {value}")]
    NonPositiveParameter { name: &'static str, value: f32 },

    /// A parameter that must be finite (sign unconstrained).
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f32 },
}

/// Collect every precondition `config` violates.
pub fn validate_config(config: &SimConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if config.world_width == 0 || config.world_height == 0 {
        errors.push(ConfigError::EmptyGrid {
            width: config.world_width,
            height: config.world_height,
        });
    }
    for dim in [config.world_width, config.world_height] {
        if dim > i32::MAX as u32 {
            errors.push(ConfigError::GridTooLarge(dim));
        }
    }

    for (name, value) in [
        ("food_spawn_prob", config.food_spawn_prob),
        ("share_fraction", config.share_fraction),
    ] {
        if !(0.0..=1.0).contains(&value) {
            errors.push(ConfigError::InvalidProbability { name, value });
        }
    }

    for (name, value) in [
        ("hunger_rate", config.hunger_rate),
        ("hunger_health_loss", config.hunger_health_loss),
        ("food_health_gain", config.food_health_gain),
        ("reproduction_mutation_std", config.reproduction_mutation_std),
        ("initial_altruism_std", config.initial_altruism_std),
    ] {
        if !value.is_finite() || value < 0.0 {
            errors.push(ConfigError::NegativeParameter { name, value });
        }
    }

    for (name, value) in [
        (
            "reproduction_health_threshold",
            config.reproduction_health_threshold,
        ),
        ("initial_health", config.initial_health),
    ] {
        if !value.is_finite() || value <= 0.0 {
            errors.push(ConfigError::NonPositiveParameter { name, value });
        }
    }

    for (name, value) in [
        ("hunger_threshold", config.hunger_threshold),
        ("share_min_health", config.share_min_health),
        ("initial_altruism_mean", config.initial_altruism_mean),
    ] {
        if !value.is_finite() {
            errors.push(ConfigError::NonFinite { name, value });
        }
    }

    errors
}

impl SimConfig {
    /// First violated precondition, if any.
    pub fn check(&self) -> Result<(), ConfigError> {
        match validate_config(self).into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

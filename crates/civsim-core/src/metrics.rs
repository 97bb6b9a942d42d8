//! Per-tick statistics collected by the engine.

use serde::{Deserialize, Serialize};

use crate::population::Population;
use crate::systems::{FoodOutcome, SharingOutcome};
use crate::world::FoodGrid;

/// Snapshot of what happened during one tick, taken after the death filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickStats {
    /// 1-based tick number.
    pub tick: u64,
    /// Agents alive at the end of the tick.
    pub population: usize,
    pub births: usize,
    pub deaths: usize,
    /// Agents that ate.
    pub food_eaten: usize,
    /// Food cells left on the grid.
    pub food_available: usize,
    pub donors: usize,
    pub recipients: usize,
    /// Health donated into the sharing pool.
    pub pooled_health: f32,
    /// Health delivered out of the pool.
    pub delivered_health: f32,
    pub mean_health: f32,
    pub mean_altruism: f32,
}

impl TickStats {
    pub(crate) fn collect(
        tick: u64,
        pop: &Population,
        grid: &FoodGrid,
        food: FoodOutcome,
        sharing: SharingOutcome,
        births: usize,
        deaths: usize,
    ) -> Self {
        Self {
            tick,
            population: pop.len(),
            births,
            deaths,
            food_eaten: food.eaten,
            food_available: grid.food_count(),
            donors: sharing.donors,
            recipients: sharing.recipients,
            pooled_health: sharing.pooled,
            delivered_health: sharing.delivered,
            mean_health: pop.mean_health(),
            mean_altruism: pop.mean_altruism(),
        }
    }

    /// Health donated this tick that reached nobody.
    pub fn lost_health(&self) -> f32 {
        self.pooled_health - self.delivered_health
    }
}

/// Outcome of a full run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Ticks executed before stopping.
    pub ticks_run: u64,
    pub final_population: usize,
    /// Whether the run stopped because everyone died.
    pub extinct: bool,
    /// Stats for every tick executed, in order.
    pub history: Vec<TickStats>,
}

impl RunSummary {
    /// Largest population seen at the end of any tick.
    pub fn peak_population(&self) -> usize {
        self.history
            .iter()
            .map(|s| s.population)
            .max()
            .unwrap_or(self.final_population)
    }

    pub fn total_births(&self) -> usize {
        self.history.iter().map(|s| s.births).sum()
    }

    pub fn total_deaths(&self) -> usize {
        self.history.iter().map(|s| s.deaths).sum()
    }
}

//! Food system - agents standing on food eat it

use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::population::Population;
use crate::world::FoodGrid;

/// What one food step consumed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodOutcome {
    /// Agents that ate this tick.
    pub eaten: usize,
    /// Distinct cells emptied.
    pub cells_cleared: usize,
}

/// Resolve food consumption for the whole population in one batch.
///
/// Every agent's "has food" flag is read from the grid as it was before the
/// step, so any number of agents sharing a cell all eat from it. Eaters reset
/// hunger to zero and gain `food_health_gain`; afterwards every eaten cell is
/// emptied in a single pass.
pub fn food_system(pop: &mut Population, grid: &mut FoodGrid, config: &SimConfig) -> FoodOutcome {
    let cells: Vec<Option<usize>> = pop
        .x()
        .iter()
        .zip(pop.y())
        .map(|(&x, &y)| grid.index(x, y).filter(|&i| grid.cells()[i] > 0))
        .collect();

    let cols = pop.columns_mut();
    let mut eaten = 0;
    for ((cell, hunger), health) in cells
        .iter()
        .zip(cols.hunger.iter_mut())
        .zip(cols.health.iter_mut())
    {
        if cell.is_some() {
            *hunger = 0.0;
            *health += config.food_health_gain;
            eaten += 1;
        }
    }

    let mut consumed: Vec<usize> = cells.into_iter().flatten().collect();
    consumed.sort_unstable();
    consumed.dedup();
    grid.clear_indices(&consumed);

    FoodOutcome {
        eaten,
        cells_cleared: consumed.len(),
    }
}

//! Movement system - one random unit step per agent, clamped to the grid

use rand::Rng;

use crate::config::SimConfig;
use crate::population::Population;

use super::clamp_coord;

/// The four unit moves: up, down, right, left.
pub const DIRECTIONS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Move every agent one step in a uniformly chosen direction.
///
/// All direction draws happen before any position changes. Positions are
/// clamped, never rejected, so agents starting off-grid end up on its edge.
pub fn movement_system<R: Rng + ?Sized>(pop: &mut Population, config: &SimConfig, rng: &mut R) {
    let choices: Vec<usize> = (0..pop.len())
        .map(|_| rng.gen_range(0..DIRECTIONS.len()))
        .collect();

    let cols = pop.columns_mut();
    for ((x, y), choice) in cols.x.iter_mut().zip(cols.y.iter_mut()).zip(choices) {
        let (dx, dy) = DIRECTIONS[choice];
        *x = clamp_coord(x.saturating_add(dx), config.world_width);
        *y = clamp_coord(y.saturating_add(dy), config.world_height);
    }
}

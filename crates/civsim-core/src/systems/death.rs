//! Death filter - removes agents whose health ran out

use crate::population::Population;

/// Drop every agent with health <= 0, keeping survivors in order.
///
/// Returns the surviving population and the death count. An empty result is
/// a normal terminal state.
pub fn death_filter(pop: Population) -> (Population, usize) {
    let before = pop.len();
    let survivors = pop.retain(|a| is_alive(a.health));
    let deaths = before - survivors.len();
    (survivors, deaths)
}

/// Survival is strictly positive health.
pub fn is_alive(health: f32) -> bool {
    health > 0.0
}

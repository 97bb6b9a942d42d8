//! Hunger system - metabolic cost paid by every agent each tick

use crate::config::SimConfig;
use crate::population::Population;

/// Raise every agent's hunger and drain a constant amount of health.
///
/// Health may go negative here; the death filter resolves that at the end of
/// the tick.
pub fn hunger_system(pop: &mut Population, config: &SimConfig) {
    let cols = pop.columns_mut();
    for hunger in cols.hunger.iter_mut() {
        *hunger += config.hunger_rate;
    }
    for health in cols.health.iter_mut() {
        *health -= config.hunger_health_loss;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::AgentRecord;

    #[test]
    fn test_exact_increments() {
        let config = SimConfig::default();
        let start = [(10.0, 0.0), (0.1, 3.5), (-2.0, 100.0)];
        let mut pop = Population::from_agents(start.iter().map(|&(health, hunger)| AgentRecord {
            x: 0,
            y: 0,
            health,
            hunger,
            altruism: 0.0,
        }));

        hunger_system(&mut pop, &config);

        for (a, &(health, hunger)) in pop.iter().zip(start.iter()) {
            assert_eq!(a.hunger, hunger + config.hunger_rate);
            assert_eq!(a.health, health - config.hunger_health_loss);
        }
    }

    #[test]
    fn test_health_may_go_negative() {
        let config = SimConfig::default();
        let mut pop = Population::from_agents([AgentRecord {
            x: 0,
            y: 0,
            health: 0.1,
            hunger: 0.0,
            altruism: 0.0,
        }]);
        hunger_system(&mut pop, &config);
        assert_eq!(pop.len(), 1);
        assert!(pop.health()[0] < 0.0);
    }

    #[test]
    fn test_empty_population() {
        let mut pop = Population::new();
        hunger_system(&mut pop, &SimConfig::default());
        assert!(pop.is_empty());
    }
}

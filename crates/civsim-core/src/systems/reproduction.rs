//! Reproduction system - healthy agents split into parent and child

use rand::Rng;

use crate::config::SimConfig;
use crate::population::{AgentRecord, Population};
use crate::rng::gaussian;

use super::clamp_coord;

/// Split every agent at or above `reproduction_health_threshold`.
///
/// Parents keep half their health and the child starts with the other half.
/// Children land within one cell of the parent on each axis (clamped), carry
/// half the parent's hunger, and inherit altruism plus Gaussian noise,
/// clamped to [0, 1]. Children are appended in parent order.
///
/// Draw order: every child's x offset, then every y offset, then every
/// mutation. Returns the grown population and the number of births.
pub fn reproduction_system<R: Rng + ?Sized>(
    mut pop: Population,
    config: &SimConfig,
    rng: &mut R,
) -> (Population, usize) {
    let parents: Vec<usize> = pop
        .health()
        .iter()
        .enumerate()
        .filter(|&(_, &h)| h >= config.reproduction_health_threshold)
        .map(|(i, _)| i)
        .collect();
    let count = parents.len();
    if count == 0 {
        return (pop, 0);
    }

    let dx: Vec<i32> = (0..count).map(|_| rng.gen_range(-1..=1)).collect();
    let dy: Vec<i32> = (0..count).map(|_| rng.gen_range(-1..=1)).collect();
    let noise: Vec<f32> = (0..count).map(|_| gaussian(rng)).collect();

    let cols = pop.columns_mut();
    let mut children = Vec::with_capacity(count);
    for (k, &i) in parents.iter().enumerate() {
        let half = cols.health[i] * 0.5;
        cols.health[i] = half;

        children.push(AgentRecord {
            x: clamp_coord(cols.x[i].saturating_add(dx[k]), config.world_width),
            y: clamp_coord(cols.y[i].saturating_add(dy[k]), config.world_height),
            health: half,
            hunger: cols.hunger[i] * 0.5,
            altruism: (cols.altruism[i] + noise[k] * config.reproduction_mutation_std)
                .clamp(0.0, 1.0),
        });
    }

    (pop.concat(Population::from_agents(children)), count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_rng;

    fn agent(x: i32, y: i32, health: f32, hunger: f32, altruism: f32) -> AgentRecord {
        AgentRecord {
            x,
            y,
            health,
            hunger,
            altruism,
        }
    }

    fn config() -> SimConfig {
        SimConfig {
            world_width: 10,
            world_height: 10,
            ..Default::default()
        }
    }

    #[test]
    fn test_no_parents_is_noop() {
        let config = config();
        let mut rng = create_rng(1);
        let pop = Population::from_agents([agent(1, 1, 11.9, 0.0, 0.5)]);
        let before = pop.clone();
        let (pop, births) = reproduction_system(pop, &config, &mut rng);
        assert_eq!(births, 0);
        assert_eq!(pop, before);
    }

    #[test]
    fn test_exact_health_split() {
        let config = config();
        let mut rng = create_rng(2);
        let pop = Population::from_agents([
            agent(4, 4, 12.0, 3.0, 0.5),
            agent(0, 0, 5.0, 1.0, 0.5),
            agent(9, 9, 20.5, 6.0, 0.2),
        ]);

        let (pop, births) = reproduction_system(pop, &config, &mut rng);

        assert_eq!(births, 2);
        assert_eq!(pop.len(), 5);
        assert!(pop.is_aligned());
        // Parents halved in place, non-parent untouched.
        assert_eq!(pop.health()[..3], [6.0, 5.0, 10.25]);
        // Children appended in parent order.
        let first = pop.get(3).unwrap();
        let second = pop.get(4).unwrap();
        assert_eq!(first.health, 6.0);
        assert_eq!(first.hunger, 1.5);
        assert_eq!(second.health, 10.25);
        assert_eq!(second.hunger, 3.0);
        assert!((first.x - 4).abs() <= 1 && (first.y - 4).abs() <= 1);
        assert!((8..10).contains(&second.x) && (8..10).contains(&second.y));
    }

    #[test]
    fn test_child_altruism_clamped() {
        let config = SimConfig {
            reproduction_mutation_std: 5.0,
            ..config()
        };
        let mut rng = create_rng(3);
        let pop = Population::from_agents((0..100).map(|_| agent(5, 5, 30.0, 0.0, 0.99)));
        let (pop, births) = reproduction_system(pop, &config, &mut rng);
        assert_eq!(births, 100);
        assert!(pop.altruism().iter().all(|a| (0.0..=1.0).contains(a)));
        assert!(pop.altruism()[100..].iter().any(|&a| a == 1.0));
        assert!(pop.altruism()[100..].iter().any(|&a| a == 0.0));
    }

    #[test]
    fn test_zero_mutation_copies_altruism() {
        let config = SimConfig {
            reproduction_mutation_std: 0.0,
            ..config()
        };
        let mut rng = create_rng(4);
        let pop = Population::from_agents([agent(5, 5, 12.0, 0.0, 0.37)]);
        let (pop, _) = reproduction_system(pop, &config, &mut rng);
        assert_eq!(pop.altruism(), &[0.37, 0.37]);
    }

    #[test]
    fn test_children_stay_in_bounds() {
        let config = config();
        let mut rng = create_rng(5);
        let pop = Population::from_agents([
            agent(0, 0, 50.0, 0.0, 0.5),
            agent(9, 9, 50.0, 0.0, 0.5),
            agent(0, 9, 50.0, 0.0, 0.5),
        ]);
        let mut pop = pop;
        for _ in 0..4 {
            pop = reproduction_system(pop, &config, &mut rng).0;
        }
        assert_eq!(pop.len(), 24);
        assert!(pop.x().iter().all(|&x| (0..10).contains(&x)));
        assert!(pop.y().iter().all(|&y| (0..10).contains(&y)));
    }

    #[test]
    fn test_empty_population() {
        let (pop, births) =
            reproduction_system(Population::new(), &config(), &mut create_rng(0));
        assert!(pop.is_empty());
        assert_eq!(births, 0);
    }
}

//! Simulation engine - owns the state and runs the tick pipeline

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, SimConfig};
use crate::metrics::{RunSummary, TickStats};
use crate::population::Population;
use crate::rng::{create_rng, SimRng};
use crate::systems::*;
use crate::world::FoodGrid;

/// Read-only copy of the state between ticks, for renderers and reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub population: Population,
    pub grid: FoodGrid,
}

/// Raw outcome of one pipeline pass, before it is summarised.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickOutcome {
    pub food: FoodOutcome,
    pub sharing: SharingOutcome,
    pub births: usize,
    pub deaths: usize,
}

/// Run one tick of the pipeline in its fixed order:
/// regenerate food, movement, hunger, food, sharing, reproduction, death.
///
/// Takes the population by value because reproduction and the death filter
/// replace it; the grid is updated in place.
pub fn run_tick<R: rand::Rng + ?Sized>(
    mut population: Population,
    grid: &mut FoodGrid,
    config: &SimConfig,
    rng: &mut R,
) -> (Population, TickOutcome) {
    grid.regenerate(config.food_spawn_prob, rng);
    movement_system(&mut population, config, rng);
    hunger_system(&mut population, config);
    let food = food_system(&mut population, grid, config);
    let sharing = sharing_system(&mut population, config, rng);
    let (population, births) = reproduction_system(population, config, rng);
    let (population, deaths) = death_filter(population);

    (
        population,
        TickOutcome {
            food,
            sharing,
            births,
            deaths,
        },
    )
}

/// Main simulation engine
pub struct SimulationEngine {
    config: SimConfig,
    population: Population,
    grid: FoodGrid,
    rng: SimRng,
    tick: u64,
    history: Vec<TickStats>,
}

impl SimulationEngine {
    /// Validate `config`, seed the RNG, and spawn the initial population on
    /// an empty grid.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.check()?;
        let mut rng = create_rng(config.seed);
        let population = Population::spawn_initial(&config, &mut rng);
        let grid = FoodGrid::new(config.world_width, config.world_height);
        info!(
            "Spawned {} agents on a {}x{} grid (seed {})",
            population.len(),
            config.world_width,
            config.world_height,
            config.seed
        );
        Ok(Self {
            config,
            population,
            grid,
            rng,
            tick: 0,
            history: Vec::new(),
        })
    }

    /// Start from a hand-built population and grid. The RNG is still seeded
    /// from `config.seed`.
    pub fn from_parts(
        config: SimConfig,
        population: Population,
        grid: FoodGrid,
    ) -> Result<Self, ConfigError> {
        config.check()?;
        let rng = create_rng(config.seed);
        Ok(Self {
            config,
            population,
            grid,
            rng,
            tick: 0,
            history: Vec::new(),
        })
    }

    /// Advance one tick and record its statistics.
    pub fn tick(&mut self) -> TickStats {
        let population = std::mem::take(&mut self.population);
        let (population, outcome) =
            run_tick(population, &mut self.grid, &self.config, &mut self.rng);
        self.population = population;
        self.tick += 1;

        let stats = TickStats::collect(
            self.tick,
            &self.population,
            &self.grid,
            outcome.food,
            outcome.sharing,
            outcome.births,
            outcome.deaths,
        );
        debug!(
            "tick {}: population={} births={} deaths={} eaten={} pooled={:.3}",
            stats.tick,
            stats.population,
            stats.births,
            stats.deaths,
            stats.food_eaten,
            stats.pooled_health
        );
        self.history.push(stats.clone());
        stats
    }

    /// Tick until the budget is spent or the population dies out.
    pub fn run(&mut self) -> RunSummary {
        while !self.is_finished() {
            let stats = self.tick();
            let interval = self.config.log_interval;
            if interval > 0 && stats.tick % interval == 0 {
                info!("[tick {}] population={}", stats.tick, stats.population);
            }
        }

        if self.is_extinct() {
            warn!("Population extinct after {} ticks", self.tick);
        } else {
            info!(
                "Tick budget reached at {} with population {}",
                self.tick,
                self.population.len()
            );
        }

        self.summary()
    }

    /// Summary of everything run so far.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            ticks_run: self.tick,
            final_population: self.population.len(),
            extinct: self.is_extinct(),
            history: self.history.clone(),
        }
    }

    pub fn is_extinct(&self) -> bool {
        self.population.is_empty()
    }

    /// True once the tick budget is spent or nobody is left.
    pub fn is_finished(&self) -> bool {
        self.tick >= self.config.max_ticks || self.is_extinct()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn grid(&self) -> &FoodGrid {
        &self.grid
    }

    /// Ticks executed so far.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn history(&self) -> &[TickStats] {
        &self.history
    }

    /// Owned copy of the current state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.tick,
            population: self.population.clone(),
            grid: self.grid.clone(),
        }
    }
}

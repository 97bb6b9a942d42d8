//! Population state - all living agents as parallel columns.
//!
//! Every attribute lives in its own `Vec`, and index `i` names the same agent
//! in every column. Columns are private: value updates go through
//! [`Population::columns_mut`], which hands out fixed-length slices, and the
//! only ways to change the agent count are [`Population::filtered`],
//! [`Population::retain`] and [`Population::concat`], which rebuild every
//! column together.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::rng::clipped_normal;

/// One agent's attributes, read out of (or fed into) the columns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub x: i32,
    pub y: i32,
    pub health: f32,
    pub hunger: f32,
    pub altruism: f32,
}

/// Columns whose lengths disagree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PopulationError {
    #[error("column `{column}` has length {actual}, expected {expected}")]
    ColumnLength {
        column: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("keep mask has length {actual}, population has {expected} agents")]
    MaskLength { expected: usize, actual: usize },
}

/// Struct-of-arrays storage for every living agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Population {
    x: Vec<i32>,
    y: Vec<i32>,
    health: Vec<f32>,
    hunger: Vec<f32>,
    altruism: Vec<f32>,
}

/// Mutable, length-locked view of every column.
pub struct ColumnsMut<'a> {
    pub x: &'a mut [i32],
    pub y: &'a mut [i32],
    pub health: &'a mut [f32],
    pub hunger: &'a mut [f32],
    pub altruism: &'a mut [f32],
}

impl Population {
    /// Empty population.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw columns, rejecting any length mismatch.
    pub fn from_columns(
        x: Vec<i32>,
        y: Vec<i32>,
        health: Vec<f32>,
        hunger: Vec<f32>,
        altruism: Vec<f32>,
    ) -> Result<Self, PopulationError> {
        let expected = x.len();
        for (column, actual) in [
            ("y", y.len()),
            ("health", health.len()),
            ("hunger", hunger.len()),
            ("altruism", altruism.len()),
        ] {
            if actual != expected {
                return Err(PopulationError::ColumnLength {
                    column,
                    expected,
                    actual,
                });
            }
        }
        Ok(Self {
            x,
            y,
            health,
            hunger,
            altruism,
        })
    }

    /// Build from agent rows, preserving their order.
    pub fn from_agents<I: IntoIterator<Item = AgentRecord>>(agents: I) -> Self {
        let mut pop = Self::new();
        for a in agents {
            pop.x.push(a.x);
            pop.y.push(a.y);
            pop.health.push(a.health);
            pop.hunger.push(a.hunger);
            pop.altruism.push(a.altruism);
        }
        pop
    }

    /// Initial population: uniform positions, fixed health, zero hunger and
    /// altruism drawn from a normal distribution clipped to [0, 1].
    ///
    /// Draws every x, then every y, then every altruism value.
    pub fn spawn_initial<R: Rng + ?Sized>(config: &SimConfig, rng: &mut R) -> Self {
        let n = config.initial_agents;
        let width = config.world_width as i32;
        let height = config.world_height as i32;

        let x = (0..n).map(|_| rng.gen_range(0..width)).collect();
        let y = (0..n).map(|_| rng.gen_range(0..height)).collect();
        let altruism = (0..n)
            .map(|_| {
                clipped_normal(
                    rng,
                    config.initial_altruism_mean,
                    config.initial_altruism_std,
                    0.0,
                    1.0,
                )
            })
            .collect();

        Self {
            x,
            y,
            health: vec![config.initial_health; n],
            hunger: vec![0.0; n],
            altruism,
        }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn x(&self) -> &[i32] {
        &self.x
    }

    pub fn y(&self) -> &[i32] {
        &self.y
    }

    pub fn health(&self) -> &[f32] {
        &self.health
    }

    pub fn hunger(&self) -> &[f32] {
        &self.hunger
    }

    pub fn altruism(&self) -> &[f32] {
        &self.altruism
    }

    /// Borrow all columns mutably at once; lengths cannot change through it.
    pub fn columns_mut(&mut self) -> ColumnsMut<'_> {
        ColumnsMut {
            x: &mut self.x,
            y: &mut self.y,
            health: &mut self.health,
            hunger: &mut self.hunger,
            altruism: &mut self.altruism,
        }
    }

    /// Agent at `index`, if any.
    pub fn get(&self, index: usize) -> Option<AgentRecord> {
        if index >= self.len() {
            return None;
        }
        Some(AgentRecord {
            x: self.x[index],
            y: self.y[index],
            health: self.health[index],
            hunger: self.hunger[index],
            altruism: self.altruism[index],
        })
    }

    /// Iterate agents in index order.
    pub fn iter(&self) -> impl Iterator<Item = AgentRecord> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    /// Keep only agents whose mask entry is `true`, compacting every column
    /// and preserving survivor order.
    pub fn filtered(self, keep: &[bool]) -> Result<Self, PopulationError> {
        if keep.len() != self.len() {
            return Err(PopulationError::MaskLength {
                expected: self.len(),
                actual: keep.len(),
            });
        }
        Ok(self.compact(keep))
    }

    /// Keep only agents satisfying `keep`, compacting every column and
    /// preserving survivor order.
    pub fn retain<F: FnMut(&AgentRecord) -> bool>(self, mut keep: F) -> Self {
        let mask: Vec<bool> = self.iter().map(|a| keep(&a)).collect();
        self.compact(&mask)
    }

    fn compact(self, keep: &[bool]) -> Self {
        Self {
            x: select(self.x, keep),
            y: select(self.y, keep),
            health: select(self.health, keep),
            hunger: select(self.hunger, keep),
            altruism: select(self.altruism, keep),
        }
    }

    /// Append `tail`'s agents after this population's, in order.
    pub fn concat(mut self, tail: Population) -> Self {
        self.x.extend(tail.x);
        self.y.extend(tail.y);
        self.health.extend(tail.health);
        self.hunger.extend(tail.hunger);
        self.altruism.extend(tail.altruism);
        self
    }

    pub fn total_health(&self) -> f32 {
        self.health.iter().sum()
    }

    /// Mean health, 0 for an empty population.
    pub fn mean_health(&self) -> f32 {
        mean(&self.health)
    }

    /// Mean altruism, 0 for an empty population.
    pub fn mean_altruism(&self) -> f32 {
        mean(&self.altruism)
    }

    /// True when every column has the same length.
    pub fn is_aligned(&self) -> bool {
        let n = self.x.len();
        self.y.len() == n
            && self.health.len() == n
            && self.hunger.len() == n
            && self.altruism.len() == n
    }
}

fn select<T: Copy>(column: Vec<T>, keep: &[bool]) -> Vec<T> {
    column
        .into_iter()
        .zip(keep)
        .filter_map(|(v, &k)| k.then_some(v))
        .collect()
}

fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f32>() / values.len() as f32
    }
}

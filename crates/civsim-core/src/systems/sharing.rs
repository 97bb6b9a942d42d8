//! Sharing system - altruistic agents feed a pooled transfer to the hungry

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::population::Population;

/// Result of one pooled sharing round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SharingOutcome {
    /// Agents that actually donated.
    pub donors: usize,
    /// Agents hungry enough to receive.
    pub recipients: usize,
    /// Health deducted from donors.
    pub pooled: f32,
    /// Health handed to recipients (0 when nobody qualified).
    pub delivered: f32,
}

impl SharingOutcome {
    /// Health donated but never delivered.
    pub fn lost(&self) -> f32 {
        self.pooled - self.delivered
    }
}

/// Pool donations from altruistic, healthy agents and split the pool evenly
/// among hungry agents.
///
/// Each agent gets exactly one uniform draw and is a candidate donor when the
/// draw falls below its altruism. Candidates above `share_min_health` give
/// `share_fraction` of their health. Donations are deducted before anything is
/// handed out, so a donor that is also a recipient receives its share on top
/// of its reduced health. With no recipients the pool is not refunded.
pub fn sharing_system<R: Rng + ?Sized>(
    pop: &mut Population,
    config: &SimConfig,
    rng: &mut R,
) -> SharingOutcome {
    let draws: Vec<f32> = (0..pop.len()).map(|_| rng.gen::<f32>()).collect();

    let cols = pop.columns_mut();
    let mut pooled = 0.0f32;
    let mut donors = 0;
    for ((health, &altruism), draw) in cols
        .health
        .iter_mut()
        .zip(cols.altruism.iter())
        .zip(draws)
    {
        if draw < altruism && *health > config.share_min_health {
            let donation = *health * config.share_fraction;
            *health -= donation;
            pooled += donation;
            donors += 1;
        }
    }

    let recipients: Vec<bool> = cols
        .hunger
        .iter()
        .map(|&h| h > config.hunger_threshold)
        .collect();
    let recipient_count = recipients.iter().filter(|&&r| r).count();

    let mut delivered = 0.0;
    if recipient_count > 0 && pooled > 0.0 {
        let share = pooled / recipient_count as f32;
        for (health, _) in cols
            .health
            .iter_mut()
            .zip(&recipients)
            .filter(|&(_, &r)| r)
        {
            *health += share;
        }
        delivered = pooled;
    }

    SharingOutcome {
        donors,
        recipients: recipient_count,
        pooled,
        delivered,
    }
}

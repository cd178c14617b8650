//! Score to difficulty tier resolution

use crate::tuning::{DifficultyTier, TierTable};

/// First tier (by table order) whose inclusive range contains `score`.
///
/// Returns `None` only for tables that fail [`TierTable::validate`].
pub fn resolve(score: u32, tiers: &TierTable) -> Option<(usize, &DifficultyTier)> {
    tiers.tiers().iter().enumerate().find(|(_, tier)| tier.contains(score))
}

//! Entity physics: gravity per tick, impulse per activation
//!
//! Positions grow downward. The entity is clamped to `[0, floor]` after
//! every mutation, so no caller ever observes it outside the field.

use super::state::Entity;
use crate::tuning::{DifficultyTier, Tuning};

/// Advance the entity by one tick of gravity and tilt recovery.
pub fn fall(entity: &mut Entity, tier: &DifficultyTier, tuning: &Tuning) {
    entity.position = (entity.position + tier.gravity).clamp(0.0, tuning.floor());
    entity.rotation = (entity.rotation + tier.gravity).clamp(-tuning.max_tilt, tuning.max_tilt);
}

/// Apply the upward impulse and snap nose-up.
pub fn flap(entity: &mut Entity, tuning: &Tuning) {
    entity.position = (entity.position - tuning.jump).clamp(0.0, tuning.floor());
    entity.rotation = -tuning.max_tilt;
}

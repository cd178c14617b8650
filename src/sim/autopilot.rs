//! Demo mode: a simple policy that plays the game
//!
//! Flaps at the lowest point that still clears the gap's top edge after
//! the impulse, which keeps the entity cycling inside the gap.

use super::state::{GameState, Phase};
use crate::tuning::Tuning;

/// Whether the demo player would activate this tick
pub fn should_flap(state: &GameState, tuning: &Tuning) -> bool {
    if state.phase != Phase::Running {
        return false;
    }
    let gravity = tuning.tiers.tier(state.tier_index).gravity;
    let bottom_line = state.obstacle.bottom_segment_top(tuning) - tuning.entity_height;
    let threshold = (state.obstacle.gap_top + tuning.jump + 1.0).min(bottom_line - gravity - 1.0);
    state.entity.position > threshold
}

//! Obstacle lane: one obstacle pair scrolling left and recycling
//!
//! A tick either moves the obstacle or, once it has passed fully beyond
//! the left edge (`x < -obstacle_width`), recycles it. Recycling sets a new
//! gap, respawns at `field_width + obstacle_width` and scores one point in
//! the same call, so no tick sees a half-updated obstacle.
//!
//! Gap distribution: `pct` is drawn uniformly from the tuning's
//! `gap_band.min_percent..=gap_band.max_percent` (integers, both
//! inclusive) and the gap top becomes `field_height * pct / 100`.

use std::ops::RangeInclusive;

use rand::Rng;

use super::state::Obstacle;
use crate::tuning::{DifficultyTier, Tuning};

/// Source of gap placement percentages
pub trait GapSource {
    /// Draw a percentage from `range` (inclusive). Must stay inside `range`.
    fn draw_percent(&mut self, range: RangeInclusive<u32>) -> u32;
}

impl<R: Rng> GapSource for R {
    fn draw_percent(&mut self, range: RangeInclusive<u32>) -> u32 {
        self.random_range(range)
    }
}

/// Replays a fixed sequence of percentages, cycling when exhausted.
///
/// Values outside the requested band are clamped into it.
#[derive(Debug, Clone)]
pub struct ScriptedGaps {
    percents: Vec<u32>,
    next: usize,
}

impl ScriptedGaps {
    pub fn new(percents: impl IntoIterator<Item = u32>) -> Self {
        Self {
            percents: percents.into_iter().collect(),
            next: 0,
        }
    }
}

impl GapSource for ScriptedGaps {
    fn draw_percent(&mut self, range: RangeInclusive<u32>) -> u32 {
        let (lo, hi) = (*range.start(), *range.end());
        if self.percents.is_empty() {
            return lo;
        }
        let pct = self.percents[self.next % self.percents.len()];
        self.next = self.next.wrapping_add(1);
        pct.clamp(lo, hi)
    }
}

/// Outcome of a lane tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LaneStep {
    Moved,
    Recycled { gap_top: f32 },
}

/// Advance the obstacle one tick, recycling and scoring when it has left the field.
pub fn advance<G: GapSource + ?Sized>(
    obstacle: &mut Obstacle,
    score: &mut u32,
    tier: &DifficultyTier,
    tuning: &Tuning,
    gaps: &mut G,
) -> LaneStep {
    if obstacle.x >= -tuning.obstacle_width {
        obstacle.x -= tier.obstacle_speed;
        return LaneStep::Moved;
    }

    let pct = gaps.draw_percent(tuning.gap_band.percent_range());
    let gap_top = tuning.gap_band.top_for(pct, tuning.field.height());

    obstacle.gap_top = gap_top;
    obstacle.x = tuning.obstacle_spawn_x();
    *score = score.saturating_add(1);

    log::debug!("Obstacle recycled: score={}, gap_top={} ({}%)", score, gap_top, pct);
    LaneStep::Recycled { gap_top }
}

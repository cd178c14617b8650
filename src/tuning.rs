//! Data-driven game balance
//!
//! [`Tuning`] is constructed once per session and passed by reference to
//! every simulation component. Nothing in the simulation reads global
//! configuration, so several tier tables can be exercised side by side.

use std::ops::RangeInclusive;
use std::path::Path;
use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::between;
use crate::consts::*;

/// Difficulty tier names, warm-up first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TierKind {
    Start,
    Easy,
    Medium,
    Hard,
    UltraHard,
}

impl TierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TierKind::Start => "Start",
            TierKind::Easy => "Easy",
            TierKind::Medium => "Medium",
            TierKind::Hard => "Hard",
            TierKind::UltraHard => "Ultra Hard",
        }
    }
}

/// One difficulty bracket: an inclusive score range and its rates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyTier {
    pub kind: TierKind,
    /// Lowest score in this tier (inclusive)
    pub min: u32,
    /// Highest score in this tier (inclusive); `None` means open-ended
    #[serde(default)]
    pub max: Option<u32>,
    /// Entity fall per tick, also the per-tick tilt recovery
    pub gravity: f32,
    /// Obstacle travel per tick
    pub obstacle_speed: f32,
}

impl DifficultyTier {
    pub fn new(kind: TierKind, min: u32, max: Option<u32>, gravity: f32, obstacle_speed: f32) -> Self {
        Self {
            kind,
            min,
            max,
            gravity,
            obstacle_speed,
        }
    }

    /// Whether `score` falls in `[min, max]` (both ends inclusive)
    #[inline]
    pub fn contains(&self, score: u32) -> bool {
        score >= self.min && self.max.is_none_or(|max| score <= max)
    }
}

/// Ordered tier set covering every non-negative score exactly once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierTable {
    tiers: Vec<DifficultyTier>,
}

impl Default for TierTable {
    fn default() -> Self {
        Self::classic()
    }
}

impl TierTable {
    pub fn new(tiers: Vec<DifficultyTier>) -> Self {
        Self { tiers }
    }

    /// Constant gravity; only obstacle speed scales with score.
    pub fn classic() -> Self {
        Self::new(vec![
            DifficultyTier::new(TierKind::Start, 0, Some(1), 6.0, 4.0),
            DifficultyTier::new(TierKind::Easy, 2, Some(5), 6.0, 5.0),
            DifficultyTier::new(TierKind::Medium, 6, Some(10), 6.0, 6.0),
            DifficultyTier::new(TierKind::Hard, 11, Some(20), 6.0, 7.0),
            DifficultyTier::new(TierKind::UltraHard, 21, None, 6.0, 8.0),
        ])
    }

    /// Gravity and obstacle speed both scale with score.
    pub fn arcade() -> Self {
        Self::new(vec![
            DifficultyTier::new(TierKind::Start, 0, Some(1), 4.0, 4.0),
            DifficultyTier::new(TierKind::Easy, 2, Some(5), 5.0, 5.0),
            DifficultyTier::new(TierKind::Medium, 6, Some(10), 6.0, 6.0),
            DifficultyTier::new(TierKind::Hard, 11, Some(20), 7.0, 7.0),
            DifficultyTier::new(TierKind::UltraHard, 21, None, 8.0, 8.0),
        ])
    }

    /// Index of the warm-up tier every session opens with
    pub const WARM_UP: usize = 0;

    /// Tier at `index`. Indices come from [`crate::sim::difficulty::resolve`]
    /// on a validated table, so they are always in range.
    pub fn tier(&self, index: usize) -> &DifficultyTier {
        &self.tiers[index]
    }

    pub fn tiers(&self) -> &[DifficultyTier] {
        &self.tiers
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Check that tiers are contiguous, start at 0 and end open-ended.
    pub fn validate(&self) -> Result<(), TuningError> {
        let first = self.tiers.first().ok_or(TuningError::EmptyTierTable)?;
        if first.min != 0 {
            return Err(TuningError::FirstTierNotZero {
                tier: first.kind,
                min: first.min,
            });
        }

        for tier in &self.tiers {
            if let Some(max) = tier.max {
                if max < tier.min {
                    return Err(TuningError::InvertedRange {
                        tier: tier.kind,
                        min: tier.min,
                        max,
                    });
                }
            }
            let finite = tier.gravity.is_finite() && tier.obstacle_speed.is_finite();
            if !(finite && tier.gravity > 0.0 && tier.obstacle_speed > 0.0) {
                return Err(TuningError::NonPositiveRate { tier: tier.kind });
            }
        }

        for pair in self.tiers.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            let Some(prev_max) = prev.max else {
                return Err(TuningError::OpenTierNotLast { tier: prev.kind });
            };
            let expected = prev_max.checked_add(1);
            if expected != Some(next.min) {
                return Err(TuningError::NotContiguous {
                    prev: prev.kind,
                    next: next.kind,
                    expected: expected.unwrap_or(u32::MAX),
                    found: next.min,
                });
            }
        }

        match self.tiers.last() {
            Some(last) if last.max.is_some() => Err(TuningError::LastTierClosed { tier: last.kind }),
            _ => Ok(()),
        }
    }
}

/// Fixed play field size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayField {
    pub size: Vec2,
}

impl Default for PlayField {
    fn default() -> Self {
        Self::new(FIELD_WIDTH, FIELD_HEIGHT)
    }
}

impl PlayField {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.y
    }
}

/// Band of field height (integer percentages, inclusive) a recycled gap top is drawn from.
///
/// The draw is `pct` uniform over `min_percent..=max_percent`, then
/// `gap_top = field_height * pct / 100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapBand {
    pub min_percent: u32,
    pub max_percent: u32,
}

impl Default for GapBand {
    fn default() -> Self {
        Self {
            min_percent: GAP_MIN_PERCENT,
            max_percent: GAP_MAX_PERCENT,
        }
    }
}

impl GapBand {
    pub fn percent_range(&self) -> RangeInclusive<u32> {
        self.min_percent..=self.max_percent
    }

    /// Gap top height for a drawn percentage
    #[inline]
    pub fn top_for(&self, percent: u32, field_height: f32) -> f32 {
        field_height * percent as f32 / 100.0
    }

    /// Lowest and highest gap top this band can produce
    pub fn bounds(&self, field_height: f32) -> (f32, f32) {
        (
            self.top_for(self.min_percent, field_height),
            self.top_for(self.max_percent, field_height),
        )
    }
}

/// Horizontal band where the obstacle is tested against the entity.
///
/// Bounds may be authored in either order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriggerZone {
    pub start: f32,
    pub end: f32,
}

impl Default for TriggerZone {
    fn default() -> Self {
        Self {
            start: LEFT_PADDING,
            end: LEFT_PADDING + ENTITY_WIDTH,
        }
    }
}

impl TriggerZone {
    #[inline]
    pub fn contains(&self, x: f32) -> bool {
        between(x, self.start, self.end)
    }

    /// Normalized `(min, max)`
    pub fn bounds(&self) -> (f32, f32) {
        (self.start.min(self.end), self.start.max(self.end))
    }
}

/// Complete session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub field: PlayField,
    /// Entity distance from the field's left edge (rendering only)
    pub left_padding: f32,

    // === Entity ===
    pub entity_width: f32,
    pub entity_height: f32,
    /// Vertical position on session start
    pub entity_start: f32,
    /// Upward impulse per activation
    pub jump: f32,
    /// Rotation extreme in degrees (nose-up is negative)
    pub max_tilt: f32,

    // === Obstacle ===
    pub obstacle_width: f32,
    /// Vertical space between top and bottom segments
    pub gap_size: f32,
    /// Gap top on session start
    pub initial_gap_top: f32,
    pub gap_band: GapBand,
    pub trigger_zone: TriggerZone,

    // === Scheduling ===
    pub tick_interval_ms: u32,
    pub max_substeps: u32,

    pub tiers: TierTable,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field: PlayField::default(),
            left_padding: LEFT_PADDING,

            entity_width: ENTITY_WIDTH,
            entity_height: ENTITY_HEIGHT,
            entity_start: ENTITY_START,
            jump: JUMP,
            max_tilt: MAX_TILT,

            obstacle_width: OBSTACLE_WIDTH,
            gap_size: GAP_SIZE,
            initial_gap_top: INITIAL_GAP_TOP,
            gap_band: GapBand::default(),
            trigger_zone: TriggerZone::default(),

            tick_interval_ms: TICK_INTERVAL_MS,
            max_substeps: MAX_SUBSTEPS,

            tiers: TierTable::classic(),
        }
    }
}

impl Tuning {
    /// Default geometry with the score-scaled gravity table
    pub fn arcade() -> Self {
        Self {
            tiers: TierTable::arcade(),
            ..Self::default()
        }
    }

    /// Lowest vertical position the entity may occupy (floor)
    #[inline]
    pub fn floor(&self) -> f32 {
        self.field.height() - self.entity_height
    }

    /// Highest legal gap top
    #[inline]
    pub fn max_gap_top(&self) -> f32 {
        self.field.height() - self.gap_size
    }

    /// Horizontal position an obstacle is parked at / recycled to
    #[inline]
    pub fn obstacle_spawn_x(&self) -> f32 {
        self.field.width() + self.obstacle_width
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.tick_interval_ms))
    }

    /// Parse a JSON override; omitted fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject geometry or tier tables the simulation cannot run on.
    pub fn validate(&self) -> Result<(), TuningError> {
        let lengths = [
            ("field.width", self.field.width()),
            ("field.height", self.field.height()),
            ("left_padding", self.left_padding),
            ("entity_width", self.entity_width),
            ("entity_height", self.entity_height),
            ("entity_start", self.entity_start),
            ("jump", self.jump),
            ("max_tilt", self.max_tilt),
            ("obstacle_width", self.obstacle_width),
            ("gap_size", self.gap_size),
            ("initial_gap_top", self.initial_gap_top),
            ("trigger_zone.start", self.trigger_zone.start),
            ("trigger_zone.end", self.trigger_zone.end),
        ];
        if let Some(&(field, _)) = lengths.iter().find(|(_, v)| !v.is_finite()) {
            return Err(TuningError::NonFinite { field });
        }

        let (width, height) = (self.field.width(), self.field.height());
        if !(width > 0.0 && height > 0.0) {
            return Err(TuningError::InvalidField { width, height });
        }
        if !(self.entity_height > 0.0 && self.entity_height < height) {
            return Err(TuningError::EntityTooTall {
                entity_height: self.entity_height,
                height,
            });
        }
        if !between(self.entity_start, 0.0, self.floor()) {
            return Err(TuningError::EntityStartOutOfField {
                start: self.entity_start,
            });
        }
        if !(self.gap_size > 0.0 && self.gap_size <= height) {
            return Err(TuningError::GapTooLarge {
                gap_size: self.gap_size,
                height,
            });
        }
        let (lowest, highest) = self.gap_band.bounds(height);
        if self.gap_band.min_percent > self.gap_band.max_percent || lowest < 0.0 || highest > self.max_gap_top() {
            return Err(TuningError::GapBandOutOfField {
                min_percent: self.gap_band.min_percent,
                max_percent: self.gap_band.max_percent,
            });
        }
        if !between(self.initial_gap_top, 0.0, self.max_gap_top()) {
            return Err(TuningError::InitialGapOutOfField {
                gap_top: self.initial_gap_top,
            });
        }
        if self.jump < 0.0 || self.max_tilt < 0.0 || self.obstacle_width <= 0.0 {
            return Err(TuningError::NegativeGeometry);
        }
        if self.tick_interval_ms == 0 || self.max_substeps == 0 {
            return Err(TuningError::ZeroTickInterval);
        }
        self.tiers.validate()?;

        // A tier that moves further per tick than the zone is wide can skip it entirely
        let (zone_lo, zone_hi) = self.trigger_zone.bounds();
        let zone_width = zone_hi - zone_lo;
        match self.tiers.tiers().iter().find(|t| t.obstacle_speed > zone_width) {
            Some(tier) => Err(TuningError::TriggerZoneTooNarrow {
                tier: tier.kind,
                speed: tier.obstacle_speed,
                zone_width,
            }),
            None => Ok(()),
        }
    }
}

/// Configuration defects. The simulation itself has no runtime errors.
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read tuning: {0}")]
    Io(#[from] std::io::Error),

    #[error("tier table is empty")]
    EmptyTierTable,
    #[error("first tier {tier:?} starts at {min}, expected 0")]
    FirstTierNotZero { tier: TierKind, min: u32 },
    #[error("tier {tier:?} has inverted range {min}..={max}")]
    InvertedRange { tier: TierKind, min: u32, max: u32 },
    #[error("tier {tier:?} must have finite, positive gravity and obstacle speed")]
    NonPositiveRate { tier: TierKind },
    #[error("open-ended tier {tier:?} is not the last tier")]
    OpenTierNotLast { tier: TierKind },
    #[error("tier {next:?} starts at {found}, expected {expected} after {prev:?}")]
    NotContiguous {
        prev: TierKind,
        next: TierKind,
        expected: u32,
        found: u32,
    },
    #[error("last tier {tier:?} must be open-ended")]
    LastTierClosed { tier: TierKind },

    #[error("play field {width}x{height} must be positive")]
    InvalidField { width: f32, height: f32 },
    #[error("entity height {entity_height} does not fit field height {height}")]
    EntityTooTall { entity_height: f32, height: f32 },
    #[error("entity start {start} is outside the field")]
    EntityStartOutOfField { start: f32 },
    #[error("gap size {gap_size} does not fit field height {height}")]
    GapTooLarge { gap_size: f32, height: f32 },
    #[error("gap band {min_percent}%..={max_percent}% leaves the field")]
    GapBandOutOfField { min_percent: u32, max_percent: u32 },
    #[error("initial gap top {gap_top} leaves the field")]
    InitialGapOutOfField { gap_top: f32 },
    #[error("jump, tilt and obstacle width must not be negative")]
    NegativeGeometry,
    #[error("tick interval and substep cap must be non-zero")]
    ZeroTickInterval,
    #[error("{field} must be finite")]
    NonFinite { field: &'static str },
    #[error("tier {tier:?} moves {speed} per tick, more than the {zone_width} wide trigger zone")]
    TriggerZoneTooNarrow {
        tier: TierKind,
        speed: f32,
        zone_width: f32,
    },
}

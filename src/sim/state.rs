//! Game state and core simulation types
//!
//! Everything a frame needs to be redrawn lives here; presentation reads it
//! through [`Snapshot`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::{TierKind, TierTable, Tuning};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the first activation; entity and obstacle parked
    #[default]
    Idle,
    /// Tick scheduler active
    Running,
    /// Crashed; last frame retained for display
    Ended,
}

/// The falling entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Top edge, measured downward from the ceiling
    pub position: f32,
    /// Cosmetic tilt in degrees, negative is nose-up
    pub rotation: f32,
}

impl Entity {
    pub fn parked(tuning: &Tuning) -> Self {
        Self {
            position: tuning.entity_start,
            rotation: 0.0,
        }
    }

    /// Top-left corner in field coordinates
    pub fn origin(&self, tuning: &Tuning) -> Vec2 {
        Vec2::new(tuning.left_padding, self.position)
    }
}

/// The single obstacle pair (top and bottom segment sharing one x)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Left edge; decreases each tick and wraps on recycle
    pub x: f32,
    /// Height of the top segment (the gap starts here)
    pub gap_top: f32,
}

impl Obstacle {
    /// Obstacle parked just off the right edge of the field
    pub fn parked(tuning: &Tuning) -> Self {
        Self {
            x: tuning.obstacle_spawn_x(),
            gap_top: tuning.initial_gap_top,
        }
    }

    /// Height of the bottom segment
    #[inline]
    pub fn gap_bottom_height(&self, tuning: &Tuning) -> f32 {
        tuning.field.height() - tuning.gap_size - self.gap_top
    }

    /// Top edge of the bottom segment
    #[inline]
    pub fn bottom_segment_top(&self, tuning: &Tuning) -> f32 {
        self.gap_top + tuning.gap_size
    }
}

/// Things that happened during a tick or action, drained by presentation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A fresh session began
    Started,
    /// Upward impulse applied
    Flapped,
    /// Obstacle recycled
    Scored { score: u32 },
    /// Difficulty tier changed after a score
    TierChanged { tier: TierKind },
    /// Collision ended the run
    Crashed { segment: Segment, score: u32 },
    /// Returned to idle
    Reset,
}

/// Which obstacle segment was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Segment {
    Top,
    Bottom,
}

/// Complete session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: Phase,
    pub entity: Entity,
    pub obstacle: Obstacle,
    /// Obstacles passed this session
    pub score: u32,
    /// Index into the tuning's tier table
    pub tier_index: usize,
    /// Ticks run this session
    pub time_ticks: u64,
    /// Pending events (not part of the frame)
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Idle state: entity and obstacle parked, score 0, warm-up tier
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            phase: Phase::Idle,
            entity: Entity::parked(tuning),
            obstacle: Obstacle::parked(tuning),
            score: 0,
            tier_index: TierTable::WARM_UP,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Re-initialize every per-session field, keeping the event queue
    pub fn reinitialize(&mut self, tuning: &Tuning) {
        let events = std::mem::take(&mut self.events);
        *self = Self::new(tuning);
        self.events = events;
    }

    pub fn snapshot(&self, tuning: &Tuning) -> Snapshot {
        Snapshot {
            entity_position: self.entity.position,
            entity_rotation: self.entity.rotation,
            entity_origin: self.entity.origin(tuning),
            obstacle_x: self.obstacle.x,
            obstacle_gap_top: self.obstacle.gap_top,
            obstacle_gap_bottom: self.obstacle.gap_bottom_height(tuning),
            score: self.score,
            phase: self.phase,
            tier: tuning.tiers.tier(self.tier_index).kind,
            time_ticks: self.time_ticks,
        }
    }
}

/// Read-only frame view for rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub entity_position: f32,
    pub entity_rotation: f32,
    pub entity_origin: Vec2,
    pub obstacle_x: f32,
    pub obstacle_gap_top: f32,
    pub obstacle_gap_bottom: f32,
    pub score: u32,
    pub phase: Phase,
    pub tier: TierKind,
    pub time_ticks: u64,
}

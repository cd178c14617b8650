//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Fixed tick interval only
//! - Injected gap source only (seeded RNG or scripted)
//! - Fixed per-tick order: physics, lane, collision, difficulty
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod clock;
pub mod collision;
pub mod difficulty;
pub mod lane;
pub mod physics;
pub mod run;
pub mod state;
pub mod tick;

pub use clock::FixedStep;
pub use collision::{check, hit_segment};
pub use lane::{GapSource, LaneStep, ScriptedGaps};
pub use run::Run;
pub use state::{Entity, GameEvent, GameState, Obstacle, Phase, Segment, Snapshot};
pub use tick::{TickOutcome, tick};

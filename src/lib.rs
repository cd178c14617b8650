//! Flappy Core - simulation core for a side-scrolling flappy obstacle game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacle lane, collisions, run state)
//! - `tuning`: Data-driven game balance (field geometry, difficulty tiers)
//!
//! Rendering, input binding and assets belong to the presentation layer,
//! which drives a [`sim::Run`] through `activate()`/`reset()` and draws
//! from its [`sim::Snapshot`].

pub mod sim;
pub mod tuning;

pub use sim::{Phase, Run, Snapshot};
pub use tuning::{DifficultyTier, TierKind, TierTable, Tuning, TuningError};

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Fixed tick interval in milliseconds
    pub const TICK_INTERVAL_MS: u32 = 24;
    /// Maximum ticks released per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Play field dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 500.0;
    /// Horizontal offset of the entity from the field's left edge
    pub const LEFT_PADDING: f32 = 5.0 * FIELD_HEIGHT / 100.0;

    /// Entity defaults
    pub const ENTITY_WIDTH: f32 = 5.0 * FIELD_WIDTH / 100.0;
    pub const ENTITY_HEIGHT: f32 = 5.0 * FIELD_WIDTH / 100.0;
    pub const ENTITY_START: f32 = 20.0 * FIELD_HEIGHT / 100.0;
    /// Upward impulse applied per activation
    pub const JUMP: f32 = 15.0 * FIELD_HEIGHT / 100.0;
    /// Nose-up / nose-down tilt extreme (degrees)
    pub const MAX_TILT: f32 = 20.0;

    /// Obstacle defaults
    pub const OBSTACLE_WIDTH: f32 = 10.0 * FIELD_WIDTH / 100.0;
    pub const GAP_SIZE: f32 = 25.0 * FIELD_HEIGHT / 100.0;
    pub const INITIAL_GAP_TOP: f32 = 60.0 * FIELD_HEIGHT / 100.0;
    /// Gap top is drawn from this inclusive percentage band of field height
    pub const GAP_MIN_PERCENT: u32 = 15;
    pub const GAP_MAX_PERCENT: u32 = 60;
}

/// Closed-interval test with order-independent bounds.
///
/// `between(x, a, b)` holds iff `min(a, b) <= x <= max(a, b)`.
#[inline]
pub fn between(x: f32, a: f32, b: f32) -> bool {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    x >= lo && x <= hi
}

//! Fixed-rate tick scheduler
//!
//! Real frame time is accumulated and released as whole ticks of the
//! configured interval. Disarming drops any accumulated time, so a tick
//! that was due but not yet run can never fire after the run stops.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct FixedStep {
    step: Duration,
    max_substeps: u32,
    accumulator: Duration,
    substeps: u32,
    armed: bool,
}

impl FixedStep {
    pub fn new(step: Duration, max_substeps: u32) -> Self {
        Self {
            step,
            max_substeps,
            accumulator: Duration::ZERO,
            substeps: 0,
            armed: false,
        }
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Start releasing ticks from a clean accumulator
    pub fn arm(&mut self) {
        self.armed = true;
        self.accumulator = Duration::ZERO;
        self.substeps = 0;
    }

    /// Stop releasing ticks and cancel any that were pending
    pub fn disarm(&mut self) {
        self.armed = false;
        self.accumulator = Duration::ZERO;
        self.substeps = 0;
    }

    /// Add a frame's elapsed time. Clamped so a long stall cannot queue
    /// more than one frame's worth of substeps.
    pub fn begin_frame(&mut self, elapsed: Duration) {
        self.substeps = 0;
        if !self.armed {
            return;
        }
        let cap = self.step.saturating_mul(self.max_substeps);
        self.accumulator = self.accumulator.saturating_add(elapsed).min(cap);
    }

    /// Consume one due tick, if any remain for this frame
    pub fn take_tick(&mut self) -> bool {
        if !self.armed || self.substeps >= self.max_substeps || self.accumulator < self.step {
            return false;
        }
        self.accumulator -= self.step;
        self.substeps += 1;
        true
    }

    /// Time accumulated toward the next tick
    pub fn pending(&self) -> Duration {
        self.accumulator
    }
}

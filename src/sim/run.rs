//! Run state machine
//!
//! `Idle` and `Ended` both accept the activate action, which re-initializes
//! the session and enters `Running`. While running, activate only flaps.
//! A collision is the only way out of `Running`; it disarms the scheduler
//! in the same call, so nothing mutates the frozen crash frame afterwards.

use std::time::Duration;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::clock::FixedStep;
use super::lane::GapSource;
use super::physics;
use super::state::{GameEvent, GameState, Phase, Snapshot};
use super::tick::{TickOutcome, tick};
use crate::tuning::{DifficultyTier, TierTable, Tuning, TuningError};

/// One player's run: validated tuning, session state, scheduler and gap source
#[derive(Debug, Clone)]
pub struct Run<G: GapSource = Pcg32> {
    tuning: Tuning,
    state: GameState,
    clock: FixedStep,
    gaps: G,
    /// Sessions started since construction
    sessions: u32,
}

impl Run<Pcg32> {
    /// Create a run whose gap placement is seeded from `seed`
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        Self::with_gaps(tuning, Pcg32::seed_from_u64(seed))
    }
}

impl<G: GapSource> Run<G> {
    /// Create a run with an injected gap source
    pub fn with_gaps(tuning: Tuning, gaps: G) -> Result<Self, TuningError> {
        tuning.validate()?;
        let state = GameState::new(&tuning);
        let clock = FixedStep::new(tuning.tick_interval(), tuning.max_substeps);
        Ok(Self {
            tuning,
            state,
            clock,
            gaps,
            sessions: 0,
        })
    }

    /// The single input action (click/key/tap)
    pub fn activate(&mut self) {
        match self.state.phase {
            Phase::Idle | Phase::Ended => self.begin(),
            Phase::Running => {
                physics::flap(&mut self.state.entity, &self.tuning);
                self.state.events.push(GameEvent::Flapped);
            }
        }
    }

    /// Back to `Idle`: scheduler stopped, everything parked
    pub fn reset(&mut self) {
        self.clock.disarm();
        self.state.reinitialize(&self.tuning);
        self.state.events.push(GameEvent::Reset);
        log::info!("Run reset to idle");
    }

    fn begin(&mut self) {
        self.state.reinitialize(&self.tuning);
        self.state.tier_index = TierTable::WARM_UP;
        self.state.phase = Phase::Running;
        self.state.events.push(GameEvent::Started);
        self.clock.arm();
        self.sessions += 1;
        log::info!(
            "Session {} started ({} tier, tick {:?})",
            self.sessions,
            self.tier().kind.as_str(),
            self.clock.step()
        );
    }

    /// Run exactly one tick, bypassing the scheduler's timing
    pub fn tick(&mut self) -> TickOutcome {
        let outcome = tick(&mut self.state, &self.tuning, &mut self.gaps);
        if let TickOutcome::Crashed { .. } = outcome {
            self.clock.disarm();
        }
        outcome
    }

    /// Feed a frame's elapsed real time; runs every tick that came due.
    /// Returns the number of ticks run.
    pub fn update(&mut self, elapsed: Duration) -> u32 {
        self.clock.begin_frame(elapsed);
        let mut ticks = 0;
        while self.clock.take_tick() {
            self.tick();
            ticks += 1;
        }
        ticks
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot(&self.tuning)
    }

    /// Take all events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn tier(&self) -> &DifficultyTier {
        self.tuning.tiers.tier(self.state.tier_index)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn sessions(&self) -> u32 {
        self.sessions
    }

    /// Whether the tick scheduler is releasing ticks
    pub fn is_scheduler_active(&self) -> bool {
        self.clock.is_armed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::lane::ScriptedGaps;
    use crate::sim::state::{Obstacle, Segment};
    use crate::tuning::{TierKind, TriggerZone};
    use proptest::prelude::*;

    const FRAME: Duration = Duration::from_millis(24);

    /// Tuning whose trigger zone the obstacle can never reach
    fn no_collisions() -> Tuning {
        Tuning {
            trigger_zone: TriggerZone {
                start: -10_000.0,
                end: -9_000.0,
            },
            ..Tuning::default()
        }
    }

    fn scripted(tuning: Tuning) -> Run<ScriptedGaps> {
        Run::with_gaps(tuning, ScriptedGaps::new([20, 45, 60, 15])).unwrap()
    }

    #[test]
    fn test_new_run_is_idle() {
        let run = Run::new(Tuning::default(), 7).unwrap();
        assert_eq!(run.phase(), Phase::Idle);
        assert!(!run.is_scheduler_active());
        assert_eq!(run.score(), 0);
        assert_eq!(run.tier().kind, TierKind::Start);
    }

    #[test]
    fn test_invalid_tuning_rejected() {
        let mut tuning = Tuning::default();
        tuning.tick_interval_ms = 0;
        assert!(matches!(Run::new(tuning, 1), Err(TuningError::ZeroTickInterval)));
    }

    #[test]
    fn test_tier_faster_than_trigger_zone_rejected() {
        let mut tuning = Tuning::default();
        tuning.trigger_zone.end = tuning.trigger_zone.start + 5.0;
        assert!(matches!(
            Run::new(tuning, 1),
            Err(TuningError::TriggerZoneTooNarrow {
                tier: TierKind::Medium,
                ..
            })
        ));
    }

    #[test]
    fn test_huge_frame_after_partial_frame_is_capped() {
        let mut run = scripted(no_collisions());
        run.activate();
        assert_eq!(run.update(Duration::from_millis(10)), 0);
        assert_eq!(run.update(Duration::MAX), run.tuning().max_substeps);
        assert_eq!(run.phase(), Phase::Running);
    }

    #[test]
    fn test_idle_does_not_tick() {
        let mut run = Run::new(Tuning::default(), 7).unwrap();
        let before = run.snapshot();
        assert_eq!(run.update(Duration::from_secs(1)), 0);
        assert_eq!(run.tick(), TickOutcome::Skipped);
        assert_eq!(run.snapshot(), before);
    }

    #[test]
    fn test_activate_from_idle_starts_running() {
        let mut run = Run::new(Tuning::default(), 7).unwrap();
        run.activate();
        assert_eq!(run.phase(), Phase::Running);
        assert!(run.is_scheduler_active());
        assert_eq!(run.score(), 0);
        assert_eq!(run.tier().kind, TierKind::Start);
        assert_eq!(run.drain_events(), vec![GameEvent::Started]);
        assert_eq!(run.sessions(), 1);
    }

    #[test]
    fn test_activate_while_running_only_flaps() {
        let mut run = scripted(no_collisions());
        run.activate();
        let jump = run.tuning().jump;
        let mut expected = run.tuning().entity_start;

        for _ in 0..4 {
            run.activate();
            expected = (expected - jump).max(0.0);
            assert_eq!(run.phase(), Phase::Running);
            assert_eq!(run.snapshot().entity_position, expected);
        }
        assert_eq!(expected, 0.0);
        assert_eq!(run.snapshot().entity_rotation, -run.tuning().max_tilt);
        assert_eq!(run.sessions(), 1);
    }

    #[test]
    fn test_crash_stops_scheduler_and_freezes_state() {
        let mut run = scripted(Tuning::default());
        run.activate();

        // Let the entity sink to the floor and wait for the obstacle
        let mut crashed = None;
        for _ in 0..10_000 {
            if let TickOutcome::Crashed { segment } = run.tick() {
                crashed = Some(segment);
                break;
            }
        }
        assert_eq!(crashed, Some(Segment::Bottom));
        assert_eq!(run.phase(), Phase::Ended);
        assert!(!run.is_scheduler_active());

        let frozen = run.snapshot();
        assert_eq!(run.update(Duration::from_secs(2)), 0);
        assert_eq!(run.tick(), TickOutcome::Skipped);
        assert_eq!(run.snapshot(), frozen);
    }

    #[test]
    fn test_crash_mid_frame_cancels_remaining_ticks() {
        let mut run = scripted(Tuning::default());
        run.activate();
        // Obstacle two ticks from the zone's right edge, entity on the ceiling
        run.state.obstacle = Obstacle {
            x: run.tuning.trigger_zone.end + 8.0,
            gap_top: 300.0,
        };
        run.state.entity.position = 0.0;

        let ran = run.update(FRAME * 8);
        assert_eq!(ran, 2);
        assert_eq!(run.phase(), Phase::Ended);
        assert_eq!(run.state().time_ticks, 2);
    }

    #[test]
    fn test_activate_after_crash_restarts_fresh() {
        let mut run = scripted(Tuning::default());
        run.activate();
        run.state.score = 12;
        run.state.tier_index = 3;
        run.state.phase = Phase::Ended;
        run.clock.disarm();
        run.drain_events();

        run.activate();
        assert_eq!(run.phase(), Phase::Running);
        assert_eq!(run.score(), 0);
        assert_eq!(run.tier().kind, TierKind::Start);
        assert_eq!(run.state().time_ticks, 0);
        assert_eq!(run.snapshot().entity_position, run.tuning().entity_start);
        assert_eq!(run.snapshot().obstacle_x, run.tuning().obstacle_spawn_x());
        assert!(run.is_scheduler_active());
        assert_eq!(run.drain_events(), vec![GameEvent::Started]);
        assert_eq!(run.sessions(), 2);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut run = scripted(no_collisions());
        run.activate();
        run.update(FRAME * 5);
        run.reset();
        assert_eq!(run.phase(), Phase::Idle);
        assert!(!run.is_scheduler_active());
        assert_eq!(run.snapshot().entity_position, run.tuning().entity_start);
        assert_eq!(run.update(FRAME * 5), 0);
        assert_eq!(run.drain_events().last(), Some(&GameEvent::Reset));
    }

    #[test]
    fn test_recycle_scenario() {
        let mut run = scripted(no_collisions());
        run.activate();
        run.state.obstacle.x = -run.tuning.obstacle_width - 0.5;

        assert_eq!(run.tick(), TickOutcome::Scored { score: 1 });
        let snap = run.snapshot();
        assert_eq!(snap.obstacle_x, run.tuning().field.width() + run.tuning().obstacle_width);
        assert_eq!(snap.obstacle_gap_top, 100.0);
        assert_eq!(snap.score, 1);
    }

    #[test]
    fn test_difficulty_climbs_with_score() {
        let mut run = scripted(no_collisions());
        run.activate();
        let mut seen = vec![run.tier().kind];
        for _ in 0..200_000 {
            run.tick();
            if seen.last() != Some(&run.tier().kind) {
                seen.push(run.tier().kind);
            }
            if run.score() >= 21 {
                break;
            }
        }
        assert_eq!(
            seen,
            vec![
                TierKind::Start,
                TierKind::Easy,
                TierKind::Medium,
                TierKind::Hard,
                TierKind::UltraHard
            ]
        );
    }

    proptest! {
        #[test]
        fn prop_one_point_per_recycle_under_variable_frames(
            frames in proptest::collection::vec(0u64..200, 1..400),
        ) {
            let mut run = scripted(no_collisions());
            run.activate();
            run.drain_events();
            let mut expected = 0u32;
            for ms in frames {
                run.update(Duration::from_millis(ms));
                for event in run.drain_events() {
                    if let GameEvent::Scored { score } = event {
                        expected += 1;
                        prop_assert_eq!(score, expected);
                    }
                }
                prop_assert_eq!(run.score(), expected);
            }
        }

        #[test]
        fn prop_entity_stays_in_field(
            seed in any::<u64>(),
            frames in proptest::collection::vec((0u64..100, any::<bool>()), 1..300),
        ) {
            let mut run = Run::new(Tuning::arcade(), seed).unwrap();
            run.activate();
            let floor = run.tuning().floor();
            for (ms, flap) in frames {
                if flap {
                    run.activate();
                }
                run.update(Duration::from_millis(ms));
                let snap = run.snapshot();
                prop_assert!(snap.entity_position >= 0.0 && snap.entity_position <= floor);
                prop_assert_eq!(snap.phase == Phase::Running, run.is_scheduler_active());
            }
        }
    }
}

//! Fixed timestep simulation tick
//!
//! One authoritative tick drives every subsystem in a fixed order:
//! physics, obstacle lane, collision, difficulty. A recycle always emits its
//! score event; a collision then ends the run and skips the difficulty update.

use super::collision::hit_segment;
use super::difficulty;
use super::lane::{self, GapSource, LaneStep};
use super::physics;
use super::state::{GameEvent, GameState, Phase, Segment};
use crate::tuning::Tuning;

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Not running; nothing changed
    Skipped,
    Advanced,
    Scored { score: u32 },
    Crashed { segment: Segment },
}

/// Advance a running session by one tick.
pub fn tick<G: GapSource + ?Sized>(state: &mut GameState, tuning: &Tuning, gaps: &mut G) -> TickOutcome {
    if state.phase != Phase::Running {
        return TickOutcome::Skipped;
    }

    state.time_ticks += 1;
    let tier = tuning.tiers.tier(state.tier_index);

    physics::fall(&mut state.entity, tier, tuning);
    let step = lane::advance(&mut state.obstacle, &mut state.score, tier, tuning, gaps);
    let scored = matches!(step, LaneStep::Recycled { .. });
    if scored {
        state.events.push(GameEvent::Scored { score: state.score });
    }

    if let Some(segment) = hit_segment(&state.entity, &state.obstacle, tuning) {
        state.phase = Phase::Ended;
        state.events.push(GameEvent::Crashed {
            segment,
            score: state.score,
        });
        log::info!(
            "Crashed into {:?} segment at tick {} (score {}, entity {:.1}, gap top {:.1})",
            segment,
            state.time_ticks,
            state.score,
            state.entity.position,
            state.obstacle.gap_top
        );
        return TickOutcome::Crashed { segment };
    }

    if scored {
        update_tier(state, tuning);
        return TickOutcome::Scored { score: state.score };
    }

    TickOutcome::Advanced
}

/// Re-resolve the tier after a score change
fn update_tier(state: &mut GameState, tuning: &Tuning) {
    match difficulty::resolve(state.score, &tuning.tiers) {
        Some((index, tier)) if index != state.tier_index => {
            log::info!("Difficulty -> {} at score {}", tier.kind.as_str(), state.score);
            state.tier_index = index;
            state.events.push(GameEvent::TierChanged { tier: tier.kind });
        }
        Some(_) => {}
        None => log::warn!("No tier covers score {}, keeping current tier", state.score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::lane::ScriptedGaps;
    use crate::sim::state::Obstacle;
    use crate::tuning::{TierKind, TierTable};

    fn running(tuning: &Tuning) -> GameState {
        let mut state = GameState::new(tuning);
        state.phase = Phase::Running;
        state
    }

    #[test]
    fn test_tick_skipped_unless_running() {
        let tuning = Tuning::default();
        let mut state = GameState::new(&tuning);
        let before = state.entity;
        assert_eq!(tick(&mut state, &tuning, &mut ScriptedGaps::new([30])), TickOutcome::Skipped);
        assert_eq!(state.entity, before);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_tick_moves_entity_and_obstacle() {
        let tuning = Tuning::default();
        let mut state = running(&tuning);
        let outcome = tick(&mut state, &tuning, &mut ScriptedGaps::new([30]));
        assert_eq!(outcome, TickOutcome::Advanced);
        assert_eq!(state.entity.position, tuning.entity_start + 6.0);
        assert_eq!(state.obstacle.x, tuning.obstacle_spawn_x() - 4.0);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_physics_runs_before_collision() {
        let tuning = Tuning::default();
        let mut state = running(&tuning);
        // Entity one gravity step above the bottom segment, obstacle in the zone
        state.obstacle = Obstacle {
            x: tuning.trigger_zone.end + 4.0,
            gap_top: 300.0,
        };
        state.entity.position = 385.0 - 6.0 + 0.5;
        let outcome = tick(&mut state, &tuning, &mut ScriptedGaps::new([30]));
        assert_eq!(outcome, TickOutcome::Crashed { segment: Segment::Bottom });
        assert_eq!(state.phase, Phase::Ended);
    }

    #[test]
    fn test_score_updates_tier() {
        let tuning = Tuning::default();
        let mut state = running(&tuning);
        state.score = 1;
        state.obstacle.x = -tuning.obstacle_width - 1.0;

        let outcome = tick(&mut state, &tuning, &mut ScriptedGaps::new([30]));
        assert_eq!(outcome, TickOutcome::Scored { score: 2 });
        assert_eq!(tuning.tiers.tier(state.tier_index).kind, TierKind::Easy);
        assert!(state.events.contains(&GameEvent::Scored { score: 2 }));
        assert!(state.events.contains(&GameEvent::TierChanged { tier: TierKind::Easy }));
    }

    #[test]
    fn test_crash_skips_difficulty_update() {
        let tuning = Tuning::default();
        let mut state = running(&tuning);
        state.score = 1;
        state.tier_index = TierTable::WARM_UP;
        state.obstacle.x = -tuning.obstacle_width - 1.0;

        // Zone that covers the recycle spawn point so the recycled obstacle is tested immediately
        let mut tuning = tuning;
        tuning.trigger_zone.start = tuning.obstacle_spawn_x();
        tuning.trigger_zone.end = tuning.obstacle_spawn_x() + 1.0;
        state.entity.position = 0.0;

        let outcome = tick(&mut state, &tuning, &mut ScriptedGaps::new([30]));
        assert_eq!(outcome, TickOutcome::Crashed { segment: Segment::Top });
        assert_eq!(state.score, 2);
        assert_eq!(
            &state.events[..],
            &[
                GameEvent::Scored { score: 2 },
                GameEvent::Crashed {
                    segment: Segment::Top,
                    score: 2
                },
            ]
        );
        assert_eq!(state.tier_index, TierTable::WARM_UP);
        assert!(!state.events.iter().any(|e| matches!(e, GameEvent::TierChanged { .. })));
    }
}

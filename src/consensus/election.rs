//! Epoch-based leader election with hot-swap
//!
//! Checked once per tick. An election fires when the fleet is armed and at
//! least one election period of simulated time has passed since the last
//! one, so it runs "at least every period", not on an exact grid. The
//! candidate is the flying unit with the highest score, first in roster
//! order among equals, and it always takes the lead. An incumbent keeps it
//! only by being that unit; a tie goes to the lower roster slot.

use crate::fleet::{FleetState, Unit};
use crate::types::*;
use log::{debug, info};

/// Result of one election check
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElectionOutcome {
    /// Fleet disarmed or epoch still open
    NotDue,
    /// Epoch closed but no unit is flying; leader left unchanged
    NoCandidate,
    /// Epoch closed and the incumbent keeps the lead
    Retained {
        /// Current leader
        leader: Option<UnitId>,
    },
    /// Leadership moved to a better unit
    HotSwap {
        /// Replaced leader
        previous: Option<UnitId>,
        /// New leader
        leader: UnitId,
        /// New leader's score
        score: f32,
    },
}

/// Check whether an election is due at the snapshot's clock
pub fn epoch_due(state: &FleetState, period_secs: f64) -> bool {
    state.is_armed() && state.simulation_time - state.last_epoch_time >= period_secs
}

/// Best flying unit, first in roster order among equal scores
pub fn select_candidate(state: &FleetState) -> Option<&Unit> {
    let mut best: Option<&Unit> = None;
    for unit in state.flying().filter(|u| u.score.is_finite()) {
        match best {
            Some(current) if unit.score <= current.score => {}
            _ => best = Some(unit),
        }
    }
    best
}

/// Run the election check against freshly computed scores
///
/// Stamps the epoch whenever the election fires, whether or not the
/// leader changes.
pub fn run_election(state: &mut FleetState, period_secs: f64) -> ElectionOutcome {
    if !epoch_due(state, period_secs) {
        return ElectionOutcome::NotDue;
    }
    state.last_epoch_time = state.simulation_time;

    let Some(candidate) = select_candidate(state) else {
        debug!("Epoch closed at t={:.2}s with no flying units", state.simulation_time);
        return ElectionOutcome::NoCandidate;
    };
    let (candidate_id, candidate_score) = (candidate.id, candidate.score);

    // The candidate is the first maximum in roster order, so it differs from
    // a flying incumbent only when it outscores it or ties from an earlier slot
    let swap = state.leader_id != Some(candidate_id);

    if !swap {
        debug!(
            "Epoch closed at t={:.2}s, leader retained",
            state.simulation_time
        );
        return ElectionOutcome::Retained {
            leader: state.leader_id,
        };
    }

    let previous = state.leader_id.replace(candidate_id);
    info!(
        "Leader hot-swap at t={:.2}s: {:?} -> {} (score {:.3})",
        state.simulation_time, previous, candidate_id, candidate_score
    );
    ElectionOutcome::HotSwap {
        previous,
        leader: candidate_id,
        score: candidate_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::config::SimConfig;

    fn armed_fleet(size: usize) -> FleetState {
        let mut state = FleetState::new(&SimConfig::new(size)).unwrap();
        state.arming_state = ArmingState::Armed;
        for unit in state.units.iter_mut() {
            unit.status = UnitStatus::Flying;
            unit.score = 0.5;
        }
        state.simulation_time = 5.0;
        state
    }

    #[test]
    fn test_not_due_before_period() {
        let mut state = armed_fleet(3);
        state.simulation_time = 4.99;
        state.units[2].score = 0.9;
        assert_eq!(run_election(&mut state, 5.0), ElectionOutcome::NotDue);
        assert_eq!(state.last_epoch_time, 0.0);
    }

    #[test]
    fn test_not_due_when_disarmed() {
        let mut state = armed_fleet(3);
        state.arming_state = ArmingState::Disarmed;
        state.units[2].score = 0.9;
        assert_eq!(run_election(&mut state, 5.0), ElectionOutcome::NotDue);
        assert_eq!(state.leader_id, Some(UnitId::new(0)));
    }

    #[test]
    fn test_strictly_better_unit_takes_over() {
        let mut state = armed_fleet(3);
        state.units[2].score = 0.9;
        let outcome = run_election(&mut state, 5.0);
        assert!(matches!(outcome, ElectionOutcome::HotSwap { leader, .. } if leader == UnitId::new(2)));
        assert_eq!(state.leader_id, Some(UnitId::new(2)));
        assert_eq!(state.last_epoch_time, 5.0);
    }

    #[test]
    fn test_tie_goes_to_lower_roster_slot() {
        let mut state = armed_fleet(3);
        state.leader_id = Some(UnitId::new(2));
        let outcome = run_election(&mut state, 5.0);
        assert_eq!(
            outcome,
            ElectionOutcome::HotSwap {
                previous: Some(UnitId::new(2)),
                leader: UnitId::new(0),
                score: 0.5,
            }
        );
        assert_eq!(state.leader_id, Some(UnitId::new(0)));
    }

    #[test]
    fn test_tie_from_later_slot_keeps_incumbent() {
        let mut state = armed_fleet(3);
        state.leader_id = Some(UnitId::new(1));
        state.units[0].score = 0.4;
        let outcome = run_election(&mut state, 5.0);
        assert_eq!(
            outcome,
            ElectionOutcome::Retained {
                leader: Some(UnitId::new(1))
            }
        );
    }

    #[test]
    fn test_tie_between_challengers_prefers_roster_order() {
        let mut state = armed_fleet(4);
        state.units[0].status = UnitStatus::Standby;
        state.units[1].score = 0.8;
        state.units[3].score = 0.8;
        run_election(&mut state, 5.0);
        assert_eq!(state.leader_id, Some(UnitId::new(1)));
    }

    #[test]
    fn test_no_candidate_keeps_leader() {
        let mut state = armed_fleet(2);
        for unit in state.units.iter_mut() {
            unit.status = UnitStatus::Armed;
        }
        assert_eq!(run_election(&mut state, 5.0), ElectionOutcome::NoCandidate);
        assert_eq!(state.leader_id, Some(UnitId::new(0)));
        assert_eq!(state.last_epoch_time, 5.0);
    }

    #[test]
    fn test_dangling_leader_is_replaced() {
        let mut state = armed_fleet(2);
        state.leader_id = Some(UnitId::new(40));
        run_election(&mut state, 5.0);
        assert_eq!(state.leader_id, Some(UnitId::new(0)));
    }
}

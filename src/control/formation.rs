//! Formation controller
//!
//! Computes target points for units the flight-mode machine hands over
//! (flying, not in TAKEOFF/LAND, no queued mission). Under the ant-colony
//! chain algorithm the leader flies an exploration orbit and every other
//! unit keeps a fixed standoff behind its roster predecessor, which yields
//! a single-file chain anchored on the leader. Other selectors hold the
//! current target.

use crate::fleet::FleetState;
use crate::system::config::SimConfig;
use crate::types::*;

/// Horizontal speeds below this give no usable heading (m/s)
pub const HEADING_SPEED_EPSILON: f32 = 1e-3;

/// Angular rate of the orbit's x component (rad/s)
const ORBIT_RATE_X: f32 = 0.08;
/// Angular rate of the orbit's y component (rad/s)
const ORBIT_RATE_Y: f32 = 0.1;
/// Angular rate of the altitude swing (rad/s)
const ORBIT_RATE_Z: f32 = 0.15;

/// Role a unit plays in the formation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormationRole {
    /// Elected leader
    Leader,
    /// Follows a predecessor
    Follower,
}

/// Computes formation targets
#[derive(Debug, Clone)]
pub struct FormationController {
    /// Orbit radius (meters)
    orbit_radius: f32,
    /// Orbit base altitude (meters)
    orbit_altitude: f32,
    /// Orbit altitude swing (meters)
    orbit_altitude_swing: f32,
    /// Standoff behind the predecessor (meters)
    follow_gap: f32,
}

impl FormationController {
    /// Create from simulation configuration
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            orbit_radius: config.orbit_radius,
            orbit_altitude: config.orbit_altitude,
            orbit_altitude_swing: config.orbit_altitude_swing,
            follow_gap: config.follow_gap,
        }
    }

    /// Target for roster slot `index`, or `None` to hold the current one
    ///
    /// `fleet` is the previous snapshot (neighbour positions are read from
    /// it), `leader` the leader id after this tick's election.
    pub fn compute_target(
        &self,
        algorithm: SwarmAlgorithm,
        index: usize,
        fleet: &FleetState,
        leader: Option<UnitId>,
        time: f64,
    ) -> Option<Position> {
        match algorithm {
            SwarmAlgorithm::BtpAntColony => self.chain_target(index, fleet, leader, time),
            SwarmAlgorithm::LeaderFollower
            | SwarmAlgorithm::BoidsFlocking
            | SwarmAlgorithm::GridSearch
            | SwarmAlgorithm::OrbitTarget
            | SwarmAlgorithm::Aggregate
            | SwarmAlgorithm::ThresholdConsensus => None,
        }
    }

    /// Leader orbit or follower standoff
    fn chain_target(
        &self,
        index: usize,
        fleet: &FleetState,
        leader: Option<UnitId>,
        time: f64,
    ) -> Option<Position> {
        let unit = fleet.units.get(index)?;
        match role(unit.id, leader) {
            FormationRole::Leader => Some(self.orbit_point(time)),
            FormationRole::Follower => {
                let predecessor = match index {
                    0 => leader.and_then(|id| fleet.unit(id)),
                    i => fleet.predecessor(i),
                }?;
                Some(self.standoff_point(&predecessor.position, &predecessor.velocity))
            }
        }
    }

    /// Leader exploration orbit at simulated time `time`
    pub fn orbit_point(&self, time: f64) -> Position {
        let t = time as f32;
        Position::new(
            libm::sinf(t * ORBIT_RATE_X) * self.orbit_radius,
            libm::cosf(t * ORBIT_RATE_Y) * self.orbit_radius,
            self.orbit_altitude + libm::sinf(t * ORBIT_RATE_Z) * self.orbit_altitude_swing,
        )
    }

    /// Point `follow_gap` behind a predecessor along its heading, at its altitude
    pub fn standoff_point(&self, position: &Position, velocity: &Velocity) -> Position {
        let angle = heading(velocity);
        Position::new(
            position.x - libm::cosf(angle) * self.follow_gap,
            position.y - libm::sinf(angle) * self.follow_gap,
            position.z,
        )
    }
}

/// Role of `id` given the current leader
pub fn role(id: UnitId, leader: Option<UnitId>) -> FormationRole {
    if leader == Some(id) {
        FormationRole::Leader
    } else {
        FormationRole::Follower
    }
}

/// Horizontal heading in radians, 0 when (nearly) stationary
pub fn heading(velocity: &Velocity) -> f32 {
    if velocity.horizontal_magnitude() < HEADING_SPEED_EPSILON {
        return 0.0;
    }
    let angle = libm::atan2f(velocity.y, velocity.x);
    if angle.is_finite() {
        angle
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> FormationController {
        FormationController::from_config(&SimConfig::default())
    }

    #[test]
    fn test_orbit_at_time_zero() {
        let p = controller().orbit_point(0.0);
        assert!(p.x.abs() < 1e-6);
        assert!((p.y - 35.0).abs() < 1e-5);
        assert!((p.z - 25.0).abs() < 1e-6);
    }

    #[test]
    fn test_standoff_behind_moving_predecessor() {
        let p = controller().standoff_point(
            &Position::new(10.0, 0.0, 20.0),
            &Velocity::new(0.0, 3.0, 0.0),
        );
        assert!((p.x - 10.0).abs() < 1e-5);
        assert!((p.y + 6.0).abs() < 1e-5);
        assert_eq!(p.z, 20.0);
    }

    #[test]
    fn test_stationary_predecessor_defaults_heading() {
        assert_eq!(heading(&Velocity::ZERO), 0.0);
        let p = controller().standoff_point(&Position::new(0.0, 0.0, 5.0), &Velocity::ZERO);
        assert!((p.x + 6.0).abs() < 1e-6);
        assert!(p.y.abs() < 1e-6);
    }

    #[test]
    fn test_follower_with_dangling_leader_holds() {
        let config = SimConfig::new(3);
        let fleet = FleetState::new(&config).unwrap();
        let target = controller().compute_target(
            SwarmAlgorithm::BtpAntColony,
            0,
            &fleet,
            Some(UnitId::new(77)),
            1.0,
        );
        assert!(target.is_none());
    }

    #[test]
    fn test_other_algorithms_hold() {
        let fleet = FleetState::new(&SimConfig::new(2)).unwrap();
        let target = controller().compute_target(
            SwarmAlgorithm::GridSearch,
            1,
            &fleet,
            fleet.leader_id,
            3.0,
        );
        assert!(target.is_none());
    }

    #[test]
    fn test_leader_orbits() {
        let fleet = FleetState::new(&SimConfig::new(2)).unwrap();
        let target = controller()
            .compute_target(SwarmAlgorithm::BtpAntColony, 0, &fleet, fleet.leader_id, 0.0)
            .unwrap();
        assert!((target.z - 25.0).abs() < 1e-6);
    }
}

//! Flight-mode state machine
//!
//! Two independent axes per unit: lifecycle `UnitStatus` and behavioral
//! `FlightMode`. Rules run once per tick in a fixed order:
//!
//! 1. STANDBY, or ARMED on the ground: velocity and acceleration zeroed,
//!    position kept on or above the ground, nothing else happens this tick.
//! 2. MISSION with queued waypoints: target the front waypoint, pop it once
//!    reached, switch to POSITION when the queue drains.
//! 3. FLYING outside TAKEOFF/LAND: the formation controller sets the target.
//! 4. After integration: LAND on the ground ends in STANDBY/STABILIZED,
//!    TAKEOFF within tolerance of its altitude becomes POSITION.

use crate::fleet::Unit;
use crate::system::config::SimConfig;
use crate::types::*;
use log::trace;

/// What drives a unit's target this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guidance {
    /// Grounded; skip target and physics
    Frozen,
    /// Target set from the mission queue
    Mission,
    /// Formation controller sets the target
    Formation,
    /// Keep the current target
    Hold,
}

/// Transition taken after integration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// LAND reached the ground
    Landed,
    /// TAKEOFF reached its altitude
    TakeoffComplete,
}

/// Thresholds driving mode transitions
#[derive(Debug, Clone, Copy)]
pub struct FlightModeMachine {
    /// Waypoint acceptance radius (meters)
    acceptance_radius: f32,
    /// Ground contact altitude (meters)
    ground_contact_altitude: f32,
    /// Takeoff completion tolerance (meters)
    takeoff_tolerance: f32,
}

impl FlightModeMachine {
    /// Create from explicit thresholds
    pub fn new(acceptance_radius: f32, ground_contact_altitude: f32, takeoff_tolerance: f32) -> Self {
        Self {
            acceptance_radius,
            ground_contact_altitude,
            takeoff_tolerance,
        }
    }

    /// Create from simulation configuration
    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(
            config.waypoint_acceptance_radius,
            config.ground_contact_altitude,
            config.takeoff_tolerance,
        )
    }

    /// Check if the unit sits out this tick
    pub fn is_frozen(&self, unit: &Unit) -> bool {
        match unit.status {
            UnitStatus::Standby => true,
            UnitStatus::Armed => unit.altitude() < self.ground_contact_altitude,
            _ => false,
        }
    }

    /// Rules 1-3: decide guidance, update the target from the mission queue
    pub fn pre_integration(&self, unit: &mut Unit) -> Guidance {
        if self.is_frozen(unit) {
            unit.hold_still();
            unit.position = unit.position.sanitized();
            unit.position.z = unit.position.z.max(0.0);
            return Guidance::Frozen;
        }

        if unit.flight_mode == FlightMode::Mission {
            if let Some(&waypoint) = unit.next_waypoint() {
                unit.target = waypoint;
                // One pop per tick, even if the next waypoint is also in range
                if unit.position.distance_to(&waypoint) < self.acceptance_radius {
                    unit.pop_waypoint();
                    trace!("{} reached waypoint, {} left", unit.id, unit.mission_path.len());
                    if unit.mission_path.is_empty() {
                        unit.flight_mode = FlightMode::Position;
                    }
                }
                return Guidance::Mission;
            }
        }

        match (unit.status, unit.flight_mode) {
            (UnitStatus::Flying, FlightMode::Takeoff | FlightMode::Land) => Guidance::Hold,
            (UnitStatus::Flying, _) => Guidance::Formation,
            _ => Guidance::Hold,
        }
    }

    /// Rule 4: terminal transitions on the freshly integrated altitude
    pub fn post_integration(&self, unit: &mut Unit) -> Option<Transition> {
        match unit.flight_mode {
            FlightMode::Land if unit.altitude() < self.ground_contact_altitude => {
                unit.position.z = 0.0;
                unit.velocity = Velocity::ZERO;
                unit.status = UnitStatus::Standby;
                unit.flight_mode = FlightMode::Stabilized;
                unit.clear_mission();
                trace!("{} landed", unit.id);
                Some(Transition::Landed)
            }
            FlightMode::Takeoff
                if libm::fabsf(unit.altitude() - unit.target.z) < self.takeoff_tolerance =>
            {
                unit.flight_mode = FlightMode::Position;
                trace!("{} takeoff complete at {:.2}m", unit.id, unit.altitude());
                Some(Transition::TakeoffComplete)
            }
            _ => None,
        }
    }
}

//! Operator commands
//!
//! Commands are applied between ticks, never inside one. Each application
//! takes the current snapshot and returns the next one together with the
//! event describing it; the input snapshot is left untouched.

use crate::fleet::{FleetState, MissionPath};
use crate::system::config::SimConfig;
use crate::telemetry::FleetEvent;
use crate::types::*;
use crate::MAX_WAYPOINTS;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Operator command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Arm the fleet and every unit
    Arm,
    /// Kill motors, ground every unit and drop their missions
    Disarm,
    /// Climb every unit to the configured takeoff altitude
    Takeoff,
    /// Descend every unit to the ground
    Land,
    /// Switch the coordination algorithm
    SetAlgorithm(SwarmAlgorithm),
    /// Send the same waypoint list to every unit
    UploadFleetMission(MissionPath),
    /// Send a waypoint list to one unit
    UploadUnitMission {
        /// Receiving unit
        unit: UnitId,
        /// Waypoints in visiting order
        waypoints: MissionPath,
    },
    /// Teleport every unit to a point
    RepositionFleet(Position),
    /// Teleport one unit to a point
    RepositionUnit {
        /// Moved unit
        unit: UnitId,
        /// Destination
        point: Position,
    },
    /// Replace the ambient conditions
    SetEnvironment(Environment),
}

impl Command {
    /// Fleet mission from a slice; waypoints past `MAX_WAYPOINTS` are dropped
    pub fn fleet_mission(waypoints: &[Position]) -> Self {
        Command::UploadFleetMission(mission_path(waypoints))
    }

    /// Unit mission from a slice; waypoints past `MAX_WAYPOINTS` are dropped
    pub fn unit_mission(unit: UnitId, waypoints: &[Position]) -> Self {
        Command::UploadUnitMission {
            unit,
            waypoints: mission_path(waypoints),
        }
    }
}

fn mission_path(waypoints: &[Position]) -> MissionPath {
    if waypoints.len() > MAX_WAYPOINTS {
        warn!(
            "Mission truncated: {} waypoints, {} kept",
            waypoints.len(),
            MAX_WAYPOINTS
        );
    }
    waypoints.iter().take(MAX_WAYPOINTS).copied().collect()
}

/// Apply `command` to `prev`, returning the new snapshot and its event
///
/// Fails only for commands addressing a unit id not in the roster; the
/// caller's snapshot is unchanged in every case.
pub fn apply_command(
    prev: &FleetState,
    command: &Command,
    config: &SimConfig,
) -> Result<(FleetState, FleetEvent)> {
    let mut next = prev.clone();

    let event = match command {
        Command::Arm => {
            next.arming_state = ArmingState::Armed;
            for unit in next.units.iter_mut() {
                unit.status = UnitStatus::Armed;
            }
            FleetEvent::Armed
        }

        Command::Disarm => {
            next.arming_state = ArmingState::Disarmed;
            next.global_flight_mode = FlightMode::Stabilized;
            for unit in next.units.iter_mut() {
                unit.status = UnitStatus::Standby;
                unit.flight_mode = FlightMode::Stabilized;
                unit.clear_mission();
            }
            FleetEvent::Disarmed
        }

        Command::Takeoff => {
            let altitude = config.default_takeoff_alt;
            next.global_flight_mode = FlightMode::Takeoff;
            for unit in next.units.iter_mut() {
                unit.flight_mode = FlightMode::Takeoff;
                unit.status = UnitStatus::Flying;
                unit.target = unit.position.with_z(altitude);
            }
            FleetEvent::Takeoff { altitude }
        }

        Command::Land => {
            next.global_flight_mode = FlightMode::Land;
            for unit in next.units.iter_mut() {
                unit.flight_mode = FlightMode::Land;
                unit.target = unit.position.with_z(0.0);
            }
            FleetEvent::Landing
        }

        Command::SetAlgorithm(algorithm) => {
            next.algorithm = *algorithm;
            FleetEvent::AlgorithmChanged(*algorithm)
        }

        Command::UploadFleetMission(waypoints) => {
            if waypoints.is_empty() {
                debug!("Empty fleet mission ignored");
                return Ok((next, FleetEvent::FleetMissionUploaded { waypoints: 0 }));
            }
            let airborne = config.airborne_altitude;
            let mut loaded = 0;
            for unit in next.units.iter_mut() {
                loaded = unit.load_mission(waypoints);
                unit.flight_mode = FlightMode::Mission;
                if unit.position.z > airborne {
                    unit.status = UnitStatus::Flying;
                }
            }
            next.global_flight_mode = FlightMode::Mission;
            FleetEvent::FleetMissionUploaded { waypoints: loaded }
        }

        Command::UploadUnitMission { unit: id, waypoints } => {
            let airborne = config.airborne_altitude;
            let unit = next.unit_mut(*id).ok_or(SimError::InvalidUnitId)?;
            if waypoints.is_empty() {
                debug!("{}: empty mission ignored", id);
                return Ok((
                    next,
                    FleetEvent::UnitMissionUploaded {
                        unit: *id,
                        waypoints: 0,
                    },
                ));
            }
            let loaded = unit.load_mission(waypoints);
            unit.flight_mode = FlightMode::Mission;
            if unit.position.z > airborne {
                unit.status = UnitStatus::Flying;
            }
            FleetEvent::UnitMissionUploaded {
                unit: *id,
                waypoints: loaded,
            }
        }

        Command::RepositionFleet(point) => {
            for unit in next.units.iter_mut() {
                unit.teleport(*point);
            }
            FleetEvent::FleetRepositioned(*point)
        }

        Command::RepositionUnit { unit: id, point } => {
            next.unit_mut(*id)
                .ok_or(SimError::InvalidUnitId)?
                .teleport(*point);
            FleetEvent::UnitRepositioned {
                unit: *id,
                point: *point,
            }
        }

        Command::SetEnvironment(environment) => {
            let env = sanitize_environment(environment);
            next.environment = env;
            FleetEvent::EnvironmentUpdated(env)
        }
    };

    Ok((next, event))
}

/// Clamp intensities into 0..=1 and speeds to non-negative, NaN to 0
fn sanitize_environment(env: &Environment) -> Environment {
    let unit_range = |v: f32| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
    let non_negative = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
    let finite = |v: f32| if v.is_finite() { v } else { 0.0 };
    Environment {
        wind: [finite(env.wind[0]), finite(env.wind[1])],
        wind_speed: non_negative(env.wind_speed),
        rain: unit_range(env.rain),
        interference: unit_range(env.interference),
    }
}

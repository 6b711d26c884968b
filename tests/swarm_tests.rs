//! Scenario tests for the fleet tick
//!
//! Drives `SwarmEngine` through takeoff, election, separation, mission and
//! landing scenarios and checks the resulting snapshots.

use drone_fleet_sim::consensus::ElectionOutcome;
use drone_fleet_sim::swarm::SwarmEngine;
use drone_fleet_sim::*;

fn engine(config: &SimConfig) -> SwarmEngine {
    SwarmEngine::new(config.clone()).unwrap()
}

fn airborne(state: &mut FleetState, altitude: f32) {
    for unit in state.units.iter_mut() {
        unit.status = UnitStatus::Flying;
        unit.flight_mode = FlightMode::Position;
        unit.position.z = altitude;
        unit.target = unit.position;
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Takeoff Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod takeoff_tests {
    use super::*;

    #[test]
    fn test_takeoff_settles_at_altitude() {
        let config = SimConfig::test_config(1);
        let state = FleetState::new(&config).unwrap();
        let (state, _) = apply_command(&state, &Command::Arm, &config).unwrap();
        let (mut state, _) = apply_command(&state, &Command::Takeoff, &config).unwrap();

        let engine = engine(&config);
        for _ in 0..120 * config.tick_rate_hz {
            state = engine.step(&state);
        }

        let unit = &state.units[0];
        assert!((unit.position.z - 10.0).abs() < 0.5, "z = {}", unit.position.z);
        assert_eq!(unit.flight_mode, FlightMode::Position);
        assert_eq!(unit.status, UnitStatus::Flying);
        assert!(unit.speed() < 0.25, "speed = {}", unit.speed());
        assert_eq!(state.tick, 7200);
        assert!((state.simulation_time - 120.0).abs() < 1e-3);
    }

    #[test]
    fn test_takeoff_completes_within_seconds() {
        let config = SimConfig::test_config(1);
        let state = FleetState::new(&config).unwrap();
        let (mut state, _) = apply_command(&state, &Command::Takeoff, &config).unwrap();

        let engine = engine(&config);
        let mut ticks = 0;
        while state.units[0].flight_mode == FlightMode::Takeoff && ticks < 600 {
            state = engine.step(&state);
            ticks += 1;
        }
        assert_eq!(state.units[0].flight_mode, FlightMode::Position);
        assert!(ticks > 60 && ticks < 300, "ticks = {}", ticks);
    }

    #[test]
    fn test_climb_respects_limits() {
        let config = SimConfig::test_config(4);
        let state = FleetState::new(&config).unwrap();
        let (mut state, _) = apply_command(&state, &Command::Takeoff, &config).unwrap();

        let engine = engine(&config);
        for _ in 0..300 {
            state = engine.step(&state);
            for unit in state.units.iter() {
                assert!(unit.speed() <= config.max_velocity + 1e-4);
                assert!(unit.acceleration.magnitude() <= config.max_acceleration + 1e-4);
                assert!(unit.position.z >= 0.0);
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Election Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod election_tests {
    use super::*;

    fn armed_flying(size: usize) -> (SimConfig, FleetState) {
        let config = SimConfig::test_config(size);
        let mut state = FleetState::new(&config).unwrap();
        state.arming_state = ArmingState::Armed;
        airborne(&mut state, 10.0);
        for unit in state.units.iter_mut() {
            unit.sensors.battery.percentage = 50.0;
        }
        (config, state)
    }

    #[test]
    fn test_best_battery_takes_lead_at_epoch() {
        let (config, mut state) = armed_flying(5);
        state.units[3].sensors.battery.percentage = 90.0;
        state.simulation_time = 5.0;

        let (next, outcome) = engine(&config).step_with_outcome(&state);
        assert_eq!(next.leader_id, Some(UnitId::new(3)));
        assert_eq!(
            outcome,
            ElectionOutcome::HotSwap {
                previous: Some(UnitId::new(0)),
                leader: UnitId::new(3),
                score: next.units[3].score,
            }
        );
        assert_eq!(next.last_epoch_time, 5.0);
    }

    #[test]
    fn test_no_election_before_epoch() {
        let (config, mut state) = armed_flying(5);
        state.units[3].sensors.battery.percentage = 90.0;
        state.simulation_time = 4.9;

        let next = engine(&config).step(&state);
        assert_eq!(next.leader_id, Some(UnitId::new(0)));
        assert_eq!(next.last_epoch_time, 0.0);
    }

    #[test]
    fn test_equal_scores_go_to_lower_slot() {
        let (config, mut state) = armed_flying(4);
        state.simulation_time = 5.0;
        state.leader_id = Some(UnitId::new(2));

        let (next, outcome) = engine(&config).step_with_outcome(&state);
        assert_eq!(next.leader_id, Some(UnitId::new(0)));
        match outcome {
            ElectionOutcome::HotSwap { previous, leader, .. } => {
                assert_eq!(previous, Some(UnitId::new(2)));
                assert_eq!(leader, UnitId::new(0));
            }
            other => panic!("expected hot-swap, got {:?}", other),
        }
    }

    #[test]
    fn test_grounded_leader_replaced() {
        let (config, mut state) = armed_flying(3);
        state.units[0].status = UnitStatus::Standby;
        state.units[0].position.z = 0.0;
        state.simulation_time = 5.0;

        let next = engine(&config).step(&state);
        assert_eq!(next.leader_id, Some(UnitId::new(1)));
    }

    #[test]
    fn test_disarmed_fleet_never_elects() {
        let (config, mut state) = armed_flying(3);
        state.arming_state = ArmingState::Disarmed;
        state.units[2].sensors.battery.percentage = 100.0;
        state.simulation_time = 50.0;

        let (next, outcome) = engine(&config).step_with_outcome(&state);
        assert_eq!(outcome, ElectionOutcome::NotDue);
        assert_eq!(next.leader_id, Some(UnitId::new(0)));
    }

    #[test]
    fn test_elections_fire_at_least_every_period() {
        let (config, mut state) = armed_flying(3);
        let engine = engine(&config);
        let mut elections = 0;
        for _ in 0..(20 * config.tick_rate_hz) {
            let (next, outcome) = engine.step_with_outcome(&state);
            if outcome != ElectionOutcome::NotDue {
                elections += 1;
            }
            state = next;
        }
        assert_eq!(elections, 3);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Separation Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod separation_tests {
    use super::*;

    #[test]
    fn test_close_pair_pushed_apart() {
        let config = SimConfig::test_config(2);
        let mut state = FleetState::new(&config).unwrap();
        airborne(&mut state, 10.0);
        state.units[0].position = Position::new(0.0, 0.0, 10.0);
        state.units[1].position = Position::new(3.0, 0.0, 10.0);
        for unit in state.units.iter_mut() {
            unit.target = unit.position;
        }

        let next = engine(&config).step(&state);
        let a0 = next.units[0].acceleration;
        let a1 = next.units[1].acceleration;
        assert!(a0.x < 0.0 && a1.x > 0.0);
        assert!(a0.magnitude() <= config.max_acceleration + 1e-4);
        assert!(a1.magnitude() <= config.max_acceleration + 1e-4);
        assert_eq!(a0.z, 0.0);
        assert!(next.units[1].position.x - next.units[0].position.x > 3.0);
    }

    #[test]
    fn test_grounded_units_ignore_each_other() {
        let config = SimConfig::test_config(2);
        let mut state = FleetState::new(&config).unwrap();
        airborne(&mut state, 0.5);
        state.units[0].position = Position::new(0.0, 0.0, 0.5);
        state.units[1].position = Position::new(1.0, 0.0, 0.5);
        for unit in state.units.iter_mut() {
            unit.target = unit.position;
        }

        let next = engine(&config).step(&state);
        assert_eq!(next.units[0].acceleration, Acceleration::ZERO);
        assert_eq!(next.units[1].acceleration, Acceleration::ZERO);
    }

    #[test]
    fn test_result_independent_of_processing_order() {
        let config = SimConfig::test_config(3);
        let mut state = FleetState::new(&config).unwrap();
        airborne(&mut state, 10.0);
        state.units[0].position = Position::new(0.0, 0.0, 10.0);
        state.units[1].position = Position::new(2.0, 0.0, 10.0);
        state.units[2].position = Position::new(4.0, 0.0, 10.0);
        for unit in state.units.iter_mut() {
            unit.target = unit.position;
        }

        let next = engine(&config).step(&state);
        // Outer units see mirror-image neighbourhoods
        assert!((next.units[0].acceleration.x + next.units[2].acceleration.x).abs() < 1e-5);
        assert!(next.units[1].acceleration.x.abs() < 1e-5);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Mission And Landing Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod mission_tests {
    use super::*;

    #[test]
    fn test_one_waypoint_popped_per_tick() {
        let config = SimConfig::test_config(1);
        let mut state = FleetState::new(&config).unwrap();
        airborne(&mut state, 10.0);
        let here = state.units[0].position;
        let wps = [
            Position::new(here.x + 1.0, here.y, 10.0),
            Position::new(here.x + 1.5, here.y, 10.0),
            Position::new(here.x + 40.0, here.y, 10.0),
        ];
        let (mut state, _) =
            apply_command(&state, &Command::fleet_mission(&wps), &config).unwrap();

        let engine = engine(&config);
        state = engine.step(&state);
        assert_eq!(state.units[0].mission_path.len(), 2);
        state = engine.step(&state);
        assert_eq!(state.units[0].mission_path.len(), 1);
        state = engine.step(&state);
        assert_eq!(state.units[0].mission_path.len(), 1);
        assert_eq!(state.units[0].target, wps[2]);
        assert_eq!(state.units[0].flight_mode, FlightMode::Mission);
    }

    #[test]
    fn test_drained_mission_holds_position() {
        let config = SimConfig::test_config(1);
        let mut state = FleetState::new(&config).unwrap();
        airborne(&mut state, 10.0);
        let wp = state.units[0].position;
        let cmd = Command::unit_mission(UnitId::new(0), &[wp]);
        let (state, _) = apply_command(&state, &cmd, &config).unwrap();

        let next = engine(&config).step(&state);
        assert!(next.units[0].mission_path.is_empty());
        assert_eq!(next.units[0].flight_mode, FlightMode::Position);
        assert_eq!(next.units[0].target, wp);
    }

    #[test]
    fn test_landing_is_terminal_and_idempotent() {
        let config = SimConfig::test_config(1);
        let mut state = FleetState::new(&config).unwrap();
        airborne(&mut state, 0.05);
        let (state, _) = apply_command(&state, &Command::Land, &config).unwrap();

        let engine = engine(&config);
        let landed = engine.step(&state);
        let unit = &landed.units[0];
        assert_eq!(unit.position.z, 0.0);
        assert_eq!(unit.velocity, Velocity::ZERO);
        assert_eq!(unit.status, UnitStatus::Standby);
        assert_eq!(unit.flight_mode, FlightMode::Stabilized);

        let again = engine.step(&landed);
        assert_eq!(again.units[0].position, landed.units[0].position);
        assert_eq!(again.units[0].status, UnitStatus::Standby);
        assert_eq!(again.units[0].sensors.battery.percentage, unit.sensors.battery.percentage);
    }

    #[test]
    fn test_full_landing_from_altitude() {
        let config = SimConfig::test_config(2);
        let mut state = FleetState::new(&config).unwrap();
        airborne(&mut state, 10.0);
        let (mut state, _) = apply_command(&state, &Command::Land, &config).unwrap();

        let engine = engine(&config);
        for _ in 0..(60 * config.tick_rate_hz) {
            state = engine.step(&state);
        }
        for unit in state.units.iter() {
            assert_eq!(unit.status, UnitStatus::Standby);
            assert_eq!(unit.position.z, 0.0);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Formation Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod formation_tests {
    use super::*;

    #[test]
    fn test_follower_targets_predecessor_standoff() {
        let mut config = SimConfig::test_config(3);
        config.initial_algorithm = SwarmAlgorithm::BtpAntColony;
        let mut state = FleetState::new(&config).unwrap();
        airborne(&mut state, 20.0);
        state.units[0].position = Position::new(0.0, 0.0, 20.0);
        state.units[0].velocity = Velocity::new(2.0, 0.0, 0.0);
        state.units[1].position = Position::new(-20.0, 0.0, 20.0);
        state.units[2].position = Position::new(-40.0, 0.0, 20.0);

        let next = engine(&config).step(&state);
        let target = next.units[1].target;
        assert!((target.x + config.follow_gap).abs() < 1e-4);
        assert!(target.y.abs() < 1e-4);
        assert_eq!(target.z, 20.0);
        // Stationary predecessor: standoff along +x heading
        assert!((next.units[2].target.x - (-20.0 - config.follow_gap)).abs() < 1e-4);
    }

    #[test]
    fn test_leader_flies_orbit() {
        let mut config = SimConfig::test_config(1);
        config.initial_algorithm = SwarmAlgorithm::BtpAntColony;
        let mut state = FleetState::new(&config).unwrap();
        airborne(&mut state, 20.0);

        let next = engine(&config).step(&state);
        let target = next.units[0].target;
        assert!(target.x.abs() < 1e-4);
        assert!((target.y - config.orbit_radius).abs() < 1e-4);
        assert!((target.z - config.orbit_altitude).abs() < 1e-4);
    }

    #[test]
    fn test_hold_algorithms_keep_target() {
        let config = SimConfig::test_config(2);
        let mut state = FleetState::new(&config).unwrap();
        airborne(&mut state, 15.0);
        let (state, _) = apply_command(
            &state,
            &Command::SetAlgorithm(SwarmAlgorithm::GridSearch),
            &config,
        )
        .unwrap();

        let next = engine(&config).step(&state);
        for (before, after) in state.units.iter().zip(next.units.iter()) {
            assert_eq!(before.target, after.target);
        }
    }
}

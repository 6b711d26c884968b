//! Fleet tick transition
//!
//! `step` is the whole simulation: a pure function from one snapshot to the
//! next. Order within a tick:
//! 1. Score every unit.
//! 2. Run the leader election if an epoch has closed.
//! 3. Per unit: flight-mode guidance, formation target, integration,
//!    terminal mode transitions, battery and trail bookkeeping.
//! 4. Advance the clock.
//!
//! Neighbour and predecessor reads go to the previous snapshot, so the
//! result does not depend on the order units are processed in.

use crate::consensus::{run_election, score_fleet, ElectionOutcome};
use crate::control::{FlightModeMachine, FormationController, Guidance, PhysicsIntegrator};
use crate::fleet::{FleetState, Unit};
use crate::system::config::SimConfig;
use crate::types::*;
use log::{trace, warn};

/// Power draw while flying, before the acceleration term
pub const FLYING_BASE_DRAW: f32 = 0.8;
/// Power draw per m/s² of demanded acceleration
pub const ACCELERATION_DRAW: f32 = 0.5;
/// Power draw while armed and idle
pub const ARMED_IDLE_DRAW: f32 = 0.1;

/// Controllers built once from a configuration and reused every tick
#[derive(Debug, Clone)]
pub struct SwarmEngine {
    config: SimConfig,
    modes: FlightModeMachine,
    formation: FormationController,
    physics: PhysicsIntegrator,
}

impl SwarmEngine {
    /// Create engine from a validated configuration
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            modes: FlightModeMachine::from_config(&config),
            formation: FormationController::from_config(&config),
            physics: PhysicsIntegrator::from_config(&config),
            config,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Compute the next snapshot
    pub fn step(&self, prev: &FleetState) -> FleetState {
        self.step_with_outcome(prev).0
    }

    /// Compute the next snapshot and report what the election did
    pub fn step_with_outcome(&self, prev: &FleetState) -> (FleetState, ElectionOutcome) {
        let dt = self.config.dt();
        let mut next = prev.clone();

        score_fleet(&mut next, self.config.max_velocity);
        let outcome = run_election(&mut next, self.config.election_period_secs);

        let leader = next.leader_id;
        let algorithm = next.algorithm;
        let time = prev.simulation_time;

        for (index, unit) in next.units.iter_mut().enumerate() {
            match self.modes.pre_integration(unit) {
                Guidance::Frozen => continue,
                Guidance::Formation => {
                    if let Some(target) =
                        self.formation
                            .compute_target(algorithm, index, prev, leader, time)
                    {
                        unit.target = target;
                    }
                }
                Guidance::Mission | Guidance::Hold => {}
            }

            let demanded = self.physics.integrate(unit, index, &prev.units, dt);
            if let Some(transition) = self.modes.post_integration(unit) {
                trace!("{}: {:?}", unit.id, transition);
            }
            self.bookkeeping(unit, demanded);
        }

        next.tick = prev.tick.wrapping_add(1);
        next.simulation_time = prev.simulation_time + f64::from(dt);
        (next, outcome)
    }

    /// Battery drain and trail after the unit's final status is known
    fn bookkeeping(&self, unit: &mut Unit, demanded_acceleration: f32) {
        let draw = match unit.status {
            UnitStatus::Flying => FLYING_BASE_DRAW + ACCELERATION_DRAW * demanded_acceleration,
            UnitStatus::Armed => ARMED_IDLE_DRAW,
            _ => 0.0,
        };
        unit.drain_battery(draw, self.config.battery_drain_base);

        if unit.is_flying() {
            unit.record_trail();
        }
    }
}

/// One tick with controllers built from `config`
///
/// Convenience for callers that do not keep a `SwarmEngine`; an invalid
/// configuration returns the snapshot unchanged.
pub fn step(prev: &FleetState, config: &SimConfig) -> FleetState {
    match SwarmEngine::new(config.clone()) {
        Ok(engine) => engine.step(prev),
        Err(e) => {
            warn!("Tick skipped: {}", e);
            prev.clone()
        }
    }
}

//! Fleet-wide snapshot
//!
//! A `FleetState` is a plain value. Each tick derives a new one from the
//! previous, so observers can read a consistent snapshot while the next is
//! computed. Units live in roster slots and are addressed by index or id;
//! the leader is kept as an id and re-resolved at every read.

use super::unit::Unit;
use crate::system::config::SimConfig;
use crate::types::*;
use crate::MAX_FLEET_SIZE;
use heapless::Vec;
use serde::{Deserialize, Serialize};

/// Snapshot of the whole fleet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetState {
    /// Roster in follower-chain order
    pub units: Vec<Unit, MAX_FLEET_SIZE>,
    /// Current leader (may name a unit that is no longer flying)
    pub leader_id: Option<UnitId>,
    /// Ground link status
    pub link_active: bool,
    /// Ticks elapsed since startup
    pub tick: u64,
    /// Simulated time (seconds)
    pub simulation_time: f64,
    /// Simulated time of the last election
    pub last_epoch_time: f64,
    /// Fleet arming state
    pub arming_state: ArmingState,
    /// Fleet-wide requested flight mode
    pub global_flight_mode: FlightMode,
    /// Active coordination algorithm
    pub algorithm: SwarmAlgorithm,
    /// Ambient conditions
    pub environment: Environment,
}

impl FleetState {
    /// Create the startup fleet: `config.fleet_size` grounded units, `uav-0` leading
    pub fn new(config: &SimConfig) -> Result<Self> {
        config.validate()?;

        let mut units = Vec::new();
        for index in 0..config.fleet_size {
            units
                .push(Unit::new_virtual(index))
                .map_err(|_| SimError::FleetSizeExceeded)?;
        }

        Ok(Self {
            leader_id: units.first().map(|u| u.id),
            units,
            link_active: true,
            tick: 0,
            simulation_time: 0.0,
            last_epoch_time: 0.0,
            arming_state: ArmingState::Disarmed,
            global_flight_mode: FlightMode::Stabilized,
            algorithm: config.initial_algorithm,
            environment: config.environment,
        })
    }

    /// Number of units
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Check if the roster is empty
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Get unit by id
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    /// Get mutable unit by id
    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|u| u.id == id)
    }

    /// Resolve the leader id against the roster
    pub fn leader(&self) -> Option<&Unit> {
        self.leader_id.and_then(|id| self.unit(id))
    }

    /// Check if the fleet is armed
    pub fn is_armed(&self) -> bool {
        self.arming_state == ArmingState::Armed
    }

    /// Unit followed by roster slot `index`
    ///
    /// Slot `i` follows slot `i - 1`; the first slot follows the leader.
    pub fn predecessor(&self, index: usize) -> Option<&Unit> {
        match index {
            0 => self.leader(),
            i => self.units.get(i - 1),
        }
    }

    /// Units currently flying
    pub fn flying(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(|u| u.is_flying())
    }

    /// Number of units with `status`
    pub fn count_status(&self, status: UnitStatus) -> usize {
        self.units.iter().filter(|u| u.status == status).count()
    }

    /// Fleet centroid (center of mass)
    pub fn centroid(&self) -> Position {
        if self.units.is_empty() {
            return Position::ZERO;
        }
        let mut sum = Position::ZERO;
        for unit in self.units.iter() {
            sum += unit.position;
        }
        sum * (1.0 / self.units.len() as f32)
    }
}

//! Configuration management for the fleet simulation

use crate::types::*;
use crate::{
    BATTERY_DRAIN_BASE, DEFAULT_TAKEOFF_ALT, DRAG_COEFF_LINEAR, MAX_ACCELERATION,
    MAX_FLEET_SIZE, MAX_VELOCITY, TICK_RATE_HZ, T_PERIOD_SEC,
};

/// Simulation configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Number of units created at startup
    pub fleet_size: usize,
    /// Fixed tick rate (Hz)
    pub tick_rate_hz: u32,
    /// Velocity magnitude limit (m/s)
    pub max_velocity: f32,
    /// Acceleration magnitude limit (m/s²)
    pub max_acceleration: f32,
    /// Linear drag coefficient applied after the force step
    pub drag_coeff_linear: f32,
    /// Minimum simulated time between leader elections (seconds)
    pub election_period_secs: f64,
    /// Battery percentage removed per unit of power draw per tick
    pub battery_drain_base: f32,
    /// Altitude commanded by takeoff (meters)
    pub default_takeoff_alt: f32,

    // Flight-mode thresholds
    /// Distance at which a mission waypoint counts as reached (meters)
    pub waypoint_acceptance_radius: f32,
    /// Altitude below which a unit is considered on the ground (meters)
    pub ground_contact_altitude: f32,
    /// Altitude error at which takeoff is complete (meters)
    pub takeoff_tolerance: f32,

    // Formation
    /// Radius of the leader exploration orbit (meters)
    pub orbit_radius: f32,
    /// Base altitude of the leader orbit (meters)
    pub orbit_altitude: f32,
    /// Altitude swing of the leader orbit (meters)
    pub orbit_altitude_swing: f32,
    /// Standoff distance behind the predecessor (meters)
    pub follow_gap: f32,

    // Physics
    /// Proportional gain from target error to acceleration
    pub position_gain: f32,
    /// Neighbours closer than this repel (meters)
    pub separation_radius: f32,
    /// Neighbours closer than this are ignored (meters)
    pub separation_min_distance: f32,
    /// Repulsion gain
    pub separation_gain: f32,
    /// Altitude above which separation is applied (meters)
    pub airborne_altitude: f32,

    /// Coordination algorithm active at startup
    pub initial_algorithm: SwarmAlgorithm,
    /// Environment at startup
    pub environment: Environment,
}

impl SimConfig {
    /// Create a configuration with the standard constants
    pub fn new(fleet_size: usize) -> Self {
        Self {
            fleet_size,
            tick_rate_hz: TICK_RATE_HZ,
            max_velocity: MAX_VELOCITY,
            max_acceleration: MAX_ACCELERATION,
            drag_coeff_linear: DRAG_COEFF_LINEAR,
            election_period_secs: T_PERIOD_SEC,
            battery_drain_base: BATTERY_DRAIN_BASE,
            default_takeoff_alt: DEFAULT_TAKEOFF_ALT,
            waypoint_acceptance_radius: 2.5,
            ground_contact_altitude: 0.1,
            takeoff_tolerance: 0.5,
            orbit_radius: 35.0,
            orbit_altitude: 25.0,
            orbit_altitude_swing: 5.0,
            follow_gap: 6.0,
            position_gain: 2.0,
            separation_radius: 5.0,
            separation_min_distance: 0.1,
            separation_gain: 10.0,
            airborne_altitude: 1.0,
            initial_algorithm: SwarmAlgorithm::BtpAntColony,
            environment: Environment::default(),
        }
    }

    /// Create a configuration for testing: small fleet, formation control off
    pub fn test_config(fleet_size: usize) -> Self {
        Self {
            initial_algorithm: SwarmAlgorithm::LeaderFollower,
            ..Self::new(fleet_size)
        }
    }

    /// Fixed step length (seconds)
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_rate_hz as f32
    }

    /// Tick period in microseconds
    pub fn tick_period_us(&self) -> u64 {
        1_000_000 / self.tick_rate_hz.max(1) as u64
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.fleet_size == 0 {
            return Err(SimError::ConfigError);
        }
        if self.fleet_size > MAX_FLEET_SIZE {
            return Err(SimError::FleetSizeExceeded);
        }
        if self.tick_rate_hz == 0 {
            return Err(SimError::ConfigError);
        }
        if !(self.max_velocity > 0.0) || !(self.max_acceleration > 0.0) {
            return Err(SimError::ConfigError);
        }
        // Drag must not reverse velocity within one step
        if self.drag_coeff_linear < 0.0 || self.drag_coeff_linear * self.dt() >= 1.0 {
            return Err(SimError::ConfigError);
        }
        if !(self.election_period_secs >= 0.0) || self.battery_drain_base < 0.0 {
            return Err(SimError::ConfigError);
        }
        if self.separation_min_distance <= 0.0
            || self.separation_radius <= self.separation_min_distance
        {
            return Err(SimError::ConfigError);
        }
        if self.default_takeoff_alt < 0.0 || self.follow_gap < 0.0 {
            return Err(SimError::InvalidParameter);
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new(crate::DEFAULT_FLEET_SIZE)
    }
}

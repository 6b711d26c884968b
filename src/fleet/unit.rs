//! Per-unit state record and sensor bundle

use crate::types::*;
use crate::{MAX_WAYPOINTS, TRAIL_CAPACITY};
use core::fmt::Write;
use heapless::{String, Vec};
use serde::{Deserialize, Serialize};

/// Coarse ranging samples kept per unit
pub const MAX_RANGING_SAMPLES: usize = 16;

/// Waypoint queue, front is the next target
pub type MissionPath = Vec<Position, MAX_WAYPOINTS>;

/// Recent positions, oldest first
pub type Trail = Vec<Position, TRAIL_CAPACITY>;

/// Inertial measurement unit readings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Imu {
    /// Measured acceleration (m/s²)
    pub accel: Vec3,
    /// Measured angular rate (rad/s)
    pub gyro: Vec3,
    /// Accumulated drift estimate
    pub drift: f32,
}

/// Coarse ranging sensor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranging {
    /// Latest range samples (meters)
    pub samples: Vec<f32, MAX_RANGING_SAMPLES>,
    /// Maximum range (meters)
    pub max_range: f32,
    /// Noise floor (meters)
    pub noise_floor: f32,
}

/// GPS receiver state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gps {
    /// Latitude (degrees)
    pub lat: f64,
    /// Longitude (degrees)
    pub lon: f64,
    /// Altitude (meters)
    pub alt: f32,
    /// Horizontal dilution of precision
    pub hdop: f32,
    /// Satellites in view
    pub sats: u8,
    /// Fix type (0 none, 2 2D, 3 3D)
    pub fix_type: u8,
}

/// Battery pack state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Battery {
    /// Pack voltage (V)
    pub voltage: f32,
    /// Current draw (A)
    pub current: f32,
    /// Remaining charge (0-100%)
    pub percentage: f32,
    /// Voltage sag under load (V)
    pub sag: f32,
}

/// Full sensor bundle of a unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorSuite {
    /// Inertial unit
    pub imu: Imu,
    /// Ranging sensor
    pub ranging: Ranging,
    /// GPS receiver
    pub gps: Gps,
    /// Battery pack
    pub battery: Battery,
}

impl Default for SensorSuite {
    fn default() -> Self {
        Self {
            imu: Imu {
                accel: Vec3::ZERO,
                gyro: Vec3::ZERO,
                drift: 0.0,
            },
            ranging: Ranging {
                samples: Vec::new(),
                max_range: 80.0,
                noise_floor: 0.01,
            },
            gps: Gps {
                lat: 37.77,
                lon: -122.42,
                alt: 0.0,
                hdop: 0.65,
                sats: 14,
                fix_type: 3,
            },
            battery: Battery {
                voltage: 12.6,
                current: 0.1,
                percentage: 100.0,
                sag: 0.0,
            },
        }
    }
}

/// One simulated fleet member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// Stable identifier
    pub id: UnitId,
    /// Display callsign (UAV-01, UAV-02, ...)
    pub callsign: String<16>,
    /// Squadron tag
    pub squadron: Squadron,
    /// Lifecycle status
    pub status: UnitStatus,
    /// Behavioral flight mode
    pub flight_mode: FlightMode,
    /// Current position (meters)
    pub position: Position,
    /// Current velocity (m/s)
    pub velocity: Velocity,
    /// Acceleration applied on the last tick (m/s²)
    pub acceleration: Acceleration,
    /// Desired point
    pub target: Position,
    /// Queued waypoints, consumed front first
    pub mission_path: MissionPath,
    /// Sensor bundle
    pub sensors: SensorSuite,
    /// Signal strength (dBm)
    pub rssi: f32,
    /// Last computed fitness (0.0 - 1.0)
    pub score: f32,
    /// Recent positions for display
    pub trail: Trail,
}

impl Unit {
    /// Create the unit occupying roster slot `index`, parked on the launch grid
    pub fn new_virtual(index: usize) -> Self {
        let grid_x = (index % 4) as f32 * 5.0 - 7.5;
        let grid_y = (index / 4) as f32 * 5.0 - 7.5;
        let position = Position::new(grid_x, grid_y, 0.0);

        let slot = index as u32;
        let mut callsign = String::new();
        // UAV- plus at most ten digits always fits
        let _ = write!(callsign, "UAV-{:02}", u64::from(slot) + 1);

        Self {
            id: UnitId::new(slot),
            callsign,
            squadron: Squadron::from_index(index),
            status: UnitStatus::Standby,
            flight_mode: FlightMode::Stabilized,
            position,
            velocity: Velocity::ZERO,
            acceleration: Acceleration::ZERO,
            target: position,
            mission_path: Vec::new(),
            sensors: SensorSuite::default(),
            rssi: -45.0,
            score: 1.0,
            trail: Vec::new(),
        }
    }

    /// Check if the unit is actively flying
    pub fn is_flying(&self) -> bool {
        self.status == UnitStatus::Flying
    }

    /// Check if the unit is above `threshold` meters
    pub fn is_airborne(&self, threshold: f32) -> bool {
        self.position.z >= threshold
    }

    /// Current altitude (meters)
    pub fn altitude(&self) -> f32 {
        self.position.z
    }

    /// Speed (m/s)
    pub fn speed(&self) -> f32 {
        self.velocity.magnitude()
    }

    /// Remaining battery (%)
    pub fn battery_percent(&self) -> f32 {
        self.sensors.battery.percentage
    }

    /// Zero velocity and acceleration
    pub fn hold_still(&mut self) {
        self.velocity = Velocity::ZERO;
        self.acceleration = Acceleration::ZERO;
    }

    /// Drop all queued waypoints
    pub fn clear_mission(&mut self) {
        self.mission_path.clear();
    }

    /// Replace the mission queue with `waypoints`
    ///
    /// Altitudes below ground are clamped to 0 and anything beyond
    /// `MAX_WAYPOINTS` is dropped. Returns the number of waypoints loaded.
    pub fn load_mission(&mut self, waypoints: &[Position]) -> usize {
        self.mission_path.clear();
        for wp in waypoints.iter().take(MAX_WAYPOINTS) {
            let clamped = wp.with_z(wp.z.max(0.0));
            if self.mission_path.push(clamped).is_err() {
                break;
            }
        }
        self.mission_path.len()
    }

    /// Next waypoint, if any
    pub fn next_waypoint(&self) -> Option<&Position> {
        self.mission_path.first()
    }

    /// Remove the front waypoint
    pub fn pop_waypoint(&mut self) -> Option<Position> {
        if self.mission_path.is_empty() {
            None
        } else {
            Some(self.mission_path.remove(0))
        }
    }

    /// Move position and target to `point` without physics
    pub fn teleport(&mut self, point: Position) {
        let point = point.with_z(point.z.max(0.0));
        self.position = point;
        self.target = point;
    }

    /// Subtract `base * draw` from the battery, never below 0
    pub fn drain_battery(&mut self, draw: f32, base: f32) {
        let battery = &mut self.sensors.battery;
        battery.percentage = (battery.percentage - base * draw).max(0.0);
        battery.sag = draw * 0.1;
    }

    /// Append the current position to the trail, evicting the oldest
    pub fn record_trail(&mut self) {
        if self.trail.is_full() {
            self.trail.remove(0);
        }
        let _ = self.trail.push(self.position);
    }
}

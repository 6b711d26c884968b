//! Core type definitions for the fleet simulation

use core::fmt;
use core::ops::{Add, AddAssign, Mul, Sub};
use serde::{Deserialize, Serialize};

/// Result type for fleet operations
pub type Result<T> = core::result::Result<T, SimError>;

/// Stable identifier of a fleet member (its roster slot)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u32);

impl UnitId {
    /// Create a new UnitId from a roster index
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the inner value
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "uav-{}", self.0)
    }
}

/// 3D vector (meters, m/s or m/s² depending on use)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component (altitude for positions)
    pub z: f32,
}

/// Position in the local frame, z up
pub type Position = Vec3;
/// Velocity vector
pub type Velocity = Vec3;
/// Acceleration vector
pub type Acceleration = Vec3;

impl Vec3 {
    /// The zero vector
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    /// Create a new vector
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean length
    pub fn magnitude(&self) -> f32 {
        libm::sqrtf(self.x * self.x + self.y * self.y + self.z * self.z)
    }

    /// Length of the (x, y) projection
    pub fn horizontal_magnitude(&self) -> f32 {
        libm::sqrtf(self.x * self.x + self.y * self.y)
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &Vec3) -> f32 {
        (*self - *other).magnitude()
    }

    /// Scale the vector down so its length does not exceed `max`
    pub fn clamp_magnitude(self, max: f32) -> Self {
        let mag = self.magnitude();
        if mag > max && mag > 0.0 {
            self * (max / mag)
        } else {
            self
        }
    }

    /// Same point with altitude replaced
    pub fn with_z(self, z: f32) -> Self {
        Self { z, ..self }
    }

    /// Check that all components are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Replace NaN or infinite components with 0
    pub fn sanitized(self) -> Self {
        let finite = |v: f32| if v.is_finite() { v } else { 0.0 };
        Self::new(finite(self.x), finite(self.y), finite(self.z))
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Vec3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Lifecycle status of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnitStatus {
    /// On the ground, motors off
    #[default]
    Standby,
    /// Motors armed, idle
    Armed,
    /// Airborne and under control
    Flying,
    /// Returning to launch
    Rtl,
    /// Hardware or control failure
    Failed,
    /// Link lost
    Lost,
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UnitStatus::Standby => "STANDBY",
            UnitStatus::Armed => "ARMED",
            UnitStatus::Flying => "FLYING",
            UnitStatus::Rtl => "RTL",
            UnitStatus::Failed => "FAILED",
            UnitStatus::Lost => "LOST",
        };
        f.pad(name)
    }
}

/// Behavioral flight mode of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlightMode {
    /// Direct pilot control (reserved)
    Manual,
    /// Attitude hold, no autonomous target
    #[default]
    Stabilized,
    /// Hold the last target
    Position,
    /// Follow the uploaded waypoint queue
    Mission,
    /// Climb to the takeoff altitude
    Takeoff,
    /// Descend to the ground
    Land,
    /// Return to launch (reserved)
    Rtl,
    /// Loiter (reserved)
    Hold,
    /// Externally supplied setpoints (reserved)
    Offboard,
}

impl fmt::Display for FlightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlightMode::Manual => "MANUAL",
            FlightMode::Stabilized => "STABILIZED",
            FlightMode::Position => "POSITION",
            FlightMode::Mission => "MISSION",
            FlightMode::Takeoff => "TAKEOFF",
            FlightMode::Land => "LAND",
            FlightMode::Rtl => "RTL",
            FlightMode::Hold => "HOLD",
            FlightMode::Offboard => "OFFBOARD",
        };
        f.pad(name)
    }
}

/// Fleet-wide arming state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArmingState {
    /// Motors disabled
    #[default]
    Disarmed,
    /// Arming in progress
    ArmingSequence,
    /// Motors enabled
    Armed,
    /// Emergency stop latched
    EmergencyStop,
}

impl fmt::Display for ArmingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArmingState::Disarmed => "DISARMED",
            ArmingState::ArmingSequence => "ARMING...",
            ArmingState::Armed => "ARMED",
            ArmingState::EmergencyStop => "E-STOP",
        };
        f.pad(name)
    }
}

/// Swarm coordination algorithm selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SwarmAlgorithm {
    /// Classic leader/follower offsets
    LeaderFollower,
    /// Reynolds flocking
    BoidsFlocking,
    /// Lawnmower area coverage
    GridSearch,
    /// Orbit a point of interest
    OrbitTarget,
    /// Converge on a rally point
    Aggregate,
    /// Threshold-consensus formation
    ThresholdConsensus,
    /// Leader exploration orbit with a single-file follower chain
    #[default]
    BtpAntColony,
}

impl fmt::Display for SwarmAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SwarmAlgorithm::LeaderFollower => "LEADER_FOLLOWER",
            SwarmAlgorithm::BoidsFlocking => "BOIDS_FLOCKING",
            SwarmAlgorithm::GridSearch => "GRID_SEARCH",
            SwarmAlgorithm::OrbitTarget => "ORBIT_TARGET",
            SwarmAlgorithm::Aggregate => "AGGREGATE",
            SwarmAlgorithm::ThresholdConsensus => "THRESHOLD_CONSENSUS",
            SwarmAlgorithm::BtpAntColony => "BTP_ANT_COLONY",
        };
        f.pad(name)
    }
}

/// Squadron assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Squadron {
    /// First squadron
    Alpha,
    /// Second squadron
    Bravo,
    /// Third squadron
    Charlie,
}

impl Squadron {
    /// Deterministic assignment from roster index
    pub const fn from_index(index: usize) -> Self {
        match index % 3 {
            0 => Squadron::Alpha,
            1 => Squadron::Bravo,
            _ => Squadron::Charlie,
        }
    }
}

impl fmt::Display for Squadron {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Squadron::Alpha => "ALPHA",
            Squadron::Bravo => "BRAVO",
            Squadron::Charlie => "CHARLIE",
        };
        f.pad(name)
    }
}

/// Ambient conditions, read-only inputs to a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    /// Horizontal wind vector (m/s)
    pub wind: [f32; 2],
    /// Wind speed (m/s)
    pub wind_speed: f32,
    /// Rain intensity (0.0 - 1.0)
    pub rain: f32,
    /// RF interference level (0.0 - 1.0)
    pub interference: f32,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            wind: [0.5, 0.2],
            wind_speed: 1.0,
            rain: 0.0,
            interference: 0.05,
        }
    }
}

/// Error types for fleet operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimError {
    /// No unit with this id in the roster
    InvalidUnitId,
    /// Fixed-capacity buffer is full
    BufferFull,
    /// Configuration rejected by validation
    ConfigError,
    /// Roster larger than `MAX_FLEET_SIZE`
    FleetSizeExceeded,
    /// Invalid parameter provided
    InvalidParameter,
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidUnitId => write!(f, "Invalid unit ID"),
            SimError::BufferFull => write!(f, "Buffer full"),
            SimError::ConfigError => write!(f, "Configuration error"),
            SimError::FleetSizeExceeded => write!(f, "Fleet size exceeded"),
            SimError::InvalidParameter => write!(f, "Invalid parameter"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SimError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_magnitude_keeps_direction() {
        let v = Vec3::new(30.0, 40.0, 0.0).clamp_magnitude(5.0);
        assert!((v.magnitude() - 5.0).abs() < 1e-5);
        assert!((v.x - 3.0).abs() < 1e-5);
        assert!((v.y - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_clamp_magnitude_zero_vector() {
        assert_eq!(Vec3::ZERO.clamp_magnitude(1.0), Vec3::ZERO);
    }

    #[test]
    fn test_sanitized_drops_non_finite() {
        let v = Vec3::new(f32::NAN, f32::INFINITY, 2.0).sanitized();
        assert_eq!(v, Vec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn test_unit_id_display() {
        assert_eq!(format!("{}", UnitId::new(7)), "uav-7");
    }

    #[test]
    fn test_squadron_rotation() {
        assert_eq!(Squadron::from_index(0), Squadron::Alpha);
        assert_eq!(Squadron::from_index(4), Squadron::Bravo);
        assert_eq!(Squadron::from_index(5), Squadron::Charlie);
    }

    #[test]
    fn test_arming_state_labels() {
        assert_eq!(format!("{}", ArmingState::EmergencyStop), "E-STOP");
        assert_eq!(format!("{}", ArmingState::ArmingSequence), "ARMING...");
    }
}

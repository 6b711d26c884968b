//! # Drone Fleet Simulation Core
//!
//! Fixed-rate simulation of a fleet of autonomous aerial units. Each tick is
//! one pure transition from the previous fleet snapshot to the next.
//!
//! ## Features
//! - Per-tick fitness scoring and epoch-based leader election with hot-swap
//! - Per-unit flight-mode state machine (arm, takeoff, mission, land)
//! - Leader exploration orbit with a single-file follower chain
//! - Proportional attraction, pairwise separation, drag and limit clamping
//! - Battery depletion and a bounded position trail
//! - Command queue applied strictly between ticks, events to a log sink
//!
//! ## Guarantees
//! - No heap allocation in the core (fixed-capacity `heapless` storage)
//! - Every tick yields a valid next state, whatever the prior state
//! - Deterministic: the simulation clock, not wall time, drives elections

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![deny(warnings)]
#![allow(clippy::manual_range_contains)]
#![allow(clippy::neg_cmp_op_on_partial_ord)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::suboptimal_flops)]

/// Situational summaries handed to advisory collaborators
pub mod advisory;
/// Operator commands and their application to a snapshot
pub mod command;
/// Fitness scoring and threshold-consensus leader election
pub mod consensus;
/// Flight-mode state machine, formation controller and physics integrator
pub mod control;
/// Unit and fleet state records
pub mod fleet;
/// Fixed-rate tick scheduler
pub mod scheduler;
/// The per-tick fleet transition
pub mod swarm;
/// System configuration
pub mod system;
/// Fleet events and log sinks
pub mod telemetry;
/// Platform-agnostic time sources for tick pacing
pub mod time_abstraction;
/// Core types (Vec3, UnitId, status and mode enums, errors)
pub mod types;

pub use command::{apply_command, Command};
pub use fleet::{FleetState, Unit};
pub use scheduler::TickScheduler;
pub use swarm::step;
pub use system::config::*;
pub use telemetry::{EventLog, EventSink, FleetEvent, LogSink};
pub use types::*;

/// Fixed simulation tick rate (Hz).
pub const TICK_RATE_HZ: u32 = 60;

/// Velocity magnitude limit (m/s).
pub const MAX_VELOCITY: f32 = 10.0;

/// Acceleration magnitude limit (m/s²).
pub const MAX_ACCELERATION: f32 = 4.0;

/// Linear drag coefficient, applied multiplicatively after the force step.
pub const DRAG_COEFF_LINEAR: f32 = 0.15;

/// Minimum simulated time between leader elections (seconds).
///
/// Elections are checked once per tick and fire on the first tick at
/// which at least this much simulated time has passed since the last one.
pub const T_PERIOD_SEC: f64 = 5.0;

/// Battery percentage drained per tick per unit of power draw.
pub const BATTERY_DRAIN_BASE: f32 = 0.00005;

/// Altitude commanded by a takeoff (meters).
pub const DEFAULT_TAKEOFF_ALT: f32 = 10.0;

/// Roster size created by `SimConfig::default()`.
pub const DEFAULT_FLEET_SIZE: usize = 12;

/// Maximum number of units in a fleet.
///
/// Bounds the roster storage and the O(n²) separation pass.
pub const MAX_FLEET_SIZE: usize = 32;

/// Maximum waypoints queued on one unit.
pub const MAX_WAYPOINTS: usize = 64;

/// Positions kept in each unit's display trail.
pub const TRAIL_CAPACITY: usize = 50;

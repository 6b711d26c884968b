//! Per-unit control: flight-mode state machine, formation targets, physics

pub mod flight_mode;
pub mod formation;
pub mod physics;

pub use flight_mode::*;
pub use formation::*;
pub use physics::*;

//! Unit and fleet state records

pub mod state;
pub mod unit;

pub use state::*;
pub use unit::*;

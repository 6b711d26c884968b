//! Threshold consensus over fleet fitness

pub mod election;
pub mod scoring;

pub use election::*;
pub use scoring::*;

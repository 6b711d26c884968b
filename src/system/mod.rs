//! System configuration

pub mod config;

pub use config::*;

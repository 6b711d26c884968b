//! Situational summaries for advisory collaborators
//!
//! An advisor (a remote assistant, a rule engine, an operator console)
//! receives a compact `FleetSummary` plus an operator prompt and writes its
//! reply to any `core::fmt::Write`. Nothing it returns feeds back into the
//! simulation.

use crate::fleet::FleetState;
use crate::types::*;
use core::fmt;
use serde::{Deserialize, Serialize};

/// IMU drift above which a unit is reported as drifting
pub const IMU_DRIFT_WARNING: f32 = 0.05;

/// Fleet status counters and conditions at one instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FleetSummary {
    /// Snapshot tick
    pub tick: u64,
    /// Units in the roster
    pub total: usize,
    /// Units currently flying
    pub active: usize,
    /// Units returning to launch
    pub returning: usize,
    /// Units failed or lost
    pub failed: usize,
    /// Units whose IMU drift exceeds `IMU_DRIFT_WARNING`
    pub drifting: usize,
    /// Mean battery charge (0-100%)
    pub mean_battery: f32,
    /// Rain intensity (0-100%)
    pub rain_percent: f32,
    /// Wind speed (m/s)
    pub wind_speed: f32,
    /// Current leader
    pub leader: Option<UnitId>,
    /// Fleet arming state
    pub arming_state: ArmingState,
    /// Active coordination algorithm
    pub algorithm: SwarmAlgorithm,
}

impl FleetSummary {
    /// Summarize a snapshot
    pub fn from_state(state: &FleetState) -> Self {
        let total = state.len();
        let battery_sum: f32 = state.units.iter().map(|u| u.battery_percent()).sum();
        let mean_battery = if total == 0 {
            0.0
        } else {
            battery_sum / total as f32
        };

        Self {
            tick: state.tick,
            total,
            active: state.count_status(UnitStatus::Flying),
            returning: state.count_status(UnitStatus::Rtl),
            failed: state.count_status(UnitStatus::Failed) + state.count_status(UnitStatus::Lost),
            drifting: state
                .units
                .iter()
                .filter(|u| u.sensors.imu.drift > IMU_DRIFT_WARNING)
                .count(),
            mean_battery,
            rain_percent: state.environment.rain * 100.0,
            wind_speed: state.environment.wind_speed,
            leader: state.leader_id,
            arming_state: state.arming_state,
            algorithm: state.algorithm,
        }
    }
}

impl fmt::Display for FleetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SITREP T{}: {} UNITS, ACTIVE {}, RTL {}, FAILED {}, IMU DRIFT {}, \
             BATT {:.1}%, RAIN {:.0}%, WIND {:.1} M/S, {}, ALGO {}, LEADER ",
            self.tick,
            self.total,
            self.active,
            self.returning,
            self.failed,
            self.drifting,
            self.mean_battery,
            self.rain_percent,
            self.wind_speed,
            self.arming_state,
            self.algorithm,
        )?;
        match self.leader {
            Some(id) => write!(f, "{}", id),
            None => f.write_str("NONE"),
        }
    }
}

/// Source of advice about the fleet
pub trait Advisor {
    /// Write advice for `prompt` given `summary` into `out`
    fn advise(
        &mut self,
        summary: &FleetSummary,
        prompt: &str,
        out: &mut dyn fmt::Write,
    ) -> fmt::Result;
}

/// Offline advisor applying fixed rules to the summary
#[derive(Debug, Clone, Copy)]
pub struct RuleAdvisor {
    /// Mean battery below which a recall is advised (%)
    pub low_battery: f32,
    /// Rain intensity above which a hold is advised (%)
    pub heavy_rain: f32,
}

impl Default for RuleAdvisor {
    fn default() -> Self {
        Self {
            low_battery: 25.0,
            heavy_rain: 60.0,
        }
    }
}

impl Advisor for RuleAdvisor {
    fn advise(
        &mut self,
        summary: &FleetSummary,
        prompt: &str,
        out: &mut dyn fmt::Write,
    ) -> fmt::Result {
        if !prompt.is_empty() {
            writeln!(out, "RE: {}", prompt)?;
        }
        writeln!(out, "{}", summary)?;

        let mut advised = false;
        if summary.failed > 0 {
            writeln!(out, "- {} UNIT(S) DOWN: REVIEW FORMATION GAPS", summary.failed)?;
            advised = true;
        }
        if summary.drifting > 0 {
            writeln!(out, "- {} UNIT(S) WITH IMU DRIFT: RECALIBRATE", summary.drifting)?;
            advised = true;
        }
        if summary.total > 0 && summary.mean_battery < self.low_battery {
            writeln!(out, "- MEAN BATTERY {:.1}%: RECOMMEND LANDING", summary.mean_battery)?;
            advised = true;
        }
        if summary.rain_percent > self.heavy_rain {
            writeln!(out, "- HEAVY RAIN {:.0}%: RECOMMEND HOLD", summary.rain_percent)?;
            advised = true;
        }
        if summary.active > 0 && summary.leader.is_none() {
            writeln!(out, "- NO LEADER WITH UNITS AIRBORNE")?;
            advised = true;
        }
        if !advised {
            writeln!(out, "- NOMINAL")?;
        }
        Ok(())
    }
}

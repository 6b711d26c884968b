//! Per-unit fitness scoring
//!
//! `score = 0.5 * battery + 0.3 * signal + 0.2 * stability`, each term
//! normalized to [0, 1]. Recomputed for every unit on every tick.

use crate::fleet::{FleetState, Unit};

/// Weight of remaining battery
pub const BATTERY_WEIGHT: f32 = 0.5;
/// Weight of normalized signal strength
pub const SIGNAL_WEIGHT: f32 = 0.3;
/// Weight of flight stability
pub const STABILITY_WEIGHT: f32 = 0.2;

/// RSSI mapped to 0.0 (dBm)
pub const RSSI_FLOOR_DBM: f32 = -95.0;
/// Width of the RSSI band mapped onto [0, 1] (dB)
pub const RSSI_SPAN_DB: f32 = 65.0;

/// Map RSSI onto [0, 1]
pub fn normalized_signal(rssi: f32) -> f32 {
    let value = ((rssi - RSSI_FLOOR_DBM) / RSSI_SPAN_DB).clamp(0.0, 1.0);
    if value.is_nan() {
        0.0
    } else {
        value
    }
}

/// 1.0 when hovering, falling to 0.0 at `max_velocity`
pub fn stability(speed: f32, max_velocity: f32) -> f32 {
    if !(max_velocity > 0.0) {
        return 0.0;
    }
    (1.0 - speed / max_velocity).max(0.0)
}

/// Fitness of one unit
pub fn fitness_score(unit: &Unit, max_velocity: f32) -> f32 {
    let battery = (unit.battery_percent() / 100.0).clamp(0.0, 1.0);
    BATTERY_WEIGHT * battery
        + SIGNAL_WEIGHT * normalized_signal(unit.rssi)
        + STABILITY_WEIGHT * stability(unit.speed(), max_velocity)
}

/// Recompute every unit's score in place
pub fn score_fleet(state: &mut FleetState, max_velocity: f32) {
    for unit in state.units.iter_mut() {
        unit.score = fitness_score(unit, max_velocity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Velocity;

    #[test]
    fn test_signal_normalization_bounds() {
        assert_eq!(normalized_signal(-120.0), 0.0);
        assert_eq!(normalized_signal(-10.0), 1.0);
        assert!((normalized_signal(-30.0) - 1.0).abs() < 1e-6);
        assert_eq!(normalized_signal(f32::NAN), 0.0);
    }

    #[test]
    fn test_fresh_unit_score() {
        let unit = Unit::new_virtual(0);
        let expected = 0.5 + 0.3 * (50.0 / 65.0) + 0.2;
        assert!((fitness_score(&unit, 10.0) - expected).abs() < 1e-5);
    }

    #[test]
    fn test_fast_unit_loses_stability() {
        let mut unit = Unit::new_virtual(0);
        let hover = fitness_score(&unit, 10.0);
        unit.velocity = Velocity::new(10.0, 0.0, 0.0);
        let fast = fitness_score(&unit, 10.0);
        assert!((hover - fast - 0.2).abs() < 1e-5);
    }
}

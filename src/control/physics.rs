//! Physics integrator
//!
//! Fixed-step point-mass model: proportional attraction toward the target,
//! short-range horizontal repulsion between airborne units, acceleration
//! and velocity limits, multiplicative linear drag, ground clamp.

use crate::fleet::Unit;
use crate::system::config::SimConfig;
use crate::types::*;

/// Integrates unit motion toward its target
#[derive(Debug, Clone)]
pub struct PhysicsIntegrator {
    /// Target error to acceleration gain
    position_gain: f32,
    /// Acceleration limit (m/s²)
    max_acceleration: f32,
    /// Velocity limit (m/s)
    max_velocity: f32,
    /// Linear drag coefficient
    drag_coeff: f32,
    /// Separation radius (meters)
    separation_radius: f32,
    /// Closer neighbours are ignored (meters)
    separation_min_distance: f32,
    /// Repulsion gain
    separation_gain: f32,
    /// Separation applies above this altitude (meters)
    airborne_altitude: f32,
}

impl PhysicsIntegrator {
    /// Create from simulation configuration
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            position_gain: config.position_gain,
            max_acceleration: config.max_acceleration,
            max_velocity: config.max_velocity,
            drag_coeff: config.drag_coeff_linear,
            separation_radius: config.separation_radius,
            separation_min_distance: config.separation_min_distance,
            separation_gain: config.separation_gain,
            airborne_altitude: config.airborne_altitude,
        }
    }

    /// Proportional pull toward `target`
    pub fn attraction(&self, position: &Position, target: &Position) -> Acceleration {
        (*target - *position) * self.position_gain
    }

    /// Horizontal repulsion from airborne neighbours
    ///
    /// `neighbors` is the previous roster; slot `index` is the unit itself.
    /// Neighbours closer than the minimum distance contribute nothing.
    pub fn separation(&self, index: usize, position: &Position, neighbors: &[Unit]) -> Acceleration {
        let mut repulsion = Acceleration::ZERO;
        if position.z <= self.airborne_altitude {
            return repulsion;
        }

        for (j, other) in neighbors.iter().enumerate() {
            if j == index || !other.is_airborne(self.airborne_altitude) {
                continue;
            }
            let offset = *position - other.position;
            let dist = offset.magnitude();
            if dist < self.separation_radius && dist > self.separation_min_distance {
                let factor = (self.separation_radius - dist) / dist * self.separation_gain;
                repulsion.x += offset.x * factor;
                repulsion.y += offset.y * factor;
            }
        }
        repulsion
    }

    /// Advance `unit` by one step of `dt` seconds toward its target
    ///
    /// Stores the applied (clamped) acceleration on the unit. Returns the
    /// magnitude demanded before the clamp, which is what the motors draw
    /// power for.
    pub fn integrate(&self, unit: &mut Unit, index: usize, neighbors: &[Unit], dt: f32) -> f32 {
        let position = unit.position.sanitized();

        let mut demand = self.attraction(&position, &unit.target.sanitized());
        demand += self.separation(index, &position, neighbors);
        let demand = demand.sanitized();
        let accel = demand.clamp_magnitude(self.max_acceleration);

        let damping = 1.0 - self.drag_coeff * dt;
        let velocity = ((unit.velocity.sanitized() + accel * dt) * damping)
            .sanitized()
            .clamp_magnitude(self.max_velocity);

        let mut next = (position + velocity * dt).sanitized();
        next.z = next.z.max(0.0);

        unit.acceleration = accel;
        unit.velocity = velocity;
        unit.position = next;

        let demanded = demand.magnitude();
        if demanded.is_finite() {
            demanded
        } else {
            f32::MAX
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn integrator() -> PhysicsIntegrator {
        PhysicsIntegrator::from_config(&SimConfig::default())
    }

    fn airborne(index: usize, x: f32, y: f32, z: f32) -> Unit {
        let mut unit = Unit::new_virtual(index);
        unit.status = UnitStatus::Flying;
        unit.position = Position::new(x, y, z);
        unit.target = unit.position;
        unit
    }

    #[test]
    fn test_attraction_is_proportional() {
        let a = integrator().attraction(&Position::ZERO, &Position::new(1.0, -2.0, 0.5));
        assert_eq!(a, Acceleration::new(2.0, -4.0, 1.0));
    }

    #[test]
    fn test_separation_pushes_apart_horizontally() {
        let units = [airborne(0, 0.0, 0.0, 10.0), airborne(1, 3.0, 0.0, 11.0)];
        let a = integrator().separation(0, &units[0].position, &units);
        assert!(a.x < 0.0);
        assert_eq!(a.z, 0.0);
    }

    #[test]
    fn test_separation_skips_coincident_and_grounded() {
        let units = [
            airborne(0, 0.0, 0.0, 10.0),
            airborne(1, 0.05, 0.0, 10.0),
            airborne(2, 2.0, 0.0, 0.5),
        ];
        let a = integrator().separation(0, &units[0].position, &units);
        assert_eq!(a, Acceleration::ZERO);
    }

    #[test]
    fn test_no_separation_near_ground() {
        let units = [airborne(0, 0.0, 0.0, 0.8), airborne(1, 1.0, 0.0, 2.0)];
        let a = integrator().separation(0, &units[0].position, &units);
        assert_eq!(a, Acceleration::ZERO);
    }

    #[test]
    fn test_integrate_clamps_acceleration() {
        let mut unit = airborne(0, 0.0, 0.0, 0.0);
        unit.target = Position::new(100.0, 0.0, 0.0);
        let demanded = integrator().integrate(&mut unit, 0, &[], 1.0 / 60.0);
        assert!((demanded - 200.0).abs() < 1e-3);
        assert!((unit.acceleration.magnitude() - 4.0).abs() < 1e-4);
        assert!(unit.velocity.x > 0.0);
    }

    #[test]
    fn test_integrate_clamps_velocity_and_ground() {
        let mut unit = airborne(0, 0.0, 0.0, 0.01);
        unit.velocity = Velocity::new(0.0, 0.0, -50.0);
        unit.target = Position::new(0.0, 0.0, 0.0);
        integrator().integrate(&mut unit, 0, &[], 1.0 / 60.0);
        assert!(unit.speed() <= 10.0 + 1e-3);
        assert_eq!(unit.position.z, 0.0);
    }

    #[test]
    fn test_integrate_survives_nan_state() {
        let mut unit = airborne(0, 0.0, 0.0, 5.0);
        unit.velocity = Velocity::new(f32::NAN, 0.0, 0.0);
        unit.target = Position::new(f32::INFINITY, 0.0, 5.0);
        integrator().integrate(&mut unit, 0, &[], 1.0 / 60.0);
        assert!(unit.position.is_finite());
        assert!(unit.velocity.is_finite());
    }
}

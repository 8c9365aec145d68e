use roverphys_core::{Scalar, Twist, WheelState};
use serde::{Deserialize, Serialize};
use crate::model::{FrictionModel, WheelForce, wheel_slip};

/// Saturated dry friction.
///
/// Each slip component is opposed linearly up to `slip_tolerance`, then the
/// force saturates at `mu * N`. The linear zone keeps the model well behaved
/// for explicit integrators at rest.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coulomb {
    /// Multiplier on each wheel's own `mu`.
    pub mu_scale: Scalar,
    /// Slip speed (m/s) at which the force saturates.
    pub slip_tolerance: Scalar,
}

impl Default for Coulomb {
    fn default() -> Self { Self { mu_scale: 1.0, slip_tolerance: 0.05 } }
}

#[inline]
fn saturate(slip: Scalar, limit: Scalar, tol: Scalar) -> Scalar {
    (-slip * limit / tol).clamp(-limit, limit)
}

impl FrictionModel for Coulomb {
    fn name(&self) -> &str { "coulomb" }

    fn compute_forces(&self, wheels: &[WheelState], vel: &Twist) -> Vec<WheelForce> {
        let tol = self.slip_tolerance.max(1e-9);
        wheels.iter().map(|w| {
            let s = wheel_slip(w, vel);
            if s.is_zero() { return WheelForce::ZERO; }
            let limit = self.mu_scale * w.mu * w.normal_load;
            WheelForce::from_wheel_frame(w, saturate(s.longitudinal, limit, tol), saturate(s.lateral, limit, tol))
        }).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn loaded(x: f64, y: f64) -> WheelState {
        let mut w = WheelState::at(x, y, 0.1);
        w.normal_load = 100.0;
        w.mu = 0.5;
        w
    }

    #[test]
    fn saturates_at_mu_n() {
        let w = [loaded(0.0, 0.3)];
        let f = Coulomb::default().compute_forces(&w, &Twist::new(5.0, 0.0, 0.0));
        assert_relative_eq!(f[0].longitudinal, -50.0);
        assert_relative_eq!(f[0].force.x, -50.0);
    }

    #[test]
    fn spinning_wheel_pushes_forward() {
        let mut w = loaded(0.0, 0.3);
        w.omega = 1.0;
        let f = Coulomb::default().compute_forces(&[w], &Twist::ZERO);
        assert!(f[0].longitudinal > 0.0);
    }

    #[test]
    fn lateral_slip_on_steered_wheel() {
        let mut w = loaded(0.5, 0.0);
        w.yaw = core::f64::consts::FRAC_PI_2;
        // chassis sliding along +X is pure lateral slip for a wheel pointing +Y
        let f = Coulomb::default().compute_forces(&[w], &Twist::new(0.01, 0.0, 0.0));
        assert_relative_eq!(f[0].longitudinal, 0.0, epsilon = 1e-12);
        assert!(f[0].force.x < 0.0);
    }
}

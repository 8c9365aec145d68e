use roverphys_core::{Scalar, Twist, WheelState};
use serde::{Deserialize, Serialize};
use crate::model::{FrictionModel, WheelForce, wheel_slip};
use crate::surface::{SurfaceId, pair_props};

/// Speed-dependent friction: static peak decaying to the kinetic plateau.
///
/// `mu(v) = mu_k + (mu_s - mu_k) * exp(-(v / stribeck_v)^2)`, applied along
/// the slip direction with a `tanh(|v| / slip_tolerance)` ramp so the force
/// vanishes at zero slip.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stribeck {
    pub mu_s: Scalar,
    pub mu_k: Scalar,
    pub stribeck_v: Scalar,
    pub slip_tolerance: Scalar,
}

impl Default for Stribeck {
    fn default() -> Self { Self::for_surfaces(SurfaceId::Rubber, SurfaceId::Asphalt) }
}

impl Stribeck {
    /// Coefficients for a tyre/ground material pair.
    pub fn for_surfaces(tire: SurfaceId, ground: SurfaceId) -> Self {
        let p = pair_props(tire, ground);
        Self { mu_s: p.mu_s, mu_k: p.mu_k, stribeck_v: p.stribeck_v, slip_tolerance: 0.02 }
    }

    /// Friction coefficient at slip speed `v`.
    pub fn mu_at(&self, v: Scalar) -> Scalar {
        let vs = self.stribeck_v.max(1.0e-6);
        self.mu_k + (self.mu_s - self.mu_k) * (-(v / vs).powi(2)).exp()
    }
}

impl FrictionModel for Stribeck {
    fn name(&self) -> &str { "stribeck" }

    fn compute_forces(&self, wheels: &[WheelState], vel: &Twist) -> Vec<WheelForce> {
        let tol = self.slip_tolerance.max(1e-9);
        wheels.iter().map(|w| {
            let s = wheel_slip(w, vel);
            let v = s.magnitude();
            if v == 0.0 { return WheelForce::ZERO; }
            let f = self.mu_at(v) * w.normal_load * (v / tol).tanh();
            WheelForce::from_wheel_frame(w, -f * s.longitudinal / v, -f * s.lateral / v)
        }).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn curve_limits() {
        let m = Stribeck::default();
        assert_relative_eq!(m.mu_at(0.0), m.mu_s);
        assert!((m.mu_at(10.0) - m.mu_k).abs() < 1e-3);
    }

    #[test]
    fn opposes_slip_and_stays_bounded() {
        let mut w = WheelState::at(0.0, 0.25, 0.1);
        w.normal_load = 50.0;
        let m = Stribeck::default();
        let f = m.compute_forces(&[w], &Twist::new(3.0, -1.0, 0.0));
        assert!(f[0].force.x < 0.0 && f[0].force.y > 0.0);
        assert!(f[0].force.length() <= m.mu_s * 50.0 + 1e-9);
    }
}

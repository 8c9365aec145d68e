use roverphys_core::{Scalar, Twist, WheelState};
use serde::{Deserialize, Serialize};
use crate::model::{FrictionModel, WheelForce, wheel_slip};

/// Linear (viscous) friction: force proportional to slip speed.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viscous {
    /// N per m/s of longitudinal slip.
    pub c_long: Scalar,
    /// N per m/s of lateral slip.
    pub c_lat: Scalar,
}

impl Default for Viscous {
    fn default() -> Self { Self { c_long: 200.0, c_lat: 400.0 } }
}

impl FrictionModel for Viscous {
    fn name(&self) -> &str { "viscous" }

    fn compute_forces(&self, wheels: &[WheelState], vel: &Twist) -> Vec<WheelForce> {
        wheels.iter().map(|w| {
            let s = wheel_slip(w, vel);
            if s.is_zero() { return WheelForce::ZERO; }
            WheelForce::from_wheel_frame(w, -self.c_long * s.longitudinal, -self.c_lat * s.lateral)
        }).collect()
    }
}

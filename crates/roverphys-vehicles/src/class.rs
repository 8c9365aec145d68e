use roverphys_core::{Scalar, VehicleError, VehicleResult, WheelState};
use serde::{Deserialize, Serialize};

/// Wheel layout parameters shared by the built-in classes.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    /// Front-to-rear axle distance (m). Ignored by `Differential`.
    pub wheelbase: Scalar,
    /// Left-to-right wheel distance (m).
    pub track: Scalar,
    pub radius: Scalar,
}

impl Default for LayoutParams {
    fn default() -> Self { Self { wheelbase: 1.3, track: 1.0, radius: 0.3 } }
}

/// Built-in vehicle kinds. The variant fixes the wheel count and order.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum VehicleClass {
    /// `[0]` = left, `[1]` = right.
    Differential,
    /// `[0]` = rear-left, `[1]` = rear-right, `[2]` = front-left, `[3]` = front-right.
    Differential4,
    /// Same order as `Differential4`; the front pair steers.
    Ackermann {
        /// Steering limit of the virtual centre wheel (rad).
        max_steer: Scalar,
    },
}

pub const WHEEL_RL: usize = 0;
pub const WHEEL_RR: usize = 1;
pub const WHEEL_FL: usize = 2;
pub const WHEEL_FR: usize = 3;

impl VehicleClass {
    pub const DEFAULT_MAX_STEER: Scalar = 0.5;

    /// Registry key.
    pub fn key(&self) -> &'static str {
        match self {
            VehicleClass::Differential => "differential",
            VehicleClass::Differential4 => "differential_4_wheels",
            VehicleClass::Ackermann { .. } => "ackermann",
        }
    }

    pub fn wheel_count(&self) -> usize {
        match self {
            VehicleClass::Differential => 2,
            VehicleClass::Differential4 | VehicleClass::Ackermann { .. } => 4,
        }
    }

    /// Length every controller torque sequence must have.
    #[inline] pub fn controller_wheel_count(&self) -> usize { self.wheel_count() }

    #[inline] pub fn is_steered(&self) -> bool { matches!(self, VehicleClass::Ackermann { .. }) }

    /// Indices that receive drive torque from speed controllers.
    pub fn driven_wheels(&self) -> Vec<usize> {
        match self {
            VehicleClass::Ackermann { .. } => vec![WHEEL_RL, WHEEL_RR],
            _ => (0..self.wheel_count()).collect(),
        }
    }

    /// Wheels in class order, centred on the rear axle (or the axle for `Differential`).
    pub fn default_wheels(&self, p: &LayoutParams) -> Vec<WheelState> {
        let h = 0.5 * p.track;
        match self {
            VehicleClass::Differential => vec![
                WheelState::at(0.0, h, p.radius),
                WheelState::at(0.0, -h, p.radius),
            ],
            VehicleClass::Differential4 | VehicleClass::Ackermann { .. } => vec![
                WheelState::at(0.0, h, p.radius),
                WheelState::at(0.0, -h, p.radius),
                WheelState::at(p.wheelbase, h, p.radius),
                WheelState::at(p.wheelbase, -h, p.radius),
            ],
        }
    }

    /// Checks a wheel sequence against the class contract.
    pub fn validate_wheels(&self, wheels: &[WheelState]) -> VehicleResult<()> {
        if wheels.len() != self.wheel_count() {
            return Err(VehicleError::config(format!(
                "class `{}` needs {} wheels, got {}", self.key(), self.wheel_count(), wheels.len()
            )));
        }
        for (i, w) in wheels.iter().enumerate() {
            if !(w.radius > 0.0) || !w.radius.is_finite() {
                return Err(VehicleError::config(format!("wheel {i}: radius must be > 0, got {}", w.radius)));
            }
            if !(w.mass >= 0.0) || !w.x.is_finite() || !w.y.is_finite() || !w.yaw.is_finite() {
                return Err(VehicleError::config(format!("wheel {i}: non-finite offset or negative mass")));
            }
        }
        if let VehicleClass::Ackermann { .. } = self {
            if (wheels[WHEEL_FL].x - wheels[WHEEL_RL].x).abs() <= Scalar::EPSILON {
                return Err(VehicleError::config("ackermann: front and rear axles coincide"));
            }
        }
        Ok(())
    }

    /// Sets the front wheel yaws for a centre steering angle. No-op for unsteered classes.
    pub fn apply_steering(&self, wheels: &mut [WheelState], angle: Scalar) {
        let VehicleClass::Ackermann { max_steer } = *self else { return };
        if wheels.len() <= WHEEL_FR { return; }
        let (fl, fr) = ackermann_angles(
            wheels[WHEEL_FL].y - wheels[WHEEL_FR].y,
            wheels[WHEEL_FL].x - wheels[WHEEL_RL].x,
            angle.clamp(-max_steer, max_steer),
        );
        wheels[WHEEL_FL].yaw = fl;
        wheels[WHEEL_FR].yaw = fr;
    }
}

/// Left/right front wheel yaws that share the turn centre of a virtual
/// centre wheel at `delta`.
pub fn ackermann_angles(track: Scalar, wheelbase: Scalar, delta: Scalar) -> (Scalar, Scalar) {
    if delta == 0.0 || wheelbase == 0.0 { return (0.0, 0.0); }
    let w_l = track / wheelbase;
    let cot = 1.0 / delta.abs().tan();
    // outer wheel turns less than the centre, inner wheel more
    let outer = (1.0 / (cot + 0.5 * w_l)).atan();
    let inner = (1.0 / (cot - 0.5 * w_l)).atan();
    if delta > 0.0 { (inner, outer) } else { (-outer, -inner) }
}

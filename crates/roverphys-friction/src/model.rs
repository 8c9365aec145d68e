use roverphys_core::{Scalar, Twist, Vec2, WheelState};

/// Contact force of one wheel, chassis frame, acting at the wheel centre.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct WheelForce {
    pub force: Vec2,
    /// Component along the wheel heading; its reaction `-longitudinal * r`
    /// brakes the wheel spin.
    pub longitudinal: Scalar,
    pub lateral: Scalar,
}

impl WheelForce {
    pub const ZERO: WheelForce = WheelForce { force: Vec2::ZERO, longitudinal: 0.0, lateral: 0.0 };

    /// Builds the chassis-frame force from wheel-frame components.
    pub fn from_wheel_frame(wheel: &WheelState, longitudinal: Scalar, lateral: Scalar) -> Self {
        let force = wheel.heading().rotate(Vec2::new(longitudinal, lateral));
        Self { force, longitudinal, lateral }
    }
}

/// Slip velocities of one wheel, expressed in the wheel frame.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct WheelSlip {
    /// Contact-point ground speed along the heading minus rim speed.
    pub longitudinal: Scalar,
    /// Contact-point ground speed across the heading.
    pub lateral: Scalar,
}

impl WheelSlip {
    #[inline] pub fn is_zero(&self) -> bool { self.longitudinal == 0.0 && self.lateral == 0.0 }
    #[inline] pub fn magnitude(&self) -> Scalar { self.longitudinal.hypot(self.lateral) }
}

/// Slip of `wheel` when the chassis moves with `vel` (chassis frame).
pub fn wheel_slip(wheel: &WheelState, vel: &Twist) -> WheelSlip {
    let v_contact = vel.point_velocity(wheel.offset());
    let v_wheel = Vec2::from_angle(-wheel.yaw).rotate(v_contact);
    WheelSlip { longitudinal: v_wheel.x - wheel.rim_speed(), lateral: v_wheel.y }
}

/// Converts wheel/chassis kinematics into contact forces.
pub trait FrictionModel: Send + Sync {
    /// Registry name, e.g. `"coulomb"`.
    fn name(&self) -> &str;

    /// One force per wheel, in wheel order.
    fn compute_forces(&self, wheels: &[WheelState], vel: &Twist) -> Vec<WheelForce>;
}

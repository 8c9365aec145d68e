mod pid;
mod raw;
mod twist;
mod ackermann;

pub use pid::{Pid, PidParams};
pub use raw::RawTorque;
pub use twist::{TwistPid, TwistPidParams};
pub use ackermann::{AckermannSpeedPid, AckermannPidParams};

use roverphys_core::{Scalar, StepCtx, Twist, VehicleState};

/// Turns the last known vehicle state into one torque per wheel.
///
/// Implementations own whatever state they carry between ticks (integrators,
/// setpoints). Given the same state, context and internal state they must
/// return the same torques.
pub trait Controller: Send {
    /// Registry name, e.g. `"twist_pid"`.
    fn name(&self) -> &str;

    /// Torques in wheel order (N m). Must have one entry per wheel.
    fn compute_torques(&mut self, state: &VehicleState<'_>, ctx: &StepCtx) -> Vec<Scalar>;

    /// Centre steering angle for steered classes; `None` keeps wheels straight.
    fn steering_angle(&self) -> Option<Scalar> { None }

    /// Accepts an external velocity command. Returns `false` if unsupported.
    fn set_twist_setpoint(&mut self, _setpoint: Twist) -> bool { false }
}

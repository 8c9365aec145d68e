use roverphys_core::{Scalar, StepCtx, Twist, VehicleState};
use serde::{Deserialize, Serialize};
use crate::{Controller, Pid, PidParams};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AckermannPidParams {
    pub pid: PidParams,
    /// Forward speed setpoint (m/s).
    pub speed: Scalar,
    /// Centre steering angle setpoint (rad).
    pub steer: Scalar,
    /// Wheelbase used to turn yaw-rate commands into steering (m).
    pub wheelbase: Scalar,
}

impl Default for AckermannPidParams {
    fn default() -> Self { Self { pid: PidParams::default(), speed: 0.0, steer: 0.0, wheelbase: 1.3 } }
}

/// Speed tracker for steered vehicles.
///
/// One PID on the odometry forward speed; its output is split evenly over
/// the driven wheels. The steering setpoint is passed through unchanged.
#[derive(Clone, Debug)]
pub struct AckermannSpeedPid {
    pub params: AckermannPidParams,
    driven: Vec<usize>,
    num_wheels: usize,
    speed: Scalar,
    steer: Scalar,
    pid: Pid,
}

impl AckermannSpeedPid {
    pub fn new(num_wheels: usize, driven: Vec<usize>, params: AckermannPidParams) -> Self {
        Self { params, driven, num_wheels, speed: params.speed, steer: params.steer, pid: Pid::new(params.pid) }
    }
}

impl Controller for AckermannSpeedPid {
    fn name(&self) -> &str { "ackermann_pid" }

    fn compute_torques(&mut self, state: &VehicleState<'_>, ctx: &StepCtx) -> Vec<Scalar> {
        let u = self.pid.step(self.speed - state.odometry.vx, ctx.dt);
        let mut out = vec![0.0; self.num_wheels];
        if self.driven.is_empty() { return out; }
        let share = u / self.driven.len() as Scalar;
        for &i in &self.driven {
            if let Some(slot) = out.get_mut(i) { *slot = share; }
        }
        out
    }

    fn steering_angle(&self) -> Option<Scalar> { Some(self.steer) }

    /// Bicycle-model inversion: `steer = atan(omega * L / v)`.
    fn set_twist_setpoint(&mut self, setpoint: Twist) -> bool {
        self.speed = setpoint.vx;
        self.steer = if setpoint.vx.abs() > 1e-6 {
            (setpoint.omega * self.params.wheelbase / setpoint.vx).atan()
        } else {
            0.0
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roverphys_core::{Pose, WheelState};

    #[test]
    fn torque_only_on_driven_axle() {
        let wheels = vec![WheelState::at(0.0, 0.5, 0.3); 4];
        let mut c = AckermannSpeedPid::new(4, vec![0, 1], AckermannPidParams { speed: 2.0, steer: 0.2, ..Default::default() });
        let (pose, z) = (Pose::default(), Twist::ZERO);
        let st = VehicleState { pose: &pose, velocity: &z, velocity_local: &z, odometry: &z, wheels: &wheels };
        let t = c.compute_torques(&st, &StepCtx::new(0.01));
        assert!(t[0] > 0.0 && t[0] == t[1]);
        assert_eq!(t[2], 0.0);
        assert_eq!(t[3], 0.0);
        assert_eq!(c.steering_angle(), Some(0.2));
    }
}

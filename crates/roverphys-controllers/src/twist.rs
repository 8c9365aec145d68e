use log::debug;
use roverphys_core::{Scalar, StepCtx, Twist, VehicleState, WheelState};
use serde::{Deserialize, Serialize};
use crate::{Controller, Pid, PidParams};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TwistPidParams {
    pub pid: PidParams,
    /// Initial setpoint (chassis frame; `vy` is ignored).
    pub setpoint: Twist,
}

impl Default for TwistPidParams {
    fn default() -> Self { Self { pid: PidParams::default(), setpoint: Twist::ZERO } }
}

/// Differential-drive velocity tracker.
///
/// The twist setpoint `(v, omega)` becomes per-side rim speeds
/// `v -/+ omega * track / 2`; one PID per side closes the loop on the
/// measured (encoder) rim speeds. Wheels with `y > 0` are the left side.
#[derive(Clone, Debug)]
pub struct TwistPid {
    pub params: TwistPidParams,
    setpoint: Twist,
    left: Vec<usize>,
    right: Vec<usize>,
    track: Scalar,
    num_wheels: usize,
    pid_left: Pid,
    pid_right: Pid,
}

impl TwistPid {
    /// Splits `wheels` into sides by the sign of their lateral offset.
    pub fn for_wheels(wheels: &[WheelState], params: TwistPidParams) -> Self {
        let left: Vec<usize> = (0..wheels.len()).filter(|&i| wheels[i].y > 0.0).collect();
        let right: Vec<usize> = (0..wheels.len()).filter(|&i| wheels[i].y < 0.0).collect();
        let sides: Vec<Scalar> = left.iter().chain(right.iter()).map(|&i| wheels[i].y.abs()).collect();
        let track = if sides.is_empty() { 0.0 } else { 2.0 * sides.iter().sum::<Scalar>() / sides.len() as Scalar };
        debug!("twist_pid: {} left, {} right wheels, track {track:.3} m", left.len(), right.len());
        Self {
            params,
            setpoint: params.setpoint,
            left, right, track,
            num_wheels: wheels.len(),
            pid_left: Pid::new(params.pid),
            pid_right: Pid::new(params.pid),
        }
    }

    #[inline] pub fn setpoint(&self) -> Twist { self.setpoint }
    #[inline] pub fn track(&self) -> Scalar { self.track }

    fn mean_rim_speed(wheels: &[WheelState], idx: &[usize]) -> Scalar {
        if idx.is_empty() { return 0.0; }
        idx.iter().map(|&i| wheels[i].rim_speed()).sum::<Scalar>() / idx.len() as Scalar
    }
}

impl Controller for TwistPid {
    fn name(&self) -> &str { "twist_pid" }

    fn compute_torques(&mut self, state: &VehicleState<'_>, ctx: &StepCtx) -> Vec<Scalar> {
        let half = 0.5 * self.track;
        let want_l = self.setpoint.vx - self.setpoint.omega * half;
        let want_r = self.setpoint.vx + self.setpoint.omega * half;

        let act_l = Self::mean_rim_speed(state.wheels, &self.left);
        let act_r = Self::mean_rim_speed(state.wheels, &self.right);

        let tl = self.pid_left.step(want_l - act_l, ctx.dt);
        let tr = self.pid_right.step(want_r - act_r, ctx.dt);

        let mut out = vec![0.0; self.num_wheels];
        for &i in &self.left { out[i] = tl; }
        for &i in &self.right { out[i] = tr; }
        out
    }

    fn set_twist_setpoint(&mut self, setpoint: Twist) -> bool {
        self.setpoint = setpoint;
        true
    }
}

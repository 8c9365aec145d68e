//! Sensors attached to a vehicle and run at the end of every tick.

use log::trace;
use roverphys_core::{Pose, Scalar, StepCtx, VehicleError, VehicleResult, VehicleState, XorShift64};

/// A measurement source. Failures are local: the owning vehicle logs and
/// records them, the tick carries on.
pub trait Sensor: Send {
    fn name(&self) -> &str;
    fn simul_post_timestep(&mut self, state: &VehicleState<'_>, ctx: &StepCtx) -> VehicleResult<()>;
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PoseReading {
    pub timestamp: Scalar,
    pub pose: Pose,
}

/// Noisy ground-truth pose (GNSS/mocap stand-in) with random dropouts.
pub struct PoseSensor {
    name: String,
    pub noise_std: Scalar,
    /// Probability in [0, 1] that a tick yields no reading.
    pub dropout: Scalar,
    rng: XorShift64,
    last: Option<PoseReading>,
}

impl PoseSensor {
    pub fn new(name: impl Into<String>, noise_std: Scalar, dropout: Scalar, seed: u64) -> Self {
        Self { name: name.into(), noise_std, dropout, rng: XorShift64::new(seed), last: None }
    }

    #[inline] pub fn last_reading(&self) -> Option<&PoseReading> { self.last.as_ref() }
}

impl Sensor for PoseSensor {
    fn name(&self) -> &str { &self.name }

    fn simul_post_timestep(&mut self, state: &VehicleState<'_>, ctx: &StepCtx) -> VehicleResult<()> {
        if self.dropout > 0.0 && self.rng.next_f64() < self.dropout {
            return Err(VehicleError::Sensor { sensor: self.name.clone(), reason: "no fix this tick".into() });
        }
        let mut pose = *state.pose;
        pose.x += self.noise_std * self.rng.next_gaussian();
        pose.y += self.noise_std * self.rng.next_gaussian();
        self.last = Some(PoseReading { timestamp: ctx.sim_time + ctx.dt, pose });
        trace!("{}: fix at ({:.3}, {:.3})", self.name, pose.x, pose.y);
        Ok(())
    }
}

/// Quantised wheel encoders: integer ticks per wheel.
pub struct WheelEncoders {
    name: String,
    pub ticks_per_rev: u32,
    angles: Vec<Scalar>,
    ticks: Vec<i64>,
}

impl WheelEncoders {
    pub fn new(name: impl Into<String>, ticks_per_rev: u32) -> Self {
        Self { name: name.into(), ticks_per_rev, angles: Vec::new(), ticks: Vec::new() }
    }

    /// Accumulated ticks, one per wheel.
    #[inline] pub fn ticks(&self) -> &[i64] { &self.ticks }
}

impl Sensor for WheelEncoders {
    fn name(&self) -> &str { &self.name }

    fn simul_post_timestep(&mut self, state: &VehicleState<'_>, ctx: &StepCtx) -> VehicleResult<()> {
        if self.ticks_per_rev == 0 {
            return Err(VehicleError::Sensor { sensor: self.name.clone(), reason: "zero resolution".into() });
        }
        let n = state.wheels.len();
        self.angles.resize(n, 0.0);
        self.ticks.resize(n, 0);
        let per_rad = self.ticks_per_rev as Scalar / core::f64::consts::TAU;
        for (i, w) in state.wheels.iter().enumerate() {
            self.angles[i] += w.omega * ctx.dt;
            self.ticks[i] = (self.angles[i] * per_rad).floor() as i64;
        }
        Ok(())
    }
}

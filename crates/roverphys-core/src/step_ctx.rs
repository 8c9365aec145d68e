use crate::Scalar;

/// Per-tick context handed to vehicles, controllers and sensors.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StepCtx {
    pub dt: Scalar,
    pub tick: u64,
    /// Simulated time at the start of this tick (s).
    pub sim_time: Scalar,
}

impl StepCtx {
    pub fn new(dt: Scalar) -> Self { Self { dt, tick: 0, sim_time: 0.0 } }

    /// Context for the tick after this one.
    pub fn next(&self) -> Self {
        Self { dt: self.dt, tick: self.tick + 1, sim_time: self.sim_time + self.dt }
    }
}

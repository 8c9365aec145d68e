use roverphys_core::{Scalar, StepCtx, VehicleState};
use crate::Controller;

/// Fixed per-wheel torques (teleoperation).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawTorque {
    pub torques: Vec<Scalar>,
}

impl RawTorque {
    pub fn new(torques: Vec<Scalar>) -> Self { Self { torques } }
    pub fn zeros(num_wheels: usize) -> Self { Self { torques: vec![0.0; num_wheels] } }
}

impl Controller for RawTorque {
    fn name(&self) -> &str { "raw" }

    fn compute_torques(&mut self, _state: &VehicleState<'_>, _ctx: &StepCtx) -> Vec<Scalar> {
        self.torques.clone()
    }
}

use crate::{Pose, Twist, WheelState};

/// Read-only view of a vehicle handed to controllers and sensors.
#[derive(Copy, Clone, Debug)]
pub struct VehicleState<'a> {
    /// Ground-truth pose of the reference point (global frame).
    pub pose: &'a Pose,
    /// Ground-truth twist (global frame).
    pub velocity: &'a Twist,
    /// Ground-truth twist in the chassis frame.
    pub velocity_local: &'a Twist,
    /// Encoder-only estimate in the chassis frame.
    pub odometry: &'a Twist,
    pub wheels: &'a [WheelState],
}

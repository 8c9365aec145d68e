//! Wheeled ground vehicles on top of a [`roverphys_dynamics::PhysicsBackend`].
//!
//! Per tick a [`VehicleDynamicsCore`] asks its controller for wheel torques,
//! asks its friction model for contact forces, hands both to the backend,
//! and after the backend has stepped reads pose, velocity and wheel spin
//! back, re-estimates odometry and publishes render and telemetry data.
//! [`Simulation`] drives any number of vehicles through that sequence.

mod capability;
mod class;
mod odometry;
mod sensor;
mod simulation;
mod vehicle;

pub use capability::{Named, Renderable, Steppable};
pub use class::{LayoutParams, VehicleClass, ackermann_angles, WHEEL_FL, WHEEL_FR, WHEEL_RL, WHEEL_RR};
pub use odometry::OdometryEstimator;
pub use sensor::{PoseReading, PoseSensor, Sensor, WheelEncoders};
pub use simulation::Simulation;
pub use vehicle::{BackendHandles, VehicleDynamicsCore, FORCE_SCALE};

//! The rigid-body backend seen from a vehicle.
//!
//! [`PhysicsBackend`] is the only surface vehicles talk to. [`PlanarWorld`]
//! is a small reference implementation (semi-implicit Euler, no contacts)
//! used by the tests and the sim tool; any engine that can honour the
//! trait can be dropped in instead.

mod backend;
mod planar;

pub use backend::{PhysicsBackend, BodyDesc, FixtureDesc, WheelJointDesc};
pub use planar::PlanarWorld;

//! Wheel/ground friction models.
//!
//! Every model maps the current wheel states and the chassis-local twist to
//! one contact force per wheel. Models are pure: they read wheel state and
//! their own coefficients, nothing else, and return exactly zero for a
//! wheel whose contact point does not slip.

mod model;
mod coulomb;
mod viscous;
mod stribeck;
pub mod surface;

pub use model::{FrictionModel, WheelForce, WheelSlip, wheel_slip};
pub use coulomb::Coulomb;
pub use viscous::Viscous;
pub use stribeck::Stribeck;
pub use surface::{SurfaceId, SurfacePair, pair_props};

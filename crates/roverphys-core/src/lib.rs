//! Core types shared by every roverphys crate.

pub mod ids;
pub mod types;
pub mod hash;
pub mod step_ctx;
pub mod schedule;
pub mod rng;
pub mod wheel;
pub mod state;
pub mod error;

pub use ids::{BodyId, FixtureId, JointId};
pub use types::{Scalar, Vec2, Vec3, Pose, Twist, GRAVITY, vec2};
pub use hash::{StepHasher, hash_pose, hash_twist};
pub use step_ctx::StepCtx;
pub use schedule::TickPhase;
pub use rng::XorShift64;
pub use wheel::WheelState;
pub use state::VehicleState;
pub use error::{VehicleError, VehicleResult};

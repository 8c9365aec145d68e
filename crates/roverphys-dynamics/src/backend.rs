use roverphys_core::{BodyId, FixtureId, JointId, Pose, Scalar, Vec2};

/// Input descriptor when creating a body.
#[derive(Copy, Clone, Debug)]
pub struct BodyDesc {
    pub pose: Pose,
    pub linvel: Vec2,
    pub angvel: Scalar,
    pub dynamic: bool,
}

impl Default for BodyDesc {
    fn default() -> Self { Self { pose: Pose::default(), linvel: Vec2::ZERO, angvel: 0.0, dynamic: true } }
}

/// Convex outline attached to a body, in body-local coordinates.
#[derive(Clone, Debug)]
pub struct FixtureDesc {
    pub polygon: Vec<Vec2>,
    pub mass: Scalar,
    pub friction: Scalar,
}

/// Spin joint for a wheel mounted on a body.
#[derive(Copy, Clone, Debug)]
pub struct WheelJointDesc {
    pub local_anchor: Vec2,
    /// Spin inertia (kg m^2); must be > 0.
    pub inertia: Scalar,
    pub initial_speed: Scalar,
}

/// What a vehicle needs from a rigid-body engine.
///
/// Forces and points passed to `apply_force` are in the global frame.
/// `transform`/`velocity` report the body origin, not the COM.
pub trait PhysicsBackend {
    fn create_body(&mut self, desc: BodyDesc) -> BodyId;
    fn create_fixture(&mut self, body: BodyId, desc: FixtureDesc) -> FixtureId;
    /// Overrides mass, COM (local) and inertia about the COM.
    fn set_mass_data(&mut self, body: BodyId, mass: Scalar, local_com: Vec2, inertia: Scalar);
    fn create_wheel_joint(&mut self, body: BodyId, desc: WheelJointDesc) -> JointId;

    fn apply_force(&mut self, body: BodyId, force: Vec2, point: Vec2);
    fn apply_torque(&mut self, body: BodyId, torque: Scalar);
    fn apply_joint_torque(&mut self, joint: JointId, torque: Scalar);

    fn step(&mut self, dt: Scalar);
    /// Drops pending forces and torques without stepping.
    fn clear_forces(&mut self);
    /// Removes a body with its fixtures and joints from the simulation.
    /// Handles of other bodies stay valid.
    fn destroy_body(&mut self, body: BodyId);

    fn transform(&self, body: BodyId) -> Pose;
    fn velocity(&self, body: BodyId) -> (Vec2, Scalar);
    fn joint_speed(&self, joint: JointId) -> Scalar;

    fn set_transform(&mut self, body: BodyId, pose: Pose);
    fn set_velocity(&mut self, body: BodyId, linvel: Vec2, angvel: Scalar);
    fn set_joint_speed(&mut self, joint: JointId, speed: Scalar);
}

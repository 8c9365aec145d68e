use log::{debug, trace, warn};
use roverphys_controllers::Controller;
use roverphys_core::{
    hash_pose, hash_twist, BodyId, FixtureId, JointId, Pose, Scalar, StepCtx, StepHasher, TickPhase,
    Twist, Vec2, Vec3, VehicleError, VehicleResult, VehicleState, WheelState, GRAVITY,
};
use roverphys_dynamics::{BodyDesc, FixtureDesc, PhysicsBackend, WheelJointDesc};
use roverphys_friction::{FrictionModel, WheelForce};
use roverphys_geom::ChassisGeometry;
use roverphys_viz::{ForceSegment, RenderSnapshotBuffer, TelemetryFrame, TelemetrySink, WheelTelemetry};

use crate::capability::{Named, Renderable, Steppable};
use crate::class::VehicleClass;
use crate::odometry::OdometryEstimator;
use crate::sensor::Sensor;

/// Metres of render segment per newton.
pub const FORCE_SCALE: Scalar = 0.01;

/// Backend handles recorded by `create_multibody_system`.
#[derive(Clone, Debug, PartialEq)]
pub struct BackendHandles {
    pub chassis: BodyId,
    pub chassis_fixture: FixtureId,
    pub wheel_fixtures: Vec<FixtureId>,
    pub wheel_joints: Vec<JointId>,
}

/// One simulated ground vehicle: chassis, wheels, a friction model and a
/// controller, stepped against an external [`PhysicsBackend`].
pub struct VehicleDynamicsCore {
    name: String,
    index: usize,
    class: VehicleClass,
    chassis: ChassisGeometry,
    wheels: Vec<WheelState>,
    friction: Box<dyn FrictionModel>,
    controller: Box<dyn Controller>,
    sensors: Vec<Box<dyn Sensor>>,
    sensor_errors: Vec<VehicleError>,

    handles: Option<BackendHandles>,
    phase: TickPhase,

    pose: Pose,
    velocity: Twist,
    velocity_local: Twist,
    odometry: Twist,
    pose_overridden: bool,

    /* --- per-tick scratch --- */
    torques: Vec<Scalar>,
    forces: Vec<WheelForce>,
    external: Vec<ForceSegment>,

    telemetry: TelemetryFrame,
    telemetry_sink: Option<Box<dyn TelemetrySink>>,
    telemetry_recording: bool,
    snapshot: RenderSnapshotBuffer,
}

impl VehicleDynamicsCore {
    /// Validates the wheel layout against `class`. The torque length contract
    /// of the controller is checked on every tick.
    pub fn new(
        name: impl Into<String>,
        class: VehicleClass,
        chassis: ChassisGeometry,
        wheels: Vec<WheelState>,
        friction: Box<dyn FrictionModel>,
        controller: Box<dyn Controller>,
    ) -> VehicleResult<Self> {
        let name = name.into();
        if name.is_empty() { return Err(VehicleError::config("vehicle name must not be empty")); }
        class.validate_wheels(&wheels)?;
        debug!(
            "vehicle `{name}`: class {}, {} wheels, friction `{}`, controller `{}`",
            class.key(), wheels.len(), friction.name(), controller.name()
        );
        let n = wheels.len();
        Ok(Self {
            name,
            index: 0,
            class,
            chassis,
            wheels,
            friction,
            controller,
            sensors: Vec::new(),
            sensor_errors: Vec::new(),
            handles: None,
            phase: TickPhase::Idle,
            pose: Pose::default(),
            velocity: Twist::ZERO,
            velocity_local: Twist::ZERO,
            odometry: Twist::ZERO,
            pose_overridden: false,
            torques: Vec::with_capacity(n),
            forces: vec![WheelForce::ZERO; n],
            external: Vec::new(),
            telemetry: TelemetryFrame::default(),
            telemetry_sink: None,
            telemetry_recording: true,
            snapshot: RenderSnapshotBuffer::new(),
        })
    }

    /* --- accessors --- */
    #[inline] pub fn pose(&self) -> &Pose { &self.pose }
    #[inline] pub fn velocity(&self) -> &Twist { &self.velocity }
    #[inline] pub fn velocity_local(&self) -> &Twist { &self.velocity_local }
    #[inline] pub fn odometry_estimate(&self) -> &Twist { &self.odometry }
    #[inline] pub fn wheels(&self) -> &[WheelState] { &self.wheels }
    #[inline] pub fn wheel(&self, i: usize) -> Option<&WheelState> { self.wheels.get(i) }
    #[inline] pub fn num_wheels(&self) -> usize { self.wheels.len() }
    #[inline] pub fn chassis(&self) -> &ChassisGeometry { &self.chassis }
    #[inline] pub fn chassis_mass(&self) -> Scalar { self.chassis.mass() }
    #[inline] pub fn max_radius(&self) -> Scalar { self.chassis.max_radius() }
    #[inline] pub fn class(&self) -> VehicleClass { self.class }
    #[inline] pub fn phase(&self) -> TickPhase { self.phase }
    #[inline] pub fn handles(&self) -> Option<&BackendHandles> { self.handles.as_ref() }
    #[inline] pub fn friction(&self) -> &dyn FrictionModel { self.friction.as_ref() }
    #[inline] pub fn controller(&self) -> &dyn Controller { self.controller.as_ref() }
    #[inline] pub fn vehicle_index(&self) -> usize { self.index }
    #[inline] pub fn set_vehicle_index(&mut self, index: usize) { self.index = index; }
    /// Friction forces of the last tick, chassis frame.
    #[inline] pub fn friction_forces(&self) -> &[WheelForce] { &self.forces }
    /// True until the next `post_timestep` after [`Self::override_pose`].
    #[inline] pub fn pose_overridden(&self) -> bool { self.pose_overridden }

    /// Forwards a body twist command to the controller. Returns false if
    /// the controller does not take one (e.g. raw torques).
    pub fn set_twist_setpoint(&mut self, setpoint: Twist) -> bool {
        let taken = self.controller.set_twist_setpoint(setpoint);
        debug!("vehicle `{}`: twist setpoint {setpoint:?} {}", self.name, if taken { "taken" } else { "ignored" });
        taken
    }

    /// The view controllers and sensors receive.
    pub fn vehicle_state(&self) -> VehicleState<'_> {
        VehicleState {
            pose: &self.pose,
            velocity: &self.velocity,
            velocity_local: &self.velocity_local,
            odometry: &self.odometry,
            wheels: &self.wheels,
        }
    }

    fn handles_or_err(&self) -> VehicleResult<&BackendHandles> {
        self.handles.as_ref().ok_or_else(|| {
            VehicleError::contract(format!("vehicle `{}`: multibody system not created", self.name))
        })
    }

    /// Moves the tick state machine to `to`, which must follow the current phase.
    fn advance(&mut self, to: TickPhase, op: &str) -> VehicleResult<()> {
        if self.phase.successor() != to {
            return Err(VehicleError::contract(format!(
                "vehicle `{}`: {op} called in {:?}, cannot move to {to:?}", self.name, self.phase
            )));
        }
        self.phase = to;
        Ok(())
    }

    /// Pose and twist (global frame) to start from. Only valid before the
    /// multibody system exists; afterwards use [`Self::override_pose`].
    pub fn set_initial_state(&mut self, pose: Pose, velocity: Twist) -> VehicleResult<()> {
        if self.handles.is_some() {
            return Err(VehicleError::contract(format!("vehicle `{}`: already in the backend", self.name)));
        }
        if !pose.is_finite() || !velocity.is_finite() {
            return Err(VehicleError::config("initial state must be finite"));
        }
        self.pose = pose;
        self.velocity = velocity;
        self.velocity_local = pose.to_local(&velocity);
        Ok(())
    }

    /// Spin rates to start from, e.g. to begin in rolling contact.
    pub fn set_initial_wheel_speeds(&mut self, omegas: &[Scalar]) -> VehicleResult<()> {
        if self.handles.is_some() {
            return Err(VehicleError::contract(format!("vehicle `{}`: already in the backend", self.name)));
        }
        if omegas.len() != self.wheels.len() {
            return Err(VehicleError::config(format!(
                "{} wheel speeds given for {} wheels", omegas.len(), self.wheels.len()
            )));
        }
        for (w, &o) in self.wheels.iter_mut().zip(omegas) { w.omega = o; }
        self.odometry = OdometryEstimator::estimate(&self.wheels);
        Ok(())
    }

    /// Creates the chassis body with its outline, one fixture and one spin
    /// joint per wheel, and sets the combined mass data. Fails if the
    /// system already exists.
    pub fn create_multibody_system(&mut self, backend: &mut dyn PhysicsBackend) -> VehicleResult<()> {
        if self.handles.is_some() {
            return Err(VehicleError::contract(format!(
                "vehicle `{}`: create_multibody_system called twice", self.name
            )));
        }
        let chassis = backend.create_body(BodyDesc {
            pose: self.pose,
            linvel: self.velocity.linear(),
            angvel: self.velocity.omega,
            dynamic: true,
        });
        let mean_mu = self.wheels.iter().map(|w| w.mu).sum::<Scalar>() / self.wheels.len().max(1) as Scalar;
        let chassis_fixture = backend.create_fixture(chassis, FixtureDesc {
            polygon: self.chassis.polygon().to_vec(),
            mass: self.chassis.mass(),
            friction: mean_mu,
        });

        let mut wheel_fixtures = Vec::with_capacity(self.wheels.len());
        let mut wheel_joints = Vec::with_capacity(self.wheels.len());
        for w in &self.wheels {
            wheel_fixtures.push(backend.create_fixture(chassis, FixtureDesc {
                polygon: wheel_outline(w),
                mass: w.mass,
                friction: w.mu,
            }));
            wheel_joints.push(backend.create_wheel_joint(chassis, WheelJointDesc {
                local_anchor: w.offset(),
                inertia: w.inertia,
                initial_speed: w.omega,
            }));
        }

        let points: Vec<(Vec2, Scalar)> = self.wheels.iter().map(|w| (w.offset(), w.mass)).collect();
        let props = self.chassis.mass_props().with_point_masses(&points);
        backend.set_mass_data(chassis, props.mass, props.com, props.inertia);

        let share = self.chassis.mass() / self.wheels.len() as Scalar;
        for w in &mut self.wheels { w.normal_load = (share + w.mass) * GRAVITY; }

        debug!(
            "vehicle `{}`: body {chassis}, total mass {:.2} kg, com ({:.3}, {:.3}), I {:.3}",
            self.name, props.mass, props.com.x, props.com.y, props.inertia
        );
        self.handles = Some(BackendHandles { chassis, chassis_fixture, wheel_fixtures, wheel_joints });
        Ok(())
    }

    /// Removes the chassis, its fixtures and joints from `backend`. The
    /// last pose and velocity are kept, so the vehicle can be created again.
    pub fn destroy_multibody_system(&mut self, backend: &mut dyn PhysicsBackend) -> VehicleResult<()> {
        let body = self.handles_or_err()?.chassis;
        backend.destroy_body(body);
        self.handles = None;
        self.abort_tick();
        debug!("vehicle `{}`: body {body} destroyed", self.name);
        Ok(())
    }

    /// External push at a chassis-local point (chassis-frame force). Not
    /// allowed while the backend result is waiting to be read back.
    pub fn apply_force(&mut self, backend: &mut dyn PhysicsBackend, force: Vec2, local_point: Vec2) -> VehicleResult<()> {
        let body = self.handles_or_err()?.chassis;
        if self.phase == TickPhase::Stepped {
            return Err(VehicleError::contract(format!(
                "vehicle `{}`: apply_force between backend step and post_timestep", self.name
            )));
        }
        let f = self.pose.rotate(force);
        let p = self.pose.compose_point(local_point);
        backend.apply_force(body, f, p);
        self.external.push(segment(p, f));
        trace!("vehicle `{}`: external force ({:.2}, {:.2}) N", self.name, f.x, f.y);
        Ok(())
    }

    /// Teleports the chassis. Velocity is left as is, so pose and velocity
    /// may disagree until the next `post_timestep`.
    pub fn override_pose(&mut self, pose: Pose, backend: &mut dyn PhysicsBackend) -> VehicleResult<()> {
        if !pose.is_finite() {
            return Err(VehicleError::contract(format!("vehicle `{}`: non-finite pose override", self.name)));
        }
        warn!("vehicle `{}`: pose overridden to ({:.3}, {:.3}, {:.3})", self.name, pose.x, pose.y, pose.yaw);
        if let Some(h) = &self.handles { backend.set_transform(h.chassis, pose); }
        self.pose = pose;
        self.pose_overridden = true;
        Ok(())
    }

    /// Velocity of each wheel centre (chassis frame) for a chassis-local twist.
    pub fn wheel_velocities_local(&self, twist: &Twist) -> Vec<Vec2> {
        self.wheels.iter().map(|w| twist.point_velocity(w.offset())).collect()
    }

    /* --- sensors --- */
    pub fn add_sensor(&mut self, sensor: Box<dyn Sensor>) { self.sensors.push(sensor); }
    pub fn sensors(&self) -> &[Box<dyn Sensor>] { &self.sensors }
    /// Sensor failures of the last tick.
    pub fn sensor_errors(&self) -> &[VehicleError] { &self.sensor_errors }

    /* --- telemetry and rendering --- */
    /// Frame of the last completed tick.
    #[inline] pub fn telemetry(&self) -> &TelemetryFrame { &self.telemetry }
    pub fn attach_telemetry(&mut self, sink: Box<dyn TelemetrySink>) { self.telemetry_sink = Some(sink); }
    pub fn detach_telemetry(&mut self) -> Option<Box<dyn TelemetrySink>> { self.telemetry_sink.take() }
    /// Gates delivery to the attached sink; the frame itself is always kept.
    pub fn set_telemetry_recording(&mut self, on: bool) { self.telemetry_recording = on; }
    #[inline] pub fn telemetry_recording(&self) -> bool { self.telemetry_recording }

    /// Digest of pose, velocity and wheel spin, for determinism checks.
    pub fn state_digest(&self) -> [u8; 32] {
        let mut h = StepHasher::new();
        hash_pose(&mut h, &self.pose);
        hash_twist(&mut h, &self.velocity);
        for w in &self.wheels {
            h.update_f64(w.omega);
            h.update_f64(w.yaw);
        }
        h.finalize()
    }

    fn build_telemetry(&self, timestamp: Scalar) -> TelemetryFrame {
        let wheel_vel = self.wheel_velocities_local(&self.velocity_local);
        let wheels = self.wheels.iter().zip(&self.forces).zip(wheel_vel)
            .map(|((w, f), v)| WheelTelemetry {
                torque: w.torque,
                weight: w.normal_load,
                velocity_x: v.x,
                velocity_y: v.y,
                friction_x: f.force.x,
                friction_y: f.force.y,
            })
            .collect();
        TelemetryFrame { timestamp, pose: self.pose, velocity: self.velocity, wheels }
    }

    fn publish_segments(&mut self, tick: u64) {
        let mut segs: Vec<ForceSegment> = self.wheels.iter().zip(&self.forces)
            .map(|(w, f)| segment(self.pose.compose_point(w.offset()), self.pose.rotate(f.force)))
            .collect();
        segs.append(&mut self.external);
        self.snapshot.publish(tick, &segs);
    }

    fn run_sensors(&mut self, ctx: &StepCtx) {
        self.sensor_errors.clear();
        let state = VehicleState {
            pose: &self.pose,
            velocity: &self.velocity,
            velocity_local: &self.velocity_local,
            odometry: &self.odometry,
            wheels: &self.wheels,
        };
        for s in self.sensors.iter_mut() {
            if let Err(e) = s.simul_post_timestep(&state, ctx) {
                warn!("vehicle `{}`: {e}", self.name);
                self.sensor_errors.push(e);
            }
        }
    }
}

fn segment(point: Vec2, force: Vec2) -> ForceSegment {
    let from = Vec3::new(point.x, point.y, 0.0);
    ForceSegment { from, to: from + Vec3::new(force.x, force.y, 0.0) * FORCE_SCALE }
}

/// Wheel footprint rectangle in chassis frame.
fn wheel_outline(w: &WheelState) -> Vec<Vec2> {
    let (r, hw) = (w.radius, 0.5 * w.width);
    let rot = w.heading();
    [(-r, -hw), (r, -hw), (r, hw), (-r, hw)]
        .iter()
        .map(|&(x, y)| w.offset() + rot.rotate(Vec2::new(x, y)))
        .collect()
}

impl Named for VehicleDynamicsCore {
    fn name(&self) -> &str { &self.name }
}

impl Steppable for VehicleDynamicsCore {
    /// Controller torques, steering and friction forces go to the backend.
    /// Pose and velocity are untouched.
    fn pre_timestep(&mut self, ctx: &StepCtx, backend: &mut dyn PhysicsBackend) -> VehicleResult<()> {
        let h = self.handles_or_err()?.clone();
        self.advance(TickPhase::PreStep, "pre_timestep")?;
        self.torques.clear();

        let state = VehicleState {
            pose: &self.pose,
            velocity: &self.velocity,
            velocity_local: &self.velocity_local,
            odometry: &self.odometry,
            wheels: &self.wheels,
        };
        let torques = self.controller.compute_torques(&state, ctx);
        if torques.len() != self.wheels.len() {
            self.phase = TickPhase::Idle;
            return Err(VehicleError::contract(format!(
                "vehicle `{}`: controller `{}` returned {} torques for {} wheels",
                self.name, self.controller.name(), torques.len(), self.wheels.len()
            )));
        }
        self.torques = torques;

        if self.class.is_steered() {
            if let Some(angle) = self.controller.steering_angle() {
                self.class.apply_steering(&mut self.wheels, angle);
            }
        }

        let forces = self.friction.compute_forces(&self.wheels, &self.velocity_local);
        if forces.len() != self.wheels.len() {
            self.phase = TickPhase::Idle;
            return Err(VehicleError::contract(format!(
                "vehicle `{}`: friction `{}` returned {} forces for {} wheels",
                self.name, self.friction.name(), forces.len(), self.wheels.len()
            )));
        }

        for (i, (w, f)) in self.wheels.iter_mut().zip(&forces).enumerate() {
            w.torque = self.torques[i];
            backend.apply_force(h.chassis, self.pose.rotate(f.force), self.pose.compose_point(w.offset()));
            // ground reaction brakes the spin
            backend.apply_joint_torque(h.wheel_joints[i], w.torque - f.longitudinal * w.radius);
        }
        self.forces = forces;
        trace!("vehicle `{}` tick {}: torques {:?}", self.name, ctx.tick, self.torques);
        Ok(())
    }

    fn backend_stepped(&mut self) -> VehicleResult<()> {
        self.advance(TickPhase::Stepped, "backend_stepped")
    }

    /// Reads the backend result back, then refreshes odometry, render
    /// segments, telemetry and sensors. Non-finite results leave the
    /// previous state in place.
    fn post_timestep(&mut self, ctx: &StepCtx, backend: &mut dyn PhysicsBackend) -> VehicleResult<()> {
        let h = self.handles_or_err()?.clone();
        self.advance(TickPhase::PostStep, "post_timestep")?;

        let read = backend.transform(h.chassis);
        let (lin, ang) = backend.velocity(h.chassis);
        let speeds: Vec<Scalar> = h.wheel_joints.iter().map(|&j| backend.joint_speed(j)).collect();
        let bad = if !read.is_finite() { Some("pose") }
            else if !(lin.is_finite() && ang.is_finite()) { Some("velocity") }
            else if !speeds.iter().all(|s| s.is_finite()) { Some("wheel joint speed") }
            else { None };
        if let Some(what) = bad {
            self.phase = TickPhase::Idle;
            self.torques.clear();
            return Err(VehicleError::BackendState {
                vehicle: self.name.clone(),
                what: format!("non-finite {what} after tick {}", ctx.tick),
            });
        }

        // the backend is planar; keep the out-of-plane components
        self.pose = Pose { x: read.x, y: read.y, yaw: read.yaw, ..self.pose };
        self.velocity = Twist::new(lin.x, lin.y, ang);
        self.velocity_local = self.pose.to_local(&self.velocity);
        for (w, &s) in self.wheels.iter_mut().zip(&speeds) {
            w.omega = s;
            w.phi = (w.phi + s * ctx.dt).rem_euclid(core::f64::consts::TAU);
        }
        self.odometry = OdometryEstimator::estimate(&self.wheels);

        self.publish_segments(ctx.tick);
        self.telemetry = self.build_telemetry(ctx.sim_time + ctx.dt);
        if self.telemetry_recording {
            if let Some(sink) = self.telemetry_sink.as_mut() { sink.record(&self.name, &self.telemetry); }
        }
        self.run_sensors(ctx);

        self.pose_overridden = false;
        self.torques.clear();
        self.advance(TickPhase::Idle, "post_timestep")
    }

    fn abort_tick(&mut self) {
        if self.phase != TickPhase::Idle {
            debug!("vehicle `{}`: tick aborted in {:?}", self.name, self.phase);
        }
        self.torques.clear();
        // the backend drops pending pushes on abort
        self.external.clear();
        self.phase = TickPhase::Idle;
    }
}

impl Renderable for VehicleDynamicsCore {
    fn render_snapshot(&self) -> RenderSnapshotBuffer { self.snapshot.clone() }

    fn outline(&self) -> Vec<Vec2> {
        self.chassis.polygon().iter().map(|&p| self.pose.compose_point(p)).collect()
    }
}

impl std::fmt::Debug for VehicleDynamicsCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VehicleDynamicsCore")
            .field("name", &self.name)
            .field("class", &self.class)
            .field("phase", &self.phase)
            .field("pose", &self.pose)
            .field("velocity", &self.velocity)
            .finish_non_exhaustive()
    }
}

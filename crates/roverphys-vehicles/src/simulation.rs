use log::{debug, error, warn};
use roverphys_core::{Pose, Scalar, StepCtx, Vec2, VehicleError, VehicleResult};
use roverphys_dynamics::PhysicsBackend;

use crate::capability::{Named, Steppable};
use crate::vehicle::VehicleDynamicsCore;

/// Owns the backend and the vehicles, and runs the tick sequence
/// pre (all) -> backend step -> stepped (all) -> post (all).
pub struct Simulation<B: PhysicsBackend> {
    backend: B,
    vehicles: Vec<VehicleDynamicsCore>,
    ctx: StepCtx,
}

impl<B: PhysicsBackend> Simulation<B> {
    pub fn new(backend: B, dt: Scalar) -> Self {
        Self { backend, vehicles: Vec::new(), ctx: StepCtx::new(dt) }
    }

    #[inline] pub fn backend(&self) -> &B { &self.backend }
    #[inline] pub fn backend_mut(&mut self) -> &mut B { &mut self.backend }
    /// Context of the next tick.
    #[inline] pub fn ctx(&self) -> &StepCtx { &self.ctx }
    #[inline] pub fn sim_time(&self) -> Scalar { self.ctx.sim_time }
    #[inline] pub fn vehicles(&self) -> &[VehicleDynamicsCore] { &self.vehicles }

    pub fn vehicle(&self, name: &str) -> Option<&VehicleDynamicsCore> {
        self.vehicles.iter().find(|v| v.name() == name)
    }

    pub fn vehicle_mut(&mut self, name: &str) -> Option<&mut VehicleDynamicsCore> {
        self.vehicles.iter_mut().find(|v| v.name() == name)
    }

    /// Builds the vehicle in the backend and assigns its index.
    pub fn add_vehicle(&mut self, mut v: VehicleDynamicsCore) -> VehicleResult<usize> {
        if self.vehicle(v.name()).is_some() {
            return Err(VehicleError::config(format!("duplicate vehicle name `{}`", v.name())));
        }
        v.create_multibody_system(&mut self.backend)?;
        let idx = self.vehicles.len();
        v.set_vehicle_index(idx);
        debug!("simulation: added `{}` as #{idx}", v.name());
        self.vehicles.push(v);
        Ok(idx)
    }

    /// Detaches a vehicle and destroys its bodies in the backend.
    pub fn remove_vehicle(&mut self, name: &str) -> Option<VehicleDynamicsCore> {
        let pos = self.vehicles.iter().position(|v| v.name() == name)?;
        let mut v = self.vehicles.remove(pos);
        if let Err(e) = v.destroy_multibody_system(&mut self.backend) {
            warn!("simulation: removing `{name}`: {e}");
        }
        for (i, rest) in self.vehicles.iter_mut().enumerate() { rest.set_vehicle_index(i); }
        Some(v)
    }

    /// External push on a named vehicle (chassis-frame force and point).
    pub fn apply_force(&mut self, name: &str, force: Vec2, local_point: Vec2) -> VehicleResult<()> {
        let v = self.vehicles.iter_mut().find(|v| v.name() == name)
            .ok_or_else(|| VehicleError::config(format!("no vehicle `{name}`")))?;
        v.apply_force(&mut self.backend, force, local_point)
    }

    pub fn override_pose(&mut self, name: &str, pose: Pose) -> VehicleResult<()> {
        let v = self.vehicles.iter_mut().find(|v| v.name() == name)
            .ok_or_else(|| VehicleError::config(format!("no vehicle `{name}`")))?;
        v.override_pose(pose, &mut self.backend)
    }

    /// Runs one tick of length `dt`.
    ///
    /// A pre-step failure aborts the tick for every vehicle before the
    /// backend steps, and drops every force already handed to it, external
    /// pushes included. Post-step failures are reported after all vehicles
    /// have been read back; the first one is returned.
    pub fn step(&mut self, dt: Scalar) -> VehicleResult<()> {
        self.ctx.dt = dt;
        let ctx = self.ctx;

        for i in 0..self.vehicles.len() {
            if let Err(e) = self.vehicles[i].pre_timestep(&ctx, &mut self.backend) {
                error!("tick {}: pre_timestep of `{}` failed: {e}", ctx.tick, self.vehicles[i].name());
                for v in &mut self.vehicles { v.abort_tick(); }
                self.backend.clear_forces();
                return Err(e);
            }
        }

        self.backend.step(dt);
        for v in &mut self.vehicles { v.backend_stepped()?; }

        let mut first: Option<VehicleError> = None;
        for v in &mut self.vehicles {
            if let Err(e) = v.post_timestep(&ctx, &mut self.backend) {
                error!("tick {}: post_timestep of `{}` failed: {e}", ctx.tick, v.name());
                first.get_or_insert(e);
            }
        }
        self.ctx = ctx.next();
        match first {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Runs `n` ticks of length `dt`, stopping at the first failure.
    pub fn run(&mut self, n: u64, dt: Scalar) -> VehicleResult<()> {
        for _ in 0..n { self.step(dt)?; }
        Ok(())
    }
}

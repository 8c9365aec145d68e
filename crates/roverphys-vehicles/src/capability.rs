//! Capabilities a simulated object can expose, composed per type.

use roverphys_core::{StepCtx, VehicleResult, Vec2};
use roverphys_dynamics::PhysicsBackend;
use roverphys_geom::Aabb2;
use roverphys_viz::RenderSnapshotBuffer;

pub trait Named {
    fn name(&self) -> &str;
}

/// Participates in the tick: `pre_timestep`, then the backend steps,
/// then `backend_stepped` and `post_timestep`.
pub trait Steppable {
    fn pre_timestep(&mut self, ctx: &StepCtx, backend: &mut dyn PhysicsBackend) -> VehicleResult<()>;
    fn backend_stepped(&mut self) -> VehicleResult<()>;
    fn post_timestep(&mut self, ctx: &StepCtx, backend: &mut dyn PhysicsBackend) -> VehicleResult<()>;
    /// Drops a half-finished tick and returns to idle.
    fn abort_tick(&mut self);
}

/// Exposes what a renderer may read from another thread.
pub trait Renderable {
    fn render_snapshot(&self) -> RenderSnapshotBuffer;
    /// Chassis outline in the global frame, as of the last completed tick.
    fn outline(&self) -> Vec<Vec2>;

    fn bounds(&self) -> Option<Aabb2> { Aabb2::of_points(&self.outline()) }

    /// Broad culling test against a global-frame view box.
    fn visible_in(&self, view: &Aabb2) -> bool {
        self.bounds().is_some_and(|b| b.overlaps(view))
    }
}

use log::info;
use roverphys_core::{Twist, VehicleError, VehicleResult};
use roverphys_dynamics::PlanarWorld;
use roverphys_geom::ChassisGeometry;
use roverphys_vehicles::{LayoutParams, PoseSensor, Sensor, Simulation, VehicleDynamicsCore, WheelEncoders};
use serde_json::Value;

use crate::desc::{SceneDesc, SensorDesc, VehicleDesc};
use crate::registry::{parse_params, ControllerInput, Registry};

fn make_sensor(d: &SensorDesc) -> Box<dyn Sensor> {
    match d {
        SensorDesc::Pose { name, noise_std, dropout, seed } => {
            Box::new(PoseSensor::new(name.clone(), *noise_std, *dropout, *seed))
        }
        SensorDesc::Encoders { name, ticks_per_rev } => Box::new(WheelEncoders::new(name.clone(), *ticks_per_rev)),
    }
}

/// Resolves every registry name in `desc` and builds the vehicle. The
/// multibody system is not created yet.
pub fn build_vehicle(desc: &VehicleDesc, registry: &Registry) -> VehicleResult<VehicleDynamicsCore> {
    let class = registry.make_class(&desc.class.class, &desc.class.params)?;
    let chassis = match &desc.chassis {
        Some(c) => c.to_geometry()?,
        None => ChassisGeometry::default(),
    };
    let wheels = match &desc.wheels {
        Some(ws) => ws.iter().map(|w| {
            let mut w = *w;
            if !(w.inertia > 0.0) { w.recompute_inertia(); }
            w
        }).collect(),
        None => {
            let layout: LayoutParams = parse_params(&desc.class.class, &desc.class.params)?;
            class.default_wheels(&layout)
        }
    };
    let friction = registry.make_friction(&desc.friction.class, &desc.friction.params)?;
    let controller = registry.make_controller(
        &desc.controller.class,
        &ControllerInput { class, wheels: &wheels, params: &desc.controller.params },
    )?;

    let mut v = VehicleDynamicsCore::new(desc.name.clone(), class, chassis, wheels, friction, controller)?;
    v.set_initial_state(desc.pose.unwrap_or_default(), desc.velocity.unwrap_or(Twist::ZERO))?;
    for s in &desc.sensors { v.add_sensor(make_sensor(s)); }
    Ok(v)
}

/// Builds a vehicle from an already-parsed config node.
pub fn load_from_config(node: &Value, registry: &Registry) -> VehicleResult<VehicleDynamicsCore> {
    let desc: VehicleDesc = serde_json::from_value(node.clone())
        .map_err(|e| VehicleError::config(format!("vehicle block: {e}")))?;
    build_vehicle(&desc, registry)
}

pub fn load_from_str(json: &str, registry: &Registry) -> VehicleResult<VehicleDynamicsCore> {
    let node: Value = serde_json::from_str(json).map_err(|e| VehicleError::config(e.to_string()))?;
    load_from_config(&node, registry)
}

/// Parses a scene and returns a ready simulation on a [`PlanarWorld`].
pub fn load_scene(json: &str, registry: &Registry) -> VehicleResult<Simulation<PlanarWorld>> {
    let scene: SceneDesc = serde_json::from_str(json).map_err(|e| VehicleError::config(format!("scene: {e}")))?;
    if !(scene.dt > 0.0) || !scene.dt.is_finite() {
        return Err(VehicleError::config(format!("scene: dt must be > 0, got {}", scene.dt)));
    }
    let world = PlanarWorld::new().with_damping(scene.linear_damping, 0.0);
    let mut sim = Simulation::new(world, scene.dt);
    for d in &scene.vehicles {
        sim.add_vehicle(build_vehicle(d, registry)?)?;
    }
    info!("scene: {} vehicles, dt {} s", scene.vehicles.len(), scene.dt);
    Ok(sim)
}

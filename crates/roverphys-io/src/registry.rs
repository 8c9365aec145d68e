use std::collections::HashMap;

use log::debug;
use roverphys_controllers::{
    AckermannPidParams, AckermannSpeedPid, Controller, RawTorque, TwistPid, TwistPidParams,
};
use roverphys_core::{Scalar, VehicleError, VehicleResult, WheelState};
use roverphys_friction::{Coulomb, FrictionModel, Stribeck, SurfaceId, Viscous};
use roverphys_vehicles::VehicleClass;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// What a controller constructor gets to see.
#[derive(Copy, Clone, Debug)]
pub struct ControllerInput<'a> {
    pub class: VehicleClass,
    pub wheels: &'a [WheelState],
    pub params: &'a Value,
}

pub type ClassCtor = Box<dyn Fn(&Value) -> VehicleResult<VehicleClass> + Send + Sync>;
pub type FrictionCtor = Box<dyn Fn(&Value) -> VehicleResult<Box<dyn FrictionModel>> + Send + Sync>;
pub type ControllerCtor = Box<dyn Fn(&ControllerInput<'_>) -> VehicleResult<Box<dyn Controller>> + Send + Sync>;

/// Deserializes a parameter block; `null` yields the defaults.
pub fn parse_params<T: DeserializeOwned + Default>(what: &str, v: &Value) -> VehicleResult<T> {
    if v.is_null() { return Ok(T::default()); }
    serde_json::from_value(v.clone()).map_err(|e| VehicleError::config(format!("{what}: {e}")))
}

/// Name -> constructor tables for vehicle classes, friction models and
/// controllers. Filled at process start; lookups never mutate it.
#[derive(Default)]
pub struct Registry {
    classes: HashMap<String, ClassCtor>,
    friction: HashMap<String, FrictionCtor>,
    controllers: HashMap<String, ControllerCtor>,
}

#[derive(Deserialize)]
#[serde(default)]
struct AckermannClassParams { max_steer: Scalar }

impl Default for AckermannClassParams {
    fn default() -> Self { Self { max_steer: VehicleClass::DEFAULT_MAX_STEER } }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawParams { torques: Option<Vec<Scalar>> }

#[derive(Deserialize)]
#[serde(untagged)]
enum StribeckParams {
    Surfaces { tire: SurfaceId, ground: SurfaceId },
    Coefficients(Stribeck),
}

impl Registry {
    /// Empty tables.
    pub fn new() -> Self { Self::default() }

    /// Tables holding every model this workspace ships.
    pub fn with_builtins() -> Self {
        let mut r = Self::new();
        r.register_class("differential", |_| Ok(VehicleClass::Differential));
        r.register_class("differential_4_wheels", |_| Ok(VehicleClass::Differential4));
        r.register_class("ackermann", |p| {
            let p: AckermannClassParams = parse_params("ackermann", p)?;
            if !(p.max_steer > 0.0) {
                return Err(VehicleError::config("ackermann: max_steer must be > 0"));
            }
            Ok(VehicleClass::Ackermann { max_steer: p.max_steer })
        });

        r.register_friction("coulomb", |p| Ok(Box::new(parse_params::<Coulomb>("coulomb", p)?)));
        r.register_friction("default", |p| Ok(Box::new(parse_params::<Coulomb>("default", p)?)));
        r.register_friction("viscous", |p| Ok(Box::new(parse_params::<Viscous>("viscous", p)?)));
        r.register_friction("stribeck", |p| {
            if p.is_null() { return Ok(Box::new(Stribeck::default())); }
            let s = match serde_json::from_value::<StribeckParams>(p.clone()) {
                Ok(StribeckParams::Surfaces { tire, ground }) => Stribeck::for_surfaces(tire, ground),
                Ok(StribeckParams::Coefficients(s)) => s,
                Err(e) => return Err(VehicleError::config(format!("stribeck: {e}"))),
            };
            Ok(Box::new(s))
        });

        r.register_controller("raw", |c| {
            let p: RawParams = parse_params("raw", c.params)?;
            Ok(Box::new(match p.torques {
                Some(t) => RawTorque::new(t),
                None => RawTorque::zeros(c.class.controller_wheel_count()),
            }))
        });
        r.register_controller("twist_pid", |c| {
            let p: TwistPidParams = parse_params("twist_pid", c.params)?;
            Ok(Box::new(TwistPid::for_wheels(c.wheels, p)))
        });
        r.register_controller("ackermann_pid", |c| {
            if !c.class.is_steered() {
                return Err(VehicleError::config(format!("ackermann_pid needs a steered class, got `{}`", c.class.key())));
            }
            let mut p: AckermannPidParams = parse_params("ackermann_pid", c.params)?;
            if c.params.get("wheelbase").is_none() {
                if let (Some(f), Some(r)) = (c.wheels.get(roverphys_vehicles::WHEEL_FL), c.wheels.get(roverphys_vehicles::WHEEL_RL)) {
                    p.wheelbase = f.x - r.x;
                }
            }
            Ok(Box::new(AckermannSpeedPid::new(c.class.controller_wheel_count(), c.class.driven_wheels(), p)))
        });
        r
    }

    pub fn register_class<F>(&mut self, name: &str, ctor: F)
    where F: Fn(&Value) -> VehicleResult<VehicleClass> + Send + Sync + 'static {
        debug!("registry: class `{name}`");
        self.classes.insert(name.to_string(), Box::new(ctor));
    }

    pub fn register_friction<F>(&mut self, name: &str, ctor: F)
    where F: Fn(&Value) -> VehicleResult<Box<dyn FrictionModel>> + Send + Sync + 'static {
        debug!("registry: friction `{name}`");
        self.friction.insert(name.to_string(), Box::new(ctor));
    }

    pub fn register_controller<F>(&mut self, name: &str, ctor: F)
    where F: Fn(&ControllerInput<'_>) -> VehicleResult<Box<dyn Controller>> + Send + Sync + 'static {
        debug!("registry: controller `{name}`");
        self.controllers.insert(name.to_string(), Box::new(ctor));
    }

    pub fn make_class(&self, name: &str, params: &Value) -> VehicleResult<VehicleClass> {
        let ctor = self.classes.get(name)
            .ok_or_else(|| VehicleError::config(format!("unknown vehicle class `{name}`")))?;
        ctor(params)
    }

    pub fn make_friction(&self, name: &str, params: &Value) -> VehicleResult<Box<dyn FrictionModel>> {
        let ctor = self.friction.get(name)
            .ok_or_else(|| VehicleError::config(format!("unknown friction model `{name}`")))?;
        ctor(params)
    }

    pub fn make_controller(&self, name: &str, input: &ControllerInput<'_>) -> VehicleResult<Box<dyn Controller>> {
        let ctor = self.controllers.get(name)
            .ok_or_else(|| VehicleError::config(format!("unknown controller `{name}`")))?;
        ctor(input)
    }

    /// Registered names, sorted: `(classes, friction, controllers)`.
    pub fn names(&self) -> (Vec<&str>, Vec<&str>, Vec<&str>) {
        fn sorted<V>(m: &HashMap<String, V>) -> Vec<&str> {
            let mut v: Vec<&str> = m.keys().map(String::as_str).collect();
            v.sort_unstable();
            v
        }
        (sorted(&self.classes), sorted(&self.friction), sorted(&self.controllers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builtins_are_registered() {
        let registry = Registry::with_builtins();
        let (classes, friction, controllers) = registry.names();
        assert_eq!(classes, ["ackermann", "differential", "differential_4_wheels"]);
        assert_eq!(friction, ["coulomb", "default", "stribeck", "viscous"]);
        assert_eq!(controllers, ["ackermann_pid", "raw", "twist_pid"]);
    }

    #[test]
    fn unknown_names_are_configuration_errors() {
        let r = Registry::with_builtins();
        assert!(matches!(r.make_class("hovercraft", &Value::Null), Err(VehicleError::Configuration(_))));
        assert!(matches!(r.make_friction("glue", &Value::Null), Err(VehicleError::Configuration(_))));
    }

    #[test]
    fn stribeck_accepts_surfaces_or_coefficients() {
        let r = Registry::with_builtins();
        assert_eq!(r.make_friction("stribeck", &json!({"tire": "rubber", "ground": "ice"})).unwrap().name(), "stribeck");
        assert!(r.make_friction("stribeck", &json!({"mu_s": 0.9, "mu_k": 0.7})).is_ok());
    }

    #[test]
    fn malformed_params_are_rejected() {
        let r = Registry::with_builtins();
        assert!(r.make_friction("viscous", &json!({"c_long": "stiff"})).is_err());
        assert!(r.make_class("ackermann", &json!({"max_steer": -1.0})).is_err());
    }

    #[test]
    fn custom_entries_can_be_added() {
        let mut r = Registry::new();
        r.register_friction("frictionless", |_| Ok(Box::new(Viscous { c_long: 0.0, c_lat: 0.0 })));
        assert!(r.make_friction("frictionless", &Value::Null).is_ok());
        assert!(r.make_friction("coulomb", &Value::Null).is_err());
    }
}

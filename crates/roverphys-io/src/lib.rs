//! Serialized vehicle descriptions and the name registry that turns them
//! into live vehicles.

mod desc;
mod registry;
mod loader;

pub use desc::{ChassisDesc, ModelBlock, SceneDesc, SensorDesc, VehicleDesc, desc_hash};
pub use registry::{ControllerCtor, ControllerInput, FrictionCtor, ClassCtor, Registry, parse_params};
pub use loader::{build_vehicle, load_from_config, load_from_str, load_scene};

use blake3::Hasher;
use roverphys_core::{vec2, Pose, Scalar, Twist, VehicleError, VehicleResult, WheelState};
use roverphys_geom::ChassisGeometry;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A registry name plus its free-form parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelBlock {
    pub class: String,
    #[serde(default)]
    pub params: Value,
}

impl ModelBlock {
    pub fn named(class: impl Into<String>) -> Self { Self { class: class.into(), params: Value::Null } }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChassisDesc {
    /// Outline vertices `[x, y]` in the chassis frame.
    pub polygon: Vec<[Scalar; 2]>,
    pub mass: Scalar,
    #[serde(default)]
    pub com: [Scalar; 2],
    #[serde(default = "default_z_min")]
    pub z_min: Scalar,
    #[serde(default = "default_z_max")]
    pub z_max: Scalar,
}

fn default_z_min() -> Scalar { 0.05 }
fn default_z_max() -> Scalar { 0.6 }

impl ChassisDesc {
    pub fn to_geometry(&self) -> VehicleResult<ChassisGeometry> {
        let poly = self.polygon.iter().map(|p| vec2(p[0], p[1])).collect();
        ChassisGeometry::new(poly, self.mass, vec2(self.com[0], self.com[1]), self.z_min, self.z_max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class", rename_all = "snake_case")]
pub enum SensorDesc {
    Pose {
        name: String,
        #[serde(default)]
        noise_std: Scalar,
        #[serde(default)]
        dropout: Scalar,
        #[serde(default = "default_seed")]
        seed: u64,
    },
    Encoders {
        name: String,
        #[serde(default = "default_ticks")]
        ticks_per_rev: u32,
    },
}

fn default_seed() -> u64 { 0x5eed }
fn default_ticks() -> u32 { 1024 }

/// One vehicle as written in a config document.
///
/// `class` is a registry key; missing `chassis`/`wheels` fall back to the
/// class defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleDesc {
    pub name: String,
    pub class: ModelBlock,
    #[serde(default)]
    pub chassis: Option<ChassisDesc>,
    #[serde(default)]
    pub wheels: Option<Vec<WheelState>>,
    #[serde(default = "default_friction")]
    pub friction: ModelBlock,
    #[serde(default = "default_controller")]
    pub controller: ModelBlock,
    #[serde(default)]
    pub pose: Option<Pose>,
    #[serde(default)]
    pub velocity: Option<Twist>,
    #[serde(default)]
    pub sensors: Vec<SensorDesc>,
}

fn default_friction() -> ModelBlock { ModelBlock::named("default") }
fn default_controller() -> ModelBlock { ModelBlock::named("raw") }

/// A set of vehicles plus the fixed tick length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDesc {
    #[serde(default = "default_dt")]
    pub dt: Scalar,
    #[serde(default)]
    pub linear_damping: Scalar,
    pub vehicles: Vec<VehicleDesc>,
}

fn default_dt() -> Scalar { 0.001 }

/// Stable digest of a descriptor, for provenance in logs and telemetry.
pub fn desc_hash(desc: &VehicleDesc) -> VehicleResult<[u8; 32]> {
    let json = serde_json::to_vec(desc).map_err(|e| VehicleError::config(e.to_string()))?;
    let mut h = Hasher::new();
    h.update(b"VEHv1\0");
    h.update(&(json.len() as u64).to_le_bytes());
    h.update(&json);
    Ok(*h.finalize().as_bytes())
}

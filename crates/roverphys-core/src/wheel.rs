use crate::{Scalar, Vec2};
use serde::{Deserialize, Serialize};

/// Per-wheel geometry and spin state.
///
/// Stored in a fixed-length sequence whose order is defined by the vehicle
/// class (e.g. `[0]` = rear-left).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WheelState {
    /// Wheel centre in chassis frame (m).
    pub x: Scalar,
    pub y: Scalar,
    /// Heading relative to the chassis +X axis (rad). Non-zero for steered wheels.
    #[serde(default)]
    pub yaw: Scalar,
    pub radius: Scalar,
    #[serde(default = "default_width")]
    pub width: Scalar,
    #[serde(default = "default_mass")]
    pub mass: Scalar,
    /// Spin inertia about the axle (kg m^2).
    #[serde(default)]
    pub inertia: Scalar,
    /// Friction coefficient against the ground.
    #[serde(default = "default_mu")]
    pub mu: Scalar,
    /// Spin rate (rad/s), positive rolls the vehicle forward.
    #[serde(skip)]
    pub omega: Scalar,
    /// Integrated spin angle (rad), only used for rendering.
    #[serde(skip)]
    pub phi: Scalar,
    /// Last torque commanded by the controller (N m).
    #[serde(skip)]
    pub torque: Scalar,
    /// Share of the vehicle weight resting on this wheel (N).
    #[serde(skip)]
    pub normal_load: Scalar,
}

fn default_width() -> Scalar { 0.20 }
fn default_mass() -> Scalar { 2.0 }
fn default_mu() -> Scalar { 0.8 }

impl WheelState {
    /// Wheel at `(x, y)` with the default width/mass/mu and solid-disc inertia.
    pub fn at(x: Scalar, y: Scalar, radius: Scalar) -> Self {
        let mut w = Self {
            x, y, yaw: 0.0, radius,
            width: default_width(), mass: default_mass(), inertia: 0.0, mu: default_mu(),
            omega: 0.0, phi: 0.0, torque: 0.0, normal_load: 0.0,
        };
        w.recompute_inertia();
        w
    }

    #[inline] pub fn offset(&self) -> Vec2 { Vec2::new(self.x, self.y) }

    /// Unit heading of the rolling direction in chassis frame.
    #[inline] pub fn heading(&self) -> Vec2 { Vec2::from_angle(self.yaw) }

    /// Solid-disc spin inertia `m r^2 / 2`.
    pub fn recompute_inertia(&mut self) { self.inertia = 0.5 * self.mass * self.radius * self.radius; }

    /// Linear rim speed `omega * radius`.
    #[inline] pub fn rim_speed(&self) -> Scalar { self.omega * self.radius }
}

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

pub type Scalar = f64;
pub type Vec2 = DVec2;
pub type Vec3 = DVec3;

/// Standard gravity (m/s^2).
pub const GRAVITY: Scalar = 9.81;

#[inline] pub fn vec2(x: Scalar, y: Scalar) -> Vec2 { Vec2::new(x, y) }

/// Global-frame pose of a vehicle reference point.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub x: Scalar,
    pub y: Scalar,
    #[serde(default)]
    pub z: Scalar,
    #[serde(default)]
    pub yaw: Scalar,
    #[serde(default)]
    pub pitch: Scalar,
    #[serde(default)]
    pub roll: Scalar,
}

impl Pose {
    #[inline] pub fn planar(x: Scalar, y: Scalar, yaw: Scalar) -> Self { Self { x, y, yaw, ..Default::default() } }
    #[inline] pub fn position(&self) -> Vec2 { Vec2::new(self.x, self.y) }

    /// Local point -> global frame.
    #[inline]
    pub fn compose_point(&self, local: Vec2) -> Vec2 {
        self.position() + self.rotate(local)
    }

    /// Rotates a local-frame vector into the global frame.
    #[inline]
    pub fn rotate(&self, v: Vec2) -> Vec2 { Vec2::from_angle(self.yaw).rotate(v) }

    /// Rotates a global-frame vector into the local frame.
    #[inline]
    pub fn inverse_rotate(&self, v: Vec2) -> Vec2 { Vec2::from_angle(-self.yaw).rotate(v) }

    /// Global twist -> chassis frame.
    #[inline]
    pub fn to_local(&self, t: &Twist) -> Twist { t.rotated(-self.yaw) }

    pub fn is_finite(&self) -> bool {
        [self.x, self.y, self.z, self.yaw, self.pitch, self.roll].iter().all(|c| c.is_finite())
    }
}

/// Planar velocity: linear part plus yaw rate.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Twist {
    pub vx: Scalar,
    pub vy: Scalar,
    pub omega: Scalar,
}

impl Twist {
    pub const ZERO: Twist = Twist { vx: 0.0, vy: 0.0, omega: 0.0 };

    #[inline] pub fn new(vx: Scalar, vy: Scalar, omega: Scalar) -> Self { Self { vx, vy, omega } }
    #[inline] pub fn linear(&self) -> Vec2 { Vec2::new(self.vx, self.vy) }

    /// Re-expresses a global twist in a frame rotated by `yaw`.
    #[inline]
    pub fn rotated(&self, yaw: Scalar) -> Twist {
        let v = Vec2::from_angle(yaw).rotate(self.linear());
        Twist { vx: v.x, vy: v.y, omega: self.omega }
    }

    /// Velocity of a point rigidly attached at `p` (same frame as the twist).
    #[inline]
    pub fn point_velocity(&self, p: Vec2) -> Vec2 {
        Vec2::new(self.vx - self.omega * p.y, self.vy + self.omega * p.x)
    }

    pub fn is_finite(&self) -> bool { self.vx.is_finite() && self.vy.is_finite() && self.omega.is_finite() }
}

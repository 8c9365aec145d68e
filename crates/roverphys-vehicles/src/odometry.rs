use glam::{DMat3, DVec3};
use roverphys_core::{Scalar, Twist, Vec2, WheelState};

/// Encoder-only velocity estimate of the reference point.
///
/// Each wheel contributes a rolling row
/// `omega_i * r_i = vx * cos(t_i) + vy * sin(t_i) + w * (x_i * sin(t_i) - y_i * cos(t_i))`
/// and a no-side-slip row
/// `0 = -vx * sin(t_i) + vy * cos(t_i) + w * (x_i * cos(t_i) + y_i * sin(t_i))`;
/// `(vx, vy, w)` is the least-squares solution. Ground-truth pose and
/// velocity are never consulted.
#[derive(Copy, Clone, Debug, Default)]
pub struct OdometryEstimator;

const DET_EPS: Scalar = 1e-12;

#[inline]
fn outer(a: DVec3) -> DMat3 { DMat3::from_cols(a * a.x, a * a.y, a * a.z) }

impl OdometryEstimator {
    pub fn estimate(wheels: &[WheelState]) -> Twist {
        if wheels.is_empty() { return Twist::ZERO; }
        // normal equations of the 2n x 3 system
        let mut ata = DMat3::ZERO;
        let mut atb = DVec3::ZERO;
        for w in wheels {
            let (s, c) = w.yaw.sin_cos();
            let rolling = DVec3::new(c, s, w.x * s - w.y * c);
            let side = DVec3::new(-s, c, w.x * c + w.y * s);
            ata += outer(rolling) + outer(side);
            atb += rolling * w.rim_speed();
        }
        let scale = (ata.x_axis.x * ata.y_axis.y * ata.z_axis.z).max(1.0);
        if ata.determinant().abs() > DET_EPS * scale {
            let v = ata.inverse() * atb;
            return Twist::new(v.x, v.y, v.z);
        }
        // rank deficient (e.g. a single wheel or a shared axle point): translation only
        let sum: Vec2 = wheels.iter().map(|w| w.heading() * w.rim_speed()).sum();
        let v = sum / wheels.len() as Scalar;
        Twist::new(v.x, v.y, 0.0)
    }
}

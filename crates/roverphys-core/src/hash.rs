use blake3::Hasher;
use crate::types::{Pose, Twist};

/// Incremental digest over per-tick state, used for determinism checks.
pub struct StepHasher(Hasher);

impl StepHasher {
    pub fn new() -> Self { StepHasher(Hasher::new()) }
    pub fn update_f64(&mut self, v: f64) { self.0.update(&v.to_le_bytes()); }
    pub fn finalize(self) -> [u8; 32] { *self.0.finalize().as_bytes() }
}

impl Default for StepHasher {
    fn default() -> Self { Self::new() }
}

#[inline]
pub fn hash_pose(h: &mut StepHasher, p: &Pose) {
    for c in [p.x, p.y, p.z, p.yaw, p.pitch, p.roll] { h.update_f64(c); }
}

#[inline]
pub fn hash_twist(h: &mut StepHasher, t: &Twist) {
    for c in [t.vx, t.vy, t.omega] { h.update_f64(c); }
}

use roverphys_core::Scalar;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PidParams {
    pub kp: Scalar,
    pub ki: Scalar,
    pub kd: Scalar,
    /// Output clamp (absolute); `0` disables it.
    pub max_out: Scalar,
}

impl Default for PidParams {
    fn default() -> Self { Self { kp: 10.0, ki: 1.0, kd: 0.0, max_out: 10.0 } }
}

/// Discrete PID with clamped output and conditional integration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pid {
    pub params: PidParams,
    integral: Scalar,
    last_err: Option<Scalar>,
}

impl Pid {
    pub fn new(params: PidParams) -> Self { Self { params, integral: 0.0, last_err: None } }

    pub fn reset(&mut self) { self.integral = 0.0; self.last_err = None; }

    #[inline] pub fn integral(&self) -> Scalar { self.integral }

    pub fn step(&mut self, err: Scalar, dt: Scalar) -> Scalar {
        let p = &self.params;
        let deriv = match self.last_err {
            Some(e0) if dt > 0.0 => (err - e0) / dt,
            _ => 0.0,
        };
        self.last_err = Some(err);

        let candidate = self.integral + err * dt;
        let raw = p.kp * err + p.ki * candidate + p.kd * deriv;
        if p.max_out > 0.0 && raw.abs() > p.max_out {
            // saturated: freeze the integrator unless it pulls back inside
            if candidate.abs() < self.integral.abs() { self.integral = candidate; }
            return raw.clamp(-p.max_out, p.max_out);
        }
        self.integral = candidate;
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn proportional_only() {
        let mut pid = Pid::new(PidParams { kp: 2.0, ki: 0.0, kd: 0.0, max_out: 0.0 });
        assert_relative_eq!(pid.step(1.5, 0.1), 3.0);
    }

    #[test]
    fn clamps_and_freezes_integral() {
        let mut pid = Pid::new(PidParams { kp: 0.0, ki: 100.0, kd: 0.0, max_out: 1.0 });
        for _ in 0..100 { assert!(pid.step(1.0, 0.1).abs() <= 1.0); }
        assert!(pid.integral() < 0.02);
    }

    #[test]
    fn deterministic() {
        let mut a = Pid::new(PidParams::default());
        let mut b = Pid::new(PidParams::default());
        for e in [0.3, -0.1, 0.7, 0.0] {
            assert_eq!(a.step(e, 0.01), b.step(e, 0.01));
        }
    }
}

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use roverphys_core::{Pose, Scalar, Twist};
use serde::Serialize;

/// Column names of the pose record, in output order.
pub fn pose_columns() -> &'static [&'static str] {
    &["timestamp", "Qx", "Qy", "Qz", "Qyaw", "Qpitch", "Qroll", "dQx", "dQy", "dQz"]
}

/// Column names of each per-wheel record, in output order.
pub fn wheel_columns() -> &'static [&'static str] {
    &["timestamp", "torque", "weight", "velocity_x", "velocity_y", "friction_x", "friction_y"]
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct WheelTelemetry {
    pub torque: Scalar,
    pub weight: Scalar,
    /// Wheel centre velocity, chassis frame.
    pub velocity_x: Scalar,
    pub velocity_y: Scalar,
    /// Contact force, chassis frame.
    pub friction_x: Scalar,
    pub friction_y: Scalar,
}

/// Named scalar fields a vehicle offers after each tick.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TelemetryFrame {
    pub timestamp: Scalar,
    pub pose: Pose,
    pub velocity: Twist,
    pub wheels: Vec<WheelTelemetry>,
}

impl TelemetryFrame {
    /// Values matching [`pose_columns`]. `dQz` carries the yaw rate.
    pub fn pose_row(&self) -> [Scalar; 10] {
        let p = &self.pose;
        [self.timestamp, p.x, p.y, p.z, p.yaw, p.pitch, p.roll, self.velocity.vx, self.velocity.vy, self.velocity.omega]
    }

    /// Values matching [`wheel_columns`] for wheel `i`.
    pub fn wheel_row(&self, i: usize) -> Option<[Scalar; 7]> {
        let w = self.wheels.get(i)?;
        Some([self.timestamp, w.torque, w.weight, w.velocity_x, w.velocity_y, w.friction_x, w.friction_y])
    }

    /// Flat `(name, value)` view; wheel fields are prefixed `wN.`.
    pub fn fields(&self) -> Vec<(String, Scalar)> {
        let mut out: Vec<(String, Scalar)> = pose_columns().iter().map(|c| c.to_string())
            .zip(self.pose_row())
            .collect();
        for i in 0..self.wheels.len() {
            if let Some(row) = self.wheel_row(i) {
                for (c, v) in wheel_columns().iter().zip(row).skip(1) {
                    out.push((format!("w{i}.{c}"), v));
                }
            }
        }
        out
    }
}

/// Receives one frame per vehicle per tick. Storage format is up to the sink.
pub trait TelemetrySink: Send {
    fn record(&mut self, vehicle: &str, frame: &TelemetryFrame);
}

/// Lets several vehicles share one sink.
impl<T: TelemetrySink> TelemetrySink for Arc<Mutex<T>> {
    fn record(&mut self, vehicle: &str, frame: &TelemetryFrame) { self.lock().record(vehicle, frame); }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LedgerEntry {
    pub session: u32,
    pub vehicle: String,
    pub frame: TelemetryFrame,
}

/// Bounded in-memory sink with recording toggle and sessions.
pub struct TelemetryLedger {
    cap: usize,
    recording: bool,
    session: u32,
    entries: VecDeque<LedgerEntry>,
}

impl TelemetryLedger {
    pub fn new(cap: usize) -> Self {
        Self { cap: cap.max(1), recording: true, session: 0, entries: VecDeque::new() }
    }

    pub fn set_recording(&mut self, on: bool) { self.recording = on; }
    #[inline] pub fn is_recording(&self) -> bool { self.recording }
    pub fn clear(&mut self) { self.entries.clear(); }

    /// Starts a new session; earlier entries are kept.
    pub fn new_session(&mut self) -> u32 {
        self.session += 1;
        self.session
    }

    #[inline] pub fn session(&self) -> u32 { self.session }
    #[inline] pub fn len(&self) -> usize { self.entries.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.entries.is_empty() }
    pub fn iter(&self) -> impl Iterator<Item = &LedgerEntry> { self.entries.iter() }
    pub fn last(&self) -> Option<&LedgerEntry> { self.entries.back() }
}

impl TelemetrySink for TelemetryLedger {
    fn record(&mut self, vehicle: &str, frame: &TelemetryFrame) {
        if !self.recording { return; }
        if self.entries.len() == self.cap { self.entries.pop_front(); }
        self.entries.push_back(LedgerEntry { session: self.session, vehicle: vehicle.to_string(), frame: frame.clone() });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(t: f64) -> TelemetryFrame {
        TelemetryFrame { timestamp: t, wheels: vec![WheelTelemetry { torque: 1.5, ..Default::default() }], ..Default::default() }
    }

    #[test]
    fn ring_drops_oldest() {
        let mut l = TelemetryLedger::new(2);
        for t in 0..3 { l.record("r1", &frame(t as f64)); }
        assert_eq!(l.len(), 2);
        assert_eq!(l.iter().next().map(|e| e.frame.timestamp), Some(1.0));
    }

    #[test]
    fn paused_ledger_ignores_frames() {
        let mut l = TelemetryLedger::new(8);
        l.set_recording(false);
        assert!(!l.is_recording());
        l.record("r1", &frame(0.0));
        assert!(l.is_empty());
        l.set_recording(true);
        assert_eq!(l.new_session(), 1);
        l.record("r1", &frame(0.1));
        assert_eq!(l.last().map(|e| e.session), Some(1));
    }

    #[test]
    fn named_fields() {
        let f = frame(0.5);
        let fields = f.fields();
        assert_eq!(fields[0], ("timestamp".to_string(), 0.5));
        assert!(fields.iter().any(|(n, v)| n == "w0.torque" && *v == 1.5));
        assert_eq!(fields.len(), pose_columns().len() + wheel_columns().len() - 1);
    }
}

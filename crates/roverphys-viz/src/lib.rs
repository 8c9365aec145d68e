mod snapshot;
mod telemetry;

pub use snapshot::{ForceSegment, ForceSnapshot, RenderSnapshotBuffer};
pub use telemetry::{
    TelemetryFrame, TelemetryLedger, TelemetrySink, LedgerEntry, WheelTelemetry,
    pose_columns, wheel_columns,
};

use thiserror::Error;

pub type VehicleResult<T> = Result<T, VehicleError>;

/// Failure kinds surfaced by vehicle construction and ticking.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum VehicleError {
    /// Malformed or missing geometry, wheel count mismatch, unknown model name.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The physics backend produced a non-finite state.
    #[error("backend state error for `{vehicle}`: {what}")]
    BackendState { vehicle: String, what: String },

    /// Programmer error: wrong torque count, double construction, out-of-order tick.
    #[error("contract violation: {0}")]
    ContractViolation(String),

    /// Sensor-local failure. Recorded by the owning vehicle, never propagated out of a tick.
    #[error("sensor `{sensor}` unavailable: {reason}")]
    Sensor { sensor: String, reason: String },
}

impl VehicleError {
    pub fn config(msg: impl Into<String>) -> Self { VehicleError::Configuration(msg.into()) }
    pub fn contract(msg: impl Into<String>) -> Self { VehicleError::ContractViolation(msg.into()) }

    pub fn is_fatal(&self) -> bool { !matches!(self, VehicleError::Sensor { .. }) }
}

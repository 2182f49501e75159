//! Common error types used across the workspace.
//!
//! Each layer converts into [`HubError`] via `#[from]`. The taxonomy is
//! deliberately small: validation failures are rejected at the API boundary
//! with nothing mutated, dispatch failures are recorded on the device belief
//! and never kill the process, and a missing sensor reading is *not* an
//! error (it is an `Option`).

use crate::device::DeviceKind;

/// Top-level error for hub operations.
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    /// Malformed or out-of-range input. Nothing was mutated.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A command or status query could not reach the actuator, timed out,
    /// or came back malformed. The device belief was marked stale.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// A request named a device kind outside the closed set.
    #[error(transparent)]
    UnknownDevice(#[from] UnknownDeviceKind),
}

/// Rejected input — settings patches, readings, or control commands.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} must not be negative")]
    Negative { field: &'static str },

    #[error("humidity must be between 0 and 100")]
    HumidityOutOfRange,

    #[error("brightness must be between 0 and 100")]
    BrightnessOutOfRange,

    #[error("target temperature must be between {min} and {max} °C")]
    TargetTemperatureOutOfRange { min: i32, max: i32 },

    #[error("telemetry line carries no recognised fields")]
    EmptyTelemetryLine,

    #[error("malformed control command: {0}")]
    MalformedCommand(String),
}

/// A failed dispatch to an actuator service.
///
/// Network errors, timeouts, bad status codes, and malformed response
/// bodies all collapse into this one shape — there is no partial success.
#[derive(Debug, Clone, thiserror::Error)]
#[error("dispatch to {device} failed: {reason}")]
pub struct DispatchError {
    pub device: DeviceKind,
    pub reason: String,
}

impl DispatchError {
    /// Build a dispatch error from any displayable cause.
    pub fn new(device: DeviceKind, reason: impl std::fmt::Display) -> Self {
        Self {
            device,
            reason: reason.to_string(),
        }
    }
}

/// A device kind string outside `{light, thermostat}`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown device kind: {0}")]
pub struct UnknownDeviceKind(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_render_dispatch_error_with_device_and_reason() {
        let err = DispatchError::new(DeviceKind::Light, "connection refused");
        assert_eq!(
            err.to_string(),
            "dispatch to light failed: connection refused"
        );
    }

    #[test]
    fn should_convert_validation_error_into_hub_error() {
        let err: HubError = ValidationError::BrightnessOutOfRange.into();
        assert!(matches!(err, HubError::Validation(_)));
        assert_eq!(err.to_string(), "brightness must be between 0 and 100");
    }

    #[test]
    fn should_convert_unknown_device_into_hub_error() {
        let err: HubError = UnknownDeviceKind("fridge".to_string()).into();
        assert_eq!(err.to_string(), "unknown device kind: fridge");
    }
}

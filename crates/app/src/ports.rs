//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside
//! world. They are defined here so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

use std::future::Future;

use hestia_domain::command::ControlCommand;
use hestia_domain::device::{DeviceKind, DeviceStatus};
use hestia_domain::error::HubError;

/// Talks to one actuator service over the network.
///
/// The three capabilities mirror the actuator API: status query, control
/// command, and toggle. Every call carries a bounded timeout inside the
/// implementation; any network error, timeout, or malformed response is a
/// uniform [`HubError::Dispatch`]. Implementations never retry — the
/// automation engine's periodic re-evaluation is the retry.
pub trait ActuatorClient {
    /// Which device this client drives.
    fn kind(&self) -> DeviceKind;

    /// Query the actuator's current state.
    fn status(&self) -> impl Future<Output = Result<DeviceStatus, HubError>> + Send;

    /// Apply a desired state. Success is an acknowledgement echoing the
    /// applied state.
    fn control(
        &self,
        command: &ControlCommand,
    ) -> impl Future<Output = Result<DeviceStatus, HubError>> + Send;

    /// Flip the device's primary state (light on/off; thermostat off/cool).
    fn toggle(&self) -> impl Future<Output = Result<DeviceStatus, HubError>> + Send;
}

impl<T: ActuatorClient + Send + Sync> ActuatorClient for std::sync::Arc<T> {
    fn kind(&self) -> DeviceKind {
        (**self).kind()
    }

    fn status(&self) -> impl Future<Output = Result<DeviceStatus, HubError>> + Send {
        (**self).status()
    }

    fn control(
        &self,
        command: &ControlCommand,
    ) -> impl Future<Output = Result<DeviceStatus, HubError>> + Send {
        (**self).control(command)
    }

    fn toggle(&self) -> impl Future<Output = Result<DeviceStatus, HubError>> + Send {
        (**self).toggle()
    }
}

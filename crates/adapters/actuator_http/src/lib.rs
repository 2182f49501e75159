//! HTTP clients for the actuator services.
//!
//! Each actuator (the smart light and the thermostat) runs as a separate
//! service exposing a small REST API. These clients implement the
//! [`ActuatorClient`](hestia_app::ports::ActuatorClient) port over that
//! API with a bounded per-request timeout and no retries of their own:
//! every transport failure, non-success status, or malformed body becomes
//! a [`DispatchError`](hestia_domain::error::DispatchError) and the
//! automation engine's next cycle is the retry.

pub mod light;
pub mod thermostat;
mod wire;

pub use light::HttpLightClient;
pub use thermostat::HttpThermostatClient;

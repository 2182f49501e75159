//! Client for the thermostat service.
//!
//! The thermostat API has no toggle endpoint, so toggling is a status
//! query followed by a control call flipping between off and cooling.

use std::fmt;
use std::time::Duration;

use reqwest::Client;

use hestia_app::ports::ActuatorClient;
use hestia_domain::command::ControlCommand;
use hestia_domain::device::{DeviceKind, DeviceStatus, ThermostatMode};
use hestia_domain::error::{DispatchError, HubError};

use crate::wire::{ThermostatControlBody, ThermostatStatusBody};

/// Drives the thermostat over its REST API.
#[derive(Debug, Clone)]
pub struct HttpThermostatClient {
    base_url: String,
    client: Client,
}

impl HttpThermostatClient {
    /// Build a client for the service at `base_url` with a per-request
    /// `timeout`.
    ///
    /// # Errors
    ///
    /// Returns the underlying builder error when the HTTP client cannot
    /// be constructed.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self { base_url, client })
    }

    fn error(reason: impl fmt::Display) -> HubError {
        HubError::Dispatch(DispatchError::new(DeviceKind::Thermostat, reason))
    }

    async fn decode(response: reqwest::Response) -> Result<DeviceStatus, HubError> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::error(format!("service answered {status}")));
        }
        let body: ThermostatStatusBody = response.json().await.map_err(Self::error)?;
        Ok(body.into_status())
    }

    async fn fetch_status(&self) -> Result<DeviceStatus, HubError> {
        let url = format!("{}/api/status", self.base_url);
        let response = self.client.get(&url).send().await.map_err(Self::error)?;
        Self::decode(response).await
    }

    async fn send_control(&self, body: &ThermostatControlBody) -> Result<DeviceStatus, HubError> {
        let url = format!("{}/api/control", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(Self::error)?;
        Self::decode(response).await
    }
}

impl ActuatorClient for HttpThermostatClient {
    fn kind(&self) -> DeviceKind {
        DeviceKind::Thermostat
    }

    async fn status(&self) -> Result<DeviceStatus, HubError> {
        self.fetch_status().await
    }

    async fn control(&self, command: &ControlCommand) -> Result<DeviceStatus, HubError> {
        let ControlCommand::Thermostat {
            mode,
            target_temperature,
            fan,
        } = command
        else {
            return Err(Self::error(format!(
                "cannot drive the thermostat with a {} command",
                command.kind()
            )));
        };
        let body = ThermostatControlBody {
            mode: *mode,
            target_temperature: *target_temperature,
            fan: *fan,
        };
        tracing::debug!(mode = %mode, target = ?target_temperature, "sending thermostat control");
        self.send_control(&body).await
    }

    async fn toggle(&self) -> Result<DeviceStatus, HubError> {
        let current = self.fetch_status().await?;
        let mode = match current {
            DeviceStatus::Thermostat {
                mode: ThermostatMode::Off,
                ..
            } => ThermostatMode::Cool,
            _ => ThermostatMode::Off,
        };
        self.send_control(&ThermostatControlBody {
            mode,
            target_temperature: None,
            fan: None,
        })
        .await
    }
}

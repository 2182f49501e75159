//! Client for the smart light service.

use std::fmt;
use std::time::Duration;

use reqwest::Client;

use hestia_app::ports::ActuatorClient;
use hestia_domain::command::ControlCommand;
use hestia_domain::device::{DeviceKind, DeviceStatus};
use hestia_domain::error::{DispatchError, HubError};

use crate::wire::{LightControlBody, LightStatusBody};

/// Drives the smart light over its REST API.
#[derive(Debug, Clone)]
pub struct HttpLightClient {
    base_url: String,
    client: Client,
}

impl HttpLightClient {
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
        HubError::Dispatch(DispatchError::new(DeviceKind::Light, reason))
    }

    async fn decode(response: reqwest::Response) -> Result<DeviceStatus, HubError> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::error(format!("service answered {status}")));
        }
        let body: LightStatusBody = response.json().await.map_err(Self::error)?;
        body.into_status().map_err(Self::error)
    }

    async fn send_control(&self, body: &LightControlBody) -> Result<DeviceStatus, HubError> {
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

impl ActuatorClient for HttpLightClient {
    fn kind(&self) -> DeviceKind {
        DeviceKind::Light
    }

    async fn status(&self) -> Result<DeviceStatus, HubError> {
        let url = format!("{}/api/status", self.base_url);
        let response = self.client.get(&url).send().await.map_err(Self::error)?;
        Self::decode(response).await
    }

    async fn control(&self, command: &ControlCommand) -> Result<DeviceStatus, HubError> {
        let ControlCommand::Light { power, brightness } = command else {
            return Err(Self::error(format!(
                "cannot drive the light with a {} command",
                command.kind()
            )));
        };
        let body = LightControlBody {
            state: if *power { "on" } else { "off" },
            brightness: *brightness,
        };
        tracing::debug!(state = body.state, brightness = ?body.brightness, "sending light control");
        self.send_control(&body).await
    }

    async fn toggle(&self) -> Result<DeviceStatus, HubError> {
        let url = format!("{}/api/toggle", self.base_url);
        let response = self.client.post(&url).send().await.map_err(Self::error)?;
        Self::decode(response).await
    }
}

//! JSON REST handlers for device belief, status, control, and toggle.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use hestia_app::ports::ActuatorClient;
use hestia_domain::command::ControlCommand;
use hestia_domain::device::{DeviceKind, DeviceState, FanMode, ThermostatMode};
use hestia_domain::error::{HubError, ValidationError};

use crate::error::ApiError;
use crate::state::AppState;

/// Control request body for the light.
#[derive(Deserialize)]
pub struct LightControlRequest {
    pub power: bool,
    #[serde(default)]
    pub brightness: Option<u8>,
}

/// Control request body for the thermostat.
#[derive(Deserialize)]
pub struct ThermostatControlRequest {
    pub mode: ThermostatMode,
    #[serde(default)]
    pub target_temperature: Option<f64>,
    #[serde(default)]
    pub fan: Option<FanMode>,
}

/// Body returned for a device the hub has never contacted.
#[derive(Serialize)]
pub struct UnknownBelief {
    pub kind: DeviceKind,
    pub confidence: &'static str,
}

/// Possible responses from the belief endpoint.
pub enum BeliefResponse {
    Known(Json<DeviceState>),
    Unknown(Json<UnknownBelief>),
}

impl IntoResponse for BeliefResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Known(json) => json.into_response(),
            Self::Unknown(json) => json.into_response(),
        }
    }
}

/// Possible responses from the status, control, and toggle endpoints.
pub enum StateResponse {
    Ok(Json<DeviceState>),
}

impl IntoResponse for StateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

fn parse_kind(raw: &str) -> Result<DeviceKind, ApiError> {
    DeviceKind::from_str(raw).map_err(|err| ApiError::from(HubError::UnknownDevice(err)))
}

fn parse_command(kind: DeviceKind, body: serde_json::Value) -> Result<ControlCommand, ApiError> {
    let command = match kind {
        DeviceKind::Light => serde_json::from_value::<LightControlRequest>(body)
            .map(|req| ControlCommand::Light {
                power: req.power,
                brightness: req.brightness,
            }),
        DeviceKind::Thermostat => serde_json::from_value::<ThermostatControlRequest>(body)
            .map(|req| ControlCommand::Thermostat {
                mode: req.mode,
                target_temperature: req.target_temperature,
                fan: req.fan,
            }),
    };
    command.map_err(|err| {
        ApiError::from(HubError::Validation(ValidationError::MalformedCommand(
            err.to_string(),
        )))
    })
}

/// `GET /api/devices/:kind`
///
/// Returns the cached belief without contacting the device.
pub async fn get<L, T>(
    State(state): State<AppState<L, T>>,
    Path(kind): Path<String>,
) -> Result<BeliefResponse, ApiError>
where
    L: ActuatorClient + Send + Sync + 'static,
    T: ActuatorClient + Send + Sync + 'static,
{
    let kind = parse_kind(&kind)?;
    match state.devices.device_state(kind) {
        Some(belief) => Ok(BeliefResponse::Known(Json(belief))),
        None => Ok(BeliefResponse::Unknown(Json(UnknownBelief {
            kind,
            confidence: "unknown",
        }))),
    }
}

/// `GET /api/devices/:kind/status`
///
/// Queries the actuator live and refreshes the belief.
pub async fn status<L, T>(
    State(state): State<AppState<L, T>>,
    Path(kind): Path<String>,
) -> Result<StateResponse, ApiError>
where
    L: ActuatorClient + Send + Sync + 'static,
    T: ActuatorClient + Send + Sync + 'static,
{
    let kind = parse_kind(&kind)?;
    let refreshed = state.devices.status(kind).await?;
    Ok(StateResponse::Ok(Json(refreshed)))
}

/// `POST /api/devices/:kind/control`
///
/// Manual control always dispatches, even when the belief already matches.
pub async fn control<L, T>(
    State(state): State<AppState<L, T>>,
    Path(kind): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<StateResponse, ApiError>
where
    L: ActuatorClient + Send + Sync + 'static,
    T: ActuatorClient + Send + Sync + 'static,
{
    let kind = parse_kind(&kind)?;
    let command = parse_command(kind, body)?;
    let applied = state.devices.control(&command).await?;
    Ok(StateResponse::Ok(Json(applied)))
}

/// `POST /api/devices/:kind/toggle`
pub async fn toggle<L, T>(
    State(state): State<AppState<L, T>>,
    Path(kind): Path<String>,
) -> Result<StateResponse, ApiError>
where
    L: ActuatorClient + Send + Sync + 'static,
    T: ActuatorClient + Send + Sync + 'static,
{
    let kind = parse_kind(&kind)?;
    let flipped = state.devices.toggle(kind).await?;
    Ok(StateResponse::Ok(Json(flipped)))
}

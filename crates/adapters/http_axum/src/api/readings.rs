//! JSON REST handlers for sensor readings and telemetry ingestion.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use hestia_app::ports::ActuatorClient;
use hestia_domain::reading::SensorReading;
use hestia_domain::telemetry::TelemetryFrame;
use hestia_domain::time::now;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for ingesting a complete reading.
#[derive(Deserialize)]
pub struct IngestReadingRequest {
    pub temperature: f64,
    pub humidity: f64,
    pub light_intensity: f64,
}

/// Possible responses from the latest-reading endpoint.
pub enum LatestResponse {
    Ok(Json<Option<SensorReading>>),
}

impl IntoResponse for LatestResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the ingest endpoint.
pub enum IngestResponse {
    Created(Json<SensorReading>),
}

impl IntoResponse for IngestResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the telemetry endpoint.
pub enum TelemetryResponse {
    /// The line was parsed; the body carries the merged reading, or `null`
    /// when fields are still missing for a first complete reading.
    Accepted(Json<Option<SensorReading>>),
}

impl IntoResponse for TelemetryResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Accepted(json) => (StatusCode::ACCEPTED, json).into_response(),
        }
    }
}

/// `GET /api/readings`
pub async fn latest<L, T>(State(state): State<AppState<L, T>>) -> Result<LatestResponse, ApiError>
where
    L: ActuatorClient + Send + Sync + 'static,
    T: ActuatorClient + Send + Sync + 'static,
{
    Ok(LatestResponse::Ok(Json(state.store.latest_reading())))
}

/// `POST /api/readings`
pub async fn ingest<L, T>(
    State(state): State<AppState<L, T>>,
    Json(req): Json<IngestReadingRequest>,
) -> Result<IngestResponse, ApiError>
where
    L: ActuatorClient + Send + Sync + 'static,
    T: ActuatorClient + Send + Sync + 'static,
{
    let reading = SensorReading::new(req.temperature, req.humidity, req.light_intensity, now())
        .map_err(hestia_domain::error::HubError::from)?;
    state.store.set_latest_reading(reading);
    tracing::debug!(
        temperature = reading.temperature,
        humidity = reading.humidity,
        light = reading.light_intensity,
        "reading ingested"
    );
    Ok(IngestResponse::Created(Json(reading)))
}

/// `POST /api/telemetry`
///
/// Accepts one raw sensor line (`T:24.50,H:51.20,L:33.00`) as plain text.
pub async fn ingest_telemetry<L, T>(
    State(state): State<AppState<L, T>>,
    line: String,
) -> Result<TelemetryResponse, ApiError>
where
    L: ActuatorClient + Send + Sync + 'static,
    T: ActuatorClient + Send + Sync + 'static,
{
    let frame: TelemetryFrame = line
        .parse()
        .map_err(hestia_domain::error::HubError::from)?;
    let merged = state.store.ingest_frame(&frame, now());
    Ok(TelemetryResponse::Accepted(Json(merged)))
}

//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod devices;
#[allow(clippy::missing_errors_doc)]
pub mod readings;
#[allow(clippy::missing_errors_doc)]
pub mod settings;

use axum::Router;
use axum::routing::{get, post};

use hestia_app::ports::ActuatorClient;

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<L, T>() -> Router<AppState<L, T>>
where
    L: ActuatorClient + Send + Sync + 'static,
    T: ActuatorClient + Send + Sync + 'static,
{
    Router::new()
        // Readings
        .route(
            "/readings",
            get(readings::latest::<L, T>).post(readings::ingest::<L, T>),
        )
        .route("/telemetry", post(readings::ingest_telemetry::<L, T>))
        // Settings
        .route(
            "/settings",
            get(settings::get::<L, T>).patch(settings::update::<L, T>),
        )
        // Devices
        .route("/devices/{kind}", get(devices::get::<L, T>))
        .route("/devices/{kind}/status", get(devices::status::<L, T>))
        .route("/devices/{kind}/control", post(devices::control::<L, T>))
        .route("/devices/{kind}/toggle", post(devices::toggle::<L, T>))
}

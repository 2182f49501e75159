//! JSON REST handlers for automation settings.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};

use hestia_app::ports::ActuatorClient;
use hestia_domain::settings::{AutomationSettings, SettingsPatch};

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the settings endpoints.
pub enum SettingsResponse {
    Ok(Json<AutomationSettings>),
}

impl IntoResponse for SettingsResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/settings`
pub async fn get<L, T>(State(state): State<AppState<L, T>>) -> Result<SettingsResponse, ApiError>
where
    L: ActuatorClient + Send + Sync + 'static,
    T: ActuatorClient + Send + Sync + 'static,
{
    Ok(SettingsResponse::Ok(Json(state.store.settings())))
}

/// `PATCH /api/settings`
///
/// Fields absent from the body keep their current value. An invalid patch
/// changes nothing. The next automation cycle picks the merged settings
/// up; there is no immediate re-evaluation.
pub async fn update<L, T>(
    State(state): State<AppState<L, T>>,
    Json(patch): Json<SettingsPatch>,
) -> Result<SettingsResponse, ApiError>
where
    L: ActuatorClient + Send + Sync + 'static,
    T: ActuatorClient + Send + Sync + 'static,
{
    let merged = state.store.update_settings(&patch)?;
    tracing::info!(
        light_threshold = merged.light_threshold,
        temperature_threshold = merged.temperature_threshold,
        auto_mode = merged.auto_mode,
        "settings updated"
    );
    Ok(SettingsResponse::Ok(Json(merged)))
}

//! End-to-end smoke tests for the full hestiad stack.
//!
//! Each test spins up the complete application (real state store, real
//! device service, real automation engine, real axum router) with
//! acknowledging in-memory actuator clients, and exercises the HTTP
//! layer via `tower::ServiceExt::oneshot` — no TCP port is bound.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use hestia_adapter_http_axum::router;
use hestia_adapter_http_axum::state::AppState;
use hestia_app::automation_engine::AutomationEngine;
use hestia_app::ports::ActuatorClient;
use hestia_app::services::device_service::DeviceService;
use hestia_app::state_store::StateStore;
use hestia_domain::command::ControlCommand;
use hestia_domain::device::{DeviceKind, DeviceStatus, FanMode, ThermostatMode};
use hestia_domain::error::HubError;

/// In-memory actuator that acknowledges every command.
struct AckClient {
    kind: DeviceKind,
}

impl AckClient {
    fn idle_status(&self) -> DeviceStatus {
        match self.kind {
            DeviceKind::Light => DeviceStatus::Light {
                power: false,
                brightness: 0,
            },
            DeviceKind::Thermostat => DeviceStatus::Thermostat {
                mode: ThermostatMode::Off,
                target_temperature: 22.0,
                fan: FanMode::Auto,
            },
        }
    }
}

impl ActuatorClient for AckClient {
    fn kind(&self) -> DeviceKind {
        self.kind
    }

    async fn status(&self) -> Result<DeviceStatus, HubError> {
        Ok(self.idle_status())
    }

    async fn control(&self, command: &ControlCommand) -> Result<DeviceStatus, HubError> {
        Ok(command.optimistic_status(None))
    }

    async fn toggle(&self) -> Result<DeviceStatus, HubError> {
        Ok(self.idle_status())
    }
}

struct Stack {
    app: axum::Router,
    engine: AutomationEngine<AckClient, AckClient>,
    store: Arc<StateStore>,
}

/// Build a fully-wired stack backed by acknowledging actuator clients.
fn stack() -> Stack {
    let store = Arc::new(StateStore::new());
    let devices = Arc::new(DeviceService::new(
        Arc::clone(&store),
        AckClient {
            kind: DeviceKind::Light,
        },
        AckClient {
            kind: DeviceKind::Thermostat,
        },
    ));
    let engine = AutomationEngine::new(
        Arc::clone(&store),
        Arc::clone(&devices),
        Duration::from_secs(10),
    );
    let app = router::build(AppState::new(Arc::clone(&store), devices));
    Stack { app, engine, store }
}

fn app() -> axum::Router {
    stack().app
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn patch_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("PATCH")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(resp: axum::response::Response) -> serde_json::Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let resp = app().oneshot(get("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Readings and telemetry
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_roundtrip_reading_through_the_api() {
    let app = app();

    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/readings",
            serde_json::json!({
                "temperature": 24.5,
                "humidity": 51.2,
                "light_intensity": 33.0,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = app.oneshot(get("/api/readings")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["temperature"], 24.5);
    assert_eq!(body["humidity"], 51.2);
    assert_eq!(body["light_intensity"], 33.0);
    assert!(body["recorded_at"].is_string());
}

#[tokio::test]
async fn should_merge_partial_telemetry_onto_previous_reading() {
    let app = app();

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/telemetry")
                .body(Body::from("T:24.50,H:51.20,L:33.00"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    // A later line carrying only light keeps the other fields.
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/telemetry")
                .body(Body::from("L:5.00"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    let body = json_body(app.oneshot(get("/api/readings")).await.unwrap()).await;
    assert_eq!(body["temperature"], 24.5);
    assert_eq!(body["light_intensity"], 5.0);
}

#[tokio::test]
async fn should_not_store_incomplete_first_telemetry() {
    let app = app();

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/telemetry")
                .body(Body::from("T:24.50"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    // No previous reading to fill the gaps, so nothing was stored.
    let body = json_body(app.oneshot(get("/api/readings")).await.unwrap()).await;
    assert_eq!(body, serde_json::Value::Null);
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_serve_default_settings() {
    let body = json_body(app().oneshot(get("/api/settings")).await.unwrap()).await;
    assert_eq!(body["light_threshold"], 50.0);
    assert_eq!(body["temperature_threshold"], 24.0);
    assert_eq!(body["auto_mode"], true);
}

#[tokio::test]
async fn should_patch_settings_partially() {
    let app = app();

    let resp = app
        .clone()
        .oneshot(patch_json(
            "/api/settings",
            serde_json::json!({"temperature_threshold": 26.5}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(app.oneshot(get("/api/settings")).await.unwrap()).await;
    assert_eq!(body["temperature_threshold"], 26.5);
    assert_eq!(body["light_threshold"], 50.0);
}

#[tokio::test]
async fn should_reject_invalid_settings_patch() {
    let resp = app()
        .oneshot(patch_json(
            "/api/settings",
            serde_json::json!({"light_threshold": -10.0}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Devices
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_report_unknown_belief_for_uncontacted_device() {
    let body = json_body(app().oneshot(get("/api/devices/thermostat")).await.unwrap()).await;
    assert_eq!(body["kind"], "thermostat");
    assert_eq!(body["confidence"], "unknown");
}

#[tokio::test]
async fn should_return_not_found_for_unknown_device_kind() {
    let resp = app().oneshot(get("/api/devices/toaster")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_control_device_and_update_belief() {
    let app = app();

    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/devices/thermostat/control",
            serde_json::json!({"mode": "cool", "target_temperature": 23.0}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["confidence"], "confirmed");
    assert_eq!(body["status"]["mode"], "cool");
    assert_eq!(body["status"]["target_temperature"], 23.0);

    let body = json_body(app.oneshot(get("/api/devices/thermostat")).await.unwrap()).await;
    assert_eq!(body["confidence"], "confirmed");
    assert_eq!(body["status"]["mode"], "cool");
}

#[tokio::test]
async fn should_reject_out_of_range_target_temperature() {
    let resp = app()
        .oneshot(post_json(
            "/api/devices/thermostat/control",
            serde_json::json!({"mode": "cool", "target_temperature": 5.0}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_toggle_light() {
    let resp = app()
        .oneshot(post_json("/api/devices/light/toggle", serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["status"]["device"], "light");
}

// ---------------------------------------------------------------------------
// Automation engine against the live stack
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_expose_automation_results_through_the_api() {
    let stack = stack();

    // Dark and hot: both rules should fire.
    let resp = stack
        .app
        .clone()
        .oneshot(post_json(
            "/api/readings",
            serde_json::json!({
                "temperature": 30.0,
                "humidity": 40.0,
                "light_intensity": 10.0,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let report = stack.engine.run_cycle().await;
    assert!(report.evaluated);

    let body = json_body(
        stack
            .app
            .clone()
            .oneshot(get("/api/devices/light"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body["confidence"], "confirmed");
    assert_eq!(body["status"]["power"], true);
    assert_eq!(body["status"]["brightness"], 80);

    let body = json_body(stack.app.oneshot(get("/api/devices/thermostat")).await.unwrap()).await;
    assert_eq!(body["status"]["mode"], "cool");
    assert_eq!(body["status"]["target_temperature"], 23.0);
}

#[tokio::test]
async fn should_skip_automation_when_disabled_through_the_api() {
    let stack = stack();

    let resp = stack
        .app
        .clone()
        .oneshot(patch_json(
            "/api/settings",
            serde_json::json!({"auto_mode": false}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    stack.store.set_latest_reading(
        hestia_domain::reading::SensorReading::new(
            30.0,
            40.0,
            10.0,
            hestia_domain::time::now(),
        )
        .unwrap(),
    );

    let report = stack.engine.run_cycle().await;
    assert!(!report.evaluated);

    let body = json_body(stack.app.oneshot(get("/api/devices/light")).await.unwrap()).await;
    assert_eq!(body["confidence"], "unknown");
}

//! # hestiad — hestia hub daemon
//!
//! Composition root that wires the actuator clients, shared state,
//! automation engine, and HTTP API together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (TOML file plus environment overrides)
//! - Initialize structured logging
//! - Construct the HTTP actuator clients (adapters)
//! - Construct the state store and device service
//! - Spawn the automation engine as a background task
//! - Build the axum router, bind a TCP port, and serve
//! - Handle graceful shutdown (SIGINT), stopping the engine last
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use hestia_adapter_actuator_http::{HttpLightClient, HttpThermostatClient};
use hestia_adapter_http_axum::state::AppState;
use hestia_app::automation_engine::AutomationEngine;
use hestia_app::services::device_service::DeviceService;
use hestia_app::state_store::StateStore;

mod config;

use config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Actuator clients
    let timeout = config.request_timeout();
    let light = HttpLightClient::new(config.devices.light_url.clone(), timeout)?;
    let thermostat = HttpThermostatClient::new(config.devices.thermostat_url.clone(), timeout)?;

    // Shared state and services
    let store = Arc::new(StateStore::new());
    let devices = Arc::new(DeviceService::new(Arc::clone(&store), light, thermostat));

    // Automation engine
    let engine = AutomationEngine::new(
        Arc::clone(&store),
        Arc::clone(&devices),
        config.automation_interval(),
    );
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let engine_handle = tokio::spawn(engine.run(shutdown_rx));

    // HTTP
    let state = AppState::new(store, devices);
    let app = hestia_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "hestiad listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped, shutting down automation engine");
    let _ = shutdown_tx.send(true);
    let _ = engine_handle.await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}

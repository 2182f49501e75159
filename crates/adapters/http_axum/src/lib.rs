//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! Serves the hub's JSON API: sensor readings and raw telemetry ingestion,
//! automation settings, and per-device belief, status, control, and toggle
//! endpoints. Maps HTTP requests into application service calls and
//! application results back into HTTP responses; never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;

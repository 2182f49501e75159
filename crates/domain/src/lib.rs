//! # hestia-domain
//!
//! Pure domain model for the hestia home automation hub.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps
//! - Define **`SensorReading`** (the latest environmental telemetry) and
//!   **`TelemetryFrame`** (a possibly-partial sensor payload)
//! - Define **`AutomationSettings`** (user-configured thresholds) and the
//!   partial-update **`SettingsPatch`**
//! - Define **`DeviceState`** (the hub's belief about an actuator) and the
//!   closed set of **`DeviceKind`** variants
//! - Define **`ControlCommand`** (idempotent desired-state commands)
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod command;
pub mod device;
pub mod error;
pub mod reading;
pub mod settings;
pub mod telemetry;
pub mod time;

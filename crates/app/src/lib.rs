//! # hestia-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Own the **`StateStore`**: the single concurrency-safe holder of the
//!   latest reading, automation settings, and device beliefs
//! - Define the **`ActuatorClient`** port that device adapters implement
//! - Provide the **`DeviceService`**: the one dispatch path shared by
//!   manual API control and the automation engine
//! - Run the **`AutomationEngine`**: the periodic threshold-evaluation
//!   cycle
//!
//! ## Dependency rule
//! Depends on `hestia-domain` only (plus `tokio` for time and channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the
//! reverse.

pub mod automation_engine;
pub mod ports;
pub mod services;
pub mod state_store;

//! Shared application state for axum handlers.

use std::sync::Arc;

use hestia_app::ports::ActuatorClient;
use hestia_app::services::device_service::DeviceService;
use hestia_app::state_store::StateStore;

/// Application state shared across all axum handlers.
///
/// Generic over the actuator client types to avoid dynamic dispatch.
/// `Clone` is implemented manually so the client types themselves do not
/// need to be `Clone` — only the `Arc` wrappers are cloned.
pub struct AppState<L, T> {
    /// Shared hub state: latest reading, settings, device beliefs.
    pub store: Arc<StateStore>,
    /// Device command service.
    pub devices: Arc<DeviceService<L, T>>,
}

impl<L, T> Clone for AppState<L, T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            devices: Arc::clone(&self.devices),
        }
    }
}

impl<L, T> AppState<L, T>
where
    L: ActuatorClient + Send + Sync + 'static,
    T: ActuatorClient + Send + Sync + 'static,
{
    /// Create state from pre-wrapped `Arc`s.
    ///
    /// The store and service are shared with the automation engine, so
    /// they arrive already wrapped.
    pub fn new(store: Arc<StateStore>, devices: Arc<DeviceService<L, T>>) -> Self {
        Self { store, devices }
    }
}

//! State store — the single authoritative holder of shared hub state.
//!
//! The automation engine's background cycle and the API's request handlers
//! both go through this object; nothing else holds mutable state. A single
//! coarse `RwLock` guards a small inner struct — contention is low and no
//! operation here ever touches the network, so readers and writers never
//! block on IO and never observe a torn value.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use hestia_domain::device::{DeviceKind, DeviceState};
use hestia_domain::error::HubError;
use hestia_domain::reading::SensorReading;
use hestia_domain::settings::{AutomationSettings, SettingsPatch};
use hestia_domain::telemetry::TelemetryFrame;
use hestia_domain::time::Timestamp;

#[derive(Debug, Default)]
struct Inner {
    latest_reading: Option<SensorReading>,
    settings: AutomationSettings,
    light: Option<DeviceState>,
    thermostat: Option<DeviceState>,
}

/// Concurrency-safe store for the latest reading, settings, and device
/// beliefs. Cheap to share behind an `Arc`.
#[derive(Debug, Default)]
pub struct StateStore {
    inner: RwLock<Inner>,
}

impl StateStore {
    /// Create a store with default settings and no reading or beliefs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// The most recent complete reading, if any telemetry has arrived.
    #[must_use]
    pub fn latest_reading(&self) -> Option<SensorReading> {
        self.read().latest_reading
    }

    /// Replace the latest reading wholesale.
    pub fn set_latest_reading(&self, reading: SensorReading) {
        self.write().latest_reading = Some(reading);
    }

    /// Merge a possibly-partial telemetry frame onto the previous reading.
    ///
    /// Returns the reading that became latest, or `None` when a field has
    /// never been observed yet (the store is left unchanged in that case).
    pub fn ingest_frame(
        &self,
        frame: &TelemetryFrame,
        recorded_at: Timestamp,
    ) -> Option<SensorReading> {
        let mut inner = self.write();
        let merged = frame.complete(inner.latest_reading.as_ref(), recorded_at)?;
        inner.latest_reading = Some(merged);
        Some(merged)
    }

    /// Current automation settings.
    #[must_use]
    pub fn settings(&self) -> AutomationSettings {
        self.read().settings
    }

    /// Apply a partial settings update atomically.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Validation`] when the patch carries an invalid
    /// value; settings are left unchanged.
    pub fn update_settings(&self, patch: &SettingsPatch) -> Result<AutomationSettings, HubError> {
        let mut inner = self.write();
        let merged = inner.settings.apply(patch)?;
        inner.settings = merged;
        Ok(merged)
    }

    /// The hub's belief about one device; `None` means never contacted.
    #[must_use]
    pub fn device_state(&self, kind: DeviceKind) -> Option<DeviceState> {
        let inner = self.read();
        match kind {
            DeviceKind::Light => inner.light.clone(),
            DeviceKind::Thermostat => inner.thermostat.clone(),
        }
    }

    /// Record a new belief for the device named by `state.kind`.
    pub fn set_device_state(&self, state: DeviceState) {
        let mut inner = self.write();
        match state.kind {
            DeviceKind::Light => inner.light = Some(state),
            DeviceKind::Thermostat => inner.thermostat = Some(state),
        }
    }

    /// A consistent `(reading, settings)` pair taken under one lock
    /// acquisition — the snapshot an automation cycle starts from.
    #[must_use]
    pub fn snapshot(&self) -> (Option<SensorReading>, AutomationSettings) {
        let inner = self.read();
        (inner.latest_reading, inner.settings)
    }
}

//! Device service — the single dispatch path to the actuators.
//!
//! Manual API commands and the automation engine both go through this
//! service, so the recorded [`DeviceState`] always reflects the most
//! recent command regardless of origin. Every dispatch follows the same
//! belief protocol: optimistic `Pending` before the call, `Confirmed` on
//! an acknowledgement, `Stale` (with the error retained) on failure.
//!
//! The store lock is never held across a network call — belief reads and
//! writes bracket the dispatch.

use std::sync::Arc;

use hestia_domain::command::ControlCommand;
use hestia_domain::device::{DeviceKind, DeviceState};
use hestia_domain::error::HubError;
use hestia_domain::time::now;

use crate::ports::ActuatorClient;
use crate::state_store::StateStore;

/// What a reconciling dispatch ended up doing.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// The confirmed belief already matched; no network call was made.
    AlreadyApplied,
    /// A command went out and the actuator acknowledged it.
    Dispatched(DeviceState),
}

/// Application service owning the light and thermostat clients.
pub struct DeviceService<L, T> {
    store: Arc<StateStore>,
    light: L,
    thermostat: T,
}

impl<L, T> DeviceService<L, T>
where
    L: ActuatorClient + Send + Sync,
    T: ActuatorClient + Send + Sync,
{
    /// Create a service backed by the given store and clients.
    pub fn new(store: Arc<StateStore>, light: L, thermostat: T) -> Self {
        Self {
            store,
            light,
            thermostat,
        }
    }

    /// The hub's current belief, without touching the network.
    #[must_use]
    pub fn device_state(&self, kind: DeviceKind) -> Option<DeviceState> {
        self.store.device_state(kind)
    }

    /// Query the actuator's live status and refresh the belief.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Dispatch`] when the actuator is unreachable or
    /// answers malformed; an existing belief is marked stale.
    #[tracing::instrument(skip(self))]
    pub async fn status(&self, kind: DeviceKind) -> Result<DeviceState, HubError> {
        let result = match kind {
            DeviceKind::Light => self.light.status().await,
            DeviceKind::Thermostat => self.thermostat.status().await,
        };
        match result {
            Ok(status) => {
                let state = DeviceState::confirmed(status, now());
                self.store.set_device_state(state.clone());
                Ok(state)
            }
            Err(err) => {
                self.flag_stale(kind, &err);
                Err(err)
            }
        }
    }

    /// Reconcile the device toward a desired state — the automation
    /// engine's path. Skips the network entirely when the confirmed belief
    /// already satisfies the command; an unknown, pending, or stale belief
    /// always dispatches.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Validation`] for an out-of-range command, or
    /// [`HubError::Dispatch`] on failure (belief marked stale).
    #[tracing::instrument(skip(self, command), fields(device = %command.kind()))]
    pub async fn reconcile(&self, command: &ControlCommand) -> Result<DispatchOutcome, HubError> {
        command.validate()?;
        if let Some(state) = self.store.device_state(command.kind()) {
            if state.satisfies(command) {
                tracing::debug!("belief already satisfies desired state, skipping dispatch");
                return Ok(DispatchOutcome::AlreadyApplied);
            }
        }
        self.dispatch(command).await.map(DispatchOutcome::Dispatched)
    }

    /// Apply a command unconditionally — the manual control path. Always
    /// dispatches, even when the belief already matches.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Validation`] for an out-of-range command, or
    /// [`HubError::Dispatch`] on failure; the stale belief is recorded
    /// before the error is surfaced.
    #[tracing::instrument(skip(self, command), fields(device = %command.kind()))]
    pub async fn control(&self, command: &ControlCommand) -> Result<DeviceState, HubError> {
        command.validate()?;
        self.dispatch(command).await
    }

    /// Flip the device's primary state through its toggle operation.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Dispatch`] when the actuator is unreachable.
    #[tracing::instrument(skip(self))]
    pub async fn toggle(&self, kind: DeviceKind) -> Result<DeviceState, HubError> {
        let result = match kind {
            DeviceKind::Light => self.light.toggle().await,
            DeviceKind::Thermostat => self.thermostat.toggle().await,
        };
        match result {
            Ok(status) => {
                let state = DeviceState::confirmed(status, now());
                self.store.set_device_state(state.clone());
                Ok(state)
            }
            Err(err) => {
                self.flag_stale(kind, &err);
                Err(err)
            }
        }
    }

    /// Send a command and walk the belief through pending → confirmed or
    /// pending → stale.
    async fn dispatch(&self, command: &ControlCommand) -> Result<DeviceState, HubError> {
        let kind = command.kind();
        let previous = self.store.device_state(kind);
        let optimistic = command.optimistic_status(previous.as_ref().map(|s| &s.status));
        self.store
            .set_device_state(DeviceState::pending(optimistic, now()));

        let result = match kind {
            DeviceKind::Light => self.light.control(command).await,
            DeviceKind::Thermostat => self.thermostat.control(command).await,
        };
        match result {
            Ok(applied) => {
                let state = DeviceState::confirmed(applied, now());
                self.store.set_device_state(state.clone());
                Ok(state)
            }
            Err(err) => {
                self.flag_stale(kind, &err);
                Err(err)
            }
        }
    }

    /// Mark the existing belief stale. A device that has never been
    /// contacted stays unknown — there is no status to retain.
    fn flag_stale(&self, kind: DeviceKind, err: &HubError) {
        if let Some(mut state) = self.store.device_state(kind) {
            state.mark_stale(err.to_string(), now());
            self.store.set_device_state(state);
        }
    }
}

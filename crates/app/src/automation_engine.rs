//! Automation engine — the periodic threshold-evaluation cycle.
//!
//! Every `interval` the engine snapshots the latest reading and settings
//! together, evaluates the two rules independently, and reconciles each
//! device toward its desired state through the shared dispatch path. A
//! failed dispatch marks the device stale and is retried naturally by the
//! next cycle — there is no separate retry scheduler.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use hestia_domain::command::{
    ControlCommand, TARGET_TEMPERATURE_MAX, TARGET_TEMPERATURE_MIN,
};
use hestia_domain::device::ThermostatMode;

use crate::ports::ActuatorClient;
use crate::services::device_service::{DeviceService, DispatchOutcome};
use crate::state_store::StateStore;

/// Brightness applied when automation turns the light on.
const AUTO_BRIGHTNESS: u8 = 80;

/// What one rule did during a cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutcome {
    /// A command was dispatched and acknowledged.
    Dispatched,
    /// The confirmed belief already matched; nothing was sent.
    AlreadyApplied,
    /// Dispatch failed; the device is stale until a later cycle succeeds.
    Failed(String),
}

/// Summary of one automation cycle, mostly for logs and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    /// False when automation was disabled or no reading existed yet.
    pub evaluated: bool,
    pub light: Option<RuleOutcome>,
    pub thermostat: Option<RuleOutcome>,
}

impl CycleReport {
    fn skipped() -> Self {
        Self {
            evaluated: false,
            light: None,
            thermostat: None,
        }
    }
}

/// Periodic rule evaluator driving the two actuators.
pub struct AutomationEngine<L, T> {
    store: Arc<StateStore>,
    devices: Arc<DeviceService<L, T>>,
    interval: Duration,
}

impl<L, T> AutomationEngine<L, T>
where
    L: ActuatorClient + Send + Sync,
    T: ActuatorClient + Send + Sync,
{
    /// Create an engine evaluating every `interval`.
    pub fn new(
        store: Arc<StateStore>,
        devices: Arc<DeviceService<L, T>>,
        interval: Duration,
    ) -> Self {
        Self {
            store,
            devices,
            interval,
        }
    }

    /// Run cycles until `shutdown` flips to `true`. Never terminates on a
    /// dispatch error — failures are recorded and retried next cycle.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let report = self.run_cycle().await;
                    tracing::debug!(?report, "automation cycle finished");
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::info!("automation engine stopping");
                        return;
                    }
                }
            }
        }
    }

    /// Execute a single evaluation cycle.
    ///
    /// The `(reading, settings)` snapshot is taken once at cycle start, so
    /// the whole cycle is internally consistent even while API writes land
    /// concurrently. The two rules are independent: a failure on one never
    /// prevents the other from being evaluated.
    pub async fn run_cycle(&self) -> CycleReport {
        let (reading, settings) = self.store.snapshot();
        if !settings.auto_mode {
            tracing::trace!("automation disabled, skipping cycle");
            return CycleReport::skipped();
        }
        let Some(reading) = reading else {
            tracing::trace!("no telemetry yet, skipping cycle");
            return CycleReport::skipped();
        };

        let light_command = if reading.light_intensity < settings.light_threshold {
            ControlCommand::Light {
                power: true,
                brightness: Some(AUTO_BRIGHTNESS),
            }
        } else {
            ControlCommand::Light {
                power: false,
                brightness: None,
            }
        };

        let thermostat_command = if reading.temperature > settings.temperature_threshold {
            // Cool one degree below the threshold, kept inside the
            // actuator's accepted range.
            let target = (settings.temperature_threshold - 1.0)
                .clamp(TARGET_TEMPERATURE_MIN, TARGET_TEMPERATURE_MAX);
            ControlCommand::Thermostat {
                mode: ThermostatMode::Cool,
                target_temperature: Some(target),
                fan: None,
            }
        } else {
            ControlCommand::Thermostat {
                mode: ThermostatMode::Off,
                target_temperature: None,
                fan: None,
            }
        };

        let light = self.apply_rule(&light_command).await;
        let thermostat = self.apply_rule(&thermostat_command).await;

        CycleReport {
            evaluated: true,
            light: Some(light),
            thermostat: Some(thermostat),
        }
    }

    async fn apply_rule(&self, command: &ControlCommand) -> RuleOutcome {
        match self.devices.reconcile(command).await {
            Ok(DispatchOutcome::Dispatched(state)) => {
                tracing::info!(device = %state.kind, status = ?state.status, "dispatched automation command");
                RuleOutcome::Dispatched
            }
            Ok(DispatchOutcome::AlreadyApplied) => RuleOutcome::AlreadyApplied,
            Err(err) => {
                tracing::warn!(device = %command.kind(), error = %err, "dispatch failed, retrying next cycle");
                RuleOutcome::Failed(err.to_string())
            }
        }
    }
}

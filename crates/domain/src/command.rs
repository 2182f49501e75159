//! Control commands — idempotent desired-state values sent to actuators.
//!
//! A command carries only the fields the caller wants to change; sending
//! the same desired state twice is a no-op on the receiving side. The hub
//! additionally avoids redundant dispatch when its confirmed belief already
//! matches (see [`DeviceState::satisfies`](crate::device::DeviceState::satisfies)).

use serde::{Deserialize, Serialize};

use crate::device::{DeviceKind, DeviceStatus, FanMode, ThermostatMode};
use crate::error::ValidationError;

/// Lowest accepted thermostat target, matching the actuator's own range.
pub const TARGET_TEMPERATURE_MIN: f64 = 10.0;
/// Highest accepted thermostat target, matching the actuator's own range.
pub const TARGET_TEMPERATURE_MAX: f64 = 35.0;

/// Target temperature the thermostat falls back to when a command never
/// specified one and there is no prior belief.
pub const DEFAULT_TARGET_TEMPERATURE: f64 = 22.0;

/// A desired-state command for one actuator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "device", rename_all = "lowercase")]
pub enum ControlCommand {
    Light {
        power: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        brightness: Option<u8>,
    },
    Thermostat {
        mode: ThermostatMode,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_temperature: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fan: Option<FanMode>,
    },
}

impl ControlCommand {
    /// Which device this command targets.
    #[must_use]
    pub fn kind(&self) -> DeviceKind {
        match self {
            Self::Light { .. } => DeviceKind::Light,
            Self::Thermostat { .. } => DeviceKind::Thermostat,
        }
    }

    /// Check range invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::BrightnessOutOfRange`] for brightness
    /// above 100, [`ValidationError::NotFinite`] or
    /// [`ValidationError::TargetTemperatureOutOfRange`] for a target outside
    /// the actuator's accepted 10–35 °C range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Light { brightness, .. } => {
                if brightness.is_some_and(|b| b > 100) {
                    return Err(ValidationError::BrightnessOutOfRange);
                }
            }
            Self::Thermostat {
                target_temperature, ..
            } => {
                if let Some(target) = target_temperature {
                    if !target.is_finite() {
                        return Err(ValidationError::NotFinite {
                            field: "target_temperature",
                        });
                    }
                    if !(TARGET_TEMPERATURE_MIN..=TARGET_TEMPERATURE_MAX).contains(target) {
                        return Err(ValidationError::TargetTemperatureOutOfRange {
                            min: 10,
                            max: 35,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// The status the hub assumes right after dispatching this command,
    /// before the actuator answers. Unspecified fields fall back to the
    /// previous belief, then to defaults.
    #[must_use]
    pub fn optimistic_status(&self, previous: Option<&DeviceStatus>) -> DeviceStatus {
        match *self {
            Self::Light { power, brightness } => {
                let prior = match previous {
                    Some(DeviceStatus::Light { brightness, .. }) => Some(*brightness),
                    _ => None,
                };
                DeviceStatus::Light {
                    power,
                    brightness: brightness.or(prior).unwrap_or(0),
                }
            }
            Self::Thermostat {
                mode,
                target_temperature,
                fan,
            } => {
                let (prior_target, prior_fan) = match previous {
                    Some(DeviceStatus::Thermostat {
                        target_temperature,
                        fan,
                        ..
                    }) => (Some(*target_temperature), Some(*fan)),
                    _ => (None, None),
                };
                DeviceStatus::Thermostat {
                    mode,
                    target_temperature: target_temperature
                        .or(prior_target)
                        .unwrap_or(DEFAULT_TARGET_TEMPERATURE),
                    fan: fan.or(prior_fan).unwrap_or(FanMode::Auto),
                }
            }
        }
    }
}

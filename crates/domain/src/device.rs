//! Device state — the hub's cached belief about each actuator.
//!
//! The hub is the single writer of its own belief; the actuator services
//! own the actual device state. Belief confidence only moves forward:
//! a dispatched command makes it [`SyncConfidence::Pending`], an
//! acknowledgement makes it [`SyncConfidence::Confirmed`], a failure makes
//! it [`SyncConfidence::Stale`] — it never reverts to unknown.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::command::ControlCommand;
use crate::error::UnknownDeviceKind;
use crate::time::Timestamp;

/// The closed set of actuators the hub knows how to drive.
///
/// Adding a new device kind is a local extension: a new variant here, a new
/// status/command variant, and a client implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Light,
    Thermostat,
}

impl DeviceKind {
    /// Stable lowercase name, matching the API path segment.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Thermostat => "thermostat",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceKind {
    type Err = UnknownDeviceKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "thermostat" => Ok(Self::Thermostat),
            other => Err(UnknownDeviceKind(other.to_string())),
        }
    }
}

/// Thermostat operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThermostatMode {
    Off,
    Heat,
    Cool,
    Auto,
}

impl fmt::Display for ThermostatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Off => "off",
            Self::Heat => "heat",
            Self::Cool => "cool",
            Self::Auto => "auto",
        };
        f.write_str(name)
    }
}

/// Thermostat fan setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FanMode {
    Auto,
    On,
}

/// Applied (or optimistically assumed) state of one actuator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "device", rename_all = "lowercase")]
pub enum DeviceStatus {
    Light {
        power: bool,
        /// 0–100.
        brightness: u8,
    },
    Thermostat {
        mode: ThermostatMode,
        target_temperature: f64,
        fan: FanMode,
    },
}

impl DeviceStatus {
    /// Which device this status belongs to.
    #[must_use]
    pub fn kind(&self) -> DeviceKind {
        match self {
            Self::Light { .. } => DeviceKind::Light,
            Self::Thermostat { .. } => DeviceKind::Thermostat,
        }
    }

    /// Whether this applied state already satisfies a desired command.
    ///
    /// Fields the command leaves unspecified (e.g. brightness on a plain
    /// power-off) match anything.
    #[must_use]
    pub fn matches(&self, command: &ControlCommand) -> bool {
        match (self, command) {
            (
                Self::Light { power, brightness },
                ControlCommand::Light {
                    power: want_power,
                    brightness: want_brightness,
                },
            ) => power == want_power && want_brightness.is_none_or(|b| b == *brightness),
            (
                Self::Thermostat {
                    mode,
                    target_temperature,
                    fan,
                },
                ControlCommand::Thermostat {
                    mode: want_mode,
                    target_temperature: want_target,
                    fan: want_fan,
                },
            ) => {
                mode == want_mode
                    && want_target.is_none_or(|t| (t - target_temperature).abs() < f64::EPSILON)
                    && want_fan.is_none_or(|f| f == *fan)
            }
            _ => false,
        }
    }
}

/// How much the hub trusts its belief about a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncConfidence {
    /// A command is in flight; the status is the optimistic desired state.
    Pending,
    /// The actuator acknowledged this exact status.
    Confirmed,
    /// The last contact failed; the status is retained but uncertain.
    Stale,
}

/// The hub's belief about one actuator's current configuration.
///
/// Created lazily on first contact with the device, then updated on every
/// dispatch and response. This is a cache that can go stale, never a lock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceState {
    pub kind: DeviceKind,
    pub status: DeviceStatus,
    pub confidence: SyncConfidence,
    pub last_synced_at: Timestamp,
    pub last_error: Option<String>,
}

impl DeviceState {
    /// Belief right after dispatching a command, before the acknowledgement.
    #[must_use]
    pub fn pending(status: DeviceStatus, at: Timestamp) -> Self {
        Self {
            kind: status.kind(),
            status,
            confidence: SyncConfidence::Pending,
            last_synced_at: at,
            last_error: None,
        }
    }

    /// Belief backed by an actuator acknowledgement.
    #[must_use]
    pub fn confirmed(status: DeviceStatus, at: Timestamp) -> Self {
        Self {
            kind: status.kind(),
            status,
            confidence: SyncConfidence::Confirmed,
            last_synced_at: at,
            last_error: None,
        }
    }

    /// Record an acknowledged status, clearing any previous error.
    pub fn confirm(&mut self, status: DeviceStatus, at: Timestamp) {
        self.status = status;
        self.confidence = SyncConfidence::Confirmed;
        self.last_synced_at = at;
        self.last_error = None;
    }

    /// Record a failed contact. The status is retained but flagged.
    pub fn mark_stale(&mut self, reason: impl Into<String>, at: Timestamp) {
        self.confidence = SyncConfidence::Stale;
        self.last_synced_at = at;
        self.last_error = Some(reason.into());
    }

    /// Whether dispatching `command` would be redundant: the belief is
    /// confirmed and already matches the desired state.
    #[must_use]
    pub fn satisfies(&self, command: &ControlCommand) -> bool {
        self.confidence == SyncConfidence::Confirmed && self.status.matches(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::now;

    fn light_on() -> DeviceStatus {
        DeviceStatus::Light {
            power: true,
            brightness: 80,
        }
    }

    #[test]
    fn should_roundtrip_device_kind_through_str() {
        for kind in [DeviceKind::Light, DeviceKind::Thermostat] {
            let parsed: DeviceKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn should_reject_unknown_device_kind() {
        let result = DeviceKind::from_str("fridge");
        assert_eq!(result, Err(UnknownDeviceKind("fridge".to_string())));
    }

    #[test]
    fn should_match_light_command_ignoring_unspecified_brightness() {
        let status = light_on();
        let command = ControlCommand::Light {
            power: true,
            brightness: None,
        };
        assert!(status.matches(&command));
    }

    #[test]
    fn should_not_match_light_command_with_different_brightness() {
        let status = light_on();
        let command = ControlCommand::Light {
            power: true,
            brightness: Some(50),
        };
        assert!(!status.matches(&command));
    }

    #[test]
    fn should_not_match_command_for_other_device() {
        let status = light_on();
        let command = ControlCommand::Thermostat {
            mode: ThermostatMode::Off,
            target_temperature: None,
            fan: None,
        };
        assert!(!status.matches(&command));
    }

    #[test]
    fn should_match_thermostat_command_on_mode_alone() {
        let status = DeviceStatus::Thermostat {
            mode: ThermostatMode::Cool,
            target_temperature: 23.0,
            fan: FanMode::Auto,
        };
        let command = ControlCommand::Thermostat {
            mode: ThermostatMode::Cool,
            target_temperature: None,
            fan: None,
        };
        assert!(status.matches(&command));
    }

    #[test]
    fn should_satisfy_only_when_confirmed() {
        let command = ControlCommand::Light {
            power: true,
            brightness: None,
        };
        let pending = DeviceState::pending(light_on(), now());
        assert!(!pending.satisfies(&command));

        let confirmed = DeviceState::confirmed(light_on(), now());
        assert!(confirmed.satisfies(&command));
    }

    #[test]
    fn should_not_satisfy_after_going_stale() {
        let command = ControlCommand::Light {
            power: true,
            brightness: None,
        };
        let mut state = DeviceState::confirmed(light_on(), now());
        state.mark_stale("timeout", now());
        assert!(!state.satisfies(&command));
        assert_eq!(state.confidence, SyncConfidence::Stale);
        assert_eq!(state.last_error.as_deref(), Some("timeout"));
        // Belief is retained, not reverted.
        assert_eq!(state.status, light_on());
    }

    #[test]
    fn should_clear_error_when_confirmed_again() {
        let mut state = DeviceState::confirmed(light_on(), now());
        state.mark_stale("timeout", now());
        state.confirm(light_on(), now());
        assert_eq!(state.confidence, SyncConfidence::Confirmed);
        assert!(state.last_error.is_none());
    }

    #[test]
    fn should_serialize_status_with_device_tag() {
        let json = serde_json::to_value(light_on()).unwrap();
        assert_eq!(json["device"], "light");
        assert_eq!(json["power"], true);
        assert_eq!(json["brightness"], 80);
    }
}

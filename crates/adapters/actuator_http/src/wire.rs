//! Request and response bodies of the actuator REST services.
//!
//! The services echo their full state on every control and toggle call, so
//! the same response shape covers all three operations. Unknown response
//! fields (timestamps, current readings) are ignored.

use serde::{Deserialize, Serialize};

use hestia_domain::device::{DeviceStatus, FanMode, ThermostatMode};

#[derive(Debug, Deserialize)]
pub(crate) struct LightStatusBody {
    state: String,
    brightness: u8,
}

impl LightStatusBody {
    /// Map the wire state onto a typed status; `state` is only ever
    /// `"on"` or `"off"`.
    pub(crate) fn into_status(self) -> Result<DeviceStatus, String> {
        let power = match self.state.as_str() {
            "on" => true,
            "off" => false,
            other => return Err(format!("unexpected light state {other:?}")),
        };
        Ok(DeviceStatus::Light {
            power,
            brightness: self.brightness,
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct LightControlBody {
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ThermostatStatusBody {
    mode: ThermostatMode,
    target_temperature: f64,
    fan: FanMode,
}

impl ThermostatStatusBody {
    pub(crate) fn into_status(self) -> DeviceStatus {
        DeviceStatus::Thermostat {
            mode: self.mode,
            target_temperature: self.target_temperature,
            fan: self.fan,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ThermostatControlBody {
    pub mode: ThermostatMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fan: Option<FanMode>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_decode_light_status_ignoring_extra_fields() {
        let body: LightStatusBody =
            serde_json::from_str(r#"{"state":"on","brightness":80,"last_changed":12.5}"#).unwrap();
        assert_eq!(
            body.into_status().unwrap(),
            DeviceStatus::Light {
                power: true,
                brightness: 80,
            }
        );
    }

    #[test]
    fn should_reject_unknown_light_state() {
        let body: LightStatusBody =
            serde_json::from_str(r#"{"state":"dim","brightness":10}"#).unwrap();
        assert!(body.into_status().is_err());
    }

    #[test]
    fn should_omit_unset_control_fields() {
        let body = LightControlBody {
            state: "off",
            brightness: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"state": "off"}));

        let body = ThermostatControlBody {
            mode: ThermostatMode::Cool,
            target_temperature: Some(23.0),
            fan: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"mode": "cool", "target_temperature": 23.0})
        );
    }

    #[test]
    fn should_decode_thermostat_status() {
        let raw = r#"{"mode":"cool","current_temperature":26.0,"target_temperature":24.0,"fan":"auto"}"#;
        let body: ThermostatStatusBody = serde_json::from_str(raw).unwrap();
        assert_eq!(
            body.into_status(),
            DeviceStatus::Thermostat {
                mode: ThermostatMode::Cool,
                target_temperature: 24.0,
                fan: FanMode::Auto,
            }
        );
    }
}

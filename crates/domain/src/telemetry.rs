//! Telemetry frames — parsing the sensor firmware's line format.
//!
//! The sensor device emits comma-separated `tag:value` pairs, e.g.
//! `T:24.50,H:51.20,L:33.00` (temperature °C, humidity %RH, light level).
//! Any subset of fields may be present in a line; a frame becomes a
//! complete [`SensorReading`] by filling gaps from the previous reading.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::reading::SensorReading;
use crate::time::Timestamp;

/// A possibly-partial sensor sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetryFrame {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub light_intensity: Option<f64>,
}

impl TelemetryFrame {
    /// Merge this frame onto the previous reading to produce the next
    /// complete reading. Fields absent from the frame keep the previous
    /// value; returns `None` when a field has never been observed or the
    /// merged result fails validation.
    #[must_use]
    pub fn complete(
        &self,
        previous: Option<&SensorReading>,
        recorded_at: Timestamp,
    ) -> Option<SensorReading> {
        let temperature = self.temperature.or(previous.map(|r| r.temperature))?;
        let humidity = self.humidity.or(previous.map(|r| r.humidity))?;
        let light_intensity = self
            .light_intensity
            .or(previous.map(|r| r.light_intensity))?;
        SensorReading::new(temperature, humidity, light_intensity, recorded_at).ok()
    }
}

impl FromStr for TelemetryFrame {
    type Err = ValidationError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut frame = Self::default();
        for part in line.trim().split(',') {
            let Some((tag, value)) = part.split_once(':') else {
                continue;
            };
            let Ok(value) = value.trim().parse::<f64>() else {
                continue;
            };
            if !value.is_finite() {
                continue;
            }
            match tag.trim() {
                "T" => frame.temperature = Some(value),
                "H" => frame.humidity = Some(value),
                "L" => frame.light_intensity = Some(value),
                _ => {}
            }
        }
        if frame == Self::default() {
            return Err(ValidationError::EmptyTelemetryLine);
        }
        Ok(frame)
    }
}

//! Sensor readings — the latest environmental telemetry snapshot.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::time::Timestamp;

/// One complete environmental sample.
///
/// Immutable once produced; ingesting a new sample replaces the hub's
/// latest reading wholesale. No history is retained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Degrees Celsius.
    pub temperature: f64,
    /// Percent relative humidity, 0–100.
    pub humidity: f64,
    /// Ambient light level (lux-like unit, non-negative).
    pub light_intensity: f64,
    pub recorded_at: Timestamp,
}

impl SensorReading {
    /// Build a validated reading.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when any value is non-finite, humidity
    /// is outside 0–100, or light intensity is negative.
    pub fn new(
        temperature: f64,
        humidity: f64,
        light_intensity: f64,
        recorded_at: Timestamp,
    ) -> Result<Self, ValidationError> {
        let reading = Self {
            temperature,
            humidity,
            light_intensity,
            recorded_at,
        };
        reading.validate()?;
        Ok(reading)
    }

    /// Check value-range invariants.
    ///
    /// # Errors
    ///
    /// See [`SensorReading::new`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.temperature.is_finite() {
            return Err(ValidationError::NotFinite {
                field: "temperature",
            });
        }
        if !self.humidity.is_finite() {
            return Err(ValidationError::NotFinite { field: "humidity" });
        }
        if !(0.0..=100.0).contains(&self.humidity) {
            return Err(ValidationError::HumidityOutOfRange);
        }
        if !self.light_intensity.is_finite() {
            return Err(ValidationError::NotFinite {
                field: "light_intensity",
            });
        }
        if self.light_intensity < 0.0 {
            return Err(ValidationError::Negative {
                field: "light_intensity",
            });
        }
        Ok(())
    }
}

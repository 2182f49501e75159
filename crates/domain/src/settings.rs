//! Automation settings — user-configured thresholds and the global switch.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Thresholds the automation engine compares readings against.
///
/// Created with defaults at startup and mutated only through a validated
/// [`SettingsPatch`], so a reader can never observe a half-applied update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AutomationSettings {
    /// Turn the light on when intensity drops below this.
    pub light_threshold: f64,
    /// Start cooling when temperature exceeds this (°C).
    pub temperature_threshold: f64,
    /// Master switch; when false the engine skips every cycle.
    pub auto_mode: bool,
}

impl Default for AutomationSettings {
    fn default() -> Self {
        Self {
            light_threshold: 50.0,
            temperature_threshold: 24.0,
            auto_mode: true,
        }
    }
}

impl AutomationSettings {
    /// Merge a partial update, leaving unspecified fields unchanged.
    ///
    /// The patch is validated first; an invalid patch leaves `self` as-is
    /// for the caller (this method does not mutate).
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when a provided threshold is
    /// non-finite or negative.
    pub fn apply(&self, patch: &SettingsPatch) -> Result<Self, ValidationError> {
        patch.validate()?;
        Ok(Self {
            light_threshold: patch.light_threshold.unwrap_or(self.light_threshold),
            temperature_threshold: patch
                .temperature_threshold
                .unwrap_or(self.temperature_threshold),
            auto_mode: patch.auto_mode.unwrap_or(self.auto_mode),
        })
    }
}

/// Partial settings update; `None` fields are left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsPatch {
    pub light_threshold: Option<f64>,
    pub temperature_threshold: Option<f64>,
    pub auto_mode: Option<bool>,
}

impl SettingsPatch {
    /// Check range invariants on the provided fields.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when a provided threshold is
    /// non-finite or negative.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("light_threshold", self.light_threshold),
            ("temperature_threshold", self.temperature_threshold),
        ] {
            if let Some(value) = value {
                if !value.is_finite() {
                    return Err(ValidationError::NotFinite { field });
                }
                if value < 0.0 {
                    return Err(ValidationError::Negative { field });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_start_with_documented_defaults() {
        let settings = AutomationSettings::default();
        assert!((settings.light_threshold - 50.0).abs() < f64::EPSILON);
        assert!((settings.temperature_threshold - 24.0).abs() < f64::EPSILON);
        assert!(settings.auto_mode);
    }

    #[test]
    fn should_merge_only_provided_fields() {
        let settings = AutomationSettings::default();
        let patch = SettingsPatch {
            temperature_threshold: Some(26.5),
            ..SettingsPatch::default()
        };
        let merged = settings.apply(&patch).unwrap();
        assert!((merged.temperature_threshold - 26.5).abs() < f64::EPSILON);
        assert!((merged.light_threshold - 50.0).abs() < f64::EPSILON);
        assert!(merged.auto_mode);
    }

    #[test]
    fn should_merge_all_fields_when_provided() {
        let settings = AutomationSettings::default();
        let patch = SettingsPatch {
            light_threshold: Some(30.0),
            temperature_threshold: Some(22.0),
            auto_mode: Some(false),
        };
        let merged = settings.apply(&patch).unwrap();
        assert!((merged.light_threshold - 30.0).abs() < f64::EPSILON);
        assert!((merged.temperature_threshold - 22.0).abs() < f64::EPSILON);
        assert!(!merged.auto_mode);
    }

    #[test]
    fn should_reject_negative_threshold_leaving_settings_unchanged() {
        let settings = AutomationSettings::default();
        let patch = SettingsPatch {
            light_threshold: Some(-1.0),
            ..SettingsPatch::default()
        };
        let result = settings.apply(&patch);
        assert_eq!(
            result,
            Err(ValidationError::Negative {
                field: "light_threshold"
            })
        );
        // The original value is untouched.
        assert!((settings.light_threshold - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn should_reject_non_finite_threshold() {
        let patch = SettingsPatch {
            temperature_threshold: Some(f64::INFINITY),
            ..SettingsPatch::default()
        };
        assert_eq!(
            patch.validate(),
            Err(ValidationError::NotFinite {
                field: "temperature_threshold"
            })
        );
    }

    #[test]
    fn should_deserialize_empty_patch_as_noop() {
        let patch: SettingsPatch = serde_json::from_str("{}").unwrap();
        assert_eq!(patch, SettingsPatch::default());
        let merged = AutomationSettings::default().apply(&patch).unwrap();
        assert_eq!(merged, AutomationSettings::default());
    }
}

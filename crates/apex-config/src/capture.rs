// crates/apex-config/src/capture.rs
// ============================================================================
// Module: Capture Configuration
// Description: The `capture.*` options (spec.md §6.3).
// Purpose: Validate the preset name against the built-in presets and the
//          duration against `ensure_session`'s requirements before a session
//          is ever requested.
// Dependencies: apex-capture, serde
// ============================================================================

use apex_capture::preset_by_name;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ConfigError;

/// `capture.*` options controlling trace flag capture (spec.md §6.3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureConfig {
    /// Named preset passed to `ensure_session`.
    pub preset: String,
    /// Trace flag lifetime, in minutes.
    pub duration_minutes: u32,
    /// Whether automated-process events are captured alongside user-initiated ones.
    pub include_automated_process: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self { preset: "minimal".to_string(), duration_minutes: 30, include_automated_process: false }
    }
}

impl CaptureConfig {
    /// Validates the preset name and duration (spec.md §6.3).
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] when `preset` is not one of the named
    /// presets, or `duration_minutes` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if preset_by_name(&self.preset).is_none() {
            return Err(ConfigError::invalid("capture.preset", "must name a known preset"));
        }
        if self.duration_minutes == 0 {
            return Err(ConfigError::invalid("capture.durationMinutes", "must be greater than zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(CaptureConfig::default().validate().is_ok());
    }

    #[test]
    fn unknown_preset_is_rejected() {
        let config = CaptureConfig { preset: "nonexistent".to_string(), ..CaptureConfig::default() };
        let error = config.validate().expect_err("unknown preset should be rejected");
        assert!(error.to_string().contains("capture.preset"));
    }

    #[test]
    fn zero_duration_is_rejected() {
        let config = CaptureConfig { duration_minutes: 0, ..CaptureConfig::default() };
        let error = config.validate().expect_err("zero duration should be rejected");
        assert!(error.to_string().contains("durationMinutes"));
    }

    #[test]
    fn every_named_preset_validates() {
        for preset in apex_capture::NAMED_PRESETS {
            let config = CaptureConfig { preset: preset.name.to_string(), ..CaptureConfig::default() };
            assert!(config.validate().is_ok());
        }
    }
}

// crates/apex-config/src/config.rs
// ============================================================================
// Module: Config
// Description: The top-level configuration surface (spec.md §6.3).
// Purpose: Parse, validate eagerly, and hand out the per-area config every
//          other crate accepts.
// Dependencies: apex-redaction, serde, toml
// ============================================================================

//! ## Overview
//! [`Config`] is validated once, at load time, never at call time: every
//! field a caller reads back has already passed its rule. Each area's
//! options live in their own sub-struct, grounded in the crate that
//! consumes them.

use serde::Deserialize;
use serde::Serialize;

use crate::auth::AuthConfig;
use crate::capture::CaptureConfig;
use crate::correlation::CorrelationConfig;
use crate::error::ConfigError;

/// The full recognized configuration surface (spec.md §6.3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// `capture.*` options.
    pub capture: CaptureConfig,
    /// `correlation.*` options.
    pub correlation: CorrelationConfig,
    /// `redaction.*` options, owned by the redaction crate itself.
    pub redaction: apex_redaction::RedactionConfig,
    /// `auth.*` options.
    pub auth: AuthConfig,
}

impl Config {
    /// Parses `text` as TOML and validates the result.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] on malformed TOML, or
    /// [`ConfigError::Invalid`] if any area fails validation.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every area of the config (spec.md §6.3).
    ///
    /// # Errors
    /// Returns the first [`ConfigError::Invalid`] encountered, in
    /// `capture`, `correlation`, `auth` order. `redaction`'s own
    /// construction path (see [`apex_redaction::RedactionConfig::validated`])
    /// never fails, so it is not re-checked here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.capture.validate()?;
        self.correlation.validate()?;
        self.auth.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let config = Config::from_toml_str("").expect("empty document should parse to defaults");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let text = r#"
            [capture]
            preset = "exceptions"
            durationMinutes = 60
        "#;
        let config = Config::from_toml_str(text).expect("partial document should parse");
        assert_eq!(config.capture.preset, "exceptions");
        assert_eq!(config.capture.duration_minutes, 60);
        assert_eq!(config.correlation, CorrelationConfig::default());
    }

    #[test]
    fn invalid_nested_field_fails_load() {
        let text = r#"
            [correlation]
            minConfidence = 2.0
        "#;
        let error = Config::from_toml_str(text).expect_err("out-of-range confidence should fail load");
        assert!(error.to_string().contains("minConfidence"));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let error = Config::from_toml_str("not = [valid").expect_err("malformed toml should fail to parse");
        assert!(matches!(error, ConfigError::Parse(_)));
    }
}

// crates/apex-config/src/auth.rs
// ============================================================================
// Module: Auth Configuration
// Description: The `auth.preferredMethods` option (spec.md §6.3).
// Purpose: Name the four authorization methods a session may be established
//          with, and the order a caller tries them in.
// Dependencies: serde
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::error::ConfigError;

/// One way an org session may be authorized (spec.md §6.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthMethod {
    /// OAuth 2.0 authorization-code flow with PKCE.
    AuthorizationCodePkce,
    /// OAuth 2.0 device authorization flow.
    DeviceCode,
    /// Import an existing CLI-stored session.
    CliImport,
    /// A caller-supplied access token.
    ManualToken,
}

impl AuthMethod {
    /// Returns the option value's wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AuthorizationCodePkce => "authorization-code-pkce",
            Self::DeviceCode => "device-code",
            Self::CliImport => "cli-import",
            Self::ManualToken => "manual-token",
        }
    }
}

/// `auth.*` options controlling how a session is authorized (spec.md §6.3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfig {
    /// Methods to try, in order, until one succeeds.
    pub preferred_methods: Vec<AuthMethod>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { preferred_methods: vec![AuthMethod::AuthorizationCodePkce, AuthMethod::DeviceCode, AuthMethod::CliImport, AuthMethod::ManualToken] }
    }
}

impl AuthConfig {
    /// Validates that at least one method is listed and none repeats
    /// (spec.md §6.3).
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] when `preferred_methods` is empty or
    /// contains a duplicate entry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.preferred_methods.is_empty() {
            return Err(ConfigError::invalid("auth.preferredMethods", "must list at least one method"));
        }
        for (index, method) in self.preferred_methods.iter().enumerate() {
            if self.preferred_methods[..index].contains(method) {
                return Err(ConfigError::invalid("auth.preferredMethods", "must not repeat a method"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(AuthConfig::default().validate().is_ok());
    }

    #[test]
    fn empty_list_is_rejected() {
        let config = AuthConfig { preferred_methods: Vec::new() };
        let error = config.validate().expect_err("empty list should be rejected");
        assert!(error.to_string().contains("preferredMethods"));
    }

    #[test]
    fn duplicate_method_is_rejected() {
        let config = AuthConfig { preferred_methods: vec![AuthMethod::DeviceCode, AuthMethod::DeviceCode] };
        let error = config.validate().expect_err("duplicate method should be rejected");
        assert!(error.to_string().contains("preferredMethods"));
    }

    #[test]
    fn single_method_validates() {
        let config = AuthConfig { preferred_methods: vec![AuthMethod::ManualToken] };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn wire_names_match_option_table() {
        assert_eq!(AuthMethod::AuthorizationCodePkce.as_str(), "authorization-code-pkce");
        assert_eq!(AuthMethod::DeviceCode.as_str(), "device-code");
        assert_eq!(AuthMethod::CliImport.as_str(), "cli-import");
        assert_eq!(AuthMethod::ManualToken.as_str(), "manual-token");
    }
}

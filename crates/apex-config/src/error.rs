// crates/apex-config/src/error.rs
// ============================================================================
// Module: Config Error
// Description: The load/validation error type for the configuration surface.
// Purpose: Give callers a single, substring-matchable failure reason distinct
//          from the request-time ApexError taxonomy (spec.md §6.3).
// Dependencies: thiserror, toml
// ============================================================================

//! ## Overview
//! Config errors happen at load time, before any request is in flight, so
//! they are modeled separately from [`apex_contract::ApexError`]'s five
//! request-time kinds. A [`ConfigError`] either wraps a TOML parse failure or
//! names the specific field that failed validation.

use thiserror::Error;

/// Failure loading or validating a [`crate::Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The input was not well-formed TOML.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A field failed validation; the message names the field and the rule
    /// it violated.
    #[error("{0}")]
    Invalid(String),
}

impl ConfigError {
    /// Builds an [`ConfigError::Invalid`] naming `field` and the violated rule.
    pub(crate) fn invalid(field: &str, rule: &str) -> Self {
        Self::Invalid(format!("{field} {rule}"))
    }
}

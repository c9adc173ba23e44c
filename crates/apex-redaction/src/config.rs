// crates/apex-redaction/src/config.rs
// ============================================================================
// Module: Redaction Configuration
// Description: The single config object every redaction pass is driven by.
// Purpose: Implement spec.md §4.2's recognized options and their validation.
// Dependencies: apex-core, regex, serde
// ============================================================================

//! ## Overview
//! A [`RedactionConfig`] is validated once, at construction, never at call
//! time. Malformed custom patterns are dropped with a [`ConfigWarning`]
//! rather than failing the whole config (spec.md §4.2's failure-mode note:
//! "none surface").

use apex_core::Sensitivity;
use regex::Regex;
use serde::Deserialize;
use serde::Serialize;

use crate::patterns::BUILTIN_CATEGORIES;

/// A user-supplied pattern to redact in addition to the built-in categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomPattern {
    /// Category identifier, used in the report and in `alwaysRedact`/`neverRedact`.
    pub id: String,
    /// The regex source text.
    pub pattern: String,
    /// Sensitivity tier assigned to matches of this pattern.
    pub sensitivity: Sensitivity,
    /// Placeholder text to substitute, e.g. `[CUSTOM]`.
    pub placeholder: String,
}

/// Configuration for one redaction pass (spec.md §4.2).
///
/// # Invariants
/// - `custom_patterns` contains only patterns that compiled successfully;
///   malformed ones are dropped during [`RedactionConfig::new`] and reported
///   via the returned warnings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedactionConfig {
    /// Minimum sensitivity tier to apply. Defaults to `Low`.
    pub min_sensitivity: Sensitivity,
    /// Categories forced on regardless of `min_sensitivity`.
    pub always_redact: Vec<String>,
    /// Categories suppressed regardless of `min_sensitivity`.
    pub never_redact: Vec<String>,
    /// `[EMAIL]`-style placeholders when true, generic `[REDACTED]` otherwise.
    pub use_placeholders: bool,
    /// Emit `hash:<hex>` in the report instead of the raw value.
    pub hash_originals: bool,
    /// Include the original text and byte positions in the report.
    pub track_redactions: bool,
    /// User-supplied patterns, validated at construction.
    pub custom_patterns: Vec<CustomPattern>,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            min_sensitivity: Sensitivity::Low,
            always_redact: Vec::new(),
            never_redact: Vec::new(),
            use_placeholders: true,
            hash_originals: false,
            track_redactions: false,
            custom_patterns: Vec::new(),
        }
    }
}

/// A non-fatal problem found while validating a [`RedactionConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    /// The custom pattern id that was dropped.
    pub pattern_id: String,
    /// Why it was dropped.
    pub reason: String,
}

impl RedactionConfig {
    /// Validates `self`, dropping any custom pattern that fails to compile
    /// and returning a warning for each one dropped.
    ///
    /// Built-in category names in `always_redact`/`never_redact` that do not
    /// match any known category (built-in or custom) are left as-is; they
    /// simply never match anything, matching the "no failure modes surface"
    /// policy of spec.md §4.2.
    #[must_use]
    pub fn validated(mut self) -> (Self, Vec<ConfigWarning>) {
        let mut warnings = Vec::new();
        let mut kept = Vec::with_capacity(self.custom_patterns.len());
        for pattern in self.custom_patterns.drain(..) {
            match Regex::new(&pattern.pattern) {
                Ok(_) => kept.push(pattern),
                Err(err) => warnings.push(ConfigWarning {
                    pattern_id: pattern.id,
                    reason: err.to_string(),
                }),
            }
        }
        self.custom_patterns = kept;
        (self, warnings)
    }

    /// Returns true when a category (built-in or custom) is enabled for this
    /// config: not in `never_redact`, and either in `always_redact` or at or
    /// above `min_sensitivity`.
    #[must_use]
    pub fn category_enabled(&self, category: &str, sensitivity: Sensitivity) -> bool {
        if self.never_redact.iter().any(|c| c == category) {
            return false;
        }
        if self.always_redact.iter().any(|c| c == category) {
            return true;
        }
        sensitivity >= self.min_sensitivity
    }

    /// Returns the placeholder text for a matched category.
    #[must_use]
    pub fn placeholder_for(&self, category: &str) -> String {
        if !self.use_placeholders {
            return "[REDACTED]".to_string();
        }
        BUILTIN_CATEGORIES
            .iter()
            .find(|builtin| builtin.id == category)
            .map_or_else(
                || format!("[{}]", category.to_uppercase()),
                |builtin| builtin.placeholder.to_string(),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_custom_pattern_is_dropped_with_warning() {
        let config = RedactionConfig {
            custom_patterns: vec![CustomPattern {
                id: "broken".to_string(),
                pattern: "(unclosed".to_string(),
                sensitivity: Sensitivity::High,
                placeholder: "[BROKEN]".to_string(),
            }],
            ..RedactionConfig::default()
        };
        let (validated, warnings) = config.validated();
        assert!(validated.custom_patterns.is_empty());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].pattern_id, "broken");
    }

    #[test]
    fn never_redact_overrides_always_redact() {
        let config = RedactionConfig {
            always_redact: vec!["email".to_string()],
            never_redact: vec!["email".to_string()],
            ..RedactionConfig::default()
        };
        assert!(!config.category_enabled("email", Sensitivity::High));
    }

    #[test]
    fn min_sensitivity_filters_lower_tiers() {
        let config = RedactionConfig {
            min_sensitivity: Sensitivity::Critical,
            ..RedactionConfig::default()
        };
        assert!(!config.category_enabled("ipv4", Sensitivity::Medium));
        assert!(config.category_enabled("ssn", Sensitivity::Critical));
    }
}

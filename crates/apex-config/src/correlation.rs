// crates/apex-config/src/correlation.rs
// ============================================================================
// Module: Correlation Configuration
// Description: The `correlation.*` options (spec.md §6.3).
// Purpose: Convert validated config into a `CorrelationOptions` the
//          correlator accepts, and own the orchestration-level toggle the
//          correlator itself has no opinion on.
// Dependencies: apex-correlate, serde
// ============================================================================

use apex_correlate::CorrelationOptions;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ConfigError;

/// `correlation.*` options controlling C6 matching (spec.md §6.3).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationConfig {
    /// Candidate-log search window past the latest enqueue, in milliseconds.
    pub max_time_window_ms: i64,
    /// Minimum overall confidence required to emit a correlation.
    pub min_confidence: f64,
    /// Per-parent cap on emitted correlations.
    pub max_children: usize,
    /// Whether to query platform job records to resolve terminal status.
    pub query_platform_jobs: bool,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        let options = CorrelationOptions::default();
        Self {
            max_time_window_ms: options.max_time_window_ms,
            min_confidence: options.min_confidence,
            max_children: options.max_children,
            query_platform_jobs: true,
        }
    }
}

impl CorrelationConfig {
    /// Validates the window, confidence, and cap (spec.md §6.3).
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] when `max_time_window_ms` or
    /// `max_children` is not positive, or `min_confidence` falls outside
    /// `[0.0, 1.0]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_time_window_ms <= 0 {
            return Err(ConfigError::invalid("correlation.maxTimeWindowMs", "must be greater than zero"));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ConfigError::invalid("correlation.minConfidence", "must be within [0.0, 1.0]"));
        }
        if self.max_children == 0 {
            return Err(ConfigError::invalid("correlation.maxChildren", "must be greater than zero"));
        }
        Ok(())
    }

    /// Converts to the options type the correlator accepts.
    #[must_use]
    pub fn to_correlator_options(self) -> CorrelationOptions {
        CorrelationOptions { max_time_window_ms: self.max_time_window_ms, min_confidence: self.min_confidence, max_children: self.max_children }
    }
}

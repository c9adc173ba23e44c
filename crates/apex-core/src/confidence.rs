// crates/apex-core/src/confidence.rs
// ============================================================================
// Module: Apex Confidence Model
// Description: Clamped confidence values and the derived confidence level.
// Purpose: Guarantee every confidence value in [0,1] and centralize the fixed
//          level thresholds (spec.md §4.1).
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Confidence values are always in `[0,1]`. [`Confidence`] clamps at
//! construction so the clamp required by spec.md §4.6.3 cannot be forgotten
//! at a call site. Level thresholds (0.85 / 0.60) are fixed constants, not
//! configuration.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Level Thresholds
// ============================================================================

/// Minimum confidence for [`ConfidenceLevel::High`].
pub const HIGH_THRESHOLD: f64 = 0.85;
/// Minimum confidence for [`ConfidenceLevel::Medium`].
pub const MEDIUM_THRESHOLD: f64 = 0.60;
/// Minimum confidence below which a correlation is no longer considered at
/// all "low" but simply unconfident; retained for documentation purposes
/// alongside the other fixed thresholds in spec.md §4.1.
pub const LOW_THRESHOLD: f64 = 0.40;

// ============================================================================
// SECTION: Confidence
// ============================================================================

/// A confidence score, always clamped to `[0,1]`.
///
/// # Invariants
/// - `0.0 <= value <= 1.0` for every live instance; enforced at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Confidence(f64);

impl Confidence {
    /// Zero confidence.
    pub const ZERO: Self = Self(0.0);
    /// Full confidence.
    pub const ONE: Self = Self(1.0);

    /// Creates a confidence value, clamping the input to `[0,1]`.
    ///
    /// `NaN` is treated as zero confidence.
    #[must_use]
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            Self::ZERO
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    /// Returns the raw `f64` value in `[0,1]`.
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }

    /// Subtracts `amount` from this confidence, clamping the result to `[0,1]`.
    #[must_use]
    pub fn saturating_sub(self, amount: f64) -> Self {
        Self::new(self.0 - amount)
    }

    /// Adds `amount` to this confidence, clamping the result to `[0,1]`.
    #[must_use]
    pub fn saturating_add(self, amount: f64) -> Self {
        Self::new(self.0 + amount)
    }

    /// Returns the derived [`ConfidenceLevel`] using the fixed thresholds from
    /// spec.md §4.1.
    #[must_use]
    pub fn level(self) -> ConfidenceLevel {
        if self.0 >= HIGH_THRESHOLD {
            ConfidenceLevel::High
        } else if self.0 >= MEDIUM_THRESHOLD {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self::ZERO
    }
}

// ============================================================================
// SECTION: Confidence Level
// ============================================================================

/// Derived confidence level for a correlation or extraction result.
///
/// # Invariants
/// - Stable ordering: `High > Medium > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    /// Confidence below the medium threshold.
    Low,
    /// Confidence at or above the medium threshold, below the high threshold.
    Medium,
    /// Confidence at or above the high threshold.
    High,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_out_of_range_values() {
        assert_eq!(Confidence::new(1.5).get(), 1.0);
        assert_eq!(Confidence::new(-0.5).get(), 0.0);
        assert_eq!(Confidence::new(f64::NAN).get(), 0.0);
    }

    #[test]
    fn level_thresholds_match_spec() {
        assert_eq!(Confidence::new(0.85).level(), ConfidenceLevel::High);
        assert_eq!(Confidence::new(0.849).level(), ConfidenceLevel::Medium);
        assert_eq!(Confidence::new(0.60).level(), ConfidenceLevel::Medium);
        assert_eq!(Confidence::new(0.599).level(), ConfidenceLevel::Low);
    }

    #[test]
    fn saturating_ops_stay_in_range() {
        assert_eq!(Confidence::ONE.saturating_add(1.0), Confidence::ONE);
        assert_eq!(Confidence::ZERO.saturating_sub(1.0), Confidence::ZERO);
    }
}

// crates/apex-core/src/redaction_report.rs
// ============================================================================
// Module: Apex Redaction Report
// Description: The record of what a redaction pass found and replaced.
// Purpose: Represent C2's output shape, shared with every crate that attaches
//          a report to a produced artifact (spec.md §3).
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`RedactionReport`] is an ordered list of spans the redaction pipeline
//! (C2, in `apex-redaction`) matched and replaced. It never contains the
//! original secret unless the caller explicitly requested tracking
//! (spec.md §4.2 `trackRedactions`).

use serde::Deserialize;
use serde::Serialize;

/// Sensitivity tier of a redaction pattern category.
///
/// # Invariants
/// - Ordered from least to most sensitive: `None < Low < Medium < High <
///   Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sensitivity {
    /// No sensitivity (used only for user-supplied exclusions).
    None,
    /// Low sensitivity (e.g. platform record ids).
    Low,
    /// Medium sensitivity (e.g. IPv4 addresses).
    Medium,
    /// High sensitivity (e.g. emails, phone numbers).
    High,
    /// Critical sensitivity (e.g. SSNs, credit cards, secrets).
    Critical,
}

/// A single matched-and-redacted span.
///
/// # Invariants
/// - `start < end`, both byte offsets into the original text.
/// - Spans within one [`RedactionReport`] are non-overlapping after conflict
///   resolution (spec.md §8).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedactionSpan {
    /// Pattern category identifier (e.g. `email`, `ssn`).
    pub category: String,
    /// Sensitivity tier of the matched category.
    pub sensitivity: Sensitivity,
    /// Inclusive start byte offset in the original text.
    pub start: usize,
    /// Exclusive end byte offset in the original text.
    pub end: usize,
    /// The placeholder text written in place of the match.
    pub placeholder: String,
    /// The original matched text, present only when `trackRedactions` was
    /// requested; `hash:<hex>` when `hashOriginals` was requested instead.
    pub original: Option<String>,
}

/// The full report produced by one redaction pass.
///
/// # Invariants
/// - `spans` is ordered by `start` and non-overlapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RedactionReport {
    /// Matched-and-redacted spans, ordered by `start`.
    pub spans: Vec<RedactionSpan>,
}

impl RedactionReport {
    /// Returns an empty report.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true when no spans were redacted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

// crates/apex-core/src/signal.rs
// ============================================================================
// Module: Apex Match Signal
// Description: A single piece of evidence contributing to a correlation's
//              confidence score.
// Purpose: Represent the scorer's (C6) inputs (spec.md §3, §4.6.2).
// Dependencies: crate::confidence, serde
// ============================================================================

//! ## Overview
//! A [`MatchSignal`] is one reason to believe a parent job reference and a
//! candidate child log (or resolved platform job record) refer to the same
//! execution. The correlator combines a set of these into a single
//! [`crate::correlation::Correlation`] confidence (spec.md §4.6.3).

use serde::Deserialize;
use serde::Serialize;

use crate::confidence::Confidence;

/// The kind of evidence a [`MatchSignal`] carries.
///
/// # Invariants
/// - Variants are stable for serialization and the fixed weight table in
///   spec.md §4.6.2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchReason {
    /// The reference's platform job id matches the resolved record's id.
    JobId,
    /// The candidate log's operation text names the reference's class.
    ClassName,
    /// The candidate log started within a plausible window after enqueue.
    Timing,
    /// The reference and candidate share the same executing user.
    User,
    /// A future reference's method signature appears in the candidate's
    /// operation text.
    MethodSignature,
    /// Enqueue-order sequencing evidence.
    Sequence,
    /// The resolved record is a batch job and the candidate's operation text
    /// matches batch execution verbs.
    BatchPattern,
}

/// A single piece of evidence supporting a correlation.
///
/// # Invariants
/// - `signal_confidence` is in `[0,1]` (enforced by [`Confidence`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSignal {
    /// The kind of evidence this signal represents.
    pub reason: MatchReason,
    /// Confidence carried by this individual signal, before weighting.
    pub signal_confidence: Confidence,
    /// Short human-readable description of the evidence.
    pub description: String,
    /// Optional supporting evidence text (e.g. the matched operation string).
    pub evidence: Option<String>,
}

impl MatchSignal {
    /// Creates a new match signal.
    #[must_use]
    pub fn new(reason: MatchReason, signal_confidence: f64, description: impl Into<String>) -> Self {
        Self {
            reason,
            signal_confidence: Confidence::new(signal_confidence),
            description: description.into(),
            evidence: None,
        }
    }

    /// Attaches supporting evidence text, consuming and returning `self`.
    #[must_use]
    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence = Some(evidence.into());
        self
    }
}

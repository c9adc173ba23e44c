// crates/apex-core/src/correlation.rs
// ============================================================================
// Module: Apex Correlation
// Description: A scored parent↔child link between a job reference and the
//              log the async executor produced for it.
// Purpose: Represent the correlator's (C6) output shape (spec.md §3).
// Dependencies: crate::{confidence, ids, job_reference, platform_job, signal}, serde
// ============================================================================

//! ## Overview
//! A [`Correlation`] pairs one [`crate::job_reference::AsyncJobReference`]
//! with a candidate child log and/or a resolved platform job record,
//! carrying the full signal list that produced its confidence. Overall
//! confidence is always a deterministic function of `signals`
//! (spec.md §8) — see `apex-correlate::scoring::score` for that function.

use serde::Deserialize;
use serde::Serialize;

use crate::confidence::Confidence;
use crate::confidence::ConfidenceLevel;
use crate::ids::ChildLogId;
use crate::ids::ParentLogId;
use crate::job_reference::AsyncJobReference;
use crate::platform_job::JobStatus;
use crate::platform_job::PlatformJobRecord;
use crate::signal::MatchSignal;

/// A scored link between a parent log's job reference and the child log (or
/// resolved platform job record) believed to be its async execution.
///
/// # Invariants
/// - `overall_confidence == score(signals)` for the scoring function in
///   `apex-correlate` (spec.md §8).
/// - `level` is `overall_confidence.level()` (spec.md §4.1).
/// - `child_log_id` may be empty only in a degraded correlation
///   (spec.md §4.6.5), in which case `resolved_job` is `Some`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    /// Parent log identifier.
    pub parent_log_id: ParentLogId,
    /// Child log identifier; empty for a degraded correlation.
    pub child_log_id: ChildLogId,
    /// The job reference this correlation resolves.
    pub job_reference: AsyncJobReference,
    /// Resolved platform job record, when one was found.
    pub resolved_job: Option<PlatformJobRecord>,
    /// Supporting evidence for this correlation.
    pub signals: Vec<MatchSignal>,
    /// Overall confidence, deterministically derived from `signals`.
    pub overall_confidence: Confidence,
    /// Derived confidence level.
    pub level: ConfidenceLevel,
    /// Resolved job status, copied from `resolved_job` when present.
    pub resolved_status: Option<JobStatus>,
    /// Milliseconds between enqueue and the resolved job record's creation,
    /// when known.
    pub queue_delay_millis: Option<i64>,
    /// Milliseconds the child log's execution took, when a child log was
    /// fetched.
    pub execution_duration_millis: Option<u64>,
}

impl Correlation {
    /// Returns true when this correlation has no child log, i.e. it is the
    /// degraded form described in spec.md §4.6.5.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.child_log_id.is_empty()
    }
}

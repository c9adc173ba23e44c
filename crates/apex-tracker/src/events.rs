// crates/apex-tracker/src/events.rs
// ============================================================================
// Module: Tracker Telemetry Events
// Description: Progress events emitted by the job tracker.
// Purpose: Observability into batch/per-reference query decisions without a
//          logging backend dependency (spec.md §4.5).
// Dependencies: apex-core
// ============================================================================

//! ## Overview
//! Emitted through an injected `apex_contract::EventSink<TrackerEvent>`.

use apex_core::LocalRefId;
use apex_core::PlatformJobId;

/// One job-tracker telemetry event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerEvent {
    /// A batch-by-id query was issued for the given number of known ids.
    BatchQueryIssued {
        /// Number of platform job ids in the batch.
        id_count: usize,
    },
    /// A per-reference class+window query was issued.
    PerReferenceQueryIssued {
        /// The reference the query resolves.
        local_ref_id: LocalRefId,
    },
    /// No platform job record matched a reference.
    NoMatchFound {
        /// The reference that could not be resolved.
        local_ref_id: LocalRefId,
    },
    /// A `waitForCompletion` poll reached its deadline before a terminal
    /// status was observed.
    PollTimedOut {
        /// The job id being polled.
        job_id: PlatformJobId,
    },
}

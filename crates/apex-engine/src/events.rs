// crates/apex-engine/src/events.rs
// ============================================================================
// Module: Engine Telemetry Events
// Description: Progress events emitted across one analysis run.
// Purpose: Observability into which stage is running and what it found,
//          without a logging backend dependency (spec.md §5).
// Dependencies: apex-core
// ============================================================================

//! ## Overview
//! Emitted through an injected `apex_contract::EventSink<EngineEvent>`. Per
//! spec.md §4.2's redaction-first policy, no payload here carries raw log
//! text: child stages already redact before reporting.

use apex_core::ChildLogId;
use apex_core::ParentLogId;

/// One engine-level telemetry event, emitted over the course of `analyze`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The root log body was fetched and parsed.
    RootLogParsed {
        /// The parent log analyzed.
        parent_log_id: ParentLogId,
        /// Number of events parsed.
        event_count: usize,
    },
    /// Extraction found the given number of async job references.
    ReferencesExtracted {
        /// The parent log analyzed.
        parent_log_id: ParentLogId,
        /// Number of references extracted.
        reference_count: usize,
    },
    /// Correlation produced the given number of correlations.
    CorrelationsResolved {
        /// The parent log analyzed.
        parent_log_id: ParentLogId,
        /// Number of correlations emitted.
        correlation_count: usize,
    },
    /// A correlated child log was fetched and parsed for the unified view.
    ChildLogFetched {
        /// The child log fetched.
        child_log_id: ChildLogId,
    },
    /// A correlated child log could not be fetched; the unified view
    /// attaches it with an empty event list (spec.md §4.7 step 4).
    ChildLogFetchFailed {
        /// The child log that failed to fetch.
        child_log_id: ChildLogId,
        /// Human-readable failure detail.
        detail: String,
    },
    /// The analysis completed successfully.
    AnalysisCompleted {
        /// The parent log analyzed.
        parent_log_id: ParentLogId,
    },
    /// The analysis was cancelled before completion.
    AnalysisCancelled {
        /// The parent log analyzed.
        parent_log_id: ParentLogId,
    },
}

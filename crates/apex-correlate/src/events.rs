// crates/apex-correlate/src/events.rs
// ============================================================================
// Module: Correlator Telemetry Events
// Description: Progress events emitted by the correlator and scorer.
// Purpose: Observability into candidate search and degraded-result decisions
//          without a logging backend dependency (spec.md §4.6).
// Dependencies: apex-core
// ============================================================================

//! ## Overview
//! Emitted through an injected `apex_contract::EventSink<CorrelatorEvent>`.

use apex_core::LocalRefId;
use apex_core::ParentLogId;

/// One correlator telemetry event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorrelatorEvent {
    /// The shared candidate-log window query was issued for a parent log.
    CandidateQueryIssued {
        /// The parent log the candidates were fetched for.
        parent_log_id: ParentLogId,
        /// Number of candidate logs returned.
        candidate_count: usize,
    },
    /// A reference's platform job record resolved but no candidate log
    /// matched; a degraded correlation was emitted instead (spec.md §4.6.5).
    DegradedResultEmitted {
        /// The reference the degraded correlation covers.
        local_ref_id: LocalRefId,
    },
    /// The per-parent `maxChildren` cap dropped one or more correlations that
    /// would otherwise have been emitted.
    ChildrenCapped {
        /// The parent log the cap applied to.
        parent_log_id: ParentLogId,
        /// Number of correlations dropped by the cap.
        dropped: usize,
    },
}

// crates/apex-correlate/src/lib.rs
// ============================================================================
// Module: Apex Correlate
// Description: Correlates extracted job references with candidate child logs
//              and resolved platform job records (C6).
// Purpose: Turn a parent log's references into scored, tie-broken, capped
//          correlations (spec.md §4.6).
// Dependencies: apex-contract, apex-core, apex-platform
// ============================================================================

//! # Apex Correlate
//!
//! C6: the correlator and scorer. Enumerates candidate child logs within a
//! shared time window, scores each against a fixed signal-weight table, and
//! emits the tie-broken, `maxChildren`-capped correlation list for one
//! parent log, including the degraded form when only a platform job record
//! resolved.

#![deny(missing_docs)]

mod correlator;
mod events;
mod query;
mod scoring;

pub use correlator::CorrelationOptions;
pub use correlator::Correlator;
pub use events::CorrelatorEvent;
pub use query::candidate_log_query;
pub use query::parse_log_record;
pub use query::CANDIDATE_LOG_LIMIT;
pub use scoring::batch_pattern_signal;
pub use scoring::class_name_signal;
pub use scoring::job_id_signal;
pub use scoring::method_signature_signal;
pub use scoring::score;
pub use scoring::timing_signal;
pub use scoring::weight_for;

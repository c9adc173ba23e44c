// crates/apex-tracker/src/lib.rs
// ============================================================================
// Module: Apex Tracker
// Description: Resolves extracted async job references against platform
//              job bookkeeping records (C5).
// Purpose: Bridge `apex-extract`'s output to the platform's `AsyncApexJob`
//          rows, by id or by class+time window (spec.md §4.5).
// Dependencies: apex-contract, apex-core, apex-platform, tokio
// ============================================================================

//! # Apex Tracker
//!
//! C5: the job tracker. Partitions references by known/unknown platform job
//! id, batches id-based lookups, builds escaped per-reference class+window
//! queries for the rest, and exposes `waitForCompletion`-style polling.

#![deny(missing_docs)]

mod events;
mod query;
mod tracker;

pub use events::TrackerEvent;
pub use query::by_id_query;
pub use query::by_reference_window_query;
pub use query::by_single_id_query;
pub use query::job_kind_from_type;
pub use query::job_status_from_text;
pub use query::job_type_literal;
pub use query::parse_job_record;
pub use query::ALLOWED_JOB_TYPES;
pub use tracker::JobTracker;

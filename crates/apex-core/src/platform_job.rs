// crates/apex-core/src/platform_job.rs
// ============================================================================
// Module: Apex Platform Job Record
// Description: The asynchronously-scheduled job as the platform's job
//              bookkeeping object (`AsyncApexJob`) describes it.
// Purpose: Represent C5's resolution target (spec.md §3).
// Dependencies: crate::event, crate::ids, crate::time, serde
// ============================================================================

//! ## Overview
//! A [`PlatformJobRecord`] mirrors the platform's own job bookkeeping row.
//! Terminal statuses never transition back to a non-terminal one; this
//! invariant is enforced at the tracker (C5), not by this type, since the
//! type itself is just data returned from a query.

use serde::Deserialize;
use serde::Serialize;

use crate::event::JobKind;
use crate::ids::PlatformJobId;
use crate::time::WallClock;

/// Status of a platform job record.
///
/// # Invariants
/// - [`JobStatus::is_terminal`] statuses never transition back to a
///   non-terminal status for the same platform job id (spec.md §8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Job is queued but not yet being prepared.
    Queued,
    /// Job is being prepared for execution.
    Preparing,
    /// Job is actively processing.
    Processing,
    /// Job completed successfully.
    Completed,
    /// Job failed.
    Failed,
    /// Job was aborted.
    Aborted,
    /// Job is holding (batch jobs awaiting a dependent resource).
    Holding,
}

impl JobStatus {
    /// Returns true for a terminal status: completed, failed, or aborted.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Aborted)
    }
}

/// Platform job bookkeeping record (`AsyncApexJob`).
///
/// # Invariants
/// - `items_processed <= items_total` whenever `items_total` is known.
/// - `parent_job_id` is set only for batch worker jobs spawned by a batch
///   parent (spec.md §4.5 "batch jobs that spawn worker jobs").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformJobRecord {
    /// Platform job identifier.
    pub id: PlatformJobId,
    /// Id of the Apex class that implements the job.
    pub class_id: String,
    /// Name of the Apex class that implements the job.
    pub class_name: String,
    /// Job type, in the platform's own taxonomy.
    pub job_type: JobKind,
    /// Current status.
    pub status: JobStatus,
    /// Number of items processed so far (batch jobs).
    pub items_processed: u64,
    /// Total number of items to process (batch jobs), when known.
    pub items_total: Option<u64>,
    /// Number of errors recorded so far.
    pub errors: u64,
    /// Wall-clock creation time.
    pub created: WallClock,
    /// Wall-clock completion time, when the job has finished.
    pub completed: Option<WallClock>,
    /// Extended status text (e.g. a failure message).
    pub extended_status: Option<String>,
    /// Parent batch job id, for batch worker jobs.
    pub parent_job_id: Option<PlatformJobId>,
    /// Method name, for future job records.
    pub method_name: Option<String>,
}

impl PlatformJobRecord {
    /// Returns true when `instant` falls within `[created, completed]`,
    /// widened by `buffer_ms` on each side (spec.md §4.6.1). When `completed`
    /// is `None`, only the lower bound is checked.
    #[must_use]
    pub fn covers_instant(&self, instant: WallClock, buffer_ms: i64) -> bool {
        let lower = self.created.plus_millis(-buffer_ms);
        if instant < lower {
            return false;
        }
        match self.completed {
            Some(completed) => instant <= completed.plus_millis(buffer_ms),
            None => true,
        }
    }
}

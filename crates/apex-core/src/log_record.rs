// crates/apex-core/src/log_record.rs
// ============================================================================
// Module: Apex Log Record
// Description: Platform-produced log bookkeeping metadata (spec.md §3).
// Purpose: Represent an `ApexLog` record read-only, as the platform produced it.
// Dependencies: crate::ids, crate::time, serde
// ============================================================================

//! ## Overview
//! A [`LogRecord`] describes an `ApexLog` row: identity, timing, and status.
//! It is produced by the platform and consumed read-only by this workspace;
//! nothing here mutates a log record once it is fetched.

use serde::Deserialize;
use serde::Serialize;

use crate::ids::ParentLogId;
use crate::time::WallClock;

/// Execution status of a completed Apex transaction, as recorded on its log.
///
/// # Invariants
/// - Variants are stable for serialization and cross-crate matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogStatus {
    /// Transaction completed without an uncaught exception.
    Success,
    /// Transaction raised an uncaught exception.
    Exception,
}

/// Platform log bookkeeping record (`ApexLog`).
///
/// # Invariants
/// - `id` is unique within the org that produced it.
/// - `duration_millis` covers the full transaction, not just captured events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Opaque log identifier.
    pub id: ParentLogId,
    /// Wall-clock start time of the transaction.
    pub start_time: WallClock,
    /// Id of the user whose execution produced this log.
    pub user_id: String,
    /// Operation text (e.g. `MyQueueable.execute` or `/services/...`).
    pub operation: String,
    /// Size of the raw log body in bytes.
    pub byte_length: u64,
    /// Final transaction status.
    pub status: LogStatus,
    /// Total transaction duration in milliseconds.
    pub duration_millis: u64,
}

impl LogRecord {
    /// Returns true when `operation` contains `needle`, case-insensitively.
    #[must_use]
    pub fn operation_contains(&self, needle: &str) -> bool {
        self.operation.to_ascii_lowercase().contains(&needle.to_ascii_lowercase())
    }
}

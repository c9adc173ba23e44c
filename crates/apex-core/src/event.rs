// crates/apex-core/src/event.rs
// ============================================================================
// Module: Apex Event
// Description: Parsed debug-log event records and their kind-specific payloads.
// Purpose: Represent a single immutable event in a parsed log (spec.md §3).
// Dependencies: crate::ids, crate::time, serde
// ============================================================================

//! ## Overview
//! An [`Event`] is a single record in a parsed Apex debug log. Events are
//! immutable once parsed; their lifetime is the lifetime of the owning log.
//! The log parser itself is external to this workspace (spec.md §2); this
//! module only defines the shape events arrive in.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::class_name::ClassName;
use crate::ids::EventId;
use crate::time::EventTimestampNs;

// ============================================================================
// SECTION: Job Kind
// ============================================================================

/// Kind of asynchronous job an enqueue event or job reference describes.
///
/// # Invariants
/// - Variants are stable for serialization and cross-crate matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    /// `System.enqueueJob` queueable.
    Queueable,
    /// `Database.executeBatch` batch job.
    Batch,
    /// `@future` method invocation.
    Future,
    /// `System.schedule` scheduled job.
    Schedulable,
}

impl JobKind {
    /// Returns a stable lowercase label for this job kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Queueable => "queueable",
            Self::Batch => "batch",
            Self::Future => "future",
            Self::Schedulable => "schedulable",
        }
    }
}

// ============================================================================
// SECTION: Event Kind
// ============================================================================

/// Kind-specific payload carried by an event.
///
/// # Invariants
/// - Only the variant matching the owning event's [`EventKind`] is ever
///   constructed for that event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventPayload {
    /// Payload for a direct async-enqueue event: the declared job kind, class,
    /// optional method, and optional platform job id present in the log text.
    AsyncEnqueue {
        /// Declared job kind.
        job_kind: JobKind,
        /// Declared class name.
        class_name: ClassName,
        /// Declared method name, required for future jobs.
        method_name: Option<String>,
        /// Platform job id, if present in the log text.
        platform_job_id: Option<String>,
    },
    /// Payload for a user-debug line: the raw message text.
    UserDebug {
        /// Raw debug message text.
        message: String,
    },
    /// Payload for a fatal-error event: the raw error message text.
    FatalError {
        /// Raw error message text.
        message: String,
    },
    /// Payload for a limit-usage event: the limit category and consumed/total
    /// counts.
    LimitUsage {
        /// Limit category name (e.g. `SOQL queries`).
        category: String,
        /// Units consumed.
        consumed: u32,
        /// Units allowed.
        allowed: u32,
    },
    /// Payload for a code-unit boundary: the operation text (e.g. trigger or
    /// class name) the unit represents.
    CodeUnit {
        /// Operation text for this code unit.
        operation: String,
    },
}

/// The kind of a parsed log event.
///
/// # Invariants
/// - Variants are stable for serialization and cross-crate matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Entry into a method.
    MethodEntry,
    /// Exit from a method.
    MethodExit,
    /// A `System.debug` statement.
    UserDebug,
    /// An explicit async-job-enqueued marker emitted by the parser.
    AsyncJobEnqueued,
    /// Start of a code unit (trigger, class, or anonymous block).
    CodeUnitStarted,
    /// End of a code unit.
    CodeUnitFinished,
    /// A governor limit usage report.
    LimitUsage,
    /// A fatal, unrecoverable error.
    FatalError,
}

// ============================================================================
// SECTION: Event
// ============================================================================

/// A single immutable record in a parsed Apex debug log.
///
/// # Invariants
/// - `timestamp` values are non-decreasing across the owning log's event
///   sequence (spec.md §8).
/// - `payload`, when present, matches `kind` (see [`EventPayload`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Stable identifier within the owning log.
    pub id: EventId,
    /// Event kind.
    pub kind: EventKind,
    /// Monotonic nanosecond timestamp since log start.
    pub timestamp: EventTimestampNs,
    /// Source line number, when known.
    pub line: Option<u32>,
    /// Class name in scope, when known.
    pub class_name: Option<String>,
    /// Method name in scope, when known.
    pub method_name: Option<String>,
    /// Namespace in scope, when known.
    pub namespace: Option<String>,
    /// Kind-specific payload.
    pub payload: Option<EventPayload>,
}

impl Event {
    /// Returns true when this event marks entry into a stack frame for the
    /// purpose of the extractor's depth counter (spec.md §4.4): a
    /// `method-entry` event. `code-unit-started` is intentionally excluded;
    /// see spec.md §9's flagged double-count and `SPEC_FULL.md` §11.
    #[must_use]
    pub const fn increments_stack_depth(&self) -> bool {
        matches!(self.kind, EventKind::MethodEntry)
    }

    /// Returns true when this event marks exit from a stack frame, mirroring
    /// [`Event::increments_stack_depth`].
    #[must_use]
    pub const fn decrements_stack_depth(&self) -> bool {
        matches!(self.kind, EventKind::MethodExit)
    }
}

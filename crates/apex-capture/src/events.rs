// crates/apex-capture/src/events.rs
// ============================================================================
// Module: Capture Telemetry Events
// Description: Progress and warning events emitted by the capture controller.
// Purpose: Give callers observability into trace-flag lifecycle decisions
//          without this crate depending on a logging backend.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Emitted through an injected `apex_contract::EventSink<CaptureEvent>`.
//! Every field here is already safe to log: user and flag ids, never log
//! bodies or debug-level text.

/// One capture-controller telemetry event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// A trace flag was created for the given user.
    TraceFlagCreated {
        /// Target user id.
        user_id: String,
        /// New trace flag id.
        flag_id: String,
    },
    /// An existing trace flag was extended instead of recreated.
    TraceFlagExtended {
        /// Extended trace flag id.
        flag_id: String,
    },
    /// A row-lock conflict on flag creation triggered a retry.
    RowLockRetried {
        /// Retry attempt number, starting at 1.
        attempt: u32,
    },
    /// The system-executor user could not be located.
    AutomatedProcessUserMissing,
    /// A trace flag failed to delete during cleanup; the failure was swallowed.
    CleanupFailed {
        /// The flag id that failed to delete.
        flag_id: String,
        /// Human-readable failure detail.
        detail: String,
    },
}

// crates/apex-capture/src/session.rs
// ============================================================================
// Module: Capture Session
// Description: The scoped acquisition of trace flags for one analysis run.
// Purpose: Guarantee trace-flag deletion on every exit path (spec.md §3, §5).
// Dependencies: std
// ============================================================================

//! ## Overview
//! A [`CaptureSession`] owns the trace flags created for one analysis run.
//! Rust has no async `Drop`, so this crate cannot delete flags from a
//! destructor; instead, every caller MUST run the session through
//! [`crate::controller::CaptureController::with_session`], which calls
//! [`CaptureSession::release`] on every exit path including error and
//! cancellation, matching spec.md §5's "guaranteed release on all exit
//! paths" resource policy.

/// One capture session: the set of trace flags created for a single
/// analysis request.
///
/// # Invariants
/// - `trace_flag_ids` lists every flag this session created, never flags it
///   merely extended.
#[derive(Debug, Clone)]
pub struct CaptureSession {
    /// Org id the session operates against.
    pub org_id: String,
    /// Primary target user id.
    pub user_id: String,
    /// Debug level record id applied.
    pub debug_level_id: String,
    /// Trace flag ids this session is responsible for deleting.
    pub trace_flag_ids: Vec<String>,
    /// True when a warning about missing async coverage was raised.
    pub automated_process_coverage_missing: bool,
}

impl CaptureSession {
    /// Creates a new session descriptor with no flags yet.
    #[must_use]
    pub fn new(org_id: impl Into<String>, user_id: impl Into<String>, debug_level_id: impl Into<String>) -> Self {
        Self {
            org_id: org_id.into(),
            user_id: user_id.into(),
            debug_level_id: debug_level_id.into(),
            trace_flag_ids: Vec::new(),
            automated_process_coverage_missing: false,
        }
    }

    /// Records a trace flag this session is now responsible for.
    pub fn track(&mut self, flag_id: impl Into<String>) {
        self.trace_flag_ids.push(flag_id.into());
    }
}

// crates/apex-capture/src/trace_flag.rs
// ============================================================================
// Module: Trace Flag Lifecycle
// Description: The state machine governing one trace flag (spec.md §4.3).
// Purpose: Model {absent, creating, active, expiring, deleted} and its
//          transitions explicitly rather than inferring state from platform
//          responses ad hoc.
// Dependencies: time
// ============================================================================

//! ## Overview
//! A [`TraceFlag`] tracks one platform `TraceFlag` record's lifecycle.
//! `active -> expiring` is a read derived from the current time and a
//! caller-supplied buffer, not a platform-pushed event; `expiring -> active`
//! only happens via [`TraceFlag::extend`].

use time::Duration;
use time::OffsetDateTime;

/// Platform rule: a trace flag's expiration is capped at 24 hours from now.
pub const MAX_EXPIRATION: Duration = Duration::hours(24);

/// Lifecycle state of a trace flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceFlagState {
    /// No trace flag exists yet for this identity.
    Absent,
    /// A create call is in flight.
    Creating,
    /// The flag exists and is outside its expiring buffer.
    Active,
    /// The flag exists but is within its expiring buffer.
    Expiring,
    /// The flag has been deleted.
    Deleted,
}

/// One tracked trace flag.
///
/// # Invariants
/// - `expiration` is never more than [`MAX_EXPIRATION`] from its creation time.
#[derive(Debug, Clone)]
pub struct TraceFlag {
    /// Platform record id, once created.
    pub id: Option<String>,
    /// Target user id this flag captures.
    pub user_id: String,
    /// Debug level record id in effect.
    pub debug_level_id: String,
    /// Expiration time, once known.
    pub expiration: Option<OffsetDateTime>,
    /// Current lifecycle state.
    pub state: TraceFlagState,
}

impl TraceFlag {
    /// Creates a not-yet-created flag descriptor.
    #[must_use]
    pub fn pending(user_id: impl Into<String>, debug_level_id: impl Into<String>) -> Self {
        Self {
            id: None,
            user_id: user_id.into(),
            debug_level_id: debug_level_id.into(),
            expiration: None,
            state: TraceFlagState::Absent,
        }
    }

    /// Records a successful creation, clamping the requested duration to
    /// [`MAX_EXPIRATION`].
    pub fn mark_created(&mut self, id: impl Into<String>, now: OffsetDateTime, requested: Duration) {
        let capped = requested.min(MAX_EXPIRATION);
        self.id = Some(id.into());
        self.expiration = Some(now + capped);
        self.state = TraceFlagState::Active;
    }

    /// Updates `state` based on `now` and a remaining-time buffer, per
    /// spec.md §4.3's `active -> expiring` rule.
    pub fn refresh_state(&mut self, now: OffsetDateTime, buffer: Duration) {
        if self.state == TraceFlagState::Deleted || self.state == TraceFlagState::Absent {
            return;
        }
        match self.expiration {
            Some(expiration) if expiration - now < buffer => self.state = TraceFlagState::Expiring,
            Some(_) => self.state = TraceFlagState::Active,
            None => {}
        }
    }

    /// Extends the flag's expiration, transitioning `expiring -> active`.
    /// This is the only path back to [`TraceFlagState::Active`] once expiring.
    pub fn extend(&mut self, now: OffsetDateTime, requested: Duration) {
        let capped = requested.min(MAX_EXPIRATION);
        self.expiration = Some(now + capped);
        self.state = TraceFlagState::Active;
    }

    /// Marks the flag deleted.
    pub fn mark_deleted(&mut self) {
        self.state = TraceFlagState::Deleted;
    }

    /// Returns true when the flag needs a create or extend call before it can
    /// be relied on.
    #[must_use]
    pub fn needs_action(&self) -> bool {
        matches!(self.state, TraceFlagState::Absent | TraceFlagState::Expiring)
    }
}

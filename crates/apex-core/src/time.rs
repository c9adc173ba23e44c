// crates/apex-core/src/time.rs
// ============================================================================
// Module: Apex Time Model
// Description: Monotonic in-log timestamps, wall-clock instants, and the single
//              conversion utility bridging them.
// Purpose: Keep timestamp arithmetic centralized and deterministic (spec.md §4.1).
// Dependencies: time, serde
// ============================================================================

//! ## Overview
//! Events inside a single parsed log are nanosecond-monotonic from log start.
//! Platform job records use wall-clock ISO-8601 instants. The two are never
//! compared directly; [`to_wall`] is the only function that bridges them, so
//! every caller converts the same way.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;

// ============================================================================
// SECTION: In-Log Timestamps
// ============================================================================

/// Monotonic nanosecond offset from the start of a single log.
///
/// # Invariants
/// - Non-negative; the log parser is responsible for rejecting malformed
///   decreasing sequences (spec.md §8 non-decreasing invariant).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventTimestampNs(u64);

impl EventTimestampNs {
    /// Creates a new in-log timestamp from a nanosecond offset.
    #[must_use]
    pub const fn new(nanos: u64) -> Self {
        Self(nanos)
    }

    /// Returns the raw nanosecond offset.
    #[must_use]
    pub const fn as_nanos(self) -> u64 {
        self.0
    }

    /// Returns the offset in whole milliseconds, truncating any sub-millisecond
    /// remainder.
    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.0 / 1_000_000
    }

    /// Returns the difference `self - earlier` in milliseconds, or `None` if
    /// `earlier` is after `self`.
    #[must_use]
    pub const fn millis_since(self, earlier: Self) -> Option<u64> {
        if self.0 < earlier.0 {
            None
        } else {
            Some((self.0 - earlier.0) / 1_000_000)
        }
    }
}

impl fmt::Display for EventTimestampNs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ns", self.0)
    }
}

// ============================================================================
// SECTION: Wall-Clock Instants
// ============================================================================

/// A wall-clock instant, used for platform job bookkeeping records and log
/// start times.
///
/// # Invariants
/// - Always UTC; callers must not assume a local offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WallClock(#[serde(with = "time::serde::rfc3339")] OffsetDateTime);

impl WallClock {
    /// Creates a wall-clock instant from an [`OffsetDateTime`].
    #[must_use]
    pub const fn new(instant: OffsetDateTime) -> Self {
        Self(instant)
    }

    /// Returns the underlying [`OffsetDateTime`].
    #[must_use]
    pub const fn as_offset_date_time(self) -> OffsetDateTime {
        self.0
    }

    /// Returns a new instant offset by the given number of milliseconds.
    #[must_use]
    pub fn plus_millis(self, millis: i64) -> Self {
        Self(self.0 + time::Duration::milliseconds(millis))
    }

    /// Returns the whole-millisecond difference `self - earlier`, clamped to
    /// the range of `i64` if the actual difference is larger.
    #[must_use]
    pub fn millis_since(self, earlier: Self) -> i64 {
        let diff = (self.0 - earlier.0).whole_milliseconds();
        i64::try_from(diff).unwrap_or(if diff.is_negative() { i64::MIN } else { i64::MAX })
    }
}

// ============================================================================
// SECTION: Conversion
// ============================================================================

/// Converts an in-log timestamp to a wall-clock instant, given the owning
/// log's wall-clock start time.
///
/// This is the single utility named in spec.md §4.1:
/// `toWall(event_ns, log_start_wall) = log_start_wall + event_ns/1e6 ms`.
#[must_use]
pub fn to_wall(event_ns: EventTimestampNs, log_start_wall: WallClock) -> WallClock {
    let millis_offset = i64::try_from(event_ns.as_millis()).unwrap_or(i64::MAX);
    log_start_wall.plus_millis(millis_offset)
}

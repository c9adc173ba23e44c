// crates/apex-core/src/ids.rs
// ============================================================================
// Module: Apex Identifiers
// Description: Canonical opaque identifiers for logs, jobs, and events.
// Purpose: Provide strongly typed, serializable identifiers with stable wire forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! This module defines the opaque identifiers threaded through every other
//! crate in the workspace. Identifiers are newtypes so a parent log id can
//! never be passed where a platform job id is expected, even though both are
//! backed by a string or integer on the wire.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Log Identifiers
// ============================================================================

/// Opaque identifier for a parent `ApexLog` record.
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization or validation is applied by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParentLogId(String);

impl ParentLogId {
    /// Creates a new parent log identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParentLogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ParentLogId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ParentLogId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Opaque identifier for a child `ApexLog` record produced by the async executor.
///
/// # Invariants
/// - May be empty only when representing the "no child log found" case in a
///   degraded correlation (spec.md §4.6.5); callers must check
///   [`ChildLogId::is_empty`] before treating the value as a real log id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChildLogId(String);

impl ChildLogId {
    /// Creates a new child log identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the sentinel "no child log" identifier.
    #[must_use]
    pub fn none() -> Self {
        Self(String::new())
    }

    /// Returns true when this identifier represents "no child log found".
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChildLogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ChildLogId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ChildLogId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Job Identifiers
// ============================================================================

/// Opaque identifier for an `AsyncApexJob` record as the platform knows it.
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization or validation is applied by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlatformJobId(String);

impl PlatformJobId {
    /// Creates a new platform job identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlatformJobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for PlatformJobId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PlatformJobId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Local integer identifier for an [`crate::job_reference::AsyncJobReference`], unique within its
/// owning parent log.
///
/// # Invariants
/// - Unique only within the scope of a single parent log's extraction pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalRefId(u64);

impl LocalRefId {
    /// Creates a new local reference identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LocalRefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// SECTION: Event Identifiers
// ============================================================================

/// Stable integer identifier for an [`crate::event::Event`] within its owning log.
///
/// # Invariants
/// - Stable for the lifetime of the owning log; never reused within that log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(u64);

impl EventId {
    /// Creates a new event identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

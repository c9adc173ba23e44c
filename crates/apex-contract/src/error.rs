// crates/apex-contract/src/error.rs
// ============================================================================
// Module: Apex Error Contract
// Description: Machine-readable error codes and the workspace-wide error type.
// Purpose: Give every fallible boundary a stable, programmatic error shape
//          (spec.md §6.4, §7).
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Every error surfaced across a crate boundary in this workspace is an
//! [`ApexError`], carrying a stable [`ErrorCode`] and a short human-readable
//! suggestion. Errors are never exceptions-as-control-flow; this type is
//! always returned through a `Result`, per spec.md §7 and §9.

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Stable, machine-readable error code (spec.md §6.4).
///
/// # Invariants
/// - Variants are stable identifiers; their `snake_case` serialization is a
///   wire contract consumed by external callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Authentication with the platform failed.
    AuthFailed,
    /// The access token expired mid-operation.
    TokenExpired,
    /// The platform rate-limited the request.
    RateLimited,
    /// A platform query failed.
    QueryFailed,
    /// A log body exceeded the size cap.
    LogTooLarge,
    /// A trace-flag creation conflicted with a concurrent caller.
    TraceFlagConflict,
    /// The operation was cancelled.
    Cancelled,
    /// The operation exceeded its deadline.
    Timeout,
    /// The produced artifact's schema version is not supported by the caller.
    SchemaUnsupported,
}

impl ErrorCode {
    /// Returns a stable snake_case label for this code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AuthFailed => "AUTH_FAILED",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::RateLimited => "RATE_LIMITED",
            Self::QueryFailed => "QUERY_FAILED",
            Self::LogTooLarge => "LOG_TOO_LARGE",
            Self::TraceFlagConflict => "TRACE_FLAG_CONFLICT",
            Self::Cancelled => "CANCELLED",
            Self::Timeout => "TIMEOUT",
            Self::SchemaUnsupported => "SCHEMA_UNSUPPORTED",
        }
    }
}

/// The workspace-wide error type.
///
/// # Invariants
/// - [`ApexError::code`] is stable for a given variant.
/// - [`ApexError::suggestion`] is always non-empty.
#[derive(Debug, Error)]
pub enum ApexError {
    /// Transient I/O failure that exhausted its retry budget (spec.md §7.1).
    #[error("platform request failed: {message}")]
    Transient {
        /// Error code for this failure.
        code: ErrorCode,
        /// Human-readable description.
        message: String,
    },
    /// Authorization failure, fatal to the current capture session
    /// (spec.md §7.2).
    #[error("authorization failed: {message}")]
    Authorization {
        /// Human-readable description.
        message: String,
    },
    /// Malformed input recovered locally by skipping it (spec.md §7.3).
    #[error("data shape error: {message}")]
    DataShape {
        /// Human-readable description.
        message: String,
    },
    /// A resource limit was hit; a partial result was produced instead
    /// (spec.md §7.4).
    #[error("resource exhausted: {message}")]
    ResourceExhausted {
        /// Error code for this condition.
        code: ErrorCode,
        /// Human-readable description.
        message: String,
    },
    /// The operation was cancelled.
    #[error("operation cancelled")]
    Cancelled,
    /// An internal invariant was violated (spec.md §7.5); never recovered.
    #[error("internal invariant violated: {message}")]
    Invariant {
        /// Human-readable description.
        message: String,
    },
}

impl ApexError {
    /// Returns the stable [`ErrorCode`] for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Transient { code, .. } | Self::ResourceExhausted { code, .. } => *code,
            Self::Authorization { .. } => ErrorCode::AuthFailed,
            Self::DataShape { .. } => ErrorCode::QueryFailed,
            Self::Cancelled => ErrorCode::Cancelled,
            Self::Invariant { .. } => ErrorCode::QueryFailed,
        }
    }

    /// Returns a short, human-readable suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Transient { .. } => "retry the request; the platform may be temporarily unavailable",
            Self::Authorization { .. } => "re-authenticate and start a new capture session",
            Self::DataShape { .. } => "the malformed input was skipped; check the source log for corruption",
            Self::ResourceExhausted { code: ErrorCode::LogTooLarge, .. } => {
                "the log body exceeds the size cap; request a narrower capture window"
            }
            Self::ResourceExhausted { .. } => "a configured limit was reached; the result is partial",
            Self::Cancelled => "the caller cancelled the operation before it completed",
            Self::Invariant { .. } => "this is a bug; please report it with the triggering input",
        }
    }

    /// Returns true when this error should abort the current operation
    /// outright rather than allow partial progress (spec.md §7's
    /// propagation policy).
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Authorization { .. } | Self::Invariant { .. })
    }
}

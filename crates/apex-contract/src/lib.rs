// crates/apex-contract/src/lib.rs
// ============================================================================
// Module: Apex Contract
// Description: Wire-stable error codes and produced-artifact shapes.
// Purpose: Give every external caller of this workspace a stable schema to
//          depend on, independent of internal refactors (spec.md §6).
// Dependencies: apex-core, serde, serde_json, thiserror
// ============================================================================

//! # Apex Contract
//!
//! The wire-stable surface of the Apex async-execution correlation engine:
//! the error codes external callers match on (spec.md §6.4, §7), and the
//! three artifact shapes the engine produces (spec.md §6.2). Nothing in this
//! crate performs I/O or correlation logic; it only defines shapes.

#![deny(missing_docs)]

mod artifacts;
mod error;
mod telemetry;

pub use artifacts::referenced_child_logs;
pub use artifacts::CorrelationArtifact;
pub use artifacts::CorrelationSummary;
pub use artifacts::Limitation;
pub use artifacts::OverallStatus;
pub use artifacts::StreamingMeta;
pub use artifacts::StreamingRecordLine;
pub use artifacts::StreamingSummary;
pub use artifacts::UnifiedViewArtifact;
pub use artifacts::UnifiedViewSummary;
pub use artifacts::STREAMING_SCHEMA_VERSION;
pub use error::ApexError;
pub use error::ErrorCode;
pub use telemetry::ChannelSink;
pub use telemetry::EventSink;
pub use telemetry::NullSink;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streaming_meta_line_round_trips_through_json() {
        let line = StreamingRecordLine::Meta(StreamingMeta::new(Some("debug.log".to_string()), 4096));
        let text = serde_json::to_string(&line).expect("serialize meta line");
        let back: StreamingRecordLine = serde_json::from_str(&text).expect("deserialize meta line");
        assert_eq!(line, back);
    }

    #[test]
    fn error_code_serializes_screaming_snake_case() {
        let text = serde_json::to_string(&ErrorCode::TokenExpired).expect("serialize code");
        assert_eq!(text, "\"TOKEN_EXPIRED\"");
    }

    #[test]
    fn authorization_and_invariant_errors_are_fatal() {
        let auth = ApexError::Authorization { message: "bad token".to_string() };
        let invariant = ApexError::Invariant { message: "unreachable".to_string() };
        let transient = ApexError::Transient { code: ErrorCode::RateLimited, message: "slow down".to_string() };
        assert!(auth.is_fatal());
        assert!(invariant.is_fatal());
        assert!(!transient.is_fatal());
    }
}

// crates/apex-core/src/lib.rs
// ============================================================================
// Module: Apex Core
// Description: Shared event, identifier, confidence, and data-model types for
//              the Apex async correlation engine.
// Purpose: Provide the leaf crate every other crate in the workspace builds on.
// Dependencies: serde, thiserror, time
// ============================================================================

//! # Apex Core
//!
//! Shared types for the Apex async-execution correlation engine: the parsed
//! event model (C1), the data records C2–C7 operate on, and the confidence
//! and timestamp arithmetic used throughout. This crate performs no I/O and
//! holds no process state.

#![deny(missing_docs)]

mod class_name;
mod confidence;
mod correlation;
mod event;
mod ids;
mod job_reference;
mod log_record;
mod platform_job;
mod redaction_report;
mod signal;
mod time;
mod unified_node;
mod unified_view;

pub use class_name::ClassName;
pub use confidence::Confidence;
pub use confidence::ConfidenceLevel;
pub use confidence::HIGH_THRESHOLD;
pub use confidence::LOW_THRESHOLD;
pub use confidence::MEDIUM_THRESHOLD;
pub use correlation::Correlation;
pub use event::Event;
pub use event::EventKind;
pub use event::EventPayload;
pub use event::JobKind;
pub use ids::ChildLogId;
pub use ids::EventId;
pub use ids::LocalRefId;
pub use ids::ParentLogId;
pub use ids::PlatformJobId;
pub use job_reference::AsyncJobReference;
pub use log_record::LogRecord;
pub use log_record::LogStatus;
pub use platform_job::JobStatus;
pub use platform_job::PlatformJobRecord;
pub use redaction_report::RedactionReport;
pub use redaction_report::RedactionSpan;
pub use redaction_report::Sensitivity;
pub use signal::MatchReason;
pub use signal::MatchSignal;
pub use time::EventTimestampNs;
pub use time::WallClock;
pub use time::to_wall;
pub use unified_node::NodeKind;
pub use unified_node::TimeRange;
pub use unified_node::UnifiedExecutionNode;
pub use unified_view::FlowStatus;
pub use unified_view::UnifiedView;
pub use unified_view::ViewSummary;

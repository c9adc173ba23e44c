// crates/apex-contract/src/artifacts.rs
// ============================================================================
// Module: Apex Produced Artifacts
// Description: Wire shapes for the three artifacts this workspace produces.
// Purpose: Give downstream consumers a stable schema (spec.md §6.2).
// Dependencies: apex-core, serde
// ============================================================================

//! ## Overview
//! This module defines the three artifact shapes named in spec.md §6.2: the
//! line-delimited streaming event record, the correlation artifact, and the
//! unified view artifact. None of these ever contains unredacted PII; callers
//! are expected to have passed every text field through `apex-redaction`
//! before constructing one.

use apex_core::ChildLogId;
use apex_core::Confidence;
use apex_core::Correlation;
use apex_core::Event;
use apex_core::FlowStatus;
use apex_core::ParentLogId;
use apex_core::UnifiedExecutionNode;
use apex_core::UnifiedView;
use serde::Deserialize;
use serde::Serialize;

/// Current schema version for the streaming event record (spec.md §6.2).
pub const STREAMING_SCHEMA_VERSION: &str = "2.1";

// ============================================================================
// SECTION: Streaming Event Record
// ============================================================================

/// File-level metadata emitted as the first line of a streaming artifact.
///
/// # Invariants
/// - Always the first line when present; a streaming artifact with zero
///   lines is not valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamingMeta {
    /// Source file name, when known.
    pub filename: Option<String>,
    /// Source byte size.
    pub size_bytes: u64,
    /// Detected debug levels present in the source log.
    pub detected_debug_levels: Vec<String>,
    /// True when the source was truncated before parsing completed.
    pub truncated: bool,
    /// Schema version, always [`STREAMING_SCHEMA_VERSION`] for lines produced
    /// by this workspace.
    pub schema_version: String,
}

impl StreamingMeta {
    /// Creates a new metadata line with the current schema version.
    #[must_use]
    pub fn new(filename: Option<String>, size_bytes: u64) -> Self {
        Self {
            filename,
            size_bytes,
            detected_debug_levels: Vec::new(),
            truncated: false,
            schema_version: STREAMING_SCHEMA_VERSION.to_string(),
        }
    }
}

/// Summary counts emitted as the optional final line of a streaming artifact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamingSummary {
    /// Total events emitted before this summary line.
    pub event_count: u64,
    /// Number of async job references detected, if extraction ran.
    pub async_job_count: Option<u64>,
}

/// One line of a line-delimited streaming event record (spec.md §6.2).
///
/// # Invariants
/// - A consumer can tolerate truncation mid-file: each line is independently
///   valid JSON, and a `META` line always precedes any `EVENT` or `SUMMARY`
///   line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "line_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StreamingRecordLine {
    /// File-level metadata; always the first line.
    Meta(StreamingMeta),
    /// A single parsed event.
    Event(Box<Event>),
    /// Optional trailing summary counts.
    Summary(StreamingSummary),
}

// ============================================================================
// SECTION: Limitations
// ============================================================================

/// A recorded partial-result limitation (spec.md §7.4).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Limitation {
    /// Short machine-readable reason (e.g. `max_children_reached`).
    pub reason: String,
    /// Human-readable detail.
    pub detail: String,
}

// ============================================================================
// SECTION: Correlation Artifact
// ============================================================================

/// Top-level summary for a correlation artifact (spec.md §4.7).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationSummary {
    /// Number of job references considered.
    pub total_references: u64,
    /// Number of references that produced an emitted correlation.
    pub correlated_references: u64,
    /// Mean overall confidence across emitted correlations.
    pub mean_confidence: Confidence,
    /// Partial-result limitations encountered, if any.
    pub limitations: Vec<Limitation>,
}

/// The correlation artifact produced for one parent log (spec.md §6.2).
///
/// # Invariants
/// - Never contains unredacted PII.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationArtifact {
    /// Parent log identifier.
    pub parent_log_id: ParentLogId,
    /// Emitted correlations, each with its own signal list.
    pub correlations: Vec<Correlation>,
    /// Top-level summary.
    pub summary: CorrelationSummary,
}

impl CorrelationArtifact {
    /// Builds the wire artifact for `parent_log_id` from the correlator's
    /// output: `references_considered` is the reference count the correlator
    /// was given, used for `summary.total_references` since a reference that
    /// matched nothing never appears in `correlations` itself.
    #[must_use]
    pub fn from_correlations(
        parent_log_id: ParentLogId,
        references_considered: usize,
        correlations: Vec<Correlation>,
        limitations: Vec<Limitation>,
    ) -> Self {
        let total_references = u64::try_from(references_considered).unwrap_or(u64::MAX);
        let correlated_references =
            u64::try_from(correlations.iter().filter(|correlation| !correlation.is_degraded()).count()).unwrap_or(u64::MAX);
        let mean_confidence = if correlations.is_empty() {
            Confidence::ONE
        } else {
            let sum: f64 = correlations.iter().map(|correlation| correlation.overall_confidence.get()).sum();
            #[allow(clippy::cast_precision_loss, reason = "correlation counts stay well within f64's exact integer range")]
            let mean = sum / correlations.len() as f64;
            Confidence::new(mean)
        };
        let summary = CorrelationSummary { total_references, correlated_references, mean_confidence, limitations };
        Self { parent_log_id, correlations, summary }
    }
}

// ============================================================================
// SECTION: Unified View Artifact
// ============================================================================

/// Overall execution status for a unified view (spec.md §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    /// No resolved job record failed or was aborted.
    Success,
    /// Every resolved job record failed or was aborted.
    Failure,
    /// Some resolved job records failed or were aborted, and some succeeded.
    PartialFailure,
}

/// Summary for a unified view artifact (spec.md §4.7).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedViewSummary {
    /// Sum of every fetched log's event-range duration plus non-negative
    /// queue delays.
    pub total_duration_millis: u64,
    /// Overall execution status.
    pub overall_status: OverallStatus,
    /// Short deterministic description of the flow (spec.md §4.7).
    pub flow_description: String,
    /// Number of children that had no emitted correlation.
    pub uncorrelated_children: u64,
    /// Confidence of the view as a whole.
    pub overall_confidence: Confidence,
}

/// The unified view artifact for one parent log (spec.md §6.2).
///
/// # Invariants
/// - Never contains unredacted PII.
/// - `root.owning_log_id` equals `parent_log_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedViewArtifact {
    /// Parent log identifier.
    pub parent_log_id: ParentLogId,
    /// Root node of the unified execution tree.
    pub root: UnifiedExecutionNode,
    /// Summary aggregation.
    pub summary: UnifiedViewSummary,
}

impl UnifiedViewArtifact {
    /// Builds the wire artifact for `parent_log_id` from a freshly built
    /// [`UnifiedView`] (spec.md §6.2); `root.owning_log_id` is left exactly
    /// as the builder produced it, per this type's own invariant.
    #[must_use]
    pub fn from_view(parent_log_id: ParentLogId, view: UnifiedView) -> Self {
        let uncorrelated = view.summary.total_children.saturating_sub(view.summary.correlated_children);
        let summary = UnifiedViewSummary {
            total_duration_millis: view.summary.total_duration_millis,
            overall_status: match view.summary.status {
                FlowStatus::Success => OverallStatus::Success,
                FlowStatus::Failure => OverallStatus::Failure,
                FlowStatus::PartialFailure => OverallStatus::PartialFailure,
            },
            flow_description: view.summary.flow_description,
            uncorrelated_children: u64::try_from(uncorrelated).unwrap_or(u64::MAX),
            overall_confidence: view.overall_confidence,
        };
        Self { parent_log_id, root: view.root, summary }
    }
}

/// Returns the child log ids referenced anywhere in `artifact`'s tree, for
/// callers that need to know which child logs were actually spliced in.
#[must_use]
pub fn referenced_child_logs(artifact: &UnifiedViewArtifact) -> Vec<ChildLogId> {
    fn walk(node: &UnifiedExecutionNode, out: &mut Vec<ChildLogId>) {
        if matches!(node.kind, apex_core::NodeKind::AsyncChild) {
            out.push(ChildLogId::new(node.owning_log_id.as_str()));
        }
        for child in &node.children {
            walk(child, out);
        }
    }
    let mut out = Vec::new();
    walk(&artifact.root, &mut out);
    out
}

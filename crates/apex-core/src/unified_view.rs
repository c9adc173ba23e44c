// crates/apex-core/src/unified_view.rs
// ============================================================================
// Module: Apex Unified View
// Description: The top-level artifact the unified view builder (C7) produces:
//              the execution tree plus its aggregated summary and confidence.
// Purpose: Represent spec.md §4.7's "summary aggregation" and "overall
//          confidence of the view" alongside the tree itself.
// Dependencies: crate::{confidence, unified_node}, serde
// ============================================================================

//! ## Overview
//! A [`UnifiedView`] pairs the [`crate::unified_node::UnifiedExecutionNode`]
//! tree with the deterministic summary spec.md §4.7 describes: total
//! duration, overall status, a short flow description, and a confidence
//! blending extraction and correlation confidence.

use serde::Deserialize;
use serde::Serialize;

use crate::confidence::Confidence;
use crate::unified_node::UnifiedExecutionNode;

/// Overall execution status derived from every resolved platform job record
/// in the view (spec.md §4.7).
///
/// # Invariants
/// - `Success` requires zero failed/aborted resolved records.
/// - `Failure` requires every resolved record to be failed/aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStatus {
    /// No resolved platform job record failed or was aborted.
    Success,
    /// Every resolved platform job record failed or was aborted.
    Failure,
    /// Some, but not all, resolved platform job records failed or were
    /// aborted.
    PartialFailure,
}

/// Deterministic aggregation over a unified view's correlations
/// (spec.md §4.7).
///
/// # Invariants
/// - `correlated_children <= total_children`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSummary {
    /// Sum of each fetched log's own event-span duration, plus every
    /// non-negative queue delay, in milliseconds.
    pub total_duration_millis: u64,
    /// Overall execution status.
    pub status: FlowStatus,
    /// Short, deterministic human-readable description of the flow.
    pub flow_description: String,
    /// Number of references that resolved to a non-degraded correlation.
    pub correlated_children: usize,
    /// Total number of references considered.
    pub total_children: usize,
}

/// The complete artifact produced by the unified view builder (C7).
///
/// # Invariants
/// - `overall_confidence` is a deterministic function of `extraction
///   confidence`, the correlations folded into `summary`, and
///   `summary.correlated_children`/`summary.total_children`
///   (spec.md §4.7).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedView {
    /// Root node of the execution tree.
    pub root: UnifiedExecutionNode,
    /// Aggregated summary.
    pub summary: ViewSummary,
    /// Overall confidence of the view.
    pub overall_confidence: Confidence,
}

// crates/apex-core/src/unified_node.rs
// ============================================================================
// Module: Apex Unified Execution Node
// Description: A node in the unified parent/child execution tree.
// Purpose: Represent the unified view builder's (C7) output shape (spec.md §3).
// Dependencies: crate::{event, ids, job_reference, time}, serde
// ============================================================================

//! ## Overview
//! A [`UnifiedExecutionNode`] is one node of the tree C7 assembles by
//! splicing a parent log's events around its async boundaries and attaching
//! each boundary's correlated child log, if any. The root is always a
//! `Sync` node covering the parent log's full event range.

use serde::Deserialize;
use serde::Serialize;

use crate::event::Event;
use crate::ids::ParentLogId;
use crate::job_reference::AsyncJobReference;
use crate::time::EventTimestampNs;

/// The kind of a unified execution node.
///
/// # Invariants
/// - Variants are stable for serialization and cross-crate matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// A synchronous segment of a log's event stream.
    Sync,
    /// A single-event node marking an async enqueue boundary.
    AsyncBoundary,
    /// The spliced-in events of a correlated child log.
    AsyncChild,
}

/// A half-open time range `[start, end)` in in-log nanoseconds.
///
/// # Invariants
/// - `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Inclusive start of the range.
    pub start: EventTimestampNs,
    /// Exclusive end of the range.
    pub end: EventTimestampNs,
}

impl TimeRange {
    /// Creates a time range, widening `end` up to `start` if it would
    /// otherwise be smaller.
    #[must_use]
    pub fn new(start: EventTimestampNs, end: EventTimestampNs) -> Self {
        if end < start {
            Self { start, end: start }
        } else {
            Self { start, end }
        }
    }

    /// Returns true when this range fully contains `other`
    /// (spec.md §8's node invariant).
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Returns a range covering both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// A node in the unified execution tree.
///
/// # Invariants
/// - `time_range` contains the time range of every descendant
///   (spec.md §3, §8).
/// - `job_reference` is `Some` only for [`NodeKind::AsyncBoundary`] and
///   [`NodeKind::AsyncChild`] nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedExecutionNode {
    /// Node identifier, unique within the owning tree.
    pub id: u64,
    /// Node kind.
    pub kind: NodeKind,
    /// Id of the log this node's events belong to.
    pub owning_log_id: ParentLogId,
    /// Events belonging to this segment.
    pub events: Vec<Event>,
    /// Child nodes.
    pub children: Vec<UnifiedExecutionNode>,
    /// Job reference for boundary/child nodes.
    pub job_reference: Option<AsyncJobReference>,
    /// Half-open time range covering this node and all descendants.
    pub time_range: TimeRange,
}

impl UnifiedExecutionNode {
    /// Returns true when `time_range` contains every child's `time_range`
    /// (spec.md §8's node invariant), checked recursively.
    #[must_use]
    pub fn time_range_is_consistent(&self) -> bool {
        self.children.iter().all(|child| {
            self.time_range.contains(&child.time_range) && child.time_range_is_consistent()
        })
    }
}

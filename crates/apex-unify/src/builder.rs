// crates/apex-unify/src/builder.rs
// ============================================================================
// Module: Unified Tree Builder
// Description: Splits a log's event stream around its async boundaries and
//              splices in correlated child logs (spec.md §4.7 steps 1-5).
// Purpose: Produce the `UnifiedExecutionNode` tree the view builder (C7)
//          exposes, recursing into grandchildren when enabled.
// Dependencies: apex-core, crate::context
// ============================================================================

//! ## Overview
//! [`build_view`] is the only entry point. It instantiates a root node
//! spanning the log's full event range, partitions the event list at
//! enqueuing events into alternating sync segments and single-event async
//! boundaries, and attaches a correlated child log's own (recursively split)
//! tree to each boundary whose correlation has a non-empty child log id.

use apex_core::Confidence;
use apex_core::Correlation;
use apex_core::Event;
use apex_core::EventTimestampNs;
use apex_core::NodeKind;
use apex_core::ParentLogId;
use apex_core::TimeRange;
use apex_core::UnifiedExecutionNode;
use apex_core::UnifiedView;

use crate::context::LogContext;
use crate::context::LogContextResolver;
use crate::summary;

/// Options controlling how deep the builder recurses into correlated child
/// logs (spec.md §4.7 step 5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnifiedViewOptions {
    /// Whether correlated child logs are themselves split around their own
    /// async boundaries. When `false`, a fetched child log is attached as a
    /// single flat async-child node.
    pub include_grandchildren: bool,
    /// Maximum recursion depth; the root log is depth 0. Recursion into a
    /// child log stops once `depth + 1 >= max_depth`.
    pub max_depth: u32,
}

impl Default for UnifiedViewOptions {
    fn default() -> Self {
        Self { include_grandchildren: false, max_depth: 1 }
    }
}

/// Monotonically-increasing node id allocator, unique within one tree.
struct NodeIdAllocator {
    /// Next id to hand out.
    next: u64,
}

impl NodeIdAllocator {
    /// Creates an allocator starting at zero.
    const fn new() -> Self {
        Self { next: 0 }
    }

    /// Returns the next unused id.
    fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Builds the complete unified view for `root`: the execution tree plus its
/// aggregated summary and overall confidence (spec.md §4.7).
#[must_use]
pub fn build_view(
    root: &LogContext,
    extraction_confidence: Confidence,
    resolver: &dyn LogContextResolver,
    options: &UnifiedViewOptions,
) -> UnifiedView {
    let mut ids = NodeIdAllocator::new();
    let mut fetched_durations_millis = Vec::new();
    let mut all_correlations = Vec::new();

    let root_node =
        split_log(NodeKind::Sync, 0, &mut ids, root, resolver, options, &mut fetched_durations_millis, &mut all_correlations);

    let summary = summary::build_summary(&fetched_durations_millis, &all_correlations);
    let overall_confidence = summary::overall_confidence(extraction_confidence, &summary, &all_correlations);

    UnifiedView { root: root_node, summary, overall_confidence }
}

/// Records a context's own event-span duration and correlations into the
/// running accumulators, regardless of whether it is later split further.
fn record_context(context: &LogContext, fetched_durations_millis: &mut Vec<u64>, all_correlations: &mut Vec<Correlation>) {
    if let (Some(first), Some(last)) = (context.events.first(), context.events.last()) {
        fetched_durations_millis.push(last.timestamp.as_millis().saturating_sub(first.timestamp.as_millis()));
    }
    all_correlations.extend(context.correlations.iter().cloned());
}

/// Splits one log's event stream into a `kind`-tagged container node holding
/// alternating sync-segment and async-boundary children (spec.md §4.7 steps
/// 1-4), recursing into boundaries per `options`.
#[allow(clippy::too_many_arguments, reason = "internal recursive worker, not part of the public surface")]
fn split_log(
    kind: NodeKind,
    depth: u32,
    ids: &mut NodeIdAllocator,
    context: &LogContext,
    resolver: &dyn LogContextResolver,
    options: &UnifiedViewOptions,
    fetched_durations_millis: &mut Vec<u64>,
    all_correlations: &mut Vec<Correlation>,
) -> UnifiedExecutionNode {
    record_context(context, fetched_durations_millis, all_correlations);

    let mut own_range = match (context.events.first(), context.events.last()) {
        (Some(first), Some(last)) => TimeRange::new(first.timestamp, last.timestamp),
        _ => TimeRange::new(EventTimestampNs::new(0), EventTimestampNs::new(0)),
    };

    let mut children = Vec::new();
    let mut sync_buffer: Vec<Event> = Vec::new();

    for event in &context.events {
        let matching_reference = context.references.iter().find(|reference| reference.enqueuing_event == event.id);

        if let Some(reference) = matching_reference {
            if !sync_buffer.is_empty() {
                children.push(sync_segment_node(ids, &context.log_id, std::mem::take(&mut sync_buffer)));
            }
            let boundary = build_boundary_node(
                depth,
                ids,
                context,
                reference,
                event,
                resolver,
                options,
                fetched_durations_millis,
                all_correlations,
            );
            own_range = own_range.union(&boundary.time_range);
            children.push(boundary);
        } else {
            sync_buffer.push(event.clone());
        }
    }

    if !sync_buffer.is_empty() {
        children.push(sync_segment_node(ids, &context.log_id, sync_buffer));
    }

    UnifiedExecutionNode {
        id: ids.next_id(),
        kind,
        owning_log_id: context.log_id.clone(),
        events: Vec::new(),
        children,
        job_reference: None,
        time_range: own_range,
    }
}

/// Builds a trailing or leading sync-segment child node from a contiguous
/// run of non-enqueuing events (spec.md §4.7 step 3).
fn sync_segment_node(ids: &mut NodeIdAllocator, owning_log_id: &ParentLogId, events: Vec<Event>) -> UnifiedExecutionNode {
    let range = match (events.first(), events.last()) {
        (Some(first), Some(last)) => TimeRange::new(first.timestamp, last.timestamp),
        _ => TimeRange::new(EventTimestampNs::new(0), EventTimestampNs::new(0)),
    };
    UnifiedExecutionNode {
        id: ids.next_id(),
        kind: NodeKind::Sync,
        owning_log_id: owning_log_id.clone(),
        events,
        children: Vec::new(),
        job_reference: None,
        time_range: range,
    }
}

/// Builds one single-event async-boundary node and, when the reference's
/// correlation has a non-empty child log, attaches its async-child node
/// (spec.md §4.7 step 4).
#[allow(clippy::too_many_arguments, reason = "internal recursive worker, not part of the public surface")]
fn build_boundary_node(
    depth: u32,
    ids: &mut NodeIdAllocator,
    context: &LogContext,
    reference: &apex_core::AsyncJobReference,
    event: &Event,
    resolver: &dyn LogContextResolver,
    options: &UnifiedViewOptions,
    fetched_durations_millis: &mut Vec<u64>,
    all_correlations: &mut Vec<Correlation>,
) -> UnifiedExecutionNode {
    let mut end = event.timestamp;
    let mut children = Vec::new();

    let correlation = context
        .correlations
        .iter()
        .find(|correlation| correlation.job_reference.id == reference.id && !correlation.child_log_id.is_empty());

    if let Some(correlation) = correlation {
        let anchor_ns = anchor_for(correlation, event.timestamp);
        let child_context = resolver.resolve(&correlation.child_log_id);

        let async_child = match child_context {
            Some(child) if options.include_grandchildren && depth + 1 < options.max_depth => {
                let shifted = shift_context(child, anchor_ns);
                split_log(NodeKind::AsyncChild, depth + 1, ids, &shifted, resolver, options, fetched_durations_millis, all_correlations)
            }
            Some(child) => {
                record_context(&child, fetched_durations_millis, all_correlations);
                leaf_async_child(ids, &child.log_id, shift_events(child.events, anchor_ns))
            }
            None => leaf_async_child(ids, &ParentLogId::new(correlation.child_log_id.as_str()), Vec::new()),
        };

        end = end.max(async_child.time_range.end);
        children.push(async_child);
    }

    UnifiedExecutionNode {
        id: ids.next_id(),
        kind: NodeKind::AsyncBoundary,
        owning_log_id: context.log_id.clone(),
        events: vec![event.clone()],
        children,
        job_reference: Some(reference.clone()),
        time_range: TimeRange::new(event.timestamp, end),
    }
}

/// Builds a flat async-child leaf node carrying `events` without further
/// splitting (the non-recursive branch of spec.md §4.7 step 4).
fn leaf_async_child(ids: &mut NodeIdAllocator, owning_log_id: &ParentLogId, events: Vec<Event>) -> UnifiedExecutionNode {
    let range = match (events.first(), events.last()) {
        (Some(first), Some(last)) => TimeRange::new(first.timestamp, last.timestamp),
        _ => TimeRange::new(EventTimestampNs::new(0), EventTimestampNs::new(0)),
    };
    UnifiedExecutionNode {
        id: ids.next_id(),
        kind: NodeKind::AsyncChild,
        owning_log_id: owning_log_id.clone(),
        events,
        children: Vec::new(),
        job_reference: None,
        time_range: range,
    }
}

/// Returns the in-parent-timeline nanosecond offset at which a correlated
/// child log's own `t=0` should be placed: the enqueue instant, advanced by
/// the correlation's non-negative queue delay when known.
fn anchor_for(correlation: &Correlation, enqueue_ts: EventTimestampNs) -> u64 {
    let delay_ns = correlation
        .queue_delay_millis
        .and_then(|millis| u64::try_from(millis).ok())
        .and_then(|millis| millis.checked_mul(1_000_000))
        .unwrap_or(0);
    enqueue_ts.as_nanos().saturating_add(delay_ns)
}

/// Returns `events` with every timestamp shifted into the parent timeline by
/// `anchor_ns`.
fn shift_events(mut events: Vec<Event>, anchor_ns: u64) -> Vec<Event> {
    for event in &mut events {
        event.timestamp = EventTimestampNs::new(anchor_ns.saturating_add(event.timestamp.as_nanos()));
    }
    events
}

/// Returns `context` with its events and its references' `enqueue_time`
/// shifted into the parent timeline by `anchor_ns`, preserving the
/// invariant that a reference's `enqueue_time` equals its enqueuing event's
/// timestamp, for the recursive split path.
fn shift_context(mut context: LogContext, anchor_ns: u64) -> LogContext {
    context.events = shift_events(context.events, anchor_ns);
    for reference in &mut context.references {
        reference.enqueue_time = EventTimestampNs::new(anchor_ns.saturating_add(reference.enqueue_time.as_nanos()));
    }
    context
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use apex_core::ChildLogId;
    use apex_core::ClassName;
    use apex_core::Confidence;
    use apex_core::ConfidenceLevel;
    use apex_core::EventId;
    use apex_core::EventKind;
    use apex_core::JobKind;
    use apex_core::LocalRefId;
    use apex_core::MatchReason;
    use apex_core::MatchSignal;

    use super::*;
    use crate::context::MapResolver;
    use crate::context::NoFetchResolver;

    fn event(id: u64, kind: EventKind, nanos: u64) -> Event {
        Event { id: EventId::new(id), kind, timestamp: EventTimestampNs::new(nanos), line: None, class_name: None, method_name: None, namespace: None, payload: None }
    }

    fn reference(id: u64, enqueuing_event: u64, enqueue_ns: u64) -> apex_core::AsyncJobReference {
        apex_core::AsyncJobReference {
            id: LocalRefId::new(id),
            job_kind: JobKind::Queueable,
            class_name: ClassName::from_text(Some("MyQueueable")),
            method_name: None,
            enqueuing_event: EventId::new(enqueuing_event),
            enqueue_time: EventTimestampNs::new(enqueue_ns),
            platform_job_id: None,
            stack_depth: 0,
            namespace: None,
        }
    }

    fn correlation(reference: &apex_core::AsyncJobReference, child_log_id: &str) -> Correlation {
        let signals = vec![MatchSignal::new(MatchReason::ClassName, 1.0, "class match")];
        Correlation {
            parent_log_id: ParentLogId::new("07L000000000001AAA"),
            child_log_id: ChildLogId::new(child_log_id),
            job_reference: reference.clone(),
            resolved_job: None,
            signals,
            overall_confidence: Confidence::ONE,
            level: ConfidenceLevel::High,
            resolved_status: None,
            queue_delay_millis: Some(0),
            execution_duration_millis: Some(0),
        }
    }

    #[test]
    fn splits_one_enqueue_into_leading_sync_boundary_and_trailing_sync() {
        let reference = reference(0, 1, 1_000_000);
        let events = vec![
            event(0, EventKind::MethodEntry, 0),
            event(1, EventKind::AsyncJobEnqueued, 1_000_000),
            event(2, EventKind::MethodExit, 2_000_000),
        ];
        let context = LogContext { log_id: ParentLogId::new("07L000000000001AAA"), events, references: vec![reference], correlations: Vec::new() };

        let view = build_view(&context, Confidence::ONE, &NoFetchResolver, &UnifiedViewOptions::default());

        assert_eq!(view.root.kind, NodeKind::Sync);
        assert_eq!(view.root.children.len(), 2);
        assert_eq!(view.root.children[0].kind, NodeKind::Sync);
        assert_eq!(view.root.children[1].kind, NodeKind::AsyncBoundary);
        assert!(view.root.children[1].children.is_empty());
        assert!(view.root.time_range_is_consistent());
    }

    #[test]
    fn attaches_flat_async_child_when_fetched_without_grandchildren() {
        let reference = reference(0, 0, 0);
        let parent_events = vec![event(0, EventKind::AsyncJobEnqueued, 0)];
        let child_events = vec![event(10, EventKind::MethodEntry, 0), event(11, EventKind::MethodExit, 5_000_000)];
        let child_context = LogContext {
            log_id: ParentLogId::new("07L000000000002AAA"),
            events: child_events,
            references: Vec::new(),
            correlations: Vec::new(),
        };
        let correlation = correlation(&reference, "07L000000000002AAA");
        let context = LogContext {
            log_id: ParentLogId::new("07L000000000001AAA"),
            events: parent_events,
            references: vec![reference],
            correlations: vec![correlation],
        };
        let mut contexts = HashMap::new();
        contexts.insert(ChildLogId::new("07L000000000002AAA"), child_context);
        let resolver = MapResolver::new(contexts);

        let view = build_view(&context, Confidence::ONE, &resolver, &UnifiedViewOptions::default());

        let boundary = &view.root.children[0];
        assert_eq!(boundary.kind, NodeKind::AsyncBoundary);
        assert_eq!(boundary.children.len(), 1);
        let async_child = &boundary.children[0];
        assert_eq!(async_child.kind, NodeKind::AsyncChild);
        assert_eq!(async_child.children.len(), 0);
        assert_eq!(async_child.events.len(), 2);
        assert_eq!(boundary.time_range.end, EventTimestampNs::new(5_000_000));
        assert!(view.root.time_range_is_consistent());
    }

    #[test]
    fn attaches_empty_async_child_when_not_fetched() {
        let reference = reference(0, 0, 0);
        let parent_events = vec![event(0, EventKind::AsyncJobEnqueued, 0)];
        let correlation = correlation(&reference, "07L000000000002AAA");
        let context = LogContext {
            log_id: ParentLogId::new("07L000000000001AAA"),
            events: parent_events,
            references: vec![reference],
            correlations: vec![correlation],
        };

        let view = build_view(&context, Confidence::ONE, &NoFetchResolver, &UnifiedViewOptions::default());

        let boundary = &view.root.children[0];
        assert_eq!(boundary.children.len(), 1);
        let async_child = &boundary.children[0];
        assert_eq!(async_child.kind, NodeKind::AsyncChild);
        assert!(async_child.events.is_empty());
    }

    #[test]
    fn recurses_into_grandchildren_when_enabled() {
        let outer_reference = reference(0, 0, 0);
        let inner_reference = reference(0, 11, 5_000_000);
        let parent_events = vec![event(0, EventKind::AsyncJobEnqueued, 0)];
        let grandchild_events = vec![event(20, EventKind::MethodEntry, 0)];
        let grandchild_context = LogContext {
            log_id: ParentLogId::new("07L000000000003AAA"),
            events: grandchild_events,
            references: Vec::new(),
            correlations: Vec::new(),
        };
        let inner_correlation = correlation(&inner_reference, "07L000000000003AAA");
        let child_events = vec![event(11, EventKind::AsyncJobEnqueued, 5_000_000)];
        let child_context = LogContext {
            log_id: ParentLogId::new("07L000000000002AAA"),
            events: child_events,
            references: vec![inner_reference],
            correlations: vec![inner_correlation],
        };
        let outer_correlation = correlation(&outer_reference, "07L000000000002AAA");
        let context = LogContext {
            log_id: ParentLogId::new("07L000000000001AAA"),
            events: parent_events,
            references: vec![outer_reference],
            correlations: vec![outer_correlation],
        };

        let mut contexts = HashMap::new();
        contexts.insert(ChildLogId::new("07L000000000002AAA"), child_context);
        contexts.insert(ChildLogId::new("07L000000000003AAA"), grandchild_context);
        let resolver = MapResolver::new(contexts);
        let options = UnifiedViewOptions { include_grandchildren: true, max_depth: 2 };

        let view = build_view(&context, Confidence::ONE, &resolver, &options);

        let boundary = &view.root.children[0];
        let async_child = &boundary.children[0];
        assert_eq!(async_child.kind, NodeKind::AsyncChild);
        assert_eq!(async_child.children.len(), 1, "child log's own boundary should be spliced in");
        assert!(view.root.time_range_is_consistent());
    }
}

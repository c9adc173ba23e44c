// crates/apex-extract/src/extractor.rs
// ============================================================================
// Module: Job Extractor
// Description: The single left-to-right extraction pass over a parent log's
//              event stream (spec.md §4.4).
// Purpose: Turn a flat event stream into deduplicated async job references
//          plus an extraction confidence score.
// Dependencies: apex-core, crate::classifiers, crate::confidence, crate::stack
// ============================================================================

//! ## Overview
//! [`extract`] is the only entry point this crate exposes. It runs the four
//! classifiers from `crate::classifiers` in priority order against each
//! event, maintains stack depth with `crate::stack::DepthTracker`, and
//! deduplicates via [`apex_core::AsyncJobReference::is_duplicate_of`].

use apex_core::AsyncJobReference;
use apex_core::Confidence;
use apex_core::Event;
use apex_core::LocalRefId;

use crate::classifiers::debug_statement_job_id;
use crate::classifiers::direct_async_event;
use crate::classifiers::future_annotation;
use crate::classifiers::method_call_pattern;
use crate::classifiers::Candidate;
use crate::confidence::extraction_confidence;
use crate::stack::DepthTracker;

/// The result of one extraction pass over a parent log's events.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionResult {
    /// Deduplicated async job references, in the order their enqueuing
    /// event first appeared.
    pub references: Vec<AsyncJobReference>,
    /// Confidence in the extraction pass itself (spec.md §4.4), independent
    /// of any later tracker/correlator scoring.
    pub confidence: Confidence,
}

/// Scans `events` once, left to right, and returns every async job
/// reference found.
///
/// # Invariants
/// - Each returned reference's `enqueuing_event` is the id of an event in
///   `events` (spec.md §3).
/// - References are returned in the order their enqueuing event first
///   appeared; classifier-4 upgrades never reorder them.
#[must_use]
pub fn extract(events: &[Event]) -> ExtractionResult {
    let mut depth_tracker = DepthTracker::new();
    let mut references: Vec<AsyncJobReference> = Vec::new();
    let mut next_id = 0_u64;

    for (index, event) in events.iter().enumerate() {
        let depth = depth_tracker.observe(event);

        if let Some(discovered) = debug_statement_job_id(event) {
            if let Some(reference) = references.iter_mut().rev().find(|reference| reference.platform_job_id.is_none()) {
                reference.upgrade_platform_job_id(discovered);
            }
            continue;
        }

        let candidate = direct_async_event(event)
            .or_else(|| future_annotation(event))
            .or_else(|| method_call_pattern(events, index));

        let Some(candidate) = candidate else { continue };

        let new_reference = build_reference(next_id, candidate, event, depth);
        match references.iter_mut().find(|existing| existing.is_duplicate_of(&new_reference)) {
            Some(existing) => {
                if let Some(discovered) = new_reference.platform_job_id {
                    existing.upgrade_platform_job_id(discovered);
                }
            }
            None => {
                next_id += 1;
                references.push(new_reference);
            }
        }
    }

    let confidence = extraction_confidence(events.len(), &references);
    ExtractionResult { references, confidence }
}

/// Assembles a full [`AsyncJobReference`] from a classifier's partial
/// [`Candidate`] plus the enqueuing event and current stack depth.
fn build_reference(local_id: u64, candidate: Candidate, event: &Event, depth: u32) -> AsyncJobReference {
    AsyncJobReference {
        id: LocalRefId::new(local_id),
        job_kind: candidate.job_kind,
        class_name: candidate.class_name,
        method_name: candidate.method_name,
        enqueuing_event: event.id,
        enqueue_time: event.timestamp,
        platform_job_id: candidate.platform_job_id,
        stack_depth: depth,
        namespace: event.namespace.clone(),
    }
}

#[cfg(test)]
mod tests {
    use apex_core::ClassName;
    use apex_core::EventId;
    use apex_core::EventKind;
    use apex_core::EventPayload;
    use apex_core::EventTimestampNs;
    use apex_core::JobKind;

    use super::*;

    fn event(id: u64, kind: EventKind, timestamp_ns: u64) -> Event {
        Event {
            id: EventId::new(id),
            kind,
            timestamp: EventTimestampNs::new(timestamp_ns),
            line: None,
            class_name: None,
            method_name: None,
            namespace: None,
            payload: None,
        }
    }

    fn direct_enqueue(id: u64, timestamp_ns: u64, class: &str, platform_job_id: Option<&str>) -> Event {
        let mut event = event(id, EventKind::AsyncJobEnqueued, timestamp_ns);
        event.payload = Some(EventPayload::AsyncEnqueue {
            job_kind: JobKind::Queueable,
            class_name: ClassName::from_text(Some(class)),
            method_name: None,
            platform_job_id: platform_job_id.map(str::to_string),
        });
        event
    }

    #[test]
    fn extracts_a_single_direct_enqueue() {
        let events = vec![direct_enqueue(0, 1_000_000, "MyQueueable", Some("707xx0000000001AAA"))];
        let result = extract(&events);
        assert_eq!(result.references.len(), 1);
        assert_eq!(result.references[0].class_name, ClassName::from_text(Some("MyQueueable")));
        assert_eq!(result.references[0].enqueuing_event, EventId::new(0));
    }

    #[test]
    fn deduplicates_within_one_millisecond() {
        let events = vec![
            direct_enqueue(0, 1_000_000, "MyQueueable", None),
            direct_enqueue(1, 1_999_999, "MyQueueable", Some("707xx0000000001AAA")),
        ];
        let result = extract(&events);
        assert_eq!(result.references.len(), 1);
        assert_eq!(result.references[0].enqueuing_event, EventId::new(0));
        assert_eq!(result.references[0].platform_job_id.as_ref().map(apex_core::PlatformJobId::as_str), Some("707xx0000000001AAA"));
    }

    #[test]
    fn debug_statement_upgrades_the_most_recent_unresolved_reference() {
        let mut debug_line = event(1, EventKind::UserDebug, 2_000_000);
        debug_line.payload =
            Some(EventPayload::UserDebug { message: "jobId=707xx0000000001AAA".to_string() });
        let events = vec![direct_enqueue(0, 1_000_000, "MyQueueable", None), debug_line];
        let result = extract(&events);
        assert_eq!(result.references.len(), 1);
        assert_eq!(
            result.references[0].platform_job_id.as_ref().map(apex_core::PlatformJobId::as_str),
            Some("707xx0000000001AAA")
        );
    }

    #[test]
    fn distinct_enqueues_beyond_one_millisecond_both_survive() {
        let events = vec![
            direct_enqueue(0, 1_000_000, "MyQueueable", None),
            direct_enqueue(1, 5_000_000, "MyQueueable", None),
        ];
        let result = extract(&events);
        assert_eq!(result.references.len(), 2);
    }

    #[test]
    fn confidence_reflects_unknown_class_and_missing_id() {
        let events = vec![direct_enqueue(0, 1_000_000, "", None)];
        let result = extract(&events);
        assert_eq!(result.references[0].class_name, ClassName::Unknown);
        assert!(result.confidence.get() < Confidence::ONE.get());
    }
}

// crates/apex-core/src/job_reference.rs
// ============================================================================
// Module: Apex Async Job Reference
// Description: A reference to an async job extracted from a parent event stream.
// Purpose: Represent the extractor's (C4) output shape (spec.md §3, §4.4).
// Dependencies: crate::class_name, crate::event, crate::ids, crate::time, serde
// ============================================================================

//! ## Overview
//! An [`AsyncJobReference`] is produced by the job extractor (C4) from a
//! single left-to-right pass over a parent log's events. It carries enough
//! information for the tracker (C5) to resolve a platform job record and for
//! the correlator (C6) to enumerate candidate child logs.

use serde::Deserialize;
use serde::Serialize;

use crate::class_name::ClassName;
use crate::event::JobKind;
use crate::ids::EventId;
use crate::ids::LocalRefId;
use crate::ids::PlatformJobId;
use crate::time::EventTimestampNs;

/// A reference to an asynchronously-enqueued job, extracted from a parent
/// log's event stream.
///
/// # Invariants
/// - `enqueuing_event` refers to an event within the owning parent log's
///   event sequence (spec.md §3).
/// - `enqueue_time` equals the enqueuing event's timestamp (spec.md §8).
/// - `method_name` is `Some` whenever `job_kind` is [`JobKind::Future`]
///   (spec.md §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsyncJobReference {
    /// Identifier unique within the owning parent log.
    pub id: LocalRefId,
    /// Kind of job enqueued.
    pub job_kind: JobKind,
    /// Class name, or the `Unknown` sentinel.
    pub class_name: ClassName,
    /// Method name; required when `job_kind` is [`JobKind::Future`].
    pub method_name: Option<String>,
    /// The event in the parent log that enqueued this job.
    pub enqueuing_event: EventId,
    /// Timestamp of the enqueuing event.
    pub enqueue_time: EventTimestampNs,
    /// Platform job id, if present in the log text at extraction time.
    pub platform_job_id: Option<PlatformJobId>,
    /// Call-stack depth at the moment of enqueue.
    pub stack_depth: u32,
    /// Namespace in scope at enqueue, when known.
    pub namespace: Option<String>,
}

impl AsyncJobReference {
    /// Returns true when `other` is a duplicate of this reference under the
    /// spec.md §4.4 dedup rule: same class name, same kind, and enqueue
    /// timestamps within 1 ms.
    #[must_use]
    pub fn is_duplicate_of(&self, other: &Self) -> bool {
        self.class_name == other.class_name
            && self.job_kind == other.job_kind
            && self
                .enqueue_time
                .millis_since(other.enqueue_time)
                .or_else(|| other.enqueue_time.millis_since(self.enqueue_time))
                .is_some_and(|diff| diff <= 1)
    }

    /// Upgrades this reference with a platform job id discovered later in the
    /// event stream (spec.md §4.4 item 4), without overwriting an id that was
    /// already known.
    pub fn upgrade_platform_job_id(&mut self, discovered: PlatformJobId) {
        if self.platform_job_id.is_none() {
            self.platform_job_id = Some(discovered);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(class: &str, kind: JobKind, enqueue_ns: u64) -> AsyncJobReference {
        AsyncJobReference {
            id: LocalRefId::new(0),
            job_kind: kind,
            class_name: ClassName::from_text(Some(class)),
            method_name: None,
            enqueuing_event: EventId::new(0),
            enqueue_time: EventTimestampNs::new(enqueue_ns),
            platform_job_id: None,
            stack_depth: 0,
            namespace: None,
        }
    }

    #[test]
    fn duplicates_within_one_ms_are_detected() {
        let a = reference("MyQueueable", JobKind::Queueable, 1_000_000);
        let b = reference("MyQueueable", JobKind::Queueable, 1_999_999);
        assert!(a.is_duplicate_of(&b));
    }

    #[test]
    fn distinct_classes_are_not_duplicates() {
        let a = reference("MyQueueable", JobKind::Queueable, 1_000_000);
        let b = reference("OtherQueueable", JobKind::Queueable, 1_000_000);
        assert!(!a.is_duplicate_of(&b));
    }

    #[test]
    fn upgrade_never_overwrites_known_id() {
        let mut reference = reference("MyQueueable", JobKind::Queueable, 0);
        reference.platform_job_id = Some(PlatformJobId::new("707x1"));
        reference.upgrade_platform_job_id(PlatformJobId::new("707x2"));
        assert_eq!(reference.platform_job_id, Some(PlatformJobId::new("707x1")));
    }
}

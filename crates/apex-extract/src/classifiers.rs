// crates/apex-extract/src/classifiers.rs
// ============================================================================
// Module: Enqueue Classifiers
// Description: The four per-event classifiers the extraction pass runs.
// Purpose: Recognize an async-job enqueue in its three source shapes, and
//          recognize a later debug line carrying an id for one already seen
//          (spec.md §4.4).
// Dependencies: apex-core
// ============================================================================

//! ## Overview
//! Classifiers 1-3 each produce a [`Candidate`] describing a newly-enqueued
//! job; classifier 4 never creates one, it only reports a platform job id
//! found in a debug line so the caller can upgrade an already-emitted
//! reference. None of the four classifiers mutate state themselves; the
//! extraction pass (`crate::extractor`) owns the emitted-reference list and
//! the lookback window.

use apex_core::ClassName;
use apex_core::Event;
use apex_core::EventKind;
use apex_core::EventPayload;
use apex_core::JobKind;
use apex_core::PlatformJobId;

/// How far back classifier 2 may look for the constructor entry that names
/// the enqueued class (spec.md §4.4 item 2).
pub const METHOD_CALL_LOOKBACK: usize = 10;

/// A newly-recognized enqueue, before it is assigned a local id, enqueue
/// event/timestamp, or stack depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Kind of job enqueued.
    pub job_kind: JobKind,
    /// Class name, or `Unknown` when it could not be determined.
    pub class_name: ClassName,
    /// Method name, set for future invocations.
    pub method_name: Option<String>,
    /// Platform job id, when already present in the log text.
    pub platform_job_id: Option<PlatformJobId>,
}

/// Classifier 1: the parser already emitted an explicit enqueue event.
#[must_use]
pub fn direct_async_event(event: &Event) -> Option<Candidate> {
    if event.kind != EventKind::AsyncJobEnqueued {
        return None;
    }
    let Some(EventPayload::AsyncEnqueue { job_kind, class_name, method_name, platform_job_id }) =
        &event.payload
    else {
        return None;
    };
    Some(Candidate {
        job_kind: *job_kind,
        class_name: class_name.clone(),
        method_name: method_name.clone(),
        platform_job_id: platform_job_id.as_deref().map(PlatformJobId::new),
    })
}

/// Classifier 3: a method-entry event the parser already tagged as a
/// `@future` invocation via its payload, never a signature-text heuristic
/// (the dropped redesign flag recorded in `DESIGN.md`).
#[must_use]
pub fn future_annotation(event: &Event) -> Option<Candidate> {
    if event.kind != EventKind::MethodEntry {
        return None;
    }
    let Some(EventPayload::AsyncEnqueue { job_kind: JobKind::Future, class_name, method_name, platform_job_id }) =
        &event.payload
    else {
        return None;
    };
    Some(Candidate {
        job_kind: JobKind::Future,
        class_name: class_name.clone(),
        method_name: method_name.clone(),
        platform_job_id: platform_job_id.as_deref().map(PlatformJobId::new),
    })
}

/// Classifier 2: a method-entry into one of the platform's builtin enqueue
/// methods, with the class inferred from the nearest preceding constructor
/// entry within [`METHOD_CALL_LOOKBACK`] events.
#[must_use]
pub fn method_call_pattern(events: &[Event], index: usize) -> Option<Candidate> {
    let event = events.get(index)?;
    if event.kind != EventKind::MethodEntry || event.payload.is_some() {
        return None;
    }
    let job_kind = builtin_enqueue_method(event.method_name.as_deref()?)?;
    let class_name = lookback_constructor_class(events, index)
        .or_else(|| event.class_name.as_deref())
        .map_or(ClassName::Unknown, |name| ClassName::from_text(Some(name)));
    Some(Candidate { job_kind, class_name, method_name: None, platform_job_id: None })
}

/// Classifier 4: a user-debug line carrying a platform job id for a job
/// already extracted. Returns the discovered id only; the caller is
/// responsible for locating the reference to upgrade.
#[must_use]
pub fn debug_statement_job_id(event: &Event) -> Option<PlatformJobId> {
    if event.kind != EventKind::UserDebug {
        return None;
    }
    let Some(EventPayload::UserDebug { message }) = &event.payload else {
        return None;
    };
    let lower = message.to_ascii_lowercase();
    if !(lower.contains("jobid") || lower.contains("batchid") || lower.contains("enqueue")) {
        return None;
    }
    extract_platform_id_token(message).map(PlatformJobId::new)
}

/// Maps a platform builtin method name (possibly namespace-qualified) to the
/// job kind it enqueues.
fn builtin_enqueue_method(method_name: &str) -> Option<JobKind> {
    let simple = method_name.rsplit('.').next().unwrap_or(method_name);
    match simple.to_ascii_lowercase().as_str() {
        "enqueuejob" => Some(JobKind::Queueable),
        "executebatch" => Some(JobKind::Batch),
        "schedule" => Some(JobKind::Schedulable),
        _ => None,
    }
}

/// Scans backward up to [`METHOD_CALL_LOOKBACK`] events for a constructor
/// entry (`method_name` ending in `<init>`) and returns its class name.
fn lookback_constructor_class(events: &[Event], index: usize) -> Option<&str> {
    let floor = index.saturating_sub(METHOD_CALL_LOOKBACK);
    events[floor..index].iter().rev().find_map(|candidate| {
        let method_name = candidate.method_name.as_deref()?;
        if candidate.kind == EventKind::MethodEntry && method_name.ends_with("<init>") {
            candidate.class_name.as_deref()
        } else {
            None
        }
    })
}

/// Picks the first whitespace/`=`/`:`-delimited token that looks like a
/// platform record id: 15 or 18 alphanumeric characters.
fn extract_platform_id_token(message: &str) -> Option<String> {
    message
        .split(|c: char| c.is_whitespace() || c == '=' || c == ':' || c == ',')
        .map(|token| token.trim_matches(|c: char| !c.is_ascii_alphanumeric()))
        .find(|token| {
            matches!(token.len(), 15 | 18) && token.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .map(str::to_string)
}

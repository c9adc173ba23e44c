// crates/apex-correlate/src/scoring.rs
// ============================================================================
// Module: Correlator Scoring
// Description: The fixed signal-weight table and the deterministic overall
//              confidence formula (spec.md §4.6.2, §4.6.3).
// Purpose: Compute one signal per evidence kind for a (reference, candidate,
//          resolved-record) triple, then blend them into a single confidence.
// Dependencies: apex-core
// ============================================================================

//! ## Overview
//! Each signal kind has a single fixed weight (`weight_for`); the strength of
//! a particular match within that kind is carried as the signal's own
//! `signal_confidence`, scaled against the kind's ceiling so it lands in
//! `[0,1]`. [`score`] is the one recomputation function named in spec.md §8's
//! "`C.overallConfidence == score(C.signals)`" invariant — calling it twice on
//! the same signal list always agrees.

use apex_core::AsyncJobReference;
use apex_core::Confidence;
use apex_core::JobKind;
use apex_core::LogRecord;
use apex_core::MatchReason;
use apex_core::MatchSignal;
use apex_core::PlatformJobRecord;
use apex_core::WallClock;

/// Fixed weight for a matched `job-id` signal (spec.md §4.6.2).
pub const JOB_ID_WEIGHT: f64 = 0.95;
/// Fixed weight (ceiling of its range) for a matched `class-name` signal.
pub const CLASS_NAME_WEIGHT: f64 = 0.85;
/// Fixed weight (ceiling of its range) for a matched `timing` signal.
pub const TIMING_WEIGHT: f64 = 0.80;
/// Fixed weight (ceiling of its range) for a matched `method-signature` signal.
pub const METHOD_SIGNATURE_WEIGHT: f64 = 0.90;
/// Fixed weight for a matched `batch-pattern` signal.
pub const BATCH_PATTERN_WEIGHT: f64 = 0.75;

const CLASS_NAME_FULL: f64 = 0.80;
const CLASS_NAME_STRIPPED: f64 = 0.65;
const CLASS_NAME_RESOLVED: f64 = 0.85;

const TIMING_FAST_MS: i64 = 10_000;
const TIMING_MEDIUM_MS: i64 = 30_000;
const TIMING_FAST: f64 = 0.80;
const TIMING_MEDIUM: f64 = 0.60;
const TIMING_SLOW: f64 = 0.40;

/// Enqueue-relative timing window, used when no platform record is resolved.
pub const TIMING_WINDOW_MS: i64 = 60_000;
/// Created-time-relative timing window, used when a platform record resolved
/// ("an alternate track uses the resolved record's created time with a 120 s
/// window", spec.md §4.6.2).
pub const TIMING_WINDOW_RESOLVED_MS: i64 = 120_000;

const METHOD_SIGNATURE_FULL: f64 = 0.90;
const METHOD_SIGNATURE_METHOD_ONLY: f64 = 0.85;

/// Per-step multi-match boost (spec.md §4.6.3).
pub const MULTI_MATCH_BOOST_STEP: f64 = 0.03;
/// Cap on the multi-match boost.
pub const MULTI_MATCH_BOOST_CAP: f64 = 0.10;
/// Penalty applied when the sole matched signal is timing.
pub const TIMING_ONLY_PENALTY: f64 = 0.15;

const BATCH_VERBS: &[&str] = &["start(", "execute(", "finish(", "batch"];

/// Returns the fixed weight for a signal kind (spec.md §4.6.2).
#[must_use]
pub const fn weight_for(reason: MatchReason) -> f64 {
    match reason {
        MatchReason::JobId => JOB_ID_WEIGHT,
        MatchReason::ClassName => CLASS_NAME_WEIGHT,
        MatchReason::Timing => TIMING_WEIGHT,
        MatchReason::MethodSignature => METHOD_SIGNATURE_WEIGHT,
        MatchReason::BatchPattern => BATCH_PATTERN_WEIGHT,
        MatchReason::User | MatchReason::Sequence => 0.0,
    }
}

/// Computes a correlation's overall confidence from its signal list
/// (spec.md §4.6.3). This is the single recomputation function spec.md §8's
/// determinism invariant refers to.
#[must_use]
pub fn score(signals: &[MatchSignal]) -> Confidence {
    if signals.is_empty() {
        return Confidence::ZERO;
    }
    let weight_sum: f64 = signals.iter().map(|signal| weight_for(signal.reason)).sum();
    if weight_sum <= 0.0 {
        return Confidence::ZERO;
    }
    let weighted_sum: f64 = signals
        .iter()
        .map(|signal| signal.signal_confidence.get() * weight_for(signal.reason))
        .sum();
    let base = weighted_sum / weight_sum;

    #[allow(clippy::cast_precision_loss, reason = "signal lists are always tiny (<=5)")]
    let boost = (MULTI_MATCH_BOOST_STEP * (signals.len() as f64 - 1.0)).clamp(0.0, MULTI_MATCH_BOOST_CAP);

    let timing_only_penalty =
        if signals.len() == 1 && signals[0].reason == MatchReason::Timing { TIMING_ONLY_PENALTY } else { 0.0 };

    Confidence::new(base + boost - timing_only_penalty)
}

/// Signal for `reference.platform_job_id` matching the resolved record's id.
#[must_use]
pub fn job_id_signal(reference: &AsyncJobReference, resolved: Option<&PlatformJobRecord>) -> Option<MatchSignal> {
    let record = resolved?;
    let reference_id = reference.platform_job_id.as_ref()?;
    if reference_id == &record.id {
        Some(
            MatchSignal::new(MatchReason::JobId, 1.0, "reference platform job id matches resolved record")
                .with_evidence(record.id.to_string()),
        )
    } else {
        None
    }
}

/// Signal for the candidate log's operation text naming the reference's
/// class, with the best-matching sub-case (spec.md §4.6.2).
#[must_use]
pub fn class_name_signal(
    reference: &AsyncJobReference,
    candidate: &LogRecord,
    resolved: Option<&PlatformJobRecord>,
) -> Option<MatchSignal> {
    let class = reference.class_name.as_str()?;

    if let Some(record) = resolved {
        if candidate.operation_contains(&record.class_name) {
            return Some(
                MatchSignal::new(
                    MatchReason::ClassName,
                    CLASS_NAME_RESOLVED / CLASS_NAME_WEIGHT,
                    "operation names the resolved record's class",
                )
                .with_evidence(record.class_name.clone()),
            );
        }
    }
    if candidate.operation_contains(class) {
        return Some(
            MatchSignal::new(MatchReason::ClassName, CLASS_NAME_FULL / CLASS_NAME_WEIGHT, "operation names the reference's class")
                .with_evidence(class.to_string()),
        );
    }
    if let Some(stripped) = reference.class_name.without_namespace() {
        if stripped != class && candidate.operation_contains(stripped) {
            return Some(
                MatchSignal::new(
                    MatchReason::ClassName,
                    CLASS_NAME_STRIPPED / CLASS_NAME_WEIGHT,
                    "operation names the reference's class with its namespace stripped",
                )
                .with_evidence(stripped.to_string()),
            );
        }
    }
    None
}

/// Signal for the candidate log starting a plausible delay after enqueue (or,
/// when a record resolved, after its creation time).
#[must_use]
pub fn timing_signal(candidate: &LogRecord, resolved: Option<&PlatformJobRecord>, enqueue_wall: WallClock) -> Option<MatchSignal> {
    let (delay_millis, window_ms) = match resolved {
        Some(record) => (candidate.start_time.millis_since(record.created), TIMING_WINDOW_RESOLVED_MS),
        None => (candidate.start_time.millis_since(enqueue_wall), TIMING_WINDOW_MS),
    };
    if delay_millis < 0 || delay_millis > window_ms {
        return None;
    }
    let raw = if delay_millis < TIMING_FAST_MS {
        TIMING_FAST
    } else if delay_millis < TIMING_MEDIUM_MS {
        TIMING_MEDIUM
    } else {
        TIMING_SLOW
    };
    Some(
        MatchSignal::new(MatchReason::Timing, raw / TIMING_WEIGHT, "candidate log started within a plausible window")
            .with_evidence(format!("{delay_millis}ms after reference instant")),
    )
}

/// Signal for a future reference's method name (or `class.method`) appearing
/// in the candidate's operation text.
#[must_use]
pub fn method_signature_signal(reference: &AsyncJobReference, candidate: &LogRecord) -> Option<MatchSignal> {
    if reference.job_kind != JobKind::Future {
        return None;
    }
    let method = reference.method_name.as_deref()?;
    if let Some(class) = reference.class_name.as_str() {
        let combo = format!("{class}.{method}");
        if candidate.operation_contains(&combo) {
            return Some(
                MatchSignal::new(
                    MatchReason::MethodSignature,
                    METHOD_SIGNATURE_FULL / METHOD_SIGNATURE_WEIGHT,
                    "operation names the future method's class.method",
                )
                .with_evidence(combo),
            );
        }
    }
    if candidate.operation_contains(method) {
        return Some(
            MatchSignal::new(
                MatchReason::MethodSignature,
                METHOD_SIGNATURE_METHOD_ONLY / METHOD_SIGNATURE_WEIGHT,
                "operation names the future method",
            )
            .with_evidence(method.to_string()),
        );
    }
    None
}

/// Signal for a resolved batch record whose candidate's operation text
/// matches batch execution verbs.
#[must_use]
pub fn batch_pattern_signal(resolved: Option<&PlatformJobRecord>, candidate: &LogRecord) -> Option<MatchSignal> {
    let record = resolved?;
    if record.job_type != JobKind::Batch {
        return None;
    }
    let operation = candidate.operation.to_ascii_lowercase();
    if BATCH_VERBS.iter().any(|verb| operation.contains(verb)) {
        Some(MatchSignal::new(MatchReason::BatchPattern, 1.0, "operation matches batch execution verbs"))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use apex_core::ClassName;
    use apex_core::EventId;
    use apex_core::EventTimestampNs;
    use apex_core::JobStatus;
    use apex_core::LocalRefId;
    use apex_core::LogStatus;
    use apex_core::ParentLogId;
    use apex_core::PlatformJobId;
    use time::macros::datetime;

    use super::*;

    fn reference(class: &str, kind: JobKind, job_id: Option<&str>) -> AsyncJobReference {
        AsyncJobReference {
            id: LocalRefId::new(0),
            job_kind: kind,
            class_name: ClassName::from_text(Some(class)),
            method_name: None,
            enqueuing_event: EventId::new(0),
            enqueue_time: EventTimestampNs::new(0),
            platform_job_id: job_id.map(PlatformJobId::new),
            stack_depth: 0,
            namespace: None,
        }
    }

    fn candidate(operation: &str, start_offset_secs: i64) -> LogRecord {
        LogRecord {
            id: ParentLogId::new("07Lxx0000000001AAA"),
            start_time: WallClock::new(datetime!(2026-01-01 00:00:00 UTC)).plus_millis(start_offset_secs * 1_000),
            user_id: "005xx0000000001".to_string(),
            operation: operation.to_string(),
            byte_length: 1024,
            status: LogStatus::Success,
            duration_millis: 500,
        }
    }

    fn record(id: &str, job_type: JobKind) -> PlatformJobRecord {
        PlatformJobRecord {
            id: PlatformJobId::new(id),
            class_id: "01pxx0000000001".to_string(),
            class_name: "MyQueueable".to_string(),
            job_type,
            status: JobStatus::Completed,
            items_processed: 0,
            items_total: None,
            errors: 0,
            created: WallClock::new(datetime!(2026-01-01 00:00:01 UTC)),
            completed: Some(WallClock::new(datetime!(2026-01-01 00:00:05 UTC))),
            extended_status: None,
            parent_job_id: None,
            method_name: None,
        }
    }

    #[test]
    fn job_id_signal_requires_exact_match() {
        let reference = reference("MyQueueable", JobKind::Queueable, Some("707xx0000000001AAA"));
        let record = record("707xx0000000001AAA", JobKind::Queueable);
        assert!(job_id_signal(&reference, Some(&record)).is_some());

        let mismatched = record("707xx0000000002AAA", JobKind::Queueable);
        assert!(job_id_signal(&reference, Some(&mismatched)).is_none());
    }

    #[test]
    fn class_name_signal_prefers_resolved_record_class() {
        let reference = reference("myns.MyQueueable", JobKind::Queueable, None);
        let record = record("707xx0000000001AAA", JobKind::Queueable);
        let candidate = candidate("MyQueueable.execute", 2);
        let signal = class_name_signal(&reference, &candidate, Some(&record)).expect("matches");
        assert!((signal.signal_confidence.get() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn class_name_signal_falls_back_to_namespace_stripped_match() {
        let reference = reference("myns.MyQueueable", JobKind::Queueable, None);
        let candidate = candidate("MyQueueable.execute", 2);
        let signal = class_name_signal(&reference, &candidate, None).expect("matches stripped");
        assert!((signal.signal_confidence.get() - CLASS_NAME_FULL / CLASS_NAME_WEIGHT).abs() < f64::EPSILON);
    }

    #[test]
    fn timing_signal_uses_fast_bucket_under_ten_seconds() {
        let candidate = candidate("Unrelated", 5);
        let enqueue = WallClock::new(datetime!(2026-01-01 00:00:00 UTC));
        let signal = timing_signal(&candidate, None, enqueue).expect("within window");
        assert!((signal.signal_confidence.get() - TIMING_FAST / TIMING_WEIGHT).abs() < f64::EPSILON);
    }

    #[test]
    fn timing_signal_absent_outside_window() {
        let candidate = candidate("Unrelated", 90);
        let enqueue = WallClock::new(datetime!(2026-01-01 00:00:00 UTC));
        assert!(timing_signal(&candidate, None, enqueue).is_none());
    }

    #[test]
    fn method_signature_signal_only_applies_to_future_jobs() {
        let mut reference = reference("MyClass", JobKind::Future, None);
        reference.method_name = Some("doWork".to_string());
        let candidate = candidate("MyClass.doWork", 1);
        assert!(method_signature_signal(&reference, &candidate).is_some());

        let non_future = reference("MyClass", JobKind::Queueable, None);
        assert!(method_signature_signal(&non_future, &candidate).is_none());
    }

    #[test]
    fn batch_pattern_signal_requires_batch_verb_and_batch_job_type() {
        let record = record("707xx0000000001AAA", JobKind::Batch);
        let candidate = candidate("MyBatch.execute(BatchableContext bc)", 1);
        assert!(batch_pattern_signal(Some(&record), &candidate).is_some());

        let queueable = record("707xx0000000002AAA", JobKind::Queueable);
        assert!(batch_pattern_signal(Some(&queueable), &candidate).is_none());
    }

    #[test]
    fn score_applies_multi_match_boost() {
        let signals = vec![
            MatchSignal::new(MatchReason::JobId, 1.0, "job id"),
            MatchSignal::new(MatchReason::ClassName, 1.0, "class name"),
        ];
        let single = vec![MatchSignal::new(MatchReason::JobId, 1.0, "job id")];
        assert!(score(&signals).get() > score(&single).get());
    }

    #[test]
    fn score_penalizes_timing_only_signal() {
        let timing_only = vec![MatchSignal::new(MatchReason::Timing, 1.0, "timing")];
        let other_only = vec![MatchSignal::new(MatchReason::ClassName, 1.0, "class name")];
        assert!(score(&timing_only).get() < score(&other_only).get());
    }

    #[test]
    fn degraded_signal_recomputes_to_zero_point_three() {
        let signals = vec![MatchSignal::new(MatchReason::ClassName, 0.30, "degraded")];
        assert!((score(&signals).get() - 0.30).abs() < 1e-9);
    }
}

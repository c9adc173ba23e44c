// crates/apex-unify/src/summary.rs
// ============================================================================
// Module: View Summary Aggregation
// Description: Deterministic duration, status, flow description, and overall
//              confidence aggregation over a unified view (spec.md §4.7).
// Purpose: Keep the summary a pure function of the tree's fetched-log spans
//          and correlations, independent of traversal order.
// Dependencies: apex-core
// ============================================================================

//! ## Overview
//! Every function here is a pure fold over the accumulators the builder
//! collects while splitting the tree: each fetched log's own event-span
//! duration, and every correlation folded in along the way.

use apex_core::Confidence;
use apex_core::Correlation;
use apex_core::FlowStatus;
use apex_core::JobStatus;
use apex_core::ViewSummary;

/// Fixed ordering for the flow description's per-kind counts, so the string
/// is deterministic regardless of reference discovery order.
const JOB_KIND_ORDER: [apex_core::JobKind; 4] =
    [apex_core::JobKind::Queueable, apex_core::JobKind::Batch, apex_core::JobKind::Future, apex_core::JobKind::Schedulable];

/// Penalty applied to the blended confidence for each uncorrelated child
/// reference (spec.md §4.7).
const UNCORRELATED_PENALTY: f64 = 0.10;

/// Builds the deterministic summary over every fetched log's duration and
/// every correlation folded into the view (spec.md §4.7).
#[must_use]
pub fn build_summary(fetched_durations_millis: &[u64], correlations: &[Correlation]) -> ViewSummary {
    let duration_total: u64 = fetched_durations_millis.iter().sum();
    let delay_total: u64 = correlations
        .iter()
        .filter_map(|correlation| correlation.queue_delay_millis)
        .filter(|delay| *delay >= 0)
        .filter_map(|delay| u64::try_from(delay).ok())
        .sum();

    let total_children = correlations.len();
    let correlated_children = correlations.iter().filter(|correlation| !correlation.is_degraded()).count();

    ViewSummary {
        total_duration_millis: duration_total.saturating_add(delay_total),
        status: flow_status(correlations),
        flow_description: flow_description(correlations, correlated_children, total_children),
        correlated_children,
        total_children,
    }
}

/// Derives the overall status: success when no resolved record failed or was
/// aborted, failure when every resolved record did, partial failure
/// otherwise (spec.md §4.7).
fn flow_status(correlations: &[Correlation]) -> FlowStatus {
    let resolved_statuses: Vec<JobStatus> = correlations.iter().filter_map(|correlation| correlation.resolved_status).collect();

    if resolved_statuses.is_empty() {
        return FlowStatus::Success;
    }

    let failed = resolved_statuses.iter().filter(|status| matches!(status, JobStatus::Failed | JobStatus::Aborted)).count();

    if failed == 0 {
        FlowStatus::Success
    } else if failed == resolved_statuses.len() {
        FlowStatus::Failure
    } else {
        FlowStatus::PartialFailure
    }
}

/// Builds the short, deterministic flow description: a per-job-kind count of
/// enqueued references, followed by the correlated/total child ratio.
fn flow_description(correlations: &[Correlation], correlated_children: usize, total_children: usize) -> String {
    let parts: Vec<String> = JOB_KIND_ORDER
        .iter()
        .filter_map(|kind| {
            let count = correlations.iter().filter(|correlation| correlation.job_reference.job_kind == *kind).count();
            (count > 0).then(|| format!("{count} {}", kind.as_str()))
        })
        .collect();

    let kinds_text = if parts.is_empty() { "no async work enqueued".to_string() } else { parts.join(", ") };

    format!("{kinds_text}; {correlated_children}/{total_children} children correlated")
}

/// Blends extraction confidence with the mean correlation confidence,
/// penalized per uncorrelated child reference, clamped to `[0,1]`
/// (spec.md §4.7).
#[must_use]
pub fn overall_confidence(extraction_confidence: Confidence, summary: &ViewSummary, correlations: &[Correlation]) -> Confidence {
    let mean_correlation_confidence = if correlations.is_empty() {
        Confidence::ONE
    } else {
        let sum: f64 = correlations.iter().map(|correlation| correlation.overall_confidence.get()).sum();
        #[allow(clippy::cast_precision_loss, reason = "correlation counts stay well within f64's exact integer range")]
        let mean = sum / correlations.len() as f64;
        Confidence::new(mean)
    };

    let uncorrelated = summary.total_children.saturating_sub(summary.correlated_children);
    #[allow(clippy::cast_precision_loss, reason = "child counts stay well within f64's exact integer range")]
    let penalty = UNCORRELATED_PENALTY * uncorrelated as f64;

    let blended = (extraction_confidence.get() + mean_correlation_confidence.get()) / 2.0;
    Confidence::new(blended - penalty)
}

#[cfg(test)]
mod tests {
    use apex_core::ChildLogId;
    use apex_core::ClassName;
    use apex_core::ConfidenceLevel;
    use apex_core::EventId;
    use apex_core::EventTimestampNs;
    use apex_core::JobKind;
    use apex_core::LocalRefId;
    use apex_core::MatchReason;
    use apex_core::MatchSignal;
    use apex_core::ParentLogId;

    use super::*;

    fn reference(kind: JobKind) -> apex_core::AsyncJobReference {
        apex_core::AsyncJobReference {
            id: LocalRefId::new(0),
            job_kind: kind,
            class_name: ClassName::from_text(Some("MyQueueable")),
            method_name: None,
            enqueuing_event: EventId::new(0),
            enqueue_time: EventTimestampNs::new(0),
            platform_job_id: None,
            stack_depth: 0,
            namespace: None,
        }
    }

    fn correlation(kind: JobKind, child_log_id: &str, resolved_status: Option<JobStatus>, queue_delay_millis: Option<i64>) -> Correlation {
        Correlation {
            parent_log_id: ParentLogId::new("07L000000000001AAA"),
            child_log_id: ChildLogId::new(child_log_id),
            job_reference: reference(kind),
            resolved_job: None,
            signals: vec![MatchSignal::new(MatchReason::ClassName, 1.0, "class match")],
            overall_confidence: Confidence::ONE,
            level: ConfidenceLevel::High,
            resolved_status,
            queue_delay_millis,
            execution_duration_millis: None,
        }
    }

    #[test]
    fn status_is_success_with_no_resolved_records() {
        let correlations = vec![correlation(JobKind::Queueable, "07L000000000002AAA", None, None)];
        assert_eq!(flow_status(&correlations), FlowStatus::Success);
    }

    #[test]
    fn status_is_partial_failure_when_some_but_not_all_resolved_failed() {
        let correlations = vec![
            correlation(JobKind::Queueable, "07L000000000002AAA", Some(JobStatus::Completed), None),
            correlation(JobKind::Batch, "07L000000000003AAA", Some(JobStatus::Failed), None),
        ];
        assert_eq!(flow_status(&correlations), FlowStatus::PartialFailure);
    }

    #[test]
    fn status_is_failure_when_every_resolved_record_failed() {
        let correlations = vec![correlation(JobKind::Queueable, "07L000000000002AAA", Some(JobStatus::Aborted), None)];
        assert_eq!(flow_status(&correlations), FlowStatus::Failure);
    }

    #[test]
    fn duration_sums_fetched_spans_and_non_negative_delays() {
        let correlations = vec![
            correlation(JobKind::Queueable, "07L000000000002AAA", None, Some(500)),
            correlation(JobKind::Batch, "", None, Some(-100)),
        ];
        let summary = build_summary(&[1_000, 2_000], &correlations);
        assert_eq!(summary.total_duration_millis, 3_500);
    }

    #[test]
    fn flow_description_is_deterministic_across_discovery_order() {
        let forward = vec![
            correlation(JobKind::Queueable, "07L000000000002AAA", None, None),
            correlation(JobKind::Batch, "07L000000000003AAA", None, None),
        ];
        let reversed = vec![forward[1].clone(), forward[0].clone()];
        let summary_forward = build_summary(&[], &forward);
        let summary_reversed = build_summary(&[], &reversed);
        assert_eq!(summary_forward.flow_description, summary_reversed.flow_description);
        assert_eq!(summary_forward.flow_description, "1 queueable, 1 batch; 2/2 children correlated");
    }

    #[test]
    fn overall_confidence_penalizes_uncorrelated_children() {
        let summary = ViewSummary {
            total_duration_millis: 0,
            status: FlowStatus::Success,
            flow_description: String::new(),
            correlated_children: 1,
            total_children: 2,
        };
        let correlations = vec![correlation(JobKind::Queueable, "07L000000000002AAA", None, None)];
        let confidence = overall_confidence(Confidence::ONE, &summary, &correlations);
        assert!((confidence.get() - 0.90).abs() < 1e-9);
    }
}

// crates/apex-extract/src/confidence.rs
// ============================================================================
// Module: Extraction Confidence
// Description: The extraction-pass confidence formula (spec.md §4.4).
// Purpose: Score how much an extraction pass had to guess, independent of
//          any later tracker/correlator confidence.
// Dependencies: apex-core
// ============================================================================

//! ## Overview
//! Extraction confidence reflects gaps in the *extraction* itself: class
//! names the pass could not resolve, and platform ids not yet present in the
//! log text. It is unrelated to the tracker/correlator confidence computed
//! downstream once platform records are resolved.

use apex_core::AsyncJobReference;
use apex_core::ClassName;
use apex_core::Confidence;

/// Flat penalty applied when fewer than this many events were seen
/// (spec.md §4.4).
const SPARSE_EVENT_FLOOR: usize = 50;
/// Flat penalty subtracted when the event stream was sparse.
const SPARSE_EVENT_PENALTY: f64 = 0.1;
/// Weight applied to the unknown-class-name ratio.
const UNKNOWN_CLASS_WEIGHT: f64 = 0.3;
/// Weight applied to the missing-platform-id ratio.
const MISSING_ID_WEIGHT: f64 = 0.2;

/// Computes the extraction confidence for a completed pass.
///
/// `events_seen` is the total number of events the pass scanned, not the
/// number of references produced.
#[must_use]
pub fn extraction_confidence(events_seen: usize, references: &[AsyncJobReference]) -> Confidence {
    let mut score = Confidence::ONE;
    if !references.is_empty() {
        #[allow(clippy::cast_precision_loss, reason = "reference counts are small by construction")]
        let total = references.len() as f64;
        let unknown = references.iter().filter(|reference| reference.class_name == ClassName::Unknown).count();
        let missing_id = references.iter().filter(|reference| reference.platform_job_id.is_none()).count();
        #[allow(clippy::cast_precision_loss, reason = "reference counts are small by construction")]
        let unknown_ratio = unknown as f64 / total;
        #[allow(clippy::cast_precision_loss, reason = "reference counts are small by construction")]
        let missing_ratio = missing_id as f64 / total;
        score = score.saturating_sub(UNKNOWN_CLASS_WEIGHT * unknown_ratio);
        score = score.saturating_sub(MISSING_ID_WEIGHT * missing_ratio);
    }
    if events_seen < SPARSE_EVENT_FLOOR {
        score = score.saturating_sub(SPARSE_EVENT_PENALTY);
    }
    score
}

#[cfg(test)]
mod tests {
    use apex_core::EventId;
    use apex_core::EventTimestampNs;
    use apex_core::JobKind;
    use apex_core::LocalRefId;
    use apex_core::PlatformJobId;

    use super::*;

    fn reference(class: ClassName, platform_job_id: Option<PlatformJobId>) -> AsyncJobReference {
        AsyncJobReference {
            id: LocalRefId::new(0),
            job_kind: JobKind::Queueable,
            class_name: class,
            method_name: None,
            enqueuing_event: EventId::new(0),
            enqueue_time: EventTimestampNs::new(0),
            platform_job_id,
            stack_depth: 0,
            namespace: None,
        }
    }

    #[test]
    fn no_references_and_plentiful_events_scores_full_confidence() {
        assert_eq!(extraction_confidence(100, &[]), Confidence::ONE);
    }

    #[test]
    fn unknown_class_and_missing_id_both_penalize() {
        let references = vec![reference(ClassName::Unknown, None)];
        let confidence = extraction_confidence(100, &references);
        assert!((confidence.get() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn sparse_event_stream_applies_flat_penalty() {
        let references = vec![reference(ClassName::from_text(Some("MyQueueable")), Some(PlatformJobId::new("id")))];
        let confidence = extraction_confidence(10, &references);
        assert!((confidence.get() - 0.9).abs() < 1e-9);
    }
}

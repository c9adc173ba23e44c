// crates/apex-correlate/src/correlator.rs
// ============================================================================
// Module: Correlator
// Description: Enumerates candidate child logs and scores them against each
//              job reference (spec.md §4.6).
// Purpose: Produce the ordered, capped correlation list for one parent log.
// Dependencies: apex-contract, apex-core, apex-platform, crate::{query, scoring}
// ============================================================================

//! ## Overview
//! [`Correlator`] is the only entry point this crate exposes. One shared
//! candidate-log query covers every reference belonging to a parent log
//! (spec.md §4.6.1); each reference is then matched against that shared set
//! independently, and the combined result is tie-broken and capped to
//! `maxChildren` (spec.md §4.6.4, §6.3).

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use apex_contract::ApexError;
use apex_contract::EventSink;
use apex_core::to_wall;
use apex_core::AsyncJobReference;
use apex_core::ChildLogId;
use apex_core::Correlation;
use apex_core::LocalRefId;
use apex_core::LogRecord;
use apex_core::MatchReason;
use apex_core::MatchSignal;
use apex_core::ParentLogId;
use apex_core::PlatformJobRecord;
use apex_core::WallClock;
use apex_platform::PlatformClient;

use crate::events::CorrelatorEvent;
use crate::query::candidate_log_query;
use crate::query::parse_log_record;
use crate::query::CANDIDATE_LOG_LIMIT;
use crate::scoring;

/// Lower bound widening applied to the shared candidate-log window
/// (spec.md §4.6.1).
const SHARED_WINDOW_LOOKBEHIND_MS: i64 = 5_000;
/// Per-reference window lower-bound widening.
const REFERENCE_WINDOW_LOOKBEHIND_MS: i64 = 5_000;
/// Buffer applied to a resolved record's `[created, completed]` range when
/// checking candidate coverage (spec.md §4.6.1).
const RESOLVED_COVERAGE_BUFFER_MS: i64 = 5_000;

/// Tunable correlation options (spec.md §6.3's `correlation.*` surface).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelationOptions {
    /// Candidate-log search window past the latest enqueue, in milliseconds.
    pub max_time_window_ms: i64,
    /// Minimum overall confidence required to emit a correlation.
    pub min_confidence: f64,
    /// Per-parent cap on emitted correlations.
    pub max_children: usize,
}

impl Default for CorrelationOptions {
    fn default() -> Self {
        Self { max_time_window_ms: 3_600_000, min_confidence: 0.40, max_children: 5 }
    }
}

/// Correlates a parent log's job references against candidate child logs and
/// resolved platform job records.
pub struct Correlator<P: PlatformClient> {
    client: Arc<P>,
    events: Arc<dyn EventSink<CorrelatorEvent>>,
}

impl<P: PlatformClient> Correlator<P> {
    /// Creates a correlator backed by `client`, emitting telemetry through
    /// `events`.
    #[must_use]
    pub fn new(client: Arc<P>, events: Arc<dyn EventSink<CorrelatorEvent>>) -> Self {
        Self { client, events }
    }

    /// Correlates every reference in `references` against candidate child
    /// logs, returning the tie-broken, `maxChildren`-capped correlation list
    /// for `parent_log_id` (spec.md §4.6).
    ///
    /// # Errors
    ///
    /// Returns [`ApexError`] if the candidate-log query fails or returns a
    /// malformed record.
    pub async fn correlate(
        &self,
        parent_log_id: &ParentLogId,
        references: &[AsyncJobReference],
        resolved_jobs: &HashMap<LocalRefId, PlatformJobRecord>,
        log_start_wall: WallClock,
        options: &CorrelationOptions,
    ) -> Result<Vec<Correlation>, ApexError> {
        if references.is_empty() {
            return Ok(Vec::new());
        }

        let enqueue_walls: Vec<WallClock> =
            references.iter().map(|reference| to_wall(reference.enqueue_time, log_start_wall)).collect();
        let min_enqueue = enqueue_walls.iter().copied().min().unwrap_or(log_start_wall);
        let max_enqueue = enqueue_walls.iter().copied().max().unwrap_or(log_start_wall);
        let window_start = min_enqueue.plus_millis(-SHARED_WINDOW_LOOKBEHIND_MS);
        let window_end = max_enqueue.plus_millis(options.max_time_window_ms);

        let query = candidate_log_query(window_start, window_end, CANDIDATE_LOG_LIMIT);
        let page = self.client.query(&query).await?;
        let candidates: Vec<LogRecord> = page.records.iter().map(parse_log_record).collect::<Result<_, _>>()?;
        self.events.emit(CorrelatorEvent::CandidateQueryIssued {
            parent_log_id: parent_log_id.clone(),
            candidate_count: candidates.len(),
        });

        let mut ranked: Vec<(Correlation, Option<WallClock>)> = Vec::new();
        for reference in references {
            let resolved = resolved_jobs.get(&reference.id);
            let enqueue_wall = to_wall(reference.enqueue_time, log_start_wall);
            let matched = self.match_reference(parent_log_id, reference, resolved, &candidates, enqueue_wall, options);
            if matched.is_empty() {
                if let Some(record) = resolved {
                    self.events.emit(CorrelatorEvent::DegradedResultEmitted { local_ref_id: reference.id });
                    ranked.push((degraded_correlation(parent_log_id, reference, record, enqueue_wall), None));
                }
            } else {
                ranked.extend(matched);
            }
        }

        ranked.sort_by(tie_break);

        if ranked.len() > options.max_children {
            let dropped = ranked.len() - options.max_children;
            ranked.truncate(options.max_children);
            self.events.emit(CorrelatorEvent::ChildrenCapped { parent_log_id: parent_log_id.clone(), dropped });
        }

        Ok(ranked.into_iter().map(|(correlation, _)| correlation).collect())
    }

    /// Scores every shared candidate that passes the spec.md §4.6.1 filter
    /// for one reference, keeping each that clears `minConfidence`.
    fn match_reference(
        &self,
        parent_log_id: &ParentLogId,
        reference: &AsyncJobReference,
        resolved: Option<&PlatformJobRecord>,
        candidates: &[LogRecord],
        enqueue_wall: WallClock,
        options: &CorrelationOptions,
    ) -> Vec<(Correlation, Option<WallClock>)> {
        let window_start = enqueue_wall.plus_millis(-REFERENCE_WINDOW_LOOKBEHIND_MS);
        let window_end = enqueue_wall.plus_millis(options.max_time_window_ms);

        candidates
            .iter()
            .filter(|candidate| candidate.start_time >= window_start && candidate.start_time <= window_end)
            .filter(|candidate| {
                reference_names_class_in(reference, candidate)
                    || resolved.is_some_and(|record| record.covers_instant(candidate.start_time, RESOLVED_COVERAGE_BUFFER_MS))
            })
            .filter_map(|candidate| {
                let signals = build_signals(reference, candidate, resolved, enqueue_wall);
                if signals.is_empty() {
                    return None;
                }
                let confidence = scoring::score(&signals);
                if confidence.get() < options.min_confidence {
                    return None;
                }
                Some((
                    build_correlation(parent_log_id, reference, candidate, resolved, signals, confidence, enqueue_wall),
                    Some(candidate.start_time),
                ))
            })
            .collect()
    }
}

/// Returns true when `candidate`'s operation text names `reference`'s class,
/// checked both with and without a namespace prefix (spec.md §4.6.1).
fn reference_names_class_in(reference: &AsyncJobReference, candidate: &LogRecord) -> bool {
    match reference.class_name.as_str() {
        Some(name) => {
            candidate.operation_contains(name)
                || reference.class_name.without_namespace().is_some_and(|stripped| candidate.operation_contains(stripped))
        }
        None => false,
    }
}

/// Computes every applicable signal for one (reference, candidate, resolved)
/// triple (spec.md §4.6.2).
fn build_signals(
    reference: &AsyncJobReference,
    candidate: &LogRecord,
    resolved: Option<&PlatformJobRecord>,
    enqueue_wall: WallClock,
) -> Vec<MatchSignal> {
    [
        scoring::job_id_signal(reference, resolved),
        scoring::class_name_signal(reference, candidate, resolved),
        scoring::timing_signal(candidate, resolved, enqueue_wall),
        scoring::method_signature_signal(reference, candidate),
        scoring::batch_pattern_signal(resolved, candidate),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Builds a matched correlation from a scored candidate.
fn build_correlation(
    parent_log_id: &ParentLogId,
    reference: &AsyncJobReference,
    candidate: &LogRecord,
    resolved: Option<&PlatformJobRecord>,
    signals: Vec<MatchSignal>,
    confidence: apex_core::Confidence,
    enqueue_wall: WallClock,
) -> Correlation {
    Correlation {
        parent_log_id: parent_log_id.clone(),
        child_log_id: ChildLogId::new(candidate.id.as_str()),
        job_reference: reference.clone(),
        resolved_job: resolved.cloned(),
        signals,
        overall_confidence: confidence,
        level: confidence.level(),
        resolved_status: resolved.map(|record| record.status),
        queue_delay_millis: resolved.map(|record| record.created.millis_since(enqueue_wall)),
        execution_duration_millis: Some(candidate.duration_millis),
    }
}

/// Builds the degraded correlation form for a reference whose platform job
/// resolved but had no matching candidate log (spec.md §4.6.5).
fn degraded_correlation(
    parent_log_id: &ParentLogId,
    reference: &AsyncJobReference,
    record: &PlatformJobRecord,
    enqueue_wall: WallClock,
) -> Correlation {
    let signals = vec![MatchSignal::new(
        MatchReason::ClassName,
        0.30,
        "platform job resolved but no candidate child log matched",
    )];
    let confidence = scoring::score(&signals);
    Correlation {
        parent_log_id: parent_log_id.clone(),
        child_log_id: ChildLogId::none(),
        job_reference: reference.clone(),
        resolved_job: Some(record.clone()),
        signals,
        overall_confidence: confidence,
        level: confidence.level(),
        resolved_status: Some(record.status),
        queue_delay_millis: Some(record.created.millis_since(enqueue_wall)),
        execution_duration_millis: None,
    }
}

/// Tie-breaks two ranked correlations: confidence desc, signal count desc,
/// job-id-matched first, earliest child-log start-time (spec.md §4.6.4).
fn tie_break(a: &(Correlation, Option<WallClock>), b: &(Correlation, Option<WallClock>)) -> Ordering {
    b.0.overall_confidence
        .get()
        .partial_cmp(&a.0.overall_confidence.get())
        .unwrap_or(Ordering::Equal)
        .then_with(|| b.0.signals.len().cmp(&a.0.signals.len()))
        .then_with(|| has_job_id_signal(&b.0).cmp(&has_job_id_signal(&a.0)))
        .then_with(|| a.1.cmp(&b.1))
}

/// Returns true when a correlation's signal list includes a matched job-id.
fn has_job_id_signal(correlation: &Correlation) -> bool {
    correlation.signals.iter().any(|signal| signal.reason == MatchReason::JobId)
}

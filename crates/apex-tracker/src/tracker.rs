// crates/apex-tracker/src/tracker.rs
// ============================================================================
// Module: Job Tracker
// Description: Resolves async job references against platform job records
//              (spec.md §4.5).
// Purpose: Batch-resolve known ids, per-reference resolve unknown ones, and
//          poll a single job to completion.
// Dependencies: apex-contract, apex-core, apex-platform, crate::query, tokio
// ============================================================================

//! ## Overview
//! [`JobTracker`] is the only entry point this crate exposes. It never
//! builds SOQL directly; every query goes through `crate::query`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use apex_contract::ApexError;
use apex_contract::EventSink;
use apex_core::AsyncJobReference;
use apex_core::JobKind;
use apex_core::LocalRefId;
use apex_core::PlatformJobId;
use apex_core::PlatformJobRecord;
use apex_core::WallClock;
use apex_core::to_wall;
use apex_platform::PlatformClient;

use crate::events::TrackerEvent;
use crate::query::by_id_query;
use crate::query::by_reference_window_query;
use crate::query::by_single_id_query;
use crate::query::parse_job_record;

/// Maximum number of platform job ids per batch-by-id query (spec.md §4.5).
const BATCH_QUERY_SIZE: usize = 50;
/// Lower bound of a per-reference window query, before enqueue time.
const WINDOW_LOOKBEHIND_MS: i64 = 5_000;
/// Upper bound of a per-reference window query, after enqueue time.
const WINDOW_LOOKAHEAD_MS: i64 = 60_000;

/// Resolves [`AsyncJobReference`]s against the platform's `AsyncApexJob`
/// bookkeeping records.
pub struct JobTracker<P: PlatformClient> {
    client: Arc<P>,
    events: Arc<dyn EventSink<TrackerEvent>>,
}

impl<P: PlatformClient> JobTracker<P> {
    /// Creates a tracker backed by `client`, emitting telemetry through
    /// `events`.
    #[must_use]
    pub fn new(client: Arc<P>, events: Arc<dyn EventSink<TrackerEvent>>) -> Self {
        Self { client, events }
    }

    /// Resolves every reference in `references` to a platform job record,
    /// where one can be found. `log_start_wall` is the owning parent log's
    /// wall-clock start time, used to convert each reference's in-log
    /// enqueue timestamp to a wall-clock window.
    ///
    /// # Errors
    ///
    /// Returns [`ApexError`] if a platform query fails; a reference simply
    /// having no match is not an error (spec.md §4.6.5 handles that case
    /// downstream).
    pub async fn resolve_all(
        &self,
        references: &[AsyncJobReference],
        log_start_wall: WallClock,
    ) -> Result<HashMap<LocalRefId, PlatformJobRecord>, ApexError> {
        let mut resolved = HashMap::new();

        let (known, unknown): (Vec<_>, Vec<_>) =
            references.iter().partition(|reference| reference.platform_job_id.is_some());

        self.resolve_known(&known, &mut resolved).await?;
        self.resolve_unknown(&unknown, log_start_wall, &mut resolved).await?;

        for reference in references {
            if !resolved.contains_key(&reference.id) {
                self.events.emit(TrackerEvent::NoMatchFound { local_ref_id: reference.id });
            }
        }

        Ok(resolved)
    }

    async fn resolve_known(
        &self,
        known: &[&AsyncJobReference],
        resolved: &mut HashMap<LocalRefId, PlatformJobRecord>,
    ) -> Result<(), ApexError> {
        for chunk in known.chunks(BATCH_QUERY_SIZE) {
            let ids: Vec<PlatformJobId> = chunk
                .iter()
                .filter_map(|reference| reference.platform_job_id.clone())
                .collect();
            if ids.is_empty() {
                continue;
            }
            self.events.emit(TrackerEvent::BatchQueryIssued { id_count: ids.len() });
            let page = self.client.query(&by_id_query(&ids)).await?;
            let records: Vec<PlatformJobRecord> =
                page.records.iter().map(parse_job_record).collect::<Result<_, _>>()?;
            for reference in chunk {
                if let Some(platform_job_id) = &reference.platform_job_id {
                    if let Some(record) = records.iter().find(|record| &record.id == platform_job_id) {
                        resolved.insert(reference.id, record.clone());
                    }
                }
            }
        }
        Ok(())
    }

    async fn resolve_unknown(
        &self,
        unknown: &[&AsyncJobReference],
        log_start_wall: WallClock,
        resolved: &mut HashMap<LocalRefId, PlatformJobRecord>,
    ) -> Result<(), ApexError> {
        for reference in unknown {
            self.events.emit(TrackerEvent::PerReferenceQueryIssued { local_ref_id: reference.id });
            let enqueue_wall = to_wall(reference.enqueue_time, log_start_wall);
            let window_start = enqueue_wall.plus_millis(-WINDOW_LOOKBEHIND_MS);
            let window_end = enqueue_wall.plus_millis(WINDOW_LOOKAHEAD_MS);
            let class_name = match reference.class_name.as_str() {
                Some(name) => name,
                None => continue,
            };
            let query = by_reference_window_query(class_name, reference.job_kind, window_start, window_end)?;
            let page = self.client.query(&query).await?;
            if let Some(earliest) = page.records.first() {
                let record = parse_job_record(earliest)?;
                resolved.insert(reference.id, record);
            }
        }
        Ok(())
    }

    /// Polls a single job's status until it reaches a terminal state or
    /// `max_wait` elapses, returning the last observed record either way
    /// (spec.md §4.5 `waitForCompletion`).
    ///
    /// # Errors
    ///
    /// Returns [`ApexError`] if a poll query fails or the job id never
    /// resolves to any record.
    pub async fn wait_for_completion(
        &self,
        job_id: &PlatformJobId,
        max_wait: Duration,
        poll_interval: Duration,
    ) -> Result<PlatformJobRecord, ApexError> {
        let deadline = Instant::now() + max_wait;
        loop {
            let page = self.client.query(&by_single_id_query(job_id)).await?;
            let record = page
                .records
                .first()
                .map(parse_job_record)
                .transpose()?
                .ok_or_else(|| ApexError::DataShape { message: format!("job {job_id} not found") })?;
            if record.status.is_terminal() || Instant::now() >= deadline {
                if !record.status.is_terminal() {
                    self.events.emit(TrackerEvent::PollTimedOut { job_id: job_id.clone() });
                }
                return Ok(record);
            }
            tokio::time::sleep(poll_interval.min(deadline.saturating_duration_since(Instant::now()))).await;
        }
    }
}

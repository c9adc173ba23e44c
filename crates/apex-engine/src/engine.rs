// crates/apex-engine/src/engine.rs
// ============================================================================
// Module: Analysis Engine
// Description: Orchestrates C3's fetched log through C4, C5, C6, and C7 for
//              one analysis request (spec.md §3's data flow).
// Purpose: The single facade a caller drives: one parent log in, one unified
//          view out, with bounded concurrency and cooperative cancellation.
// Dependencies: apex-config, apex-contract, apex-core, apex-correlate,
//               apex-extract, apex-platform, apex-tracker, apex-unify, tokio
// ============================================================================

//! ## Overview
//! [`AnalysisEngine`] never talks to the platform directly for anything
//! `apex-capture`, `apex-tracker`, or `apex-correlate` already own; it only
//! sequences their calls and threads the redacted, extracted, and
//! correlated state between them. Bounded concurrency caps the number of
//! analyses in flight at once (spec.md §5); cancellation is checked at
//! every suspension point and propagated as [`ApexError::Cancelled`],
//! never a partial structure (spec.md §5's cancellation semantics).

use std::collections::HashMap;
use std::sync::Arc;

use apex_config::Config;
use apex_contract::ApexError;
use apex_contract::CorrelationArtifact;
use apex_contract::EventSink;
use apex_contract::NullSink;
use apex_contract::UnifiedViewArtifact;
use apex_core::ChildLogId;
use apex_core::Correlation;
use apex_core::LogRecord;
use apex_core::ParentLogId;
use apex_correlate::Correlator;
use apex_platform::PlatformClient;
use apex_tracker::JobTracker;
use apex_unify::build_view;
use apex_unify::LogContext;
use apex_unify::MapResolver;
use apex_unify::UnifiedViewOptions;
use apex_unify::UnifiedView;
use tokio::sync::watch;
use tokio::sync::Semaphore;

use crate::events::EngineEvent;
use crate::parser::LogParser;
use crate::sanitize::redact_events;

/// Default bound on the number of analyses running at once (spec.md §5).
pub const DEFAULT_MAX_CONCURRENT_ANALYSES: usize = 5;

/// Cooperative cancellation signal. A caller holds the paired
/// [`watch::Sender<bool>`] and sets it to `true` to request cancellation;
/// [`AnalysisEngine::analyze`] observes it at every suspension point.
pub type CancelSignal = watch::Receiver<bool>;

fn check_cancelled(cancel: &CancelSignal) -> Result<(), ApexError> {
    if *cancel.borrow() {
        return Err(ApexError::Cancelled);
    }
    Ok(())
}

/// Orchestrates one analysis request end to end: fetch, redact, extract,
/// resolve, correlate, unify.
pub struct AnalysisEngine<P: PlatformClient> {
    client: Arc<P>,
    parser: Arc<dyn LogParser>,
    events: Arc<dyn EventSink<EngineEvent>>,
    config: Config,
    semaphore: Arc<Semaphore>,
}

impl<P: PlatformClient> AnalysisEngine<P> {
    /// Creates an engine backed by `client`, parsing fetched bodies through
    /// `parser`, and bounded to [`DEFAULT_MAX_CONCURRENT_ANALYSES`]
    /// concurrent analyses.
    #[must_use]
    pub fn new(client: Arc<P>, parser: Arc<dyn LogParser>, events: Arc<dyn EventSink<EngineEvent>>, config: Config) -> Self {
        Self::with_concurrency(client, parser, events, config, DEFAULT_MAX_CONCURRENT_ANALYSES)
    }

    /// Creates an engine with an explicit concurrency bound.
    #[must_use]
    pub fn with_concurrency(
        client: Arc<P>,
        parser: Arc<dyn LogParser>,
        events: Arc<dyn EventSink<EngineEvent>>,
        config: Config,
        max_concurrent_analyses: usize,
    ) -> Self {
        Self { client, parser, events, config, semaphore: Arc::new(Semaphore::new(max_concurrent_analyses.max(1))) }
    }

    /// Runs one analysis of `log`, producing its unified view.
    ///
    /// # Errors
    /// Returns [`ApexError::Cancelled`] as soon as `cancel` is observed set.
    /// Returns whatever [`ApexError`] the failing stage surfaces otherwise;
    /// platform-query and parse failures propagate per spec.md §7's
    /// transient/data-shape policy, since no partial view is produced.
    pub async fn analyze(&self, log: &LogRecord, cancel: &CancelSignal, unify_options: &UnifiedViewOptions) -> Result<UnifiedView, ApexError> {
        self.run_analysis(log, cancel, unify_options).await.map(|(view, _, _)| view)
    }

    /// Runs one analysis of `log`, producing the wire-stable correlation and
    /// unified-view artifacts (spec.md §6.2) instead of the bare
    /// [`UnifiedView`] `analyze` returns.
    ///
    /// # Errors
    /// Same failure modes as [`Self::analyze`].
    pub async fn analyze_artifacts(
        &self,
        log: &LogRecord,
        cancel: &CancelSignal,
        unify_options: &UnifiedViewOptions,
    ) -> Result<(CorrelationArtifact, UnifiedViewArtifact), ApexError> {
        let (view, correlations, reference_count) = self.run_analysis(log, cancel, unify_options).await?;
        let correlation_artifact = CorrelationArtifact::from_correlations(log.id.clone(), reference_count, correlations, Vec::new());
        let view_artifact = UnifiedViewArtifact::from_view(log.id.clone(), view);
        Ok((correlation_artifact, view_artifact))
    }

    async fn run_analysis(
        &self,
        log: &LogRecord,
        cancel: &CancelSignal,
        unify_options: &UnifiedViewOptions,
    ) -> Result<(UnifiedView, Vec<Correlation>, usize), ApexError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_err| ApexError::Invariant { message: "analysis semaphore closed".to_string() })?;

        let result = self.analyze_locked(log, cancel, unify_options).await;
        match &result {
            Ok(_) => self.events.emit(EngineEvent::AnalysisCompleted { parent_log_id: log.id.clone() }),
            Err(ApexError::Cancelled) => self.events.emit(EngineEvent::AnalysisCancelled { parent_log_id: log.id.clone() }),
            Err(_) => {}
        }
        result
    }

    async fn analyze_locked(
        &self,
        log: &LogRecord,
        cancel: &CancelSignal,
        unify_options: &UnifiedViewOptions,
    ) -> Result<(UnifiedView, Vec<Correlation>, usize), ApexError> {
        check_cancelled(cancel)?;
        let body = self.client.log_body(log.id.as_str()).await?;

        check_cancelled(cancel)?;
        let mut root_events = self.parser.parse(&body)?;
        redact_events(&mut root_events, &self.config.redaction);
        self.events.emit(EngineEvent::RootLogParsed { parent_log_id: log.id.clone(), event_count: root_events.len() });

        check_cancelled(cancel)?;
        let extraction = apex_extract::extract(&root_events);
        let reference_count = extraction.references.len();
        self.events.emit(EngineEvent::ReferencesExtracted { parent_log_id: log.id.clone(), reference_count });

        check_cancelled(cancel)?;
        let tracker = JobTracker::new(Arc::clone(&self.client), Arc::new(NullSink));
        let resolved = tracker.resolve_all(&extraction.references, log.start_time).await?;

        check_cancelled(cancel)?;
        let correlator = Correlator::new(Arc::clone(&self.client), Arc::new(NullSink));
        let options = self.config.correlation.to_correlator_options();
        let correlations = correlator.correlate(&log.id, &extraction.references, &resolved, log.start_time, &options).await?;
        self.events.emit(EngineEvent::CorrelationsResolved { parent_log_id: log.id.clone(), correlation_count: correlations.len() });

        check_cancelled(cancel)?;
        let resolver = self.fetch_child_contexts(&correlations, cancel).await?;

        check_cancelled(cancel)?;
        let root_context =
            LogContext { log_id: log.id.clone(), events: root_events, references: extraction.references, correlations: correlations.clone() };
        let view = build_view(&root_context, extraction.confidence, &resolver, unify_options);
        Ok((view, correlations, reference_count))
    }

    /// Fetches and parses every correlation's non-empty child log, skipping
    /// (and reporting) any that fails rather than aborting the whole
    /// analysis (spec.md §7's data-shape/transient recovery policy).
    async fn fetch_child_contexts(&self, correlations: &[apex_core::Correlation], cancel: &CancelSignal) -> Result<MapResolver, ApexError> {
        let mut contexts: HashMap<ChildLogId, LogContext> = HashMap::new();
        for correlation in correlations {
            if correlation.child_log_id.is_empty() {
                continue;
            }
            check_cancelled(cancel)?;
            if let Some(context) = self.fetch_one_child(&correlation.child_log_id).await {
                contexts.insert(correlation.child_log_id.clone(), context);
            }
        }
        Ok(MapResolver::new(contexts))
    }

    async fn fetch_one_child(&self, child_log_id: &ChildLogId) -> Option<LogContext> {
        let body = match self.client.log_body(child_log_id.as_str()).await {
            Ok(body) => body,
            Err(err) => {
                self.events.emit(EngineEvent::ChildLogFetchFailed { child_log_id: child_log_id.clone(), detail: err.to_string() });
                return None;
            }
        };
        let mut events = match self.parser.parse(&body) {
            Ok(events) => events,
            Err(err) => {
                self.events.emit(EngineEvent::ChildLogFetchFailed { child_log_id: child_log_id.clone(), detail: err.to_string() });
                return None;
            }
        };
        redact_events(&mut events, &self.config.redaction);
        self.events.emit(EngineEvent::ChildLogFetched { child_log_id: child_log_id.clone() });
        let extraction = apex_extract::extract(&events);
        Some(LogContext {
            log_id: ParentLogId::new(child_log_id.as_str()),
            events,
            references: extraction.references,
            correlations: Vec::new(),
        })
    }
}

// crates/apex-capture/src/controller.rs
// ============================================================================
// Module: Capture Controller
// Description: The C3 operations: ensure session, async coverage, debug
//              levels, and log listing/fetching/deletion.
// Purpose: Implement spec.md §4.3 end to end against a PlatformClient.
// Dependencies: apex-contract, apex-core, apex-platform, time, tokio
// ============================================================================

//! ## Overview
//! [`CaptureController`] is the only way this workspace touches trace flags
//! and debug levels. It never holds platform state itself beyond what is
//! threaded through a [`crate::session::CaptureSession`]; the connection
//! pool and access token live in `apex-platform`.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use apex_contract::ApexError;
use apex_contract::ErrorCode;
use apex_contract::EventSink;
use apex_core::LogRecord;
use apex_core::LogStatus;
use apex_core::WallClock;
use apex_platform::soql;
use apex_platform::PlatformClient;
use serde_json::json;
use time::Duration;
use time::OffsetDateTime;

use crate::events::CaptureEvent;
use crate::presets::preset_by_name;
use crate::presets::Category;
use crate::presets::Preset;
use crate::presets::ALL_CATEGORIES;
use crate::session::CaptureSession;
use crate::trace_flag::TraceFlag;
use crate::trace_flag::TraceFlagState;

/// Canonical name of the platform's system-executor identity (spec.md's
/// Glossary: "Automated-process / system-executor user").
pub const AUTOMATED_PROCESS_USER_NAME: &str = "Automated Process";

/// Default remaining-minutes buffer before a trace flag is extended.
pub const DEFAULT_REMAINING_BUFFER: Duration = Duration::minutes(10);

/// Drives the trace-flag and debug-level lifecycle against one platform
/// connection.
pub struct CaptureController<P: PlatformClient> {
    client: Arc<P>,
    events: Arc<dyn EventSink<CaptureEvent>>,
}

impl<P: PlatformClient> CaptureController<P> {
    /// Creates a new controller.
    #[must_use]
    pub fn new(client: Arc<P>, events: Arc<dyn EventSink<CaptureEvent>>) -> Self {
        Self { client, events }
    }

    /// Gets or creates a `DebugLevel` record by developer name.
    ///
    /// # Errors
    ///
    /// Returns [`ApexError`] on platform failure.
    pub async fn ensure_debug_level(&self, developer_name: &str, preset: &Preset) -> Result<String, ApexError> {
        let escaped_name = soql::escape(developer_name);
        let query = format!(
            "SELECT Id FROM DebugLevel WHERE DeveloperName = '{escaped_name}' LIMIT 1"
        );
        let page = self.client.tooling_query(&query).await?;
        if let Some(existing) = page.records.first().and_then(|record| record.get("Id")).and_then(|v| v.as_str()) {
            return Ok(existing.to_string());
        }

        let mut body = serde_json::Map::new();
        body.insert("DeveloperName".to_string(), json!(developer_name));
        body.insert("MasterLabel".to_string(), json!(developer_name));
        for category in ALL_CATEGORIES {
            body.insert(field_name(*category).to_string(), json!(level_label(preset.level_for(*category))));
        }

        match self.client.tooling_create("DebugLevel", serde_json::Value::Object(body)).await {
            Ok(id) => Ok(id),
            Err(ApexError::DataShape { .. }) => {
                // Another caller created it concurrently; the namespace is shared (spec.md §4.3).
                let page = self.client.tooling_query(&query).await?;
                page.records
                    .first()
                    .and_then(|record| record.get("Id"))
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
                    .ok_or_else(|| ApexError::DataShape { message: "debug level still missing after retry".to_string() })
            }
            Err(other) => Err(other),
        }
    }

    /// Ensures at least one active trace flag exists for `user_id` with the
    /// given debug level, extending an existing flag or creating a new one,
    /// retrying once with linear backoff on a row-lock conflict.
    ///
    /// # Errors
    ///
    /// Returns [`ApexError`] on platform failure.
    pub async fn ensure_trace_flag(
        &self,
        user_id: &str,
        debug_level_id: &str,
        duration: Duration,
    ) -> Result<TraceFlag, ApexError> {
        let mut flag = self.find_trace_flag(user_id).await?;
        flag.refresh_state(now(), DEFAULT_REMAINING_BUFFER);

        match flag.state {
            TraceFlagState::Active => Ok(flag),
            TraceFlagState::Expiring => {
                let new_expiration = now() + duration.min(crate::trace_flag::MAX_EXPIRATION);
                let Some(id) = flag.id.clone() else {
                    return self.create_trace_flag(user_id, debug_level_id, duration).await;
                };
                self.client
                    .tooling_patch("TraceFlag", &id, json!({ "ExpirationDate": new_expiration.to_string() }))
                    .await?;
                flag.extend(now(), duration);
                self.events.emit(CaptureEvent::TraceFlagExtended { flag_id: id });
                Ok(flag)
            }
            TraceFlagState::Absent | TraceFlagState::Deleted => {
                self.create_trace_flag(user_id, debug_level_id, duration).await
            }
            TraceFlagState::Creating => {
                Err(ApexError::Invariant { message: "trace flag observed mid-creation".to_string() })
            }
        }
    }

    async fn create_trace_flag(
        &self,
        user_id: &str,
        debug_level_id: &str,
        duration: Duration,
    ) -> Result<TraceFlag, ApexError> {
        let mut flag = TraceFlag::pending(user_id, debug_level_id);
        let mut attempt = 0_u32;
        loop {
            let body = json!({
                "TracedEntityId": user_id,
                "DebugLevelId": debug_level_id,
                "LogType": "USER_DEBUG",
                "ExpirationDate": (now() + duration.min(crate::trace_flag::MAX_EXPIRATION)).to_string(),
            });
            match self.client.tooling_create("TraceFlag", body).await {
                Ok(id) => {
                    flag.mark_created(id.clone(), now(), duration);
                    self.events.emit(CaptureEvent::TraceFlagCreated { user_id: user_id.to_string(), flag_id: id });
                    return Ok(flag);
                }
                Err(ApexError::ResourceExhausted { code: ErrorCode::TraceFlagConflict, .. }) if attempt < 1 => {
                    attempt += 1;
                    self.events.emit(CaptureEvent::RowLockRetried { attempt });
                    tokio::time::sleep(StdDuration::from_millis(u64::from(attempt) * 250)).await;
                }
                Err(other) => return Err(other),
            }
        }
    }

    async fn find_trace_flag(&self, user_id: &str) -> Result<TraceFlag, ApexError> {
        let escaped_user = soql::escape(user_id);
        let query = format!(
            "SELECT Id, DebugLevelId, ExpirationDate FROM TraceFlag WHERE TracedEntityId = '{escaped_user}' LIMIT 1"
        );
        let page = self.client.tooling_query(&query).await?;
        let Some(record) = page.records.first() else {
            return Ok(TraceFlag::pending(user_id, String::new()));
        };
        let id = record.get("Id").and_then(|v| v.as_str()).unwrap_or_default().to_string();
        let debug_level_id = record.get("DebugLevelId").and_then(|v| v.as_str()).unwrap_or_default().to_string();
        let mut flag = TraceFlag::pending(user_id, debug_level_id);
        flag.id = Some(id);
        flag.state = TraceFlagState::Active;
        flag.expiration = record
            .get("ExpirationDate")
            .and_then(|v| v.as_str())
            .and_then(|text| OffsetDateTime::parse(text, &time::format_description::well_known::Rfc3339).ok());
        Ok(flag)
    }

    /// Ensures a capture session for `user_id`, merging `include_automated_process`
    /// coverage if requested (spec.md §4.3 "Enable async coverage").
    ///
    /// # Errors
    ///
    /// Returns [`ApexError`] on platform failure for the primary user's flag;
    /// automated-process coverage failures are downgraded to a session
    /// warning instead.
    pub async fn ensure_session(
        &self,
        org_id: &str,
        user_id: &str,
        preset_name: &str,
        duration: Duration,
        include_automated_process: bool,
    ) -> Result<CaptureSession, ApexError> {
        let preset = preset_by_name(preset_name)
            .ok_or_else(|| ApexError::DataShape { message: format!("unknown preset '{preset_name}'") })?;
        let debug_level_id = self.ensure_debug_level(&format!("APEX_{preset_name}"), preset).await?;
        let flag = self.ensure_trace_flag(user_id, &debug_level_id, duration).await?;

        let mut session = CaptureSession::new(org_id, user_id, debug_level_id);
        if let Some(id) = flag.id {
            session.track(id);
        }

        if include_automated_process {
            self.enable_async_coverage(&mut session, preset, duration).await?;
        }

        Ok(session)
    }

    /// Locates the system-executor user and creates a merged-preset trace
    /// flag on it, or records a warning if it cannot be found (spec.md
    /// §4.3's "return success ... with a warning").
    ///
    /// # Errors
    ///
    /// Returns [`ApexError`] only on unexpected platform failure; a missing
    /// system-executor user is not an error.
    pub async fn enable_async_coverage(
        &self,
        session: &mut CaptureSession,
        preset: &Preset,
        duration: Duration,
    ) -> Result<(), ApexError> {
        let escaped_name = soql::escape(AUTOMATED_PROCESS_USER_NAME);
        let query = format!("SELECT Id FROM User WHERE Name = '{escaped_name}' LIMIT 1");
        let page = self.client.query(&query).await?;
        let Some(system_user_id) = page.records.first().and_then(|r| r.get("Id")).and_then(|v| v.as_str()) else {
            session.automated_process_coverage_missing = true;
            self.events.emit(CaptureEvent::AutomatedProcessUserMissing);
            return Ok(());
        };

        let debug_level_id = self.ensure_debug_level("APEX_async_coverage", preset).await?;
        let flag = self.ensure_trace_flag(system_user_id, &debug_level_id, duration).await?;
        if let Some(id) = flag.id {
            session.track(id);
        }
        Ok(())
    }

    /// Lists logs for `user_id` with start times in `[window_start, window_end)`.
    ///
    /// # Errors
    ///
    /// Returns [`ApexError`] on platform failure.
    pub async fn list_logs(
        &self,
        user_id: &str,
        window_start: OffsetDateTime,
        window_end: OffsetDateTime,
        limit: u32,
    ) -> Result<Vec<LogRecord>, ApexError> {
        let escaped_user = soql::escape(user_id);
        let capped_limit = soql::clamp_limit(limit, 50);
        let query = format!(
            "SELECT Id, StartTime, LogUserId, Operation, LogLength, Status, DurationMilliseconds \
             FROM ApexLog WHERE LogUserId = '{escaped_user}' AND StartTime >= {start} AND StartTime < {end} \
             ORDER BY StartTime ASC LIMIT {capped_limit}",
            start = window_start.format(&time::format_description::well_known::Rfc3339).unwrap_or_default(),
            end = window_end.format(&time::format_description::well_known::Rfc3339).unwrap_or_default(),
        );
        let page = self.client.query(&query).await?;
        Ok(page.records.iter().filter_map(parse_log_record).collect())
    }

    /// Fetches one log body, subject to the 20 MiB cap enforced in `apex-platform`.
    ///
    /// # Errors
    ///
    /// Returns [`ApexError`] on platform failure or size-cap violation.
    pub async fn fetch_log(&self, log_id: &str) -> Result<String, ApexError> {
        self.client.log_body(log_id).await
    }

    /// Deletes all trace flags this session created, logging but swallowing
    /// per-flag failures (spec.md §4.3 "Cleanup").
    pub async fn cleanup(&self, session: &CaptureSession) {
        for flag_id in &session.trace_flag_ids {
            if let Err(err) = self.client.tooling_delete("TraceFlag", flag_id).await {
                self.events.emit(CaptureEvent::CleanupFailed {
                    flag_id: flag_id.clone(),
                    detail: err.to_string(),
                });
            }
        }
    }

    /// Runs `body` with `session`, guaranteeing [`CaptureController::cleanup`]
    /// runs afterward regardless of success, error, or cancellation
    /// (spec.md §5's scoped-acquisition guarantee).
    ///
    /// # Errors
    ///
    /// Propagates whatever error `body` returns, after cleanup has run.
    pub async fn with_session<F, Fut, T>(&self, session: CaptureSession, body: F) -> Result<T, ApexError>
    where
        F: FnOnce(CaptureSession) -> Fut,
        Fut: std::future::Future<Output = Result<T, ApexError>>,
    {
        let cleanup_copy = session.clone();
        let result = body(session).await;
        self.cleanup(&cleanup_copy).await;
        result
    }
}

fn now() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

fn field_name(category: Category) -> &'static str {
    match category {
        Category::Database => "Db",
        Category::Workflow => "Workflow",
        Category::Validation => "Validation",
        Category::Callout => "Callout",
        Category::ApexCode => "ApexCode",
        Category::ApexProfiling => "ApexProfiling",
        Category::Visualforce => "Visualforce",
        Category::System => "System",
    }
}

fn level_label(verbosity: crate::presets::Verbosity) -> &'static str {
    use crate::presets::Verbosity;
    match verbosity {
        Verbosity::None => "NONE",
        Verbosity::Error => "ERROR",
        Verbosity::Warn => "WARN",
        Verbosity::Info => "INFO",
        Verbosity::Debug => "DEBUG",
        Verbosity::Fine => "FINE",
        Verbosity::Finer => "FINER",
        Verbosity::Finest => "FINEST",
    }
}

fn parse_log_record(record: &serde_json::Value) -> Option<LogRecord> {
    let id = record.get("Id")?.as_str()?.to_string();
    let start_time_text = record.get("StartTime")?.as_str()?;
    let start_time = OffsetDateTime::parse(start_time_text, &time::format_description::well_known::Rfc3339).ok()?;
    let user_id = record.get("LogUserId")?.as_str()?.to_string();
    let operation = record.get("Operation").and_then(|v| v.as_str()).unwrap_or_default().to_string();
    let byte_length = record.get("LogLength").and_then(serde_json::Value::as_u64).unwrap_or(0);
    let status = match record.get("Status").and_then(|v| v.as_str()) {
        Some("Success") => LogStatus::Success,
        _ => LogStatus::Exception,
    };
    let duration_millis = record.get("DurationMilliseconds").and_then(serde_json::Value::as_u64).unwrap_or(0);
    Some(LogRecord {
        id: id.into(),
        start_time: WallClock::new(start_time),
        user_id,
        operation,
        byte_length,
        status,
        duration_millis,
    })
}

// crates/apex-correlate/src/query.rs
// ============================================================================
// Module: Correlator Query Building
// Description: SOQL construction and response parsing for candidate ApexLog
//              records (spec.md §4.6.1).
// Purpose: Give the candidate-log search a single, capped, escaped query path
//          and a single parser back to `LogRecord`.
// Dependencies: apex-contract, apex-core, apex-platform, serde_json, time
// ============================================================================

//! ## Overview
//! A single window query fetches every candidate child log for a parent's
//! full reference set; per-reference filtering happens afterward in
//! `crate::correlator`. The window itself is capped to 50 records
//! (spec.md §4.6.1).

use apex_contract::ApexError;
use apex_core::LogRecord;
use apex_core::LogStatus;
use apex_core::ParentLogId;
use apex_core::WallClock;
use apex_platform::soql;
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Hard cap on candidate logs fetched per correlation pass (spec.md §4.6.1).
pub const CANDIDATE_LOG_LIMIT: u32 = 50;

const SELECT_FIELDS: &str =
    "Id, StartTime, LogUserId, Operation, LogLength, Status, DurationMilliseconds";

/// Builds the candidate-log window query.
#[must_use]
pub fn candidate_log_query(window_start: WallClock, window_end: WallClock, limit: u32) -> String {
    let limit = soql::clamp_limit(limit, CANDIDATE_LOG_LIMIT);
    let start = format_datetime(window_start).unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string());
    let end = format_datetime(window_end).unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string());
    format!(
        "SELECT {SELECT_FIELDS} FROM ApexLog \
         WHERE StartTime >= {start} AND StartTime <= {end} \
         ORDER BY StartTime ASC LIMIT {limit}"
    )
}

fn format_datetime(instant: WallClock) -> Result<String, ApexError> {
    instant
        .as_offset_date_time()
        .format(&Rfc3339)
        .map_err(|err| ApexError::Invariant { message: format!("unformattable timestamp: {err}") })
}

fn parse_datetime(text: &str) -> Result<WallClock, ApexError> {
    OffsetDateTime::parse(text, &Rfc3339)
        .map(WallClock::new)
        .map_err(|err| ApexError::DataShape { message: format!("malformed timestamp '{text}': {err}") })
}

/// Parses one `ApexLog` record from the platform's raw JSON shape.
///
/// # Errors
///
/// Returns [`ApexError::DataShape`] when a required field is missing or
/// malformed.
pub fn parse_log_record(value: &Value) -> Result<LogRecord, ApexError> {
    let missing = |field: &str| ApexError::DataShape { message: format!("ApexLog record missing '{field}'") };

    let id = value.get("Id").and_then(Value::as_str).ok_or_else(|| missing("Id"))?;
    let start_text = value.get("StartTime").and_then(Value::as_str).ok_or_else(|| missing("StartTime"))?;
    let user_id = value.get("LogUserId").and_then(Value::as_str).unwrap_or_default().to_string();
    let operation = value.get("Operation").and_then(Value::as_str).unwrap_or_default().to_string();
    let byte_length = value.get("LogLength").and_then(Value::as_u64).unwrap_or(0);
    let status_text = value.get("Status").and_then(Value::as_str).unwrap_or_default();
    let duration_millis = value.get("DurationMilliseconds").and_then(Value::as_u64).unwrap_or(0);

    Ok(LogRecord {
        id: ParentLogId::new(id),
        start_time: parse_datetime(start_text)?,
        user_id,
        operation,
        byte_length,
        status: if status_text == "Success" { LogStatus::Success } else { LogStatus::Exception },
        duration_millis,
    })
}

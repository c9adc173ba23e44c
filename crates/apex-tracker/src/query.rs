// crates/apex-tracker/src/query.rs
// ============================================================================
// Module: Tracker Query Building
// Description: SOQL construction and response parsing for AsyncApexJob
//              records (spec.md §4.5).
// Purpose: Give every query a single, escaped, allow-listed construction
//          path, and a single parser back to `PlatformJobRecord`.
// Dependencies: apex-contract, apex-core, apex-platform, serde_json, time
// ============================================================================

//! ## Overview
//! Every SOQL fragment built here routes user-derived strings through
//! [`apex_platform::soql::escape`] and enum-valued filters through
//! [`apex_platform::soql::validate_enum`], per spec.md §4.5's "must be
//! escaped"/"must be validated against a fixed allow-list" requirements.

use apex_contract::ApexError;
use apex_core::JobKind;
use apex_core::JobStatus;
use apex_core::PlatformJobId;
use apex_core::PlatformJobRecord;
use apex_core::WallClock;
use apex_platform::soql;
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

const SELECT_FIELDS: &str = "Id, ApexClassId, ApexClass.Name, JobType, Status, \
     JobItemsProcessed, TotalJobItems, NumberOfErrors, CreatedDate, CompletedDate, \
     ExtendedStatus, ParentJobId, MethodName";

/// The platform's allow-listed `AsyncApexJob.JobType` values.
pub const ALLOWED_JOB_TYPES: &[&str] = &["Queueable", "BatchApex", "Future", "ScheduledApex"];

/// Maps a [`JobKind`] to its platform `JobType` literal.
#[must_use]
pub const fn job_type_literal(kind: JobKind) -> &'static str {
    match kind {
        JobKind::Queueable => "Queueable",
        JobKind::Batch => "BatchApex",
        JobKind::Future => "Future",
        JobKind::Schedulable => "ScheduledApex",
    }
}

/// Maps a platform `JobType` string back to [`JobKind`], defaulting to
/// [`JobKind::Queueable`] for an unrecognized value rather than failing the
/// whole resolution (spec.md §9's "never surface fewer results than found").
#[must_use]
pub fn job_kind_from_type(text: &str) -> JobKind {
    match text {
        "BatchApex" => JobKind::Batch,
        "Future" => JobKind::Future,
        "ScheduledApex" => JobKind::Schedulable,
        _ => JobKind::Queueable,
    }
}

/// Maps a platform `Status` string to [`JobStatus`], defaulting to
/// [`JobStatus::Queued`] for an unrecognized value.
#[must_use]
pub fn job_status_from_text(text: &str) -> JobStatus {
    match text {
        "Preparing" => JobStatus::Preparing,
        "Processing" => JobStatus::Processing,
        "Completed" => JobStatus::Completed,
        "Failed" => JobStatus::Failed,
        "Aborted" => JobStatus::Aborted,
        "Holding" => JobStatus::Holding,
        _ => JobStatus::Queued,
    }
}

/// Builds a `SELECT ... WHERE Id IN (...)` query for a chunk of known
/// platform job ids. `ids` must not exceed 50 entries; the caller is
/// responsible for chunking (spec.md §4.5).
#[must_use]
pub fn by_id_query(ids: &[PlatformJobId]) -> String {
    let list = ids
        .iter()
        .map(|id| soql::quoted(&soql::escape(id.as_str())))
        .collect::<Vec<_>>()
        .join(", ");
    format!("SELECT {SELECT_FIELDS} FROM AsyncApexJob WHERE Id IN ({list})")
}

/// Builds the per-reference `class+type+window` query for a reference with
/// no known platform job id.
///
/// # Errors
///
/// Returns [`ApexError::Invariant`] if `job_kind`'s literal is somehow not in
/// [`ALLOWED_JOB_TYPES`] (defensive; the literal is derived from a closed
/// enum so this cannot happen in practice).
pub fn by_reference_window_query(
    class_name: &str,
    job_kind: JobKind,
    window_start: WallClock,
    window_end: WallClock,
) -> Result<String, ApexError> {
    let job_type = soql::validate_enum(job_type_literal(job_kind), ALLOWED_JOB_TYPES)
        .map_err(|message| ApexError::Invariant { message })?;
    let class_literal = soql::quoted(&soql::escape(class_name));
    let start = format_datetime(window_start)?;
    let end = format_datetime(window_end)?;
    Ok(format!(
        "SELECT {SELECT_FIELDS} FROM AsyncApexJob \
         WHERE ApexClass.Name = {class_literal} AND JobType = '{job_type}' \
         AND CreatedDate >= {start} AND CreatedDate <= {end} \
         ORDER BY CreatedDate ASC LIMIT 1"
    ))
}

/// Builds the single-record query `waitForCompletion` polls against.
#[must_use]
pub fn by_single_id_query(id: &PlatformJobId) -> String {
    let literal = soql::quoted(&soql::escape(id.as_str()));
    format!("SELECT {SELECT_FIELDS} FROM AsyncApexJob WHERE Id = {literal} LIMIT 1")
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

/// Parses one `AsyncApexJob` record from the platform's raw JSON shape.
///
/// # Errors
///
/// Returns [`ApexError::DataShape`] when a required field is missing or
/// malformed.
pub fn parse_job_record(value: &Value) -> Result<PlatformJobRecord, ApexError> {
    let missing = |field: &str| ApexError::DataShape { message: format!("AsyncApexJob record missing '{field}'") };

    let id = value.get("Id").and_then(Value::as_str).ok_or_else(|| missing("Id"))?;
    let class_id = value.get("ApexClassId").and_then(Value::as_str).unwrap_or_default().to_string();
    let class_name = value
        .get("ApexClass")
        .and_then(|class| class.get("Name"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let job_type = value.get("JobType").and_then(Value::as_str).ok_or_else(|| missing("JobType"))?;
    let status = value.get("Status").and_then(Value::as_str).ok_or_else(|| missing("Status"))?;
    let created_text = value.get("CreatedDate").and_then(Value::as_str).ok_or_else(|| missing("CreatedDate"))?;

    Ok(PlatformJobRecord {
        id: PlatformJobId::new(id),
        class_id,
        class_name,
        job_type: job_kind_from_type(job_type),
        status: job_status_from_text(status),
        items_processed: value.get("JobItemsProcessed").and_then(Value::as_u64).unwrap_or(0),
        items_total: value.get("TotalJobItems").and_then(Value::as_u64),
        errors: value.get("NumberOfErrors").and_then(Value::as_u64).unwrap_or(0),
        created: parse_datetime(created_text)?,
        completed: value
            .get("CompletedDate")
            .and_then(Value::as_str)
            .map(parse_datetime)
            .transpose()?,
        extended_status: value.get("ExtendedStatus").and_then(Value::as_str).map(str::to_string),
        parent_job_id: value.get("ParentJobId").and_then(Value::as_str).map(PlatformJobId::new),
        method_name: value.get("MethodName").and_then(Value::as_str).map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::datetime;

    use super::*;

    #[test]
    fn by_id_query_escapes_and_joins_ids() {
        let ids = vec![PlatformJobId::new("707xx0000000001AAA"), PlatformJobId::new("707xx0000000002AAA")];
        let query = by_id_query(&ids);
        assert!(query.contains("'707xx0000000001AAA'"));
        assert!(query.contains("IN ("));
    }

    #[test]
    fn by_reference_window_query_validates_job_type() {
        let start = WallClock::new(datetime!(2026-01-01 00:00:00 UTC));
        let end = WallClock::new(datetime!(2026-01-01 00:01:00 UTC));
        let query = by_reference_window_query("MyQueueable", JobKind::Queueable, start, end).expect("builds");
        assert!(query.contains("JobType = 'Queueable'"));
        assert!(query.contains("'MyQueueable'"));
    }

    #[test]
    fn reference_query_escapes_hostile_class_names() {
        let start = WallClock::new(datetime!(2026-01-01 00:00:00 UTC));
        let end = WallClock::new(datetime!(2026-01-01 00:01:00 UTC));
        let query = by_reference_window_query("x' OR '1'='1", JobKind::Batch, start, end).expect("builds");
        assert!(!query.contains("OR '1'='1'"));
    }

    #[test]
    fn parse_job_record_reads_nested_class_name() {
        let value = json!({
            "Id": "707xx0000000001AAA",
            "ApexClassId": "01p000000000001",
            "ApexClass": { "Name": "MyQueueable" },
            "JobType": "Queueable",
            "Status": "Completed",
            "JobItemsProcessed": 1,
            "TotalJobItems": 1,
            "NumberOfErrors": 0,
            "CreatedDate": "2026-01-01T00:00:00Z",
            "CompletedDate": "2026-01-01T00:00:05Z",
        });
        let record = parse_job_record(&value).expect("parses");
        assert_eq!(record.class_name, "MyQueueable");
        assert_eq!(record.status, JobStatus::Completed);
        assert!(record.completed.is_some());
    }

    #[test]
    fn parse_job_record_rejects_missing_required_field() {
        let value = json!({ "ApexClass": { "Name": "MyQueueable" } });
        assert!(parse_job_record(&value).is_err());
    }
}

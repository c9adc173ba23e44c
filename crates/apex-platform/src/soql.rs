// crates/apex-platform/src/soql.rs
// ============================================================================
// Module: SOQL Escaping
// Description: Centralized escaping and validation for query-string interpolation.
// Purpose: The single place every caller builds user-derived query fragments,
//          per spec.md §4.5's "must be escaped" requirement.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Every string interpolated into a SOQL query anywhere in this workspace
//! passes through [`escape`] first. Numeric limits are clamped with
//! [`clamp_limit`] and enum-valued filters are checked against a fixed
//! allow-list with [`validate_enum`] before being written into a query
//! literal.

/// Escapes backslash, single-quote, and double-quote characters for safe
/// interpolation into a SOQL string literal.
#[must_use]
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            other => out.push(other),
        }
    }
    out
}

/// Clamps a numeric query limit to `[1, max]`.
#[must_use]
pub fn clamp_limit(requested: u32, max: u32) -> u32 {
    requested.clamp(1, max)
}

/// Validates that `value` appears in `allowed`, case-sensitively, returning
/// it unchanged. Used for enum-valued filters (e.g. job status, job type)
/// before they are written into a query literal without quoting.
pub fn validate_enum<'a>(value: &'a str, allowed: &[&str]) -> Result<&'a str, String> {
    if allowed.contains(&value) {
        Ok(value)
    } else {
        Err(format!("'{value}' is not one of the allowed values: {allowed:?}"))
    }
}

/// Wraps an already-escaped value in single quotes for a string literal.
#[must_use]
pub fn quoted(escaped_value: &str) -> String {
    format!("'{escaped_value}'")
}

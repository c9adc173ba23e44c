// crates/apex-redaction/src/value.rs
// ============================================================================
// Module: Deep Value Redaction
// Description: Recursive redaction over structured JSON values.
// Purpose: Implement spec.md §4.2's "deep redaction on structured values"
//          requirement for artifacts that embed text inside nested objects.
// Dependencies: apex-core, serde_json
// ============================================================================

//! ## Overview
//! [`redact_value`] walks a [`serde_json::Value`] at any depth, redacting
//! every string leaf and merging the per-leaf reports into one. Non-string
//! leaves (numbers, bools, null) are copied verbatim.

use apex_core::RedactionReport;
use serde_json::Value;

use crate::config::RedactionConfig;
use crate::engine::redact_text;

/// Redacts every string leaf in `value`, returning the redacted copy and a
/// merged report. Spans in the merged report carry byte offsets relative to
/// their own leaf string, not to a flattened representation of `value`.
#[must_use]
pub fn redact_value(value: &Value, config: &RedactionConfig) -> (Value, RedactionReport) {
    let mut report = RedactionReport::empty();
    let redacted = walk(value, config, &mut report);
    (redacted, report)
}

fn walk(value: &Value, config: &RedactionConfig, report: &mut RedactionReport) -> Value {
    match value {
        Value::String(text) => {
            let (redacted, leaf_report) = redact_text(text, config);
            report.spans.extend(leaf_report.spans);
            Value::String(redacted)
        }
        Value::Array(items) => {
            Value::Array(items.iter().map(|item| walk(item, config, report)).collect())
        }
        Value::Object(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (key, item) in map {
                out.insert(key.clone(), walk(item, config, report));
            }
            Value::Object(out)
        }
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_string_leaves_are_copied_verbatim() {
        let input = json!({"count": 3, "active": true, "note": null});
        let (redacted, report) = redact_value(&input, &RedactionConfig::default());
        assert_eq!(redacted, input);
        assert!(report.is_empty());
    }

    #[test]
    fn nested_strings_are_redacted_at_any_depth() {
        let input = json!({"user": {"contacts": ["a@b.com", "no pii here"]}});
        let (redacted, report) = redact_value(&input, &RedactionConfig::default());
        assert_eq!(redacted["user"]["contacts"][0], json!("[EMAIL]"));
        assert_eq!(redacted["user"]["contacts"][1], json!("no pii here"));
        assert_eq!(report.spans.len(), 1);
    }
}

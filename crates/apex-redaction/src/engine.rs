// crates/apex-redaction/src/engine.rs
// ============================================================================
// Module: Redaction Engine
// Description: The core text-redaction algorithm (spec.md §4.2).
// Purpose: Turn a config and a piece of text into a redacted copy plus report.
// Dependencies: apex-core, regex, sha2
// ============================================================================

//! ## Overview
//! [`redact_text`] runs every enabled pattern over the input, resolves
//! overlaps in favor of the higher-sensitivity match, and rewrites the text
//! right-to-left so earlier byte offsets in the report stay valid against the
//! original text.

use apex_core::RedactionReport;
use apex_core::RedactionSpan;
use apex_core::Sensitivity;
use sha2::Digest;
use sha2::Sha256;

use crate::config::RedactionConfig;
use crate::patterns::BUILTIN_CATEGORIES;

struct Candidate {
    category: String,
    sensitivity: Sensitivity,
    placeholder: String,
    start: usize,
    end: usize,
}

fn collect_candidates(text: &str, config: &RedactionConfig) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    for builtin in BUILTIN_CATEGORIES {
        if !config.category_enabled(builtin.id, builtin.sensitivity) {
            continue;
        }
        if !(builtin.precheck)(text) {
            continue;
        }
        for mat in builtin.regex.find_iter(text) {
            candidates.push(Candidate {
                category: builtin.id.to_string(),
                sensitivity: builtin.sensitivity,
                placeholder: config.placeholder_for(builtin.id),
                start: mat.start(),
                end: mat.end(),
            });
        }
    }

    for custom in &config.custom_patterns {
        if !config.category_enabled(&custom.id, custom.sensitivity) {
            continue;
        }
        let Ok(regex) = regex::Regex::new(&custom.pattern) else {
            continue;
        };
        for mat in regex.find_iter(text) {
            candidates.push(Candidate {
                category: custom.id.clone(),
                sensitivity: custom.sensitivity,
                placeholder: custom.placeholder.clone(),
                start: mat.start(),
                end: mat.end(),
            });
        }
    }

    candidates
}

/// Resolves overlapping candidates by keeping the higher-sensitivity span,
/// breaking ties by earliest start (spec.md §4.2), and returns the survivors
/// sorted by start offset.
fn resolve_overlaps(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then_with(|| b.sensitivity.cmp(&a.sensitivity))
    });

    let mut resolved: Vec<Candidate> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let overlaps_kept = resolved
            .iter()
            .position(|kept| candidate.start < kept.end && kept.start < candidate.end);
        match overlaps_kept {
            None => resolved.push(candidate),
            Some(index) => {
                let replace = candidate.sensitivity > resolved[index].sensitivity
                    || (candidate.sensitivity == resolved[index].sensitivity
                        && candidate.start < resolved[index].start);
                if replace {
                    resolved[index] = candidate;
                }
            }
        }
    }
    resolved.sort_by_key(|c| c.start);
    resolved
}

fn hash_original(original: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(original.as_bytes());
    format!("hash:{:x}", hasher.finalize())
}

/// Redacts `text` per `config`, returning the redacted copy and a report.
///
/// # Invariants
/// - Empty input returns `(String::new(), RedactionReport::empty())`
///   (spec.md §4.2's failure-mode note).
/// - The returned report's spans are sorted by `start` and non-overlapping.
#[must_use]
pub fn redact_text(text: &str, config: &RedactionConfig) -> (String, RedactionReport) {
    if text.is_empty() {
        return (String::new(), RedactionReport::empty());
    }

    let candidates = resolve_overlaps(collect_candidates(text, config));

    let mut spans = Vec::with_capacity(candidates.len());
    let mut output = text.to_string();
    for candidate in candidates.iter().rev() {
        output.replace_range(candidate.start..candidate.end, &candidate.placeholder);
    }

    for candidate in candidates {
        let original_slice = &text[candidate.start..candidate.end];
        let original = if config.hash_originals {
            Some(hash_original(original_slice))
        } else if config.track_redactions {
            Some(original_slice.to_string())
        } else {
            None
        };
        spans.push(RedactionSpan {
            category: candidate.category,
            sensitivity: candidate.sensitivity,
            start: candidate.start,
            end: candidate.end,
            placeholder: candidate.placeholder,
            original,
        });
    }

    (output, RedactionReport { spans })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_returns_empty_report() {
        let (text, report) = redact_text("", &RedactionConfig::default());
        assert_eq!(text, "");
        assert!(report.is_empty());
    }

    #[test]
    fn email_is_redacted_with_placeholder() {
        let (text, report) = redact_text("contact a@b.com now", &RedactionConfig::default());
        assert_eq!(text, "contact [EMAIL] now");
        assert_eq!(report.spans.len(), 1);
        assert_eq!(report.spans[0].category, "email");
        assert!(report.spans[0].original.is_none());
    }

    #[test]
    fn truncated_email_is_not_redacted() {
        let (text, report) = redact_text("Email = 'a@b", &RedactionConfig::default());
        assert_eq!(text, "Email = 'a@b");
        assert!(report.is_empty());
    }

    #[test]
    fn higher_sensitivity_wins_on_overlap() {
        let config = RedactionConfig {
            custom_patterns: vec![crate::config::CustomPattern {
                id: "wide".to_string(),
                pattern: r"\d{3}-\d{2}-\d{4} is sensitive".to_string(),
                sensitivity: Sensitivity::Critical,
                placeholder: "[WIDE]".to_string(),
            }],
            ..RedactionConfig::default()
        }
        .validated()
        .0;
        let (text, report) = redact_text("123-45-6789 is sensitive", &config);
        assert_eq!(text, "[WIDE]");
        assert_eq!(report.spans.len(), 1);
        assert_eq!(report.spans[0].category, "wide");
    }

    #[test]
    fn track_redactions_preserves_original() {
        let config = RedactionConfig { track_redactions: true, ..RedactionConfig::default() };
        let (_, report) = redact_text("email a@b.com here", &config);
        assert_eq!(report.spans[0].original.as_deref(), Some("a@b.com"));
    }

    #[test]
    fn hash_originals_emits_hash_prefix() {
        let config = RedactionConfig { hash_originals: true, ..RedactionConfig::default() };
        let (_, report) = redact_text("email a@b.com here", &config);
        let original = report.spans[0].original.as_deref().unwrap_or_default();
        assert!(original.starts_with("hash:"));
    }
}

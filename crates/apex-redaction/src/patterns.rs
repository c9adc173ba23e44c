// crates/apex-redaction/src/patterns.rs
// ============================================================================
// Module: Built-in Redaction Patterns
// Description: The nine built-in PII pattern categories (spec.md §4.2).
// Purpose: Pair each category with a sensitivity, a fast substring pre-check,
//          and a compiled regex.
// Dependencies: apex-core, once_cell, regex
// ============================================================================

//! ## Overview
//! Each built-in category carries a cheap substring pre-check so a 20 MiB log
//! is not run through thirteen regexes unconditionally (spec.md §10's
//! "Regex-per-PII-category with fast substring pre-check" decision). The
//! pre-check is a closure rather than a single literal because some
//! categories (ssn, key=value) need more than one candidate substring.

use apex_core::Sensitivity;
use once_cell::sync::Lazy;
use regex::Regex;

/// A built-in PII pattern category.
pub struct BuiltinCategory {
    /// Stable identifier, used in the redaction report and in config overrides.
    pub id: &'static str,
    /// Sensitivity tier for matches of this category.
    pub sensitivity: Sensitivity,
    /// Default placeholder text when `usePlaceholders` is enabled.
    pub placeholder: &'static str,
    /// Cheap pre-check: returns false when the regex certainly cannot match.
    pub precheck: fn(&str) -> bool,
    /// Compiled pattern, applied globally when `precheck` passes.
    pub regex: &'static Lazy<Regex>,
}

#[allow(clippy::unwrap_used, reason = "pattern literals are fixed and tested")]
mod regexes {
    use super::Lazy;
    use super::Regex;

    pub static EMAIL: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap()
    });
    pub static PHONE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\b\+?1?[\s.-]?\(?\d{3}\)?[\s.-]\d{3}[\s.-]\d{4}\b").unwrap());
    // Requires an explicit `-` or space delimiter between the 3-2-4 groups so
    // a bare 9-digit numeric id is never mistaken for an SSN.
    pub static SSN: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\b\d{3}[\s-]\d{2}[\s-]\d{4}\b").unwrap());
    pub static CREDIT_CARD: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\b(?:\d[ -]?){13,16}\b").unwrap());
    pub static IPV4: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"\b(?:(?:25[0-5]|2[0-4]\d|1?\d?\d)\.){3}(?:25[0-5]|2[0-4]\d|1?\d?\d)\b").unwrap()
    });
    // Platform record ids: 15 or 18 alphanumeric characters, first 3 the
    // object-prefix convention.
    pub static PLATFORM_RECORD_ID: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\b[A-Za-z0-9]{3}[A-Za-z0-9]{12}(?:[A-Za-z0-9]{3})?\b").unwrap());
    pub static SESSION_TOKEN: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\b00D[A-Za-z0-9]{12,15}![A-Za-z0-9._-]{20,}\b").unwrap());
    pub static API_KEY: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\b(?:sk|pk|key)[_-][A-Za-z0-9]{16,}\b").unwrap());
    pub static PASSWORD_KV: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)\b(?:password|passwd|pwd|secret)\s*=\s*\S+").unwrap()
    });
}

fn contains_at(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

/// The full set of built-in categories, in a fixed order used to break ties
/// when two categories would otherwise match the same sensitivity.
pub static BUILTIN_CATEGORIES: &[BuiltinCategory] = &[
    BuiltinCategory {
        id: "email",
        sensitivity: Sensitivity::High,
        placeholder: "[EMAIL]",
        precheck: |t| contains_at(t, &["@"]),
        regex: &regexes::EMAIL,
    },
    BuiltinCategory {
        id: "phone",
        sensitivity: Sensitivity::High,
        placeholder: "[PHONE]",
        precheck: |t| t.bytes().any(|b| b.is_ascii_digit()),
        regex: &regexes::PHONE,
    },
    BuiltinCategory {
        id: "ssn",
        sensitivity: Sensitivity::Critical,
        placeholder: "[SSN]",
        precheck: |t| t.bytes().filter(u8::is_ascii_digit).count() >= 9,
        regex: &regexes::SSN,
    },
    BuiltinCategory {
        id: "credit-card",
        sensitivity: Sensitivity::Critical,
        placeholder: "[CREDIT_CARD]",
        precheck: |t| t.bytes().filter(u8::is_ascii_digit).count() >= 13,
        regex: &regexes::CREDIT_CARD,
    },
    BuiltinCategory {
        id: "ipv4",
        sensitivity: Sensitivity::Medium,
        placeholder: "[IP_ADDRESS]",
        precheck: |t| contains_at(t, &["."]),
        regex: &regexes::IPV4,
    },
    BuiltinCategory {
        id: "platform-record-id",
        sensitivity: Sensitivity::Low,
        placeholder: "[RECORD_ID]",
        precheck: |t| t.bytes().any(|b| b.is_ascii_alphanumeric()),
        regex: &regexes::PLATFORM_RECORD_ID,
    },
    BuiltinCategory {
        id: "session-token",
        sensitivity: Sensitivity::Critical,
        placeholder: "[SESSION_TOKEN]",
        precheck: |t| contains_at(t, &["00D"]),
        regex: &regexes::SESSION_TOKEN,
    },
    BuiltinCategory {
        id: "api-key",
        sensitivity: Sensitivity::Critical,
        placeholder: "[API_KEY]",
        precheck: |t| contains_at(t, &["sk_", "sk-", "pk_", "pk-", "key_", "key-"]),
        regex: &regexes::API_KEY,
    },
    BuiltinCategory {
        id: "password-kv",
        sensitivity: Sensitivity::Critical,
        placeholder: "[REDACTED]",
        precheck: |t| contains_at(&t.to_ascii_lowercase(), &["password", "passwd", "pwd", "secret"]),
        regex: &regexes::PASSWORD_KV,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_precheck_passes_for_a_matching_sample() {
        let samples: &[(&str, &str)] = &[
            ("email", "reach me at a@b.com"),
            ("phone", "call 555-123-4567"),
            ("ssn", "ssn 123-45-6789"),
            ("credit-card", "4111 1111 1111 1111"),
            ("ipv4", "connect to 10.0.0.1"),
            ("platform-record-id", "id 00Q1a0000000001AAA"),
            ("session-token", "00D1a0000000001!abcdefghijklmnopqrstuvwxyz0123"),
            ("api-key", "token sk_live_abcdefghij1234567890"),
            ("password-kv", "password = hunter2"),
        ];
        for (id, sample) in samples {
            let category = BUILTIN_CATEGORIES.iter().find(|c| c.id == *id).expect("category exists");
            assert!((category.precheck)(sample), "precheck failed for {id}");
            assert!(category.regex.is_match(sample), "regex failed for {id}");
        }
    }

    #[test]
    fn password_kv_precheck_is_case_insensitive() {
        let category = BUILTIN_CATEGORIES.iter().find(|c| c.id == "password-kv").expect("category exists");
        assert!((category.precheck)("Password = hunter2"));
        assert!((category.precheck)("SeCrEt=swordfish"));
    }

    #[test]
    fn ssn_pattern_requires_explicit_delimiter() {
        assert!(!regexes::SSN.is_match("order number 123456789"));
        assert!(regexes::SSN.is_match("ssn 123-45-6789"));
    }
}

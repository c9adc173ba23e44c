// crates/apex-redaction/src/lib.rs
// ============================================================================
// Module: Apex Redaction
// Description: Pattern-based PII detection, classification, and masking (C2).
// Purpose: Every textual artifact leaving this workspace passes through here
//          first (spec.md §4.2, §5).
// Dependencies: apex-core, once_cell, regex, serde, serde_json, sha2
// ============================================================================

//! # Apex Redaction
//!
//! C2: the PII-aware redaction pipeline. Given arbitrary text or a
//! structured value, returns a redacted copy plus a report of what was
//! matched and where. Runs synchronously and CPU-bound on the caller's
//! worker, as required by spec.md §5 — it never performs I/O.

#![deny(missing_docs)]

mod config;
mod engine;
mod patterns;
mod value;

pub use config::ConfigWarning;
pub use config::CustomPattern;
pub use config::RedactionConfig;
pub use engine::redact_text;
pub use patterns::BuiltinCategory;
pub use patterns::BUILTIN_CATEGORIES;
pub use value::redact_value;

// crates/apex-engine/src/lib.rs
// ============================================================================
// Module: Apex Engine
// Description: The orchestration facade over C3 through C7.
// Purpose: Give a caller one entry point — one parsed log in, one unified
//          view out — with bounded concurrency and cooperative cancellation
//          (spec.md §3, §5).
// Dependencies: apex-config, apex-contract, apex-core, apex-correlate,
//               apex-extract, apex-platform, apex-redaction, apex-tracker,
//               apex-unify, tokio
// ============================================================================

//! # Apex Engine
//!
//! Sequences a single analysis request across the rest of the workspace:
//! fetch the parent log, redact its free text (C2), extract async job
//! references (C4), resolve them against platform job records (C5),
//! correlate them with candidate child logs (C6), and assemble the unified
//! view (C7). Parsing a raw log body into events is external to this
//! workspace; callers plug in their own parser through [`LogParser`].

#![deny(missing_docs)]

mod engine;
mod events;
mod parser;
mod sanitize;

pub use engine::AnalysisEngine;
pub use engine::CancelSignal;
pub use engine::DEFAULT_MAX_CONCURRENT_ANALYSES;
pub use events::EngineEvent;
pub use parser::LogParser;

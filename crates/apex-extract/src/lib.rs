// crates/apex-extract/src/lib.rs
// ============================================================================
// Module: Apex Extract
// Description: Async-job reference extraction from a parsed event stream (C4).
// Purpose: Turn a parent log's flat event stream into the job references C5
//          resolves against the platform (spec.md §4.4).
// Dependencies: apex-core
// ============================================================================

//! # Apex Extract
//!
//! C4: the job extractor. A single left-to-right pass over a parent log's
//! events, running four classifiers and deduplicating as it goes. No I/O;
//! this crate is a pure function of its input event slice.

#![deny(missing_docs)]

mod classifiers;
mod confidence;
mod extractor;
mod stack;

pub use classifiers::Candidate;
pub use classifiers::METHOD_CALL_LOOKBACK;
pub use confidence::extraction_confidence;
pub use extractor::extract;
pub use extractor::ExtractionResult;

// crates/apex-unify/src/lib.rs
// ============================================================================
// Module: Apex Unify
// Description: Builds the unified parent/child execution tree and its
//              aggregated summary (C7).
// Purpose: Splice each parent log's async boundaries together with their
//          correlated child logs into one tree (spec.md §4.7).
// Dependencies: apex-core
// ============================================================================

//! # Apex Unify
//!
//! C7: the unified view builder. Partitions a log's event stream around its
//! async-enqueue boundaries, attaches each boundary's correlated child log
//! (recursing into grandchildren when enabled), and aggregates the result
//! into a deterministic summary and overall confidence. No I/O; callers
//! supply already-fetched log contexts through a [`LogContextResolver`].

#![deny(missing_docs)]

mod builder;
mod context;
mod summary;

pub use builder::build_view;
pub use builder::UnifiedViewOptions;
pub use context::LogContext;
pub use context::LogContextResolver;
pub use context::MapResolver;
pub use context::NoFetchResolver;
pub use summary::build_summary;
pub use summary::overall_confidence;

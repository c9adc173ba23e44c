// crates/apex-unify/src/context.rs
// ============================================================================
// Module: Log Context
// Description: The per-log input the view builder recurses over, and the
//              lookup it uses to resolve a correlated child log's own context.
// Purpose: Decouple the builder from how callers have already fetched and
//          cached child logs (spec.md §4.7 step 5).
// Dependencies: apex-core, std::collections
// ============================================================================

//! ## Overview
//! [`LogContext`] bundles one log's events, extracted references, and the
//! correlations resolved for it. The builder treats the top-level parent log
//! and any recursively-fetched child log identically: both are just a
//! [`LogContext`] handed to the splitting algorithm.
//!
//! Whether a correlated child log was actually fetched is modeled by
//! [`LogContextResolver::resolve`] returning `None`: the builder still
//! attaches an async-child node for the correlation, just with an empty
//! event list (spec.md §4.7 step 4).

use std::collections::HashMap;

use apex_core::ChildLogId;
use apex_core::Correlation;
use apex_core::Event;
use apex_core::ParentLogId;

/// One log's events, the references extracted from it, and the correlations
/// resolved for those references.
#[derive(Debug, Clone, PartialEq)]
pub struct LogContext {
    /// Identifier of the log this context describes.
    pub log_id: ParentLogId,
    /// The log's parsed events, in timestamp order.
    pub events: Vec<Event>,
    /// References extracted from `events`.
    pub references: Vec<apex_core::AsyncJobReference>,
    /// Correlations resolved for `references`.
    pub correlations: Vec<Correlation>,
}

/// Looks up a correlated child log's own context, when it was fetched.
///
/// Implementations decide what "fetched" means; [`MapResolver`] is the
/// simplest case, backed by a pre-populated map.
pub trait LogContextResolver {
    /// Returns the child log's context, or `None` if it was not fetched.
    fn resolve(&self, child_log_id: &ChildLogId) -> Option<LogContext>;
}

/// A [`LogContextResolver`] backed by a plain map of already-fetched
/// contexts.
#[derive(Debug, Clone, Default)]
pub struct MapResolver(HashMap<ChildLogId, LogContext>);

impl MapResolver {
    /// Creates a resolver over the given map of fetched contexts.
    #[must_use]
    pub fn new(contexts: HashMap<ChildLogId, LogContext>) -> Self {
        Self(contexts)
    }
}

impl LogContextResolver for MapResolver {
    fn resolve(&self, child_log_id: &ChildLogId) -> Option<LogContext> {
        self.0.get(child_log_id).cloned()
    }
}

/// A [`LogContextResolver`] that never resolves any child log, for callers
/// that did not fetch child logs at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFetchResolver;

impl LogContextResolver for NoFetchResolver {
    fn resolve(&self, _child_log_id: &ChildLogId) -> Option<LogContext> {
        None
    }
}

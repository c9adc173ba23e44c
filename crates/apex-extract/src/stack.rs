// crates/apex-extract/src/stack.rs
// ============================================================================
// Module: Enqueue Depth Tracker
// Description: Running call-stack depth counter for the extraction pass.
// Purpose: Attribute each async job reference the depth of its enqueuing
//          frame without double-counting code-unit boundaries (spec.md §4.4).
// Dependencies: apex-core
// ============================================================================

//! ## Overview
//! `code-unit-started`/`code-unit-finished` events bound a top-level
//! transaction or trigger, not a method call; counting them here would
//! double the depth already carried by `method-entry`/`method-exit` pairs.
//! This tracker only reacts to the latter, matching
//! [`apex_core::Event::increments_stack_depth`] and
//! [`apex_core::Event::decrements_stack_depth`].

use apex_core::Event;

/// Tracks call-stack depth across a single left-to-right pass over an event
/// stream.
///
/// # Invariants
/// - Never underflows; a stray `method-exit` with no matching entry floors
///   at zero rather than wrapping.
#[derive(Debug, Default)]
pub struct DepthTracker {
    depth: u32,
}

impl DepthTracker {
    /// Starts a tracker at depth zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { depth: 0 }
    }

    /// Applies `event`'s effect on depth, returning the depth in force while
    /// `event` itself is being classified: a `method-entry` event is counted
    /// as already on the stack, since any enqueue call it makes executes
    /// inside that frame.
    pub fn observe(&mut self, event: &Event) -> u32 {
        if event.increments_stack_depth() {
            self.depth = self.depth.saturating_add(1);
        }
        let current = self.depth;
        if event.decrements_stack_depth() {
            self.depth = self.depth.saturating_sub(1);
        }
        current
    }
}

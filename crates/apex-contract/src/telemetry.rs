// crates/apex-contract/src/telemetry.rs
// ============================================================================
// Module: Telemetry Sink
// Description: A dependency-light observability hook shared by every crate.
// Purpose: Let C3/C5/C6 emit progress and warning events without committing
//          the workspace to a specific metrics backend.
// Dependencies: std
// ============================================================================

//! ## Overview
//! This workspace never depends on a logging or metrics crate directly.
//! Instead, each crate defines its own event enum and emits it through an
//! injected [`EventSink`]. Event payloads must never carry unredacted PII;
//! callers are expected to have passed text through `apex-redaction` first.

use std::sync::mpsc::SendError;
use std::sync::mpsc::Sender;

/// Receives telemetry events of type `E`.
pub trait EventSink<E>: Send + Sync {
    /// Records one event. Must not block or panic.
    fn emit(&self, event: E);
}

/// A sink that discards every event.
///
/// # Invariants
/// - Never observable from outside; purely a default.
pub struct NullSink;

impl<E> EventSink<E> for NullSink {
    fn emit(&self, _event: E) {}
}

/// A sink that forwards events to a channel, for callers that want to
/// observe progress from another task or thread.
pub struct ChannelSink<E> {
    sender: Sender<E>,
}

impl<E> ChannelSink<E> {
    /// Wraps an existing channel sender.
    #[must_use]
    pub fn new(sender: Sender<E>) -> Self {
        Self { sender }
    }
}

impl<E: Send> EventSink<E> for ChannelSink<E> {
    fn emit(&self, event: E) {
        let _: Result<(), SendError<E>> = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;

    #[derive(Debug, PartialEq)]
    struct SampleEvent(u32);

    #[test]
    fn null_sink_discards_events() {
        let sink = NullSink;
        sink.emit(SampleEvent(1));
    }

    #[test]
    fn channel_sink_forwards_events() {
        let (tx, rx) = channel();
        let sink = ChannelSink::new(tx);
        sink.emit(SampleEvent(7));
        assert_eq!(rx.recv().expect("event received"), SampleEvent(7));
    }
}

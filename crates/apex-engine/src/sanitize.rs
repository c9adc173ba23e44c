// crates/apex-engine/src/sanitize.rs
// ============================================================================
// Module: Boundary Sanitization
// Description: Runs every free-text event field through C2 before it is used
//              anywhere downstream.
// Purpose: Enforce spec.md §3's data-flow rule: "Everything textual that
//          crosses the boundary is filtered through C2 first."
// Dependencies: apex-core, apex-redaction
// ============================================================================

//! ## Overview
//! Only [`EventPayload::UserDebug`] and [`EventPayload::FatalError`] carry
//! free text copied verbatim from the log; every other payload field is
//! already a bounded, structured value (job kind, counts, a class name) and
//! is left untouched.

use apex_core::Event;
use apex_core::EventPayload;
use apex_redaction::redact_text;
use apex_redaction::RedactionConfig;

/// Redacts every free-text payload field in `events`, in place.
pub fn redact_events(events: &mut [Event], config: &RedactionConfig) {
    for event in events {
        let Some(payload) = event.payload.as_mut() else { continue };
        match payload {
            EventPayload::UserDebug { message } | EventPayload::FatalError { message } => {
                let (redacted, _report) = redact_text(message, config);
                *message = redacted;
            }
            EventPayload::AsyncEnqueue { .. } | EventPayload::LimitUsage { .. } | EventPayload::CodeUnit { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use apex_core::EventId;
    use apex_core::EventKind;
    use apex_core::EventTimestampNs;

    use super::*;

    fn debug_event(message: &str) -> Event {
        Event {
            id: EventId::new(0),
            kind: EventKind::UserDebug,
            timestamp: EventTimestampNs::new(0),
            line: None,
            class_name: None,
            method_name: None,
            namespace: None,
            payload: Some(EventPayload::UserDebug { message: message.to_string() }),
        }
    }

    #[test]
    fn redacts_user_debug_message_in_place() {
        let mut events = vec![debug_event("Email = 'person@example.com'")];
        redact_events(&mut events, &RedactionConfig::default());
        let Some(EventPayload::UserDebug { message }) = &events[0].payload else {
            panic!("expected user debug payload");
        };
        assert!(!message.contains("person@example.com"));
    }

    #[test]
    fn leaves_structured_payloads_untouched() {
        let mut events = vec![Event {
            id: EventId::new(1),
            kind: EventKind::LimitUsage,
            timestamp: EventTimestampNs::new(0),
            line: None,
            class_name: None,
            method_name: None,
            namespace: None,
            payload: Some(EventPayload::LimitUsage { category: "SOQL queries".to_string(), consumed: 1, allowed: 100 }),
        }];
        redact_events(&mut events, &RedactionConfig::default());
        assert!(matches!(&events[0].payload, Some(EventPayload::LimitUsage { category, .. }) if category == "SOQL queries"));
    }
}

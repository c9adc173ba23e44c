// crates/apex-core/tests/proptest_confidence.rs
// ============================================================================
// Module: Confidence and Timestamp Property-Based Tests
// Description: Property tests for the clamp and ordering invariants every
//              other crate in the workspace relies on.
// Purpose: Prove the universal invariants from spec.md §8 (confidence
//          determinism, timestamp monotonicity) across wide input ranges.
// ============================================================================

//! Property-based tests for [`Confidence`] and [`EventTimestampNs`].

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions are permitted."
)]

use apex_core::Confidence;
use apex_core::EventTimestampNs;
use proptest::prelude::*;

proptest! {
    #[test]
    fn confidence_new_always_lands_in_unit_range(value in any::<f64>()) {
        let confidence = Confidence::new(value);
        prop_assert!(confidence.get() >= 0.0);
        prop_assert!(confidence.get() <= 1.0);
    }

    #[test]
    fn confidence_new_is_deterministic(value in any::<f64>()) {
        prop_assert_eq!(Confidence::new(value), Confidence::new(value));
    }

    #[test]
    fn confidence_round_trips_through_json(value in 0.0_f64..=1.0) {
        let confidence = Confidence::new(value);
        let json = serde_json::to_string(&confidence).expect("serializes");
        let restored: Confidence = serde_json::from_str(&json).expect("deserializes");
        prop_assert_eq!(confidence, restored);
    }

    #[test]
    fn event_timestamp_ordering_matches_nanos(a in any::<u64>(), b in any::<u64>()) {
        let ts_a = EventTimestampNs::new(a);
        let ts_b = EventTimestampNs::new(b);
        prop_assert_eq!(ts_a < ts_b, a < b);
        prop_assert_eq!(ts_a == ts_b, a == b);
    }

    #[test]
    fn event_timestamp_round_trips_through_json(nanos in any::<u64>()) {
        let ts = EventTimestampNs::new(nanos);
        let json = serde_json::to_string(&ts).expect("serializes");
        let restored: EventTimestampNs = serde_json::from_str(&json).expect("deserializes");
        prop_assert_eq!(ts, restored);
    }
}

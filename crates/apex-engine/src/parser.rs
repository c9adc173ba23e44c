// crates/apex-engine/src/parser.rs
// ============================================================================
// Module: Log Parser Seam
// Description: The boundary between a fetched raw log body and the typed
//              event stream every other crate consumes.
// Purpose: Parsing a raw log body into events is external to this workspace
//          (spec.md §3's data flow: "parser is external"); this trait is the
//          injection point a caller supplies an implementation through.
// Dependencies: apex-contract, apex-core
// ============================================================================

//! ## Overview
//! [`LogParser`] is never implemented in this workspace. A caller who owns a
//! concrete log-format parser plugs it in here; [`crate::AnalysisEngine`]
//! only ever calls through the trait.

use apex_contract::ApexError;
use apex_core::Event;

/// Parses a raw log body into its event stream.
///
/// # Errors
/// Implementations return [`ApexError::DataShape`] for malformed input.
pub trait LogParser: Send + Sync {
    /// Parses `body` into events, in log order.
    fn parse(&self, body: &str) -> Result<Vec<Event>, ApexError>;
}

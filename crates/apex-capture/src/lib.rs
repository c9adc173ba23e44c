// crates/apex-capture/src/lib.rs
// ============================================================================
// Module: Apex Capture
// Description: Debug-level presets, trace-flag lifecycle, and log
//              listing/fetching (C3).
// Purpose: Guarantee the right trace flags exist before any log can be
//          fetched or correlated (spec.md §4.3).
// Dependencies: apex-contract, apex-core, apex-platform, time, tokio
// ============================================================================

//! # Apex Capture
//!
//! C3: the capture controller. Owns the trace-flag lifecycle state machine,
//! the nine named debug-level presets, and the thin log
//! list/fetch/delete operations every downstream crate relies on.

#![deny(missing_docs)]

mod controller;
mod events;
mod presets;
mod session;
mod trace_flag;

pub use controller::CaptureController;
pub use controller::AUTOMATED_PROCESS_USER_NAME;
pub use controller::DEFAULT_REMAINING_BUFFER;
pub use events::CaptureEvent;
pub use presets::merge_presets;
pub use presets::preset_by_name;
pub use presets::Category;
pub use presets::Preset;
pub use presets::Verbosity;
pub use presets::ALL_CATEGORIES;
pub use presets::NAMED_PRESETS;
pub use session::CaptureSession;
pub use trace_flag::TraceFlag;
pub use trace_flag::TraceFlagState;
pub use trace_flag::MAX_EXPIRATION;

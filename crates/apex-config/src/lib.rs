// crates/apex-config/src/lib.rs
// ============================================================================
// Module: Apex Config
// Description: The configuration surface every other crate is driven by
//              (spec.md §6.3).
// Purpose: Parse and validate TOML configuration once, at load time, and
//          hand out typed, already-validated config to each consuming crate.
// Dependencies: apex-capture, apex-correlate, apex-redaction, serde, thiserror, toml
// ============================================================================

//! # Apex Config
//!
//! The recognized configuration surface: `capture.*`, `correlation.*`,
//! `redaction.*`, and `auth.*`. Every option is validated eagerly, at
//! [`Config::from_toml_str`] or [`Config::validate`], never at call time in
//! the crates that consume it.

#![deny(missing_docs)]

mod auth;
mod capture;
mod config;
mod correlation;
mod error;

pub use auth::AuthConfig;
pub use auth::AuthMethod;
pub use capture::CaptureConfig;
pub use config::Config;
pub use correlation::CorrelationConfig;
pub use error::ConfigError;

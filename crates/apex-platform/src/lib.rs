// crates/apex-platform/src/lib.rs
// ============================================================================
// Module: Apex Platform
// Description: REST adapter, SOQL escaping, and connection pooling.
// Purpose: Give C3 and C5 a single typed, escaped, retried path to the
//          platform (spec.md §6.1, §5).
// Dependencies: apex-contract, apex-core, async-trait, reqwest, tokio
// ============================================================================

//! # Apex Platform
//!
//! The ambient platform-adapter layer: the [`PlatformClient`] trait and its
//! `reqwest` implementation, centralized SOQL escaping (`soql`), and the
//! workspace's one piece of process-wide mutable state, the connection pool.

#![deny(missing_docs)]

pub mod soql;

mod client;
mod pool;

pub use client::PlatformClient;
pub use client::QueryPage;
pub use client::ReqwestPlatformClient;
pub use client::DEFAULT_CALL_TIMEOUT;
pub use client::MAX_LOG_BODY_BYTES;
pub use pool::ConnectionKey;
pub use pool::ConnectionPool;
pub use pool::TokenHandle;
pub use pool::TokenRefresher;

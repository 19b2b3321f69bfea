//! Tollgate core: authorization decisions, routing contracts, and error types.
//!
//! This crate defines the wire-level authorization contract (policy documents
//! and their context maps), the per-connection routing model, and the error
//! surface shared by the gateway and its tests. It intentionally carries no
//! transport or runtime dependencies so it can be reused in multiple contexts.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `TollgateError`/`Result` so production
//! processes do not crash on malformed input or bad traffic.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod connection;
pub mod error;
pub mod policy;
pub mod protocol;
pub mod route;

/// Shared result type.
pub use error::{Result, TollgateError};

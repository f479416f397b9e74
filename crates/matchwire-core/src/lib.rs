//! matchwire core: wire-level frame types, shared identifiers, and the error
//! surface.
//!
//! This crate defines the JSON frame contracts and error codes shared by the
//! gateway and by anything else that speaks its protocol. It intentionally
//! carries no transport or runtime dependencies so it can be reused in
//! multiple contexts.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `MatchwireError`/`Result` so the
//! gateway process does not crash on malformed input.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;
pub mod types;

/// Shared result type.
pub use error::{MatchwireError, Result};

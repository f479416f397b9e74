//! Wire protocol (JSON text frames).
//!
//! Inbound traffic decodes into [`client::ClientFrame`], a tagged union with
//! one variant per message kind; the gateway dispatches on the variant, never
//! on raw type strings. Outbound traffic is built as
//! [`server::ServerFrame`] values and serialized exactly once per fan-out
//! ([`server::PreparedFrame`]).
//!
//! All parsing is panic-free: malformed input is reported as
//! `MatchwireError`, keeping the gateway resilient to hostile traffic.

pub mod client;
pub mod server;

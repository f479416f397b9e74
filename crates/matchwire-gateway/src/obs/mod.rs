//! Lightweight in-process metrics (dependency-free).
//!
//! Atomics-backed counters rendered by the `/metrics` handler; no external
//! metrics crate is pulled in.

pub mod metrics;

pub use metrics::GatewayMetrics;

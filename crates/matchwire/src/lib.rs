//! Top-level facade crate for matchwire.
//!
//! Re-exports core types and the gateway library so users can depend on a
//! single crate.

pub mod core {
    pub use matchwire_core::*;
}

pub mod gateway {
    pub use matchwire_gateway::*;
}

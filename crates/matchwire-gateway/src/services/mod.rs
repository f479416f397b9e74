//! Frame relay services.
//!
//! Each module owns the participant resolution for one slice of the
//! protocol: chat and typing resolve the match partner, call signaling is
//! directly addressed, games resolve a room roster.

pub mod call;
pub mod chat;
pub mod game;

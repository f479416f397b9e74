//! WebSocket transport: upgrade handling, the per-connection session loop,
//! and the decode-once codec.

pub mod codec;
pub mod ws;

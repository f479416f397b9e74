//! Realtime runtime: the connection registry and the ephemeral room
//! directory shared across all session tasks.

mod registry;
mod rooms;

pub use registry::{Connection, Registry};
pub use rooms::RoomDirectory;

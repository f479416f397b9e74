//! Inbound frames.
//!
//! One variant per client message kind, tagged by the `type` field. Unknown
//! `type` values fail to parse; extra fields (client-side timestamps and the
//! like) are ignored. Signaling and game-state payloads stay opaque
//! [`serde_json::Value`] blobs the gateway relays without inspecting.

use serde::Deserialize;
use serde_json::Value;

use crate::types::{MatchId, RoomId, UserId};

/// One decoded client frame.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    /// Chat text for a match; routed to the other participant.
    ChatMessage {
        match_id: MatchId,
        content: String,
        #[serde(default = "default_message_type")]
        message_type: String,
    },
    /// Typing indicator for a match; routed to the other participant.
    Typing { match_id: MatchId, is_typing: bool },
    /// Call-signaling blob, directly addressed to one user.
    CallSignal { to: UserId, data: Value },
    /// Open a new game room with the sender as first member.
    GameCreate,
    /// Join an existing game room.
    GameJoin { room_id: RoomId },
    /// Leave a game room.
    GameLeave { room_id: RoomId },
    /// Game-state blob, fanned out to the other room members.
    GameUpdate { room_id: RoomId, data: Value },
    /// Voice-signaling blob, relayed to the other room members.
    VoiceSignal { room_id: RoomId, data: Value },
}

impl ClientFrame {
    /// Stable frame-kind name (metrics labels, logs).
    pub fn kind(&self) -> &'static str {
        match self {
            ClientFrame::ChatMessage { .. } => "chat_message",
            ClientFrame::Typing { .. } => "typing",
            ClientFrame::CallSignal { .. } => "call_signal",
            ClientFrame::GameCreate => "game_create",
            ClientFrame::GameJoin { .. } => "game_join",
            ClientFrame::GameLeave { .. } => "game_leave",
            ClientFrame::GameUpdate { .. } => "game_update",
            ClientFrame::VoiceSignal { .. } => "voice_signal",
        }
    }
}

fn default_message_type() -> String {
    "text".to_owned()
}

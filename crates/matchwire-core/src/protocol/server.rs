//! Outbound frames.

use serde::Serialize;
use serde_json::Value;

use crate::error::{MatchwireError, Result};
use crate::types::{MatchId, RoomId, UserId};

/// One server-to-client frame. Every variant carries a server-side
/// `timestamp` in unix milliseconds.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    /// Session greeting, sent right after the connection is registered.
    Connected { user_id: UserId, timestamp: u64 },
    ChatMessage {
        match_id: MatchId,
        sender_id: UserId,
        content: String,
        message_type: String,
        timestamp: u64,
    },
    Typing {
        match_id: MatchId,
        sender_id: UserId,
        is_typing: bool,
        timestamp: u64,
    },
    CallSignal {
        sender_id: UserId,
        data: Value,
        timestamp: u64,
    },
    GameCreated { room_id: RoomId, timestamp: u64 },
    /// Current member list, sent to the whole room on join/leave.
    GameRoster {
        room_id: RoomId,
        players: Vec<UserId>,
        timestamp: u64,
    },
    GameUpdate {
        room_id: RoomId,
        sender_id: UserId,
        data: Value,
        timestamp: u64,
    },
    VoiceSignal {
        room_id: RoomId,
        sender_id: UserId,
        data: Value,
        timestamp: u64,
    },
    Error {
        code: &'static str,
        message: String,
        timestamp: u64,
    },
}

/// A frame serialized once, cloned per recipient during fan-out.
#[derive(Debug, Clone)]
pub struct PreparedFrame(String);

impl PreparedFrame {
    pub fn encode(frame: &ServerFrame) -> Result<Self> {
        serde_json::to_string(frame)
            .map(Self)
            .map_err(|e| MatchwireError::Internal(format!("frame encode failed: {e}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Milliseconds since the unix epoch; frames are stamped at build time.
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

//! Shared error type across matchwire crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed frame.
    BadRequest,
    /// Match id did not resolve.
    UnknownMatch,
    /// Room id did not resolve.
    UnknownRoom,
    /// Room is at capacity.
    RoomFull,
    /// Sender does not belong to the match or room it addressed.
    NotParticipant,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON error frames.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::UnknownMatch => "UNKNOWN_MATCH",
            ClientCode::UnknownRoom => "UNKNOWN_ROOM",
            ClientCode::RoomFull => "ROOM_FULL",
            ClientCode::NotParticipant => "NOT_PARTICIPANT",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, MatchwireError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum MatchwireError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unknown match: {0}")]
    UnknownMatch(String),
    #[error("unknown room: {0}")]
    UnknownRoom(String),
    #[error("room full: {0}")]
    RoomFull(String),
    #[error("not a participant of {0}")]
    NotParticipant(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl MatchwireError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            MatchwireError::BadRequest(_) => ClientCode::BadRequest,
            MatchwireError::UnknownMatch(_) => ClientCode::UnknownMatch,
            MatchwireError::UnknownRoom(_) => ClientCode::UnknownRoom,
            MatchwireError::RoomFull(_) => ClientCode::RoomFull,
            MatchwireError::NotParticipant(_) => ClientCode::NotParticipant,
            MatchwireError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            MatchwireError::Internal(_) => ClientCode::Internal,
        }
    }
}

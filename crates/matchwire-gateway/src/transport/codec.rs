use axum::extract::ws::Message;

use matchwire_core::error::{MatchwireError, Result};
use matchwire_core::protocol::client::ClientFrame;

/// Decode one WS message into a client frame.
///
/// Control frames decode to `None`. Binary frames are rejected: the wire
/// protocol is JSON text only.
pub fn decode(msg: &Message) -> Result<Option<ClientFrame>> {
    match msg {
        Message::Text(t) => serde_json::from_str::<ClientFrame>(t)
            .map(Some)
            .map_err(|e| MatchwireError::BadRequest(format!("invalid frame: {e}"))),
        Message::Binary(_) => Err(MatchwireError::BadRequest(
            "binary frames not supported".into(),
        )),
        Message::Ping(_) | Message::Pong(_) | Message::Close(_) => Ok(None),
    }
}

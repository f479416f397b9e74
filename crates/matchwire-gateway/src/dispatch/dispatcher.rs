use std::sync::Arc;
use std::time::Instant;

use matchwire_core::error::Result;
use matchwire_core::protocol::client::ClientFrame;
use matchwire_core::types::UserId;

use crate::infra::MatchDirectory;
use crate::obs::GatewayMetrics;
use crate::realtime::{Registry, RoomDirectory};
use crate::services;

/// Routes decoded frames to their service handler.
///
/// All domain logic (who are the participants of a match or room) lives in
/// the service modules; the registry underneath only ever sees resolved user
/// ids. The dispatcher is constructor-injected into every session rather
/// than reached through ambient state.
pub struct Dispatcher {
    pub(crate) registry: Arc<Registry>,
    pub(crate) matches: Arc<dyn MatchDirectory>,
    pub(crate) rooms: Arc<RoomDirectory>,
    pub(crate) metrics: Arc<GatewayMetrics>,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<Registry>,
        matches: Arc<dyn MatchDirectory>,
        rooms: Arc<RoomDirectory>,
        metrics: Arc<GatewayMetrics>,
    ) -> Self {
        Self {
            registry,
            matches,
            rooms,
            metrics,
        }
    }

    /// Handle one inbound frame from `sender`.
    ///
    /// Errors are per-frame: the caller reports them back to the sender and
    /// keeps the session alive.
    pub async fn dispatch(&self, sender: &UserId, frame: ClientFrame) -> Result<()> {
        let kind = frame.kind();
        let started = Instant::now();
        self.metrics.frames_in.inc(kind);

        let res = match frame {
            ClientFrame::ChatMessage {
                match_id,
                content,
                message_type,
            } => services::chat::relay_message(self, sender, &match_id, content, message_type).await,
            ClientFrame::Typing {
                match_id,
                is_typing,
            } => services::chat::relay_typing(self, sender, &match_id, is_typing).await,
            ClientFrame::CallSignal { to, data } => {
                services::call::relay_signal(self, sender, &to, data)
            }
            ClientFrame::GameCreate => services::game::create_room(self, sender),
            ClientFrame::GameJoin { room_id } => services::game::join_room(self, sender, &room_id),
            ClientFrame::GameLeave { room_id } => {
                services::game::leave_room(self, sender, &room_id)
            }
            ClientFrame::GameUpdate { room_id, data } => {
                services::game::relay_update(self, sender, &room_id, data)
            }
            ClientFrame::VoiceSignal { room_id, data } => {
                services::game::relay_voice(self, sender, &room_id, data)
            }
        };

        if res.is_err() {
            self.metrics.dispatch_errors.inc(kind);
        }
        self.metrics.dispatch_duration.observe(started.elapsed());
        res
    }
}

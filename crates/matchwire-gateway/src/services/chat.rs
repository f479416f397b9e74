//! Chat relay: messages and typing indicators go to the other participant of
//! a match. The sender gets no delivery confirmation; an offline partner
//! just means the frame is dropped.

use matchwire_core::error::{MatchwireError, Result};
use matchwire_core::protocol::server::{now_millis, PreparedFrame, ServerFrame};
use matchwire_core::types::{MatchId, UserId};

use crate::dispatch::Dispatcher;

pub(crate) async fn relay_message(
    d: &Dispatcher,
    sender: &UserId,
    match_id: &MatchId,
    content: String,
    message_type: String,
) -> Result<()> {
    let recipient = other_participant(d, sender, match_id).await?;
    let frame = PreparedFrame::encode(&ServerFrame::ChatMessage {
        match_id: match_id.clone(),
        sender_id: sender.clone(),
        content,
        message_type,
        timestamp: now_millis(),
    })?;
    let delivered = d.registry.send_to(&recipient, &frame);
    d.metrics.note_delivery(usize::from(delivered), 1);
    Ok(())
}

pub(crate) async fn relay_typing(
    d: &Dispatcher,
    sender: &UserId,
    match_id: &MatchId,
    is_typing: bool,
) -> Result<()> {
    let recipient = other_participant(d, sender, match_id).await?;
    let frame = PreparedFrame::encode(&ServerFrame::Typing {
        match_id: match_id.clone(),
        sender_id: sender.clone(),
        is_typing,
        timestamp: now_millis(),
    })?;
    let delivered = d.registry.send_to(&recipient, &frame);
    d.metrics.note_delivery(usize::from(delivered), 1);
    Ok(())
}

/// The match participant who is not `sender`.
async fn other_participant(
    d: &Dispatcher,
    sender: &UserId,
    match_id: &MatchId,
) -> Result<UserId> {
    let (a, b) = d.matches.participants(match_id).await?;
    if &a == sender {
        Ok(b)
    } else if &b == sender {
        Ok(a)
    } else {
        Err(MatchwireError::NotParticipant(match_id.to_string()))
    }
}

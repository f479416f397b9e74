//! Party-game rooms: lifecycle, state fan-out, and voice relay.
//!
//! Updates and voice signals go to every room member except the sender.
//! Roster frames go to everyone still in the room, including the actor.

use serde_json::Value;

use matchwire_core::error::{MatchwireError, Result};
use matchwire_core::protocol::server::{now_millis, PreparedFrame, ServerFrame};
use matchwire_core::types::{RoomId, UserId};

use crate::dispatch::Dispatcher;

pub(crate) fn create_room(d: &Dispatcher, sender: &UserId) -> Result<()> {
    let room = d.rooms.create(sender);
    tracing::debug!(user = %sender, room = %room, "game room created");
    let frame = PreparedFrame::encode(&ServerFrame::GameCreated {
        room_id: room,
        timestamp: now_millis(),
    })?;
    let delivered = d.registry.send_to(sender, &frame);
    d.metrics.note_delivery(usize::from(delivered), 1);
    Ok(())
}

pub(crate) fn join_room(d: &Dispatcher, sender: &UserId, room: &RoomId) -> Result<()> {
    d.rooms.join(room, sender)?;
    broadcast_roster(d, room)
}

pub(crate) fn leave_room(d: &Dispatcher, sender: &UserId, room: &RoomId) -> Result<()> {
    d.rooms.leave(room, sender);
    broadcast_roster(d, room)
}

pub(crate) fn relay_update(
    d: &Dispatcher,
    sender: &UserId,
    room: &RoomId,
    data: Value,
) -> Result<()> {
    let roster = member_roster(d, room, sender)?;
    let frame = PreparedFrame::encode(&ServerFrame::GameUpdate {
        room_id: room.clone(),
        sender_id: sender.clone(),
        data,
        timestamp: now_millis(),
    })?;
    let delivered = d
        .registry
        .broadcast_to_participants(&roster, &frame, Some(sender));
    d.metrics
        .note_delivery(delivered, roster.len().saturating_sub(1));
    Ok(())
}

pub(crate) fn relay_voice(
    d: &Dispatcher,
    sender: &UserId,
    room: &RoomId,
    data: Value,
) -> Result<()> {
    let roster = member_roster(d, room, sender)?;
    let frame = PreparedFrame::encode(&ServerFrame::VoiceSignal {
        room_id: room.clone(),
        sender_id: sender.clone(),
        data,
        timestamp: now_millis(),
    })?;
    let delivered = d
        .registry
        .broadcast_to_participants(&roster, &frame, Some(sender));
    d.metrics
        .note_delivery(delivered, roster.len().saturating_sub(1));
    Ok(())
}

/// Push the current member list to everyone in the room. Used on join/leave
/// and when a disconnect scrubs a user out of their rooms.
pub(crate) fn broadcast_roster(d: &Dispatcher, room: &RoomId) -> Result<()> {
    let roster = d.rooms.roster(room);
    if roster.is_empty() {
        return Ok(());
    }
    let frame = PreparedFrame::encode(&ServerFrame::GameRoster {
        room_id: room.clone(),
        players: roster.clone(),
        timestamp: now_millis(),
    })?;
    let delivered = d.registry.broadcast_to_participants(&roster, &frame, None);
    d.metrics.note_delivery(delivered, roster.len());
    Ok(())
}

/// Roster of `room`, checked to contain `sender`.
fn member_roster(d: &Dispatcher, room: &RoomId, sender: &UserId) -> Result<Vec<UserId>> {
    let roster = d.rooms.roster(room);
    if roster.is_empty() && !d.rooms.contains(room) {
        return Err(MatchwireError::UnknownRoom(room.to_string()));
    }
    if !roster.contains(sender) {
        return Err(MatchwireError::NotParticipant(room.to_string()));
    }
    Ok(roster)
}

use dashmap::{DashMap, DashSet};
use uuid::Uuid;

use matchwire_core::error::{MatchwireError, Result};
use matchwire_core::types::{RoomId, UserId};

/// Party rooms hold at most this many players.
const ROOM_CAPACITY: usize = 4;

/// Ephemeral game-room directory: `room -> members`, `user -> rooms`.
///
/// Rooms live in process memory only. A room disappears when its last member
/// leaves; the reverse index exists so a dropped connection can be scrubbed
/// from every room it was in.
#[derive(Default)]
pub struct RoomDirectory {
    members: DashMap<RoomId, Vec<UserId>>,
    user_rooms: DashMap<UserId, DashSet<RoomId>>,
}

impl RoomDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a room with `creator` as its first member.
    ///
    /// Ids are short so players can read them out loud.
    pub fn create(&self, creator: &UserId) -> RoomId {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(8);
        let room = RoomId(id);
        self.members.insert(room.clone(), vec![creator.clone()]);
        self.index(creator, &room);
        room
    }

    pub fn join(&self, room: &RoomId, user: &UserId) -> Result<()> {
        {
            let mut entry = self
                .members
                .get_mut(room)
                .ok_or_else(|| MatchwireError::UnknownRoom(room.to_string()))?;
            if !entry.contains(user) {
                if entry.len() >= ROOM_CAPACITY {
                    return Err(MatchwireError::RoomFull(room.to_string()));
                }
                entry.push(user.clone());
            }
        }
        self.index(user, room);
        Ok(())
    }

    /// Remove `user` from `room`; the room is deleted once empty. Missing
    /// room and non-member are both no-ops.
    pub fn leave(&self, room: &RoomId, user: &UserId) {
        self.remove_member(room, user);
        if let Some(set) = self.user_rooms.get(user) {
            set.remove(room);
            if set.is_empty() {
                drop(set);
                self.user_rooms.remove_if(user, |_, s| s.is_empty());
            }
        }
    }

    /// Current member list, cloned so callers can iterate while other tasks
    /// mutate the room.
    pub fn roster(&self, room: &RoomId) -> Vec<UserId> {
        self.members
            .get(room)
            .map(|r| r.value().clone())
            .unwrap_or_default()
    }

    pub fn contains(&self, room: &RoomId) -> bool {
        self.members.contains_key(room)
    }

    /// Scrub a disconnected user from every room they were in. Returns the
    /// rooms they left so callers can push roster updates.
    pub fn cleanup_user(&self, user: &UserId) -> Vec<RoomId> {
        let Some((_, rooms)) = self.user_rooms.remove(user) else {
            return Vec::new();
        };
        let rooms: Vec<RoomId> = rooms.into_iter().collect();
        for room in &rooms {
            self.remove_member(room, user);
        }
        rooms
    }

    fn remove_member(&self, room: &RoomId, user: &UserId) {
        if let Some(mut entry) = self.members.get_mut(room) {
            entry.retain(|u| u != user);
            let empty = entry.is_empty();
            drop(entry);
            if empty {
                self.members.remove_if(room, |_, v| v.is_empty());
            }
        }
    }

    fn index(&self, user: &UserId, room: &RoomId) {
        self.user_rooms
            .entry(user.clone())
            .or_insert_with(DashSet::new)
            .insert(room.clone());
    }
}

use axum::extract::ws::Message;
use dashmap::DashMap;
use tokio::sync::mpsc;

use std::sync::atomic::{AtomicU64, Ordering};

use matchwire_core::protocol::server::PreparedFrame;
use matchwire_core::types::UserId;

/// One session's outbound queue sender.
#[derive(Clone)]
pub struct Connection {
    pub tx: mpsc::Sender<Message>,
}

#[derive(Clone)]
struct Entry {
    conn: Connection,
    seq: u64,
}

/// Presence registry: `user -> live connection`, at most one entry per user.
///
/// The registry owns no domain state: it never resolves matches or rooms,
/// callers hand it already-resolved recipient ids and it attempts
/// best-effort, at-most-once delivery. Nothing here survives the process.
pub struct Registry {
    entries: DashMap<UserId, Entry>,
    seq: AtomicU64,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            seq: AtomicU64::new(1),
        }
    }

    /// Bind `user` to `conn`, superseding any previous binding.
    ///
    /// Returns the binding's sequence number for scoped teardown. A
    /// superseded connection is not closed here; its sender is dropped and
    /// its own session loop winds down through its error path.
    pub fn connect(&self, user: UserId, conn: Connection) -> u64 {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        if self.entries.insert(user.clone(), Entry { conn, seq }).is_some() {
            tracing::debug!(user = %user, "connection superseded");
        }
        seq
    }

    /// Unconditional removal. Idempotent; a missing entry is a no-op.
    pub fn disconnect(&self, user: &UserId) {
        self.entries.remove(user);
    }

    /// Remove `user` only while still bound to the connection identified by
    /// `seq`. A superseded session's teardown must not evict its successor.
    pub fn disconnect_session(&self, user: &UserId, seq: u64) {
        self.entries.remove_if(user, |_, e| e.seq == seq);
    }

    /// Deliver one frame to `user` if currently connected.
    ///
    /// Returns `false` when the user is offline (frame silently dropped) or
    /// when the write fails. A failed write is terminal for that connection:
    /// the entry is evicted so later lookups report offline instead of
    /// writing into a dead channel.
    pub fn send_to(&self, user: &UserId, frame: &PreparedFrame) -> bool {
        let Some(entry) = self.entries.get(user).map(|r| r.value().clone()) else {
            return false;
        };
        match entry
            .conn
            .tx
            .try_send(Message::Text(frame.as_str().to_owned()))
        {
            Ok(()) => true,
            Err(_) => {
                // Receiver gone or queue full: evict exactly this binding.
                self.entries.remove_if(user, |_, e| e.seq == entry.seq);
                tracing::debug!(user = %user, "evicted connection on failed write");
                false
            }
        }
    }

    /// Fan one frame out to every participant except `exclude`.
    ///
    /// Returns the number of successful deliveries; offline participants and
    /// failed writes just lower the count. Not atomic: deliveries that
    /// already happened stand even if a later one fails.
    pub fn broadcast_to_participants(
        &self,
        participants: &[UserId],
        frame: &PreparedFrame,
        exclude: Option<&UserId>,
    ) -> usize {
        participants
            .iter()
            .filter(|u| Some(*u) != exclude)
            .filter(|u| self.send_to(u, frame))
            .count()
    }

    pub fn is_online(&self, user: &UserId) -> bool {
        self.entries.contains_key(user)
    }

    pub fn online_count(&self) -> usize {
        self.entries.len()
    }

    /// Drop every remaining binding (process shutdown).
    pub fn drain(&self) {
        self.entries.clear();
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

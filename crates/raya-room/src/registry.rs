//! The room registry: the process-wide mapping from code to live room.

use std::collections::HashMap;

use raya_protocol::{Mark, RoomCode};
use raya_transport::ConnectionId;
use tokio::sync::Mutex;

use crate::room::{Participant, spawn_room};
use crate::{LeaveReason, PlayerSender, RoomError, RoomHandle};

/// Default command mailbox size for room actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Process-wide mapping from room code to a running room actor.
///
/// Constructed once at startup and shared (behind an `Arc`) by every
/// connection task; there is no global singleton. All entry points
/// serialize on the internal mutex, so checking a code's availability
/// and inserting under it is atomic, and a room emptied by `leave` can
/// never be observed half-removed. Per-room state stays serialized by
/// the actor mailbox, so rooms make progress independently of each
/// other once the map lookup is done.
pub struct Registry {
    rooms: Mutex<HashMap<RoomCode, RoomHandle>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }

    /// Opens a new room under `code` with the creator seated as X.
    ///
    /// The creator receives `room_created` through `sender`. Fails with
    /// [`RoomError::CodeInUse`] if a live room already holds the code;
    /// a code whose room was emptied (and therefore destroyed) is free
    /// again.
    pub async fn create(
        &self,
        code: RoomCode,
        password: String,
        conn: ConnectionId,
        username: String,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        let mut rooms = self.rooms.lock().await;
        if rooms.contains_key(&code) {
            return Err(RoomError::CodeInUse(code));
        }

        let creator = Participant {
            conn,
            username,
            mark: Mark::X,
            sender,
        };
        let handle = spawn_room(
            code.clone(),
            password,
            creator,
            DEFAULT_CHANNEL_SIZE,
        );
        rooms.insert(code.clone(), handle);
        tracing::info!(room = %code, "room created");
        Ok(())
    }

    /// Seats a participant in an existing room.
    ///
    /// The joiner receives `room_joined` through `sender` and everyone
    /// already seated receives `player_joined`. The lock is held across
    /// the actor round-trip so the room cannot be destroyed and recreated
    /// under this code mid-join.
    pub async fn join(
        &self,
        code: &RoomCode,
        password: String,
        conn: ConnectionId,
        username: String,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        let rooms = self.rooms.lock().await;
        let handle = rooms
            .get(code)
            .ok_or_else(|| RoomError::NotFound(code.clone()))?;
        handle.join(conn, username, password, sender).await
    }

    /// Routes a move to the participant's room.
    pub async fn make_move(
        &self,
        code: &RoomCode,
        conn: ConnectionId,
        index: Option<i64>,
    ) -> Result<(), RoomError> {
        let handle = self
            .rooms
            .lock()
            .await
            .get(code)
            .cloned()
            .ok_or_else(|| RoomError::NotFound(code.clone()))?;
        handle.make_move(conn, index).await
    }

    /// Resets a room's match. No-op if the room no longer exists.
    pub async fn reset(&self, code: &RoomCode) {
        let handle = self.rooms.lock().await.get(code).cloned();
        if let Some(handle) = handle {
            let _ = handle.reset().await;
        }
    }

    /// Removes a participant from a room, destroying the room when its
    /// last participant leaves. No-op if the room no longer exists.
    pub async fn leave(
        &self,
        code: &RoomCode,
        conn: ConnectionId,
        reason: LeaveReason,
    ) {
        let mut rooms = self.rooms.lock().await;
        let Some(handle) = rooms.get(code) else {
            return;
        };
        match handle.leave(conn, reason).await {
            Ok(false) => {}
            // Emptied, or the actor is already gone: drop the entry so
            // the code becomes available for a fresh create.
            Ok(true) | Err(_) => {
                rooms.remove(code);
                tracing::info!(room = %code, "room destroyed");
            }
        }
    }

    /// Number of live rooms.
    pub async fn room_count(&self) -> usize {
        self.rooms.lock().await.len()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

//! Error types for the room layer.
//!
//! The `Display` strings double as the client-facing `error` payload, so
//! they are written for humans, not logs.

use raya_protocol::RoomCode;

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// An active room already exists under this code.
    #[error("a room with code {0} already exists")]
    CodeInUse(RoomCode),

    /// No room exists under this code.
    #[error("no room found with code {0}")]
    NotFound(RoomCode),

    /// The supplied password does not match the room's.
    #[error("incorrect password")]
    BadPassword,

    /// Both seats are taken.
    #[error("room {0} is full")]
    RoomFull(RoomCode),

    /// The room's command channel is closed (actor already shut down).
    #[error("room {0} is no longer available")]
    Unavailable(RoomCode),
}

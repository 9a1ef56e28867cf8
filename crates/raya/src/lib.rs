//! # Raya
//!
//! Authoritative WebSocket server for two-player tres en raya matches.
//!
//! Two remote participants share a password-protected, code-addressed
//! room; the server owns the board, validates every move, and broadcasts
//! the resulting state to both sides. Clients are pure views: nothing
//! they send is trusted beyond "a request to do something".
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use raya::RayaServerBuilder;
//!
//! # async fn run() -> Result<(), raya::RayaError> {
//! let server = RayaServerBuilder::new().bind("0.0.0.0:3001").build().await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::RayaError;
pub use server::{RayaServer, RayaServerBuilder};

/// Convenient re-exports for server binaries and tests.
pub mod prelude {
    pub use crate::{RayaError, RayaServer, RayaServerBuilder};
    pub use raya_protocol::{
        Board, ClientMessage, Codec, JsonCodec, Mark, Outcome, PlayerInfo,
        ProtocolError, RoomCode, ServerMessage,
    };
    pub use raya_room::{Game, LeaveReason, Registry, RoomError, rules};
    pub use raya_transport::{
        Connection, ConnectionId, Transport, TransportError,
    };
}

//! Room lifecycle management for Raya.
//!
//! Each room runs as an isolated Tokio task (actor model) owning one
//! match: the board, whose turn it is, the outcome, and the at-most-two
//! seated participants. Commands arrive on the actor's mailbox and are
//! applied strictly serially, so no operation can ever observe a
//! half-applied move.
//!
//! # Key types
//!
//! - [`rules`]: the pure rule engine (win/draw detection, turn order)
//! - [`Game`]: the match state machine
//! - [`Registry`]: the process-wide code→room map; creates, finds, and
//!   destroys rooms
//! - [`RoomHandle`]: sends commands to a running room actor

mod error;
mod game;
mod registry;
mod room;
pub mod rules;

pub use error::RoomError;
pub use game::{Game, MoveOutcome};
pub use registry::Registry;
pub use room::{LeaveReason, PlayerSender, RoomHandle};

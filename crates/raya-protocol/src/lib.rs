//! Wire protocol for Raya.
//!
//! This crate defines the language that clients and the server speak:
//!
//! - **Types** ([`ClientMessage`], [`ServerMessage`], [`Mark`], [`Outcome`],
//!   [`Board`], [`PlayerInfo`], [`RoomCode`]): the structures that travel
//!   on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those messages are
//!   converted to and from UTF-8 text frames.
//! - **Errors** ([`ProtocolError`]): what can go wrong while encoding or
//!   decoding.
//!
//! Every message is a JSON envelope `{ "type": string, "payload": object }`
//! in both directions. The protocol layer knows nothing about connections
//! or rooms; it only knows how to read and write messages.

mod codec;
mod error;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use types::{
    Board, ClientMessage, Mark, Outcome, PlayerInfo, RoomCode, ServerMessage,
};

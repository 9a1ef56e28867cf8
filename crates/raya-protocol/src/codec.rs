//! Codec trait and the JSON implementation.
//!
//! A codec converts between Rust types and the UTF-8 text that travels in
//! WebSocket frames. The rest of the stack only depends on the [`Codec`]
//! trait, so the wire representation can be swapped without touching the
//! server or room layers. [`JsonCodec`] is the one the protocol specifies;
//! it is also the reason this crate depends on `serde_json` directly.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes values to text frames and decodes them back.
///
/// `Send + Sync + 'static` because the codec is shared across every
/// connection task for the lifetime of the server.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into one outbound frame.
    ///
    /// # Errors
    /// [`ProtocolError::Encode`] if the value cannot be represented.
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError>;

    /// Deserializes one inbound frame into a value.
    ///
    /// # Errors
    /// [`ProtocolError::Decode`] if the text is malformed or does not
    /// match the expected shape.
    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, ProtocolError>;
}

/// A [`Codec`] backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError> {
        serde_json::to_string(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, ProtocolError> {
        serde_json::from_str(text).map_err(ProtocolError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Mark, ServerMessage};

    #[test]
    fn test_encode_decode_round_trip() {
        let codec = JsonCodec;
        let msg = ServerMessage::GameState {
            board: [None; 9],
            turn: Some(Mark::X),
            winner: None,
        };

        let text = codec.encode(&msg).unwrap();
        let decoded: ServerMessage = codec.decode(&text).unwrap();
        assert_eq!(msg, decoded);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let codec = JsonCodec;
        let result: Result<ServerMessage, _> = codec.decode("{{{{");
        assert!(result.is_err());
    }
}

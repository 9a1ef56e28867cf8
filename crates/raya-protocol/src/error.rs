//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding wire messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into a text frame).
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// The inbound frame is not a well-formed envelope: malformed JSON,
    /// or a payload whose fields have the wrong shape.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The envelope parsed but its `type` tag names no known request.
    /// Reported separately so the client sees "unrecognized action"
    /// rather than a generic parse failure.
    #[error("unrecognized action: {0}")]
    UnknownAction(String),
}

//! Core protocol types for Raya's wire format.
//!
//! Both directions use the same envelope shape:
//!
//! ```text
//! { "type": "make_move", "payload": { "index": 4 } }
//! ```
//!
//! Server messages are modeled as an adjacently tagged serde enum, which
//! produces that shape directly. Client messages are decoded in two steps
//! (envelope first, payload second) so that a malformed envelope and an
//! unknown `type` tag can be reported as distinct errors, and so that
//! missing credential fields degrade to empty strings the way the reference
//! client expects (they are then rejected by validation, not by the parser).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Marks, outcomes, boards
// ---------------------------------------------------------------------------

/// One of the two players' symbols. Serialized as `"X"` / `"O"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// The opposing mark.
    pub fn other(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "X"),
            Self::O => write!(f, "O"),
        }
    }
}

/// Terminal result of a match.
///
/// On the wire this is the `winner` field: `null` while the match is live,
/// `"X"` or `"O"` for a win, or the literal `"draw"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    X,
    O,
    #[serde(rename = "draw")]
    Draw,
}

impl From<Mark> for Outcome {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::X => Self::X,
            Mark::O => Self::O,
        }
    }
}

/// The 9 cells of a match, row-major, index 0–8. `None` is an empty cell.
pub type Board = [Option<Mark>; 9];

// ---------------------------------------------------------------------------
// Room codes
// ---------------------------------------------------------------------------

/// A human-chosen room identifier.
///
/// Codes compare case-insensitively; the server normalizes them to
/// uppercase on entry, so two `RoomCode`s compare with plain equality.
/// `#[serde(transparent)]` keeps the wire form a bare string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// Builds a code from raw client input: trims whitespace, uppercases.
    pub fn normalize(raw: &str) -> Self {
        Self(raw.trim().to_uppercase())
    }

    /// True if normalization left nothing, meaning the client sent a blank code.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The normalized code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entry of the join-ordered participant roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    /// The display name the participant joined with.
    pub username: String,
    /// The mark they hold for the lifetime of their seat.
    pub symbol: Mark,
}

// ---------------------------------------------------------------------------
// Client → Server
// ---------------------------------------------------------------------------

/// A request from a client.
///
/// Decoded from the `{type, payload}` envelope by [`ClientMessage::decode`].
/// `make_move` carries the cell index as the client sent it, `None` when
/// the field is missing or not an integer, so range validation (and its
/// error reply) stays with the room, not the parser. Extra payload fields
/// (the reference client repeats the room code on move/reset/leave) are
/// ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    CreateRoom {
        code: String,
        password: String,
        username: String,
    },
    JoinRoom {
        code: String,
        password: String,
        username: String,
    },
    MakeMove {
        index: Option<i64>,
    },
    ResetGame,
    LeaveRoom,
}

/// The raw inbound envelope. `payload` defaults to `null` when absent.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: serde_json::Value,
}

/// Credential payload for `create_room` / `join_room`. Missing fields
/// become empty strings and fail the non-empty check downstream.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Credentials {
    code: String,
    password: String,
    username: String,
}

impl ClientMessage {
    /// Decodes one inbound text frame.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::Decode`] for a frame that is not a well-formed
    /// envelope, [`ProtocolError::UnknownAction`] for an envelope whose
    /// `type` tag names no known request.
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        let envelope: Envelope =
            serde_json::from_str(text).map_err(ProtocolError::Decode)?;

        match envelope.kind.as_str() {
            "create_room" => {
                let creds: Credentials =
                    serde_json::from_value(envelope.payload)
                        .map_err(ProtocolError::Decode)?;
                Ok(Self::CreateRoom {
                    code: creds.code,
                    password: creds.password,
                    username: creds.username,
                })
            }
            "join_room" => {
                let creds: Credentials =
                    serde_json::from_value(envelope.payload)
                        .map_err(ProtocolError::Decode)?;
                Ok(Self::JoinRoom {
                    code: creds.code,
                    password: creds.password,
                    username: creds.username,
                })
            }
            "make_move" => Ok(Self::MakeMove {
                index: envelope
                    .payload
                    .get("index")
                    .and_then(serde_json::Value::as_i64),
            }),
            "reset_game" => Ok(Self::ResetGame),
            "leave_room" => Ok(Self::LeaveRoom),
            other => Err(ProtocolError::UnknownAction(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Server → Client
// ---------------------------------------------------------------------------

/// A message from the server.
///
/// `#[serde(tag = "type", content = "payload")]` produces the adjacently
/// tagged envelope, e.g.:
///
/// ```text
/// { "type": "game_state",
///   "payload": { "board": [null, ...], "turn": "O", "winner": null } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Confirmation to a room's creator. `symbol` is always X.
    RoomCreated {
        code: RoomCode,
        symbol: Mark,
        board: Board,
        turn: Option<Mark>,
        players: Vec<PlayerInfo>,
    },

    /// Confirmation to a joiner, with the current match snapshot.
    RoomJoined {
        code: RoomCode,
        symbol: Mark,
        board: Board,
        turn: Option<Mark>,
        players: Vec<PlayerInfo>,
    },

    /// Sent to everyone already in the room when a participant joins.
    PlayerJoined {
        username: String,
        players: Vec<PlayerInfo>,
    },

    /// Departure notice plus the refreshed (reset) match state.
    PlayerLeft {
        username: String,
        players: Vec<PlayerInfo>,
        board: Board,
        turn: Option<Mark>,
        reason: String,
    },

    /// Authoritative state after a move or reset, sent to all participants.
    GameState {
        board: Board,
        turn: Option<Mark>,
        winner: Option<Outcome>,
    },

    /// A human-readable error, sent only to the offending connection.
    Error { message: String },
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! The wire format is consumed by a browser client, so these tests pin
    //! exact JSON shapes: a serde attribute change that alters the output
    //! breaks real clients even if Rust round-trips still pass.

    use super::*;

    fn empty_board() -> Board {
        [None; 9]
    }

    // =====================================================================
    // Mark / Outcome / RoomCode
    // =====================================================================

    #[test]
    fn test_mark_serializes_as_bare_letter() {
        assert_eq!(serde_json::to_string(&Mark::X).unwrap(), "\"X\"");
        assert_eq!(serde_json::to_string(&Mark::O).unwrap(), "\"O\"");
    }

    #[test]
    fn test_mark_other() {
        assert_eq!(Mark::X.other(), Mark::O);
        assert_eq!(Mark::O.other(), Mark::X);
    }

    #[test]
    fn test_outcome_wire_values() {
        assert_eq!(serde_json::to_string(&Outcome::X).unwrap(), "\"X\"");
        assert_eq!(serde_json::to_string(&Outcome::O).unwrap(), "\"O\"");
        assert_eq!(
            serde_json::to_string(&Outcome::Draw).unwrap(),
            "\"draw\""
        );
    }

    #[test]
    fn test_outcome_from_mark() {
        assert_eq!(Outcome::from(Mark::X), Outcome::X);
        assert_eq!(Outcome::from(Mark::O), Outcome::O);
    }

    #[test]
    fn test_room_code_normalizes_case_and_whitespace() {
        let code = RoomCode::normalize("  abc123 ");
        assert_eq!(code.as_str(), "ABC123");
        assert_eq!(code, RoomCode::normalize("ABC123"));
    }

    #[test]
    fn test_room_code_blank_input_is_empty() {
        assert!(RoomCode::normalize("   ").is_empty());
        assert!(!RoomCode::normalize("a").is_empty());
    }

    #[test]
    fn test_room_code_serializes_as_plain_string() {
        // `#[serde(transparent)]`: the client sees "SALA", not {"0":"SALA"}.
        let json = serde_json::to_string(&RoomCode::normalize("sala")).unwrap();
        assert_eq!(json, "\"SALA\"");
    }

    // =====================================================================
    // ClientMessage decoding
    // =====================================================================

    #[test]
    fn test_decode_create_room() {
        let msg = ClientMessage::decode(
            r#"{"type":"create_room","payload":{"code":"abc","password":"pw","username":"Ana"}}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            ClientMessage::CreateRoom {
                code: "abc".into(),
                password: "pw".into(),
                username: "Ana".into(),
            }
        );
    }

    #[test]
    fn test_decode_join_room_missing_fields_default_to_empty() {
        // The reference client may omit fields; they become "" and are
        // rejected by the handler's non-empty validation, not here.
        let msg = ClientMessage::decode(
            r#"{"type":"join_room","payload":{"code":"abc"}}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            ClientMessage::JoinRoom {
                code: "abc".into(),
                password: String::new(),
                username: String::new(),
            }
        );
    }

    #[test]
    fn test_decode_make_move() {
        let msg = ClientMessage::decode(
            r#"{"type":"make_move","payload":{"index":4}}"#,
        )
        .unwrap();
        assert_eq!(msg, ClientMessage::MakeMove { index: Some(4) });
    }

    #[test]
    fn test_decode_make_move_ignores_extra_fields() {
        // The reference client repeats the room code; it must be ignored.
        let msg = ClientMessage::decode(
            r#"{"type":"make_move","payload":{"code":"SALA","index":0}}"#,
        )
        .unwrap();
        assert_eq!(msg, ClientMessage::MakeMove { index: Some(0) });
    }

    #[test]
    fn test_decode_make_move_non_integer_index_is_none() {
        for payload in [
            r#"{"type":"make_move","payload":{}}"#,
            r#"{"type":"make_move","payload":{"index":4.5}}"#,
            r#"{"type":"make_move","payload":{"index":"4"}}"#,
            r#"{"type":"make_move"}"#,
        ] {
            let msg = ClientMessage::decode(payload).unwrap();
            assert_eq!(msg, ClientMessage::MakeMove { index: None }, "{payload}");
        }
    }

    #[test]
    fn test_decode_make_move_negative_index_survives_decoding() {
        // Negative stays Some so the room reports it out of range instead
        // of the parser swallowing it.
        let msg = ClientMessage::decode(
            r#"{"type":"make_move","payload":{"index":-1}}"#,
        )
        .unwrap();
        assert_eq!(msg, ClientMessage::MakeMove { index: Some(-1) });
    }

    #[test]
    fn test_decode_reset_and_leave_with_or_without_payload() {
        assert_eq!(
            ClientMessage::decode(r#"{"type":"reset_game","payload":{"code":"A"}}"#)
                .unwrap(),
            ClientMessage::ResetGame
        );
        assert_eq!(
            ClientMessage::decode(r#"{"type":"leave_room"}"#).unwrap(),
            ClientMessage::LeaveRoom
        );
    }

    #[test]
    fn test_decode_unknown_type() {
        let err =
            ClientMessage::decode(r#"{"type":"fly_to_moon","payload":{}}"#)
                .unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownAction(kind) if kind == "fly_to_moon"));
    }

    #[test]
    fn test_decode_garbage_is_a_decode_error() {
        let err = ClientMessage::decode("not json at all").unwrap_err();
        assert!(matches!(err, ProtocolError::Decode(_)));
    }

    #[test]
    fn test_decode_wrong_envelope_shape_is_a_decode_error() {
        let err = ClientMessage::decode(r#"{"name":"hello"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::Decode(_)));
    }

    // =====================================================================
    // ServerMessage JSON shapes
    // =====================================================================

    #[test]
    fn test_room_created_json_shape() {
        let msg = ServerMessage::RoomCreated {
            code: RoomCode::normalize("sala1"),
            symbol: Mark::X,
            board: empty_board(),
            turn: Some(Mark::X),
            players: vec![PlayerInfo {
                username: "Ana".into(),
                symbol: Mark::X,
            }],
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["type"], "room_created");
        assert_eq!(json["payload"]["code"], "SALA1");
        assert_eq!(json["payload"]["symbol"], "X");
        assert_eq!(json["payload"]["turn"], "X");
        assert_eq!(json["payload"]["board"].as_array().unwrap().len(), 9);
        assert!(json["payload"]["board"][0].is_null());
        assert_eq!(json["payload"]["players"][0]["username"], "Ana");
        assert_eq!(json["payload"]["players"][0]["symbol"], "X");
    }

    #[test]
    fn test_game_state_json_shape() {
        let mut board = empty_board();
        board[4] = Some(Mark::X);
        let msg = ServerMessage::GameState {
            board,
            turn: Some(Mark::O),
            winner: None,
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["type"], "game_state");
        assert_eq!(json["payload"]["board"][4], "X");
        assert_eq!(json["payload"]["turn"], "O");
        assert!(json["payload"]["winner"].is_null());
    }

    #[test]
    fn test_game_state_finished_json_shape() {
        let msg = ServerMessage::GameState {
            board: empty_board(),
            turn: None,
            winner: Some(Outcome::Draw),
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();

        assert!(json["payload"]["turn"].is_null());
        assert_eq!(json["payload"]["winner"], "draw");
    }

    #[test]
    fn test_player_left_json_shape() {
        let msg = ServerMessage::PlayerLeft {
            username: "Ana".into(),
            players: vec![PlayerInfo {
                username: "Beto".into(),
                symbol: Mark::O,
            }],
            board: empty_board(),
            turn: Some(Mark::X),
            reason: "disconnect".into(),
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["type"], "player_left");
        assert_eq!(json["payload"]["username"], "Ana");
        assert_eq!(json["payload"]["reason"], "disconnect");
        assert_eq!(json["payload"]["players"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_error_json_shape() {
        let msg = ServerMessage::Error {
            message: "incorrect password".into(),
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["type"], "error");
        assert_eq!(json["payload"]["message"], "incorrect password");
    }

    #[test]
    fn test_server_message_round_trip() {
        let msg = ServerMessage::PlayerJoined {
            username: "Beto".into(),
            players: vec![
                PlayerInfo { username: "Ana".into(), symbol: Mark::X },
                PlayerInfo { username: "Beto".into(), symbol: Mark::O },
            ],
        };
        let text = serde_json::to_string(&msg).unwrap();
        let decoded: ServerMessage = serde_json::from_str(&text).unwrap();
        assert_eq!(msg, decoded);
    }
}

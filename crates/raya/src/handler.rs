//! Per-connection handler: decode, dispatch, implicit leave on close.
//!
//! Each accepted connection runs two tasks: the reader loop in
//! [`handle_connection`], and a writer task that drains the connection's
//! outbound channel. Room actors and the reader both enqueue into that
//! channel, so replies and broadcasts never interleave on the socket.

use std::sync::Arc;

use raya_protocol::{
    ClientMessage, Codec, ProtocolError, RoomCode, ServerMessage,
};
use raya_room::{LeaveReason, PlayerSender};
use raya_transport::{Connection, ConnectionId, WebSocketConnection};
use tokio::sync::mpsc;

use crate::RayaError;
use crate::server::ServerState;

/// Explicit per-connection session record, threaded through the dispatch
/// functions. Handlers are functions of (session, message); there is no
/// hidden state on the connection object itself.
struct ConnSession {
    conn: ConnectionId,
    outbound: PlayerSender,
    /// The room this connection currently occupies, by code. Never a
    /// room handle: a room destroyed and recreated under the same code
    /// must not be reachable through a stale reference.
    current_room: Option<RoomCode>,
}

impl ConnSession {
    /// Queues a message for this connection's writer task.
    fn send(&self, msg: ServerMessage) {
        let _ = self.outbound.send(msg);
    }

    fn error(&self, message: impl Into<String>) {
        self.send(ServerMessage::Error {
            message: message.into(),
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), RayaError> {
    let conn_id = conn.id();
    tracing::debug!(conn = %conn_id, "connection open");

    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    let writer = tokio::spawn(write_outbound(
        conn.clone(),
        Arc::clone(&state),
        outbound_rx,
    ));

    let mut session = ConnSession {
        conn: conn_id,
        outbound: outbound_tx,
        current_room: None,
    };

    loop {
        match conn.recv().await {
            Ok(Some(text)) => {
                dispatch(&state, &mut session, &text).await;
            }
            Ok(None) => break,
            Err(e) => {
                tracing::debug!(conn = %conn_id, error = %e, "recv error");
                break;
            }
        }
    }

    // Transport-level closure is the only liveness signal there is;
    // leaving here covers clean closes and dropped connections alike.
    leave_current(&state, &mut session, LeaveReason::Disconnect).await;

    // Dropping the session drops the last outbound sender (the room
    // released its clone on leave), which ends the writer task.
    drop(session);
    let _ = writer.await;

    tracing::debug!(conn = %conn_id, "connection closed");
    Ok(())
}

/// Drains a connection's outbound channel onto the socket.
///
/// A failed write means the peer is going away: remaining messages are
/// dropped without retry, and the next state change reaches whoever is
/// still connected.
async fn write_outbound<C: Codec>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
    mut outbound: mpsc::UnboundedReceiver<ServerMessage>,
) {
    while let Some(msg) = outbound.recv().await {
        let text = match state.codec.encode(&msg) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode outbound message");
                continue;
            }
        };
        if conn.send(&text).await.is_err() {
            break;
        }
    }
}

/// Decodes one inbound frame and routes it to the matching operation.
async fn dispatch<C: Codec>(
    state: &Arc<ServerState<C>>,
    session: &mut ConnSession,
    text: &str,
) {
    let msg = match ClientMessage::decode(text) {
        Ok(msg) => msg,
        Err(ProtocolError::UnknownAction(kind)) => {
            tracing::debug!(conn = %session.conn, kind, "unrecognized action");
            session.error("unrecognized action");
            return;
        }
        Err(e) => {
            tracing::debug!(conn = %session.conn, error = %e, "invalid message");
            session.error("invalid message");
            return;
        }
    };

    match msg {
        ClientMessage::CreateRoom {
            code,
            password,
            username,
        } => create_room(state, session, &code, &password, &username).await,
        ClientMessage::JoinRoom {
            code,
            password,
            username,
        } => join_room(state, session, &code, &password, &username).await,
        ClientMessage::MakeMove { index } => {
            make_move(state, session, index).await;
        }
        ClientMessage::ResetGame => reset_game(state, session).await,
        ClientMessage::LeaveRoom => {
            leave_current(state, session, LeaveReason::Leave).await;
        }
    }
}

/// Normalizes and validates create/join credentials. `None` when any of
/// them is blank after trimming.
fn credentials(
    code: &str,
    password: &str,
    username: &str,
) -> Option<(RoomCode, String, String)> {
    let code = RoomCode::normalize(code);
    let password = password.trim();
    let username = username.trim();
    if code.is_empty() || password.is_empty() || username.is_empty() {
        return None;
    }
    Some((code, password.to_string(), username.to_string()))
}

async fn create_room<C: Codec>(
    state: &Arc<ServerState<C>>,
    session: &mut ConnSession,
    code: &str,
    password: &str,
    username: &str,
) {
    // A client may not be in two rooms at once.
    leave_current(state, session, LeaveReason::Replaced).await;

    let Some((code, password, username)) =
        credentials(code, password, username)
    else {
        session.error("code, password and username are required");
        return;
    };

    let result = state
        .registry
        .create(
            code.clone(),
            password,
            session.conn,
            username,
            session.outbound.clone(),
        )
        .await;

    match result {
        Ok(()) => session.current_room = Some(code),
        Err(e) => session.error(e.to_string()),
    }
}

async fn join_room<C: Codec>(
    state: &Arc<ServerState<C>>,
    session: &mut ConnSession,
    code: &str,
    password: &str,
    username: &str,
) {
    leave_current(state, session, LeaveReason::Replaced).await;

    let Some((code, password, username)) =
        credentials(code, password, username)
    else {
        session.error("code, password and username are required");
        return;
    };

    let result = state
        .registry
        .join(
            &code,
            password,
            session.conn,
            username,
            session.outbound.clone(),
        )
        .await;

    match result {
        Ok(()) => session.current_room = Some(code),
        Err(e) => session.error(e.to_string()),
    }
}

async fn make_move<C: Codec>(
    state: &Arc<ServerState<C>>,
    session: &mut ConnSession,
    index: Option<i64>,
) {
    let Some(code) = session.current_room.clone() else {
        session.error("you are not in a room");
        return;
    };

    if let Err(e) = state
        .registry
        .make_move(&code, session.conn, index)
        .await
    {
        session.error(e.to_string());
    }
}

async fn reset_game<C: Codec>(
    state: &Arc<ServerState<C>>,
    session: &mut ConnSession,
) {
    // A reset without a room is a stale rematch click: silent no-op.
    let Some(code) = session.current_room.clone() else {
        return;
    };
    state.registry.reset(&code).await;
}

/// Leaves the current room, if any, clearing the session's room code.
async fn leave_current<C: Codec>(
    state: &Arc<ServerState<C>>,
    session: &mut ConnSession,
    reason: LeaveReason,
) {
    let Some(code) = session.current_room.take() else {
        return;
    };
    state.registry.leave(&code, session.conn, reason).await;
}

//! Room actor: an isolated Tokio task that owns one match.
//!
//! Each room runs in its own task, communicating with the outside world
//! through an mpsc mailbox: no shared mutable state, just message
//! passing. Commands are applied one at a time, which is what serializes
//! all state-changing operations for a given room code.

use std::fmt;

use raya_protocol::{Mark, PlayerInfo, RoomCode, ServerMessage};
use raya_transport::ConnectionId;
use tokio::sync::{mpsc, oneshot};

use crate::{Game, MoveOutcome, RoomError};

/// A room seats at most two participants.
const MAX_PLAYERS: usize = 2;

/// Channel sender delivering outbound messages to one participant's
/// connection writer.
pub type PlayerSender = mpsc::UnboundedSender<ServerMessage>;

/// Why a participant left; serialized into the `player_left` notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveReason {
    /// The connection closed (the only liveness signal there is).
    Disconnect,
    /// An explicit `leave_room` request.
    Leave,
    /// Implicitly left because the client created or joined another room.
    Replaced,
}

impl LeaveReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disconnect => "disconnect",
            Self::Leave => "leave",
            Self::Replaced => "replaced",
        }
    }
}

impl fmt::Display for LeaveReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A seated participant of one room.
pub(crate) struct Participant {
    pub(crate) conn: ConnectionId,
    pub(crate) username: String,
    pub(crate) mark: Mark,
    pub(crate) sender: PlayerSender,
}

/// Commands sent to a room actor through its mailbox.
///
/// Join and Leave carry a reply channel because the caller needs the
/// result (to report a precondition error, or to remove an emptied room
/// from the registry). Moves and resets are fire-and-forget: their
/// effects travel back through the participants' outbound channels.
pub(crate) enum RoomCommand {
    Join {
        conn: ConnectionId,
        username: String,
        password: String,
        sender: PlayerSender,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    Move {
        conn: ConnectionId,
        index: Option<i64>,
    },
    Reset,
    Leave {
        conn: ConnectionId,
        reason: LeaveReason,
        /// Replies `true` when the room is now empty.
        reply: oneshot::Sender<bool>,
    },
}

/// Handle to a running room actor. Cheap to clone, being just an `mpsc::Sender`
/// wrapper. The [`Registry`](crate::Registry) holds one per room.
#[derive(Clone)]
pub struct RoomHandle {
    code: RoomCode,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// The code this room was created under.
    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    /// Asks the room to seat a participant.
    pub async fn join(
        &self,
        conn: ConnectionId,
        username: String,
        password: String,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                conn,
                username,
                password,
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?
    }

    /// Delivers a move request (fire-and-forget).
    pub async fn make_move(
        &self,
        conn: ConnectionId,
        index: Option<i64>,
    ) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Move { conn, index })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }

    /// Asks the room to reset its match (fire-and-forget).
    pub async fn reset(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Reset)
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }

    /// Removes a participant. Returns `true` when the room emptied and
    /// the caller must drop its registry entry.
    pub async fn leave(
        &self,
        conn: ConnectionId,
        reason: LeaveReason,
    ) -> Result<bool, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Leave {
                conn,
                reason,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor {
    code: RoomCode,
    password: String,
    game: Game,
    /// Join-ordered; at most [`MAX_PLAYERS`] entries.
    players: Vec<Participant>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    /// Runs the actor loop until the last participant leaves.
    async fn run(mut self) {
        tracing::info!(room = %self.code, "room opened");

        // The creator is seated before the actor starts; confirm the
        // room to them first so `room_created` precedes every broadcast.
        if let Some(creator) = self.players.first() {
            let confirmation = ServerMessage::RoomCreated {
                code: self.code.clone(),
                symbol: creator.mark,
                board: *self.game.board(),
                turn: self.game.turn(),
                players: self.roster(),
            };
            let _ = creator.sender.send(confirmation);
        }

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Join {
                    conn,
                    username,
                    password,
                    sender,
                    reply,
                } => {
                    let result =
                        self.handle_join(conn, username, password, sender);
                    let _ = reply.send(result);
                }
                RoomCommand::Move { conn, index } => {
                    self.handle_move(conn, index);
                }
                RoomCommand::Reset => self.handle_reset(),
                RoomCommand::Leave { conn, reason, reply } => {
                    let now_empty = self.handle_leave(conn, reason);
                    let _ = reply.send(now_empty);
                    if now_empty {
                        break;
                    }
                }
            }
        }

        tracing::info!(room = %self.code, "room closed");
    }

    fn handle_join(
        &mut self,
        conn: ConnectionId,
        username: String,
        password: String,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        if password != self.password {
            return Err(RoomError::BadPassword);
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(RoomError::RoomFull(self.code.clone()));
        }

        // The free mark: X for the first seat, O for the second. If the
        // X holder departed earlier, the next joiner takes X back so the
        // room always has exactly one of each.
        let mark = if self.players.iter().any(|p| p.mark == Mark::X) {
            Mark::O
        } else {
            Mark::X
        };

        let joined = username.clone();
        self.players.push(Participant {
            conn,
            username,
            mark,
            sender,
        });
        tracing::info!(
            room = %self.code,
            %conn,
            players = self.players.len(),
            "participant joined"
        );

        // Confirm to the joiner, then notify the rest of the room.
        self.send_to(
            conn,
            ServerMessage::RoomJoined {
                code: self.code.clone(),
                symbol: mark,
                board: *self.game.board(),
                turn: self.game.turn(),
                players: self.roster(),
            },
        );
        self.broadcast_except(
            conn,
            ServerMessage::PlayerJoined {
                username: joined,
                players: self.roster(),
            },
        );
        Ok(())
    }

    fn handle_move(&mut self, conn: ConnectionId, index: Option<i64>) {
        let Some(participant) =
            self.players.iter().find(|p| p.conn == conn)
        else {
            tracing::warn!(
                room = %self.code,
                %conn,
                "move from non-member, ignoring"
            );
            return;
        };
        let mark = participant.mark;

        let Some(index) = index.filter(|i| (0..=8).contains(i)) else {
            self.send_to(
                conn,
                ServerMessage::Error {
                    message: "invalid move".into(),
                },
            );
            return;
        };

        match self.game.apply(mark, index as usize) {
            MoveOutcome::Applied => {
                if let Some(outcome) = self.game.outcome() {
                    tracing::info!(
                        room = %self.code,
                        ?outcome,
                        "match finished"
                    );
                }
                self.broadcast_state();
            }
            MoveOutcome::NotYourTurn => {
                self.send_to(
                    conn,
                    ServerMessage::Error {
                        message: "not your turn".into(),
                    },
                );
            }
            // Stale click (finished game / occupied cell): no state
            // change, no broadcast, no error.
            MoveOutcome::Ignored => {}
        }
    }

    fn handle_reset(&mut self) {
        self.game.reset();
        tracing::debug!(room = %self.code, "match reset");
        self.broadcast_state();
    }

    /// Returns `true` when the room is now empty.
    fn handle_leave(
        &mut self,
        conn: ConnectionId,
        reason: LeaveReason,
    ) -> bool {
        let Some(position) =
            self.players.iter().position(|p| p.conn == conn)
        else {
            return self.players.is_empty();
        };
        let departed = self.players.remove(position);
        tracing::info!(
            room = %self.code,
            %conn,
            %reason,
            players = self.players.len(),
            "participant left"
        );

        if self.players.is_empty() {
            return true;
        }

        // The match cannot continue one-sided: reset it and tell the
        // remaining participant who left and what the fresh state is.
        self.game.reset();
        self.broadcast(ServerMessage::PlayerLeft {
            username: departed.username,
            players: self.roster(),
            board: *self.game.board(),
            turn: self.game.turn(),
            reason: reason.to_string(),
        });
        false
    }

    /// The join-ordered `players` roster as sent on the wire.
    fn roster(&self) -> Vec<PlayerInfo> {
        self.players
            .iter()
            .map(|p| PlayerInfo {
                username: p.username.clone(),
                symbol: p.mark,
            })
            .collect()
    }

    fn broadcast_state(&self) {
        self.broadcast(ServerMessage::GameState {
            board: *self.game.board(),
            turn: self.game.turn(),
            winner: self.game.outcome(),
        });
    }

    /// Sends to every participant. A send to a closed channel is dropped
    /// without retry; the next state change reaches whoever remains.
    fn broadcast(&self, msg: ServerMessage) {
        for p in &self.players {
            let _ = p.sender.send(msg.clone());
        }
    }

    fn broadcast_except(&self, excluded: ConnectionId, msg: ServerMessage) {
        for p in self.players.iter().filter(|p| p.conn != excluded) {
            let _ = p.sender.send(msg.clone());
        }
    }

    /// Sends to a single participant; silently drops if they are gone.
    fn send_to(&self, conn: ConnectionId, msg: ServerMessage) {
        if let Some(p) = self.players.iter().find(|p| p.conn == conn) {
            let _ = p.sender.send(msg);
        }
    }
}

/// Spawns a new room actor with its creator already seated as X, and
/// returns a handle to communicate with it.
///
/// `channel_size` bounds the command mailbox; the actor never blocks
/// while holding a command, so the mailbox only fills if the actor died.
pub(crate) fn spawn_room(
    code: RoomCode,
    password: String,
    creator: Participant,
    channel_size: usize,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = RoomActor {
        code: code.clone(),
        password,
        game: Game::new(),
        players: vec![creator],
        receiver: rx,
    };

    tokio::spawn(actor.run());

    RoomHandle { code, sender: tx }
}

//! The match state machine: board, turn, and outcome.
//!
//! `Game` owns no participants and no channels; it is the authoritative
//! match state that the room actor mutates between broadcasts. All the
//! "stale click" tolerance lives here: moves on a finished game or an
//! occupied cell are ignored without an error, because they are expected
//! under latency and must not alarm the user.

use raya_protocol::{Board, Mark, Outcome};

use crate::rules;

/// Result of applying a move to the match state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move was applied; state changed and must be broadcast.
    Applied,
    /// The acting mark is not the current turn. Reported to the actor
    /// only; no state change.
    NotYourTurn,
    /// Late or stale request (finished game, occupied cell). No state
    /// change, no broadcast, no error.
    Ignored,
}

/// Authoritative state of one match.
///
/// Invariant: `turn` is `None` iff `outcome` is `Some`; the outcome is
/// recomputed after every mutation, before the turn advances.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    turn: Option<Mark>,
    outcome: Option<Outcome>,
}

impl Game {
    /// A fresh match: empty board, X to move, no outcome.
    pub fn new() -> Self {
        Self {
            board: [None; 9],
            turn: Some(Mark::X),
            outcome: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Option<Mark> {
        self.turn
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Applies `mark` at `index` (must already be range-checked to 0..9).
    ///
    /// The winning line is evaluated before the full-board check, so a
    /// move that fills the board *and* completes a line reports the win,
    /// never a draw.
    pub fn apply(&mut self, mark: Mark, index: usize) -> MoveOutcome {
        if self.outcome.is_some() {
            return MoveOutcome::Ignored;
        }
        if self.board[index].is_some() {
            return MoveOutcome::Ignored;
        }
        if self.turn != Some(mark) {
            return MoveOutcome::NotYourTurn;
        }

        self.board[index] = Some(mark);
        if let Some(won) = rules::winner(&self.board) {
            self.outcome = Some(Outcome::from(won));
            self.turn = None;
        } else if rules::is_full(&self.board) {
            self.outcome = Some(Outcome::Draw);
            self.turn = None;
        } else {
            self.turn = Some(rules::next_turn(mark));
        }
        MoveOutcome::Applied
    }

    /// Clears the board, sets the turn back to X, clears the outcome.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

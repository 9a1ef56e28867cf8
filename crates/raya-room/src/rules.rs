//! The pure rule engine: win detection, draw detection, turn order.
//!
//! No state and no side effects: everything here is a function of its
//! arguments, callable concurrently without synchronization. Whether a
//! move is *legal* is not decided here; that needs match-level context
//! (whose turn it is, whether the game is over) and lives in
//! [`Game`](crate::Game).

use raya_protocol::{Board, Mark};

/// The 8 winning lines: 3 rows, 3 columns, 2 diagonals.
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Returns the mark occupying a complete line, if any.
///
/// Lines are checked in a fixed order, but in a legal game at most one
/// line can be complete, so the order is unobservable.
pub fn winner(board: &Board) -> Option<Mark> {
    for [a, b, c] in LINES {
        if let Some(mark) = board[a] {
            if board[b] == Some(mark) && board[c] == Some(mark) {
                return Some(mark);
            }
        }
    }
    None
}

/// True iff no cell is empty.
pub fn is_full(board: &Board) -> bool {
    board.iter().all(|cell| cell.is_some())
}

/// X→O, O→X.
pub fn next_turn(mark: Mark) -> Mark {
    mark.other()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(marks: &[(usize, Mark)]) -> Board {
        let mut board: Board = [None; 9];
        for &(index, mark) in marks {
            board[index] = Some(mark);
        }
        board
    }

    #[test]
    fn test_empty_board_has_no_winner() {
        assert_eq!(winner(&[None; 9]), None);
    }

    #[test]
    fn test_winner_detects_every_line() {
        for line in LINES {
            let board = board_with(&[
                (line[0], Mark::X),
                (line[1], Mark::X),
                (line[2], Mark::X),
            ]);
            assert_eq!(winner(&board), Some(Mark::X), "line {line:?}");
        }
    }

    #[test]
    fn test_winner_detects_o_lines_too() {
        let board =
            board_with(&[(2, Mark::O), (4, Mark::O), (6, Mark::O)]);
        assert_eq!(winner(&board), Some(Mark::O));
    }

    #[test]
    fn test_mixed_line_is_not_a_win() {
        let board =
            board_with(&[(0, Mark::X), (1, Mark::O), (2, Mark::X)]);
        assert_eq!(winner(&board), None);
    }

    #[test]
    fn test_is_full() {
        assert!(!is_full(&[None; 9]));

        let mut board: Board = [Some(Mark::X); 9];
        assert!(is_full(&board));

        board[8] = None;
        assert!(!is_full(&board));
    }

    #[test]
    fn test_next_turn_alternates() {
        assert_eq!(next_turn(Mark::X), Mark::O);
        assert_eq!(next_turn(Mark::O), Mark::X);
    }
}

//! Three-in-a-row detection.

use super::super::{Board, Mark, Square};

/// Board indices of every line: rows, then columns, then diagonals.
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

/// The mark owning a complete line, if any.
pub fn check_winner(board: &Board) -> Option<Mark> {
    let squares = board.squares();
    LINES.iter().find_map(|line| {
        let [a, b, c] = line.map(|i| squares[i]);
        match a {
            Square::Occupied(mark) if a == b && b == c => Some(mark),
            _ => None,
        }
    })
}

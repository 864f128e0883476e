//! Named squares of the tic-tac-toe board.

use super::types::Board;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A square of the 3x3 board, numbered 0-8 row-major.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, strum::Display,
)]
#[strum(serialize_all = "kebab-case")]
pub enum Position {
    /// Square 0.
    TopLeft,
    /// Square 1.
    TopCenter,
    /// Square 2.
    TopRight,
    /// Square 3.
    MiddleLeft,
    /// Square 4.
    Center,
    /// Square 5.
    MiddleRight,
    /// Square 6.
    BottomLeft,
    /// Square 7.
    BottomCenter,
    /// Square 8.
    BottomRight,
}

impl Position {
    /// All 9 positions.
    pub const ALL: [Position; 9] = [
        Position::TopLeft,
        Position::TopCenter,
        Position::TopRight,
        Position::MiddleLeft,
        Position::Center,
        Position::MiddleRight,
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ];

    /// The four corners.
    pub const CORNERS: [Position; 4] = [
        Position::TopLeft,
        Position::TopRight,
        Position::BottomLeft,
        Position::BottomRight,
    ];

    /// The four edge midpoints.
    pub const EDGES: [Position; 4] = [
        Position::TopCenter,
        Position::MiddleLeft,
        Position::MiddleRight,
        Position::BottomCenter,
    ];

    /// Row, 0 at the top.
    pub fn row(self) -> usize {
        self.to_index() / 3
    }

    /// Column, 0 at the left.
    pub fn col(self) -> usize {
        self.to_index() % 3
    }

    /// The square at `row`, `col`, if both are on the board.
    pub fn at(row: usize, col: usize) -> Option<Self> {
        (row < 3 && col < 3).then(|| Self::ALL[row * 3 + col])
    }

    /// Row-major board index.
    pub fn to_index(self) -> usize {
        self as usize
    }

    /// Inverse of [`Position::to_index`].
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Empty squares, in index order.
    #[instrument(skip(board))]
    pub fn valid_moves(board: &Board) -> Vec<Position> {
        Self::ALL
            .into_iter()
            .filter(|pos| board.is_empty(*pos))
            .collect()
    }
}

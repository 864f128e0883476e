//! Tetromino shapes and rotation.

use crate::rng::ArcadeRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The seven tetromino kinds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
pub enum Tetromino {
    /// Four in a line.
    I,
    /// Hook to the left.
    J,
    /// Hook to the right.
    L,
    /// Square.
    O,
    /// Skew to the right.
    S,
    /// Tee.
    T,
    /// Skew to the left.
    Z,
}

impl Tetromino {
    /// All kinds, in spawn-table order.
    pub const ALL: [Tetromino; 7] = [
        Tetromino::I,
        Tetromino::J,
        Tetromino::L,
        Tetromino::O,
        Tetromino::S,
        Tetromino::T,
        Tetromino::Z,
    ];

    /// Draws a kind uniformly at random.
    pub fn random(rng: &mut ArcadeRng) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Spawn orientation of this kind.
    pub fn shape(self) -> Shape {
        match self {
            Tetromino::I => Shape::from_rows(&[".#..", ".#..", ".#..", ".#.."]),
            Tetromino::J => Shape::from_rows(&[".#.", ".#.", "##."]),
            Tetromino::L => Shape::from_rows(&[".#.", ".#.", ".##"]),
            Tetromino::O => Shape::from_rows(&["##", "##"]),
            Tetromino::S => Shape::from_rows(&[".##", "##.", "..."]),
            Tetromino::T => Shape::from_rows(&["...", "###", ".#."]),
            Tetromino::Z => Shape::from_rows(&["##.", ".##", "..."]),
        }
    }

    /// Single-letter symbol used when printing boards.
    pub fn symbol(self) -> char {
        match self {
            Tetromino::I => 'I',
            Tetromino::J => 'J',
            Tetromino::L => 'L',
            Tetromino::O => 'O',
            Tetromino::S => 'S',
            Tetromino::T => 'T',
            Tetromino::Z => 'Z',
        }
    }
}

/// Square occupancy matrix of a tetromino in one orientation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    size: usize,
    cells: Vec<bool>,
}

impl Shape {
    /// Builds a shape from rows of `#` (filled) and `.` (empty).
    ///
    /// Rows must all have the same length as the number of rows.
    pub fn from_rows(rows: &[&str]) -> Self {
        let size = rows.len();
        let cells = rows
            .iter()
            .flat_map(|row| row.chars().map(|c| c == '#'))
            .collect::<Vec<_>>();
        debug_assert_eq!(cells.len(), size * size, "shape must be square");
        Self { size, cells }
    }

    /// Side length of the matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the matrix cell at (`x`, `y`) is filled.
    pub fn is_filled(&self, x: usize, y: usize) -> bool {
        x < self.size && y < self.size && self.cells[y * self.size + x]
    }

    /// Offsets `(x, y)` of every filled cell, relative to the matrix origin.
    pub fn filled(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (0..self.size).flat_map(move |y| {
            (0..self.size)
                .filter(move |&x| self.is_filled(x, y))
                .map(move |x| (x as i32, y as i32))
        })
    }

    /// The shape turned a quarter clockwise (transpose, then mirror rows).
    pub fn rotated_cw(&self) -> Self {
        let n = self.size;
        let mut cells = vec![false; n * n];
        for y in 0..n {
            for x in 0..n {
                cells[y * n + x] = self.cells[(n - 1 - x) * n + y];
            }
        }
        Self { size: n, cells }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_four_cells() {
        for kind in Tetromino::ALL {
            assert_eq!(kind.shape().filled().count(), 4, "{kind}");
        }
    }

    #[test]
    fn test_four_rotations_return_to_start() {
        for kind in Tetromino::ALL {
            let start = kind.shape();
            let turned = start.rotated_cw().rotated_cw().rotated_cw().rotated_cw();
            assert_eq!(turned, start, "{kind}");
        }
    }

    #[test]
    fn test_vertical_i_becomes_horizontal() {
        let turned = Tetromino::I.shape().rotated_cw();
        let rows: Vec<i32> = turned.filled().map(|(_, y)| y).collect();
        assert!(rows.iter().all(|&y| y == rows[0]));
    }

    #[test]
    fn test_tee_rotates_clockwise() {
        // ...      .#.
        // ###  ->  ##.
        // .#.      .#.
        let expected = Shape::from_rows(&[".#.", "##.", ".#."]);
        assert_eq!(Tetromino::T.shape().rotated_cw(), expected);
    }
}

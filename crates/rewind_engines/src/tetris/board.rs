//! The Tetris playfield: settled cells, collision and line sweep.

use super::piece::{Shape, Tetromino};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Playfield width in cells.
pub const WIDTH: usize = 12;
/// Playfield height in cells.
pub const HEIGHT: usize = 20;

/// Settled cells, row-major with row 0 at the top.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: Vec<Option<Tetromino>>,
}

impl Board {
    /// Creates an empty playfield.
    pub fn new() -> Self {
        Self {
            cells: vec![None; WIDTH * HEIGHT],
        }
    }

    /// Builds a board from text rows, bottom-aligned.
    ///
    /// `.` is empty, any other character is a settled cell (letters map to
    /// their tetromino, anything else to `I`). Missing rows above are empty.
    pub fn from_rows(rows: &[&str]) -> Self {
        let mut board = Self::new();
        let top = HEIGHT.saturating_sub(rows.len());
        for (i, row) in rows.iter().enumerate().take(HEIGHT) {
            for (x, c) in row.chars().enumerate().take(WIDTH) {
                if c != '.' {
                    let kind = Tetromino::ALL
                        .into_iter()
                        .find(|t| t.symbol() == c)
                        .unwrap_or(Tetromino::I);
                    board.cells[(top + i) * WIDTH + x] = Some(kind);
                }
            }
        }
        board
    }

    /// Cell contents, or `None` when empty or out of range.
    pub fn get(&self, x: usize, y: usize) -> Option<Tetromino> {
        if x < WIDTH && y < HEIGHT {
            self.cells[y * WIDTH + x]
        } else {
            None
        }
    }

    /// True when the cell is inside the field and free.
    pub fn is_free(&self, x: i32, y: i32) -> bool {
        x >= 0
            && y >= 0
            && (x as usize) < WIDTH
            && (y as usize) < HEIGHT
            && self.cells[y as usize * WIDTH + x as usize].is_none()
    }

    /// A placement is legal iff every filled cell of `shape` at (`x`, `y`)
    /// lands on an in-bounds free cell.
    pub fn fits(&self, shape: &Shape, x: i32, y: i32) -> bool {
        shape.filled().all(|(dx, dy)| self.is_free(x + dx, y + dy))
    }

    /// Writes the shape's cells into the field.
    #[instrument(skip(self, shape))]
    pub fn merge(&mut self, shape: &Shape, kind: Tetromino, x: i32, y: i32) {
        for (dx, dy) in shape.filled() {
            let (cx, cy) = (x + dx, y + dy);
            if self.is_free(cx, cy) {
                self.cells[cy as usize * WIDTH + cx as usize] = Some(kind);
            }
        }
    }

    /// True when the row has no empty cell.
    pub fn is_row_full(&self, y: usize) -> bool {
        y < HEIGHT && self.cells[y * WIDTH..(y + 1) * WIDTH].iter().all(Option::is_some)
    }

    /// Removes every full row and drops the rows above it.
    ///
    /// Empty rows are inserted at the top so the height never changes.
    /// Returns how many rows were removed.
    #[instrument(skip(self))]
    pub fn sweep(&mut self) -> usize {
        let kept: Vec<Option<Tetromino>> = (0..HEIGHT)
            .filter(|&y| !self.is_row_full(y))
            .flat_map(|y| self.cells[y * WIDTH..(y + 1) * WIDTH].to_vec())
            .collect();
        let cleared = HEIGHT - kept.len() / WIDTH;
        if cleared > 0 {
            let mut cells = vec![None; cleared * WIDTH];
            cells.extend(kept);
            self.cells = cells;
            debug!(cleared, "Rows swept");
        }
        cleared
    }

    /// Number of rows, always [`HEIGHT`].
    pub fn height(&self) -> usize {
        self.cells.len() / WIDTH
    }

    /// Number of settled cells.
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                let c = self.get(x, y).map(Tetromino::symbol).unwrap_or('.');
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_fits_spawn() {
        let board = Board::new();
        assert!(board.fits(&Tetromino::T.shape(), 4, 0));
    }

    #[test]
    fn test_walls_block() {
        let board = Board::new();
        // O occupies the whole 2x2 matrix, so x = -1 pokes out on the left.
        assert!(!board.fits(&Tetromino::O.shape(), -1, 0));
        assert!(!board.fits(&Tetromino::O.shape(), WIDTH as i32 - 1, 0));
        assert!(!board.fits(&Tetromino::O.shape(), 0, HEIGHT as i32 - 1));
    }

    #[test]
    fn test_settled_cells_block() {
        let board = Board::from_rows(&["##.........."]);
        assert!(!board.fits(&Tetromino::O.shape(), 0, HEIGHT as i32 - 2));
        assert!(board.fits(&Tetromino::O.shape(), 2, HEIGHT as i32 - 2));
    }

    #[test]
    fn test_sweep_removes_only_full_rows() {
        let mut board = Board::from_rows(&[
            "L...........",
            "############",
            "#.##########",
            "############",
        ]);
        let cleared = board.sweep();
        assert_eq!(cleared, 2);
        assert_eq!(board.height(), HEIGHT);
        // The partial rows slid down in order.
        assert_eq!(board.get(0, HEIGHT - 2), Some(Tetromino::L));
        assert_eq!(board.get(1, HEIGHT - 1), None);
        assert!(!board.is_row_full(HEIGHT - 1));
        assert_eq!(board.filled_count(), 1 + 11);
    }

    #[test]
    fn test_sweep_without_full_rows_is_noop() {
        let mut board = Board::from_rows(&["#.#.#.#.#.#."]);
        let before = board.clone();
        assert_eq!(board.sweep(), 0);
        assert_eq!(board, before);
    }
}

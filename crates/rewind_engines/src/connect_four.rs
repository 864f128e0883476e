//! Connect Four: discs fall to the lowest free cell of a column.

use crate::engine::{Engine, GameId, MoveError, Outcome, Side, Status, TurnBased};
use crate::rng::{self, ArcadeRng};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Number of columns.
pub const COLUMNS: usize = 7;
/// Number of rows. Row 0 is the top.
pub const ROWS: usize = 6;
/// Discs in a line needed to win.
pub const RUN: usize = 4;

/// Line directions `(drow, dcol)` scanned for a winning run.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (-1, 1)];

/// The 7x6 grid of discs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    cells: [[Option<Side>; COLUMNS]; ROWS],
}

impl Grid {
    /// Creates an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a grid from text rows, top first: `X` human, `O` opponent,
    /// anything else empty.
    pub fn from_rows(rows: &[&str]) -> Self {
        let mut grid = Self::new();
        for (r, line) in rows.iter().enumerate().take(ROWS) {
            for (c, ch) in line.chars().enumerate().take(COLUMNS) {
                grid.cells[r][c] = match ch {
                    'X' => Some(Side::Human),
                    'O' => Some(Side::Opponent),
                    _ => None,
                };
            }
        }
        grid
    }

    /// Disc at (`row`, `col`), or `None` when empty or off the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<Side> {
        self.cells.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    /// Row a disc dropped into `col` would land in.
    pub fn landing_row(&self, col: usize) -> Option<usize> {
        if col >= COLUMNS {
            return None;
        }
        (0..ROWS).rev().find(|&row| self.cells[row][col].is_none())
    }

    /// Columns that still accept a disc, left to right.
    pub fn legal_columns(&self) -> Vec<usize> {
        (0..COLUMNS)
            .filter(|&c| self.cells[0][c].is_none())
            .collect()
    }

    /// True when every cell holds a disc.
    pub fn is_full(&self) -> bool {
        self.cells[0].iter().all(Option::is_some)
    }

    /// Drops a disc for `side` into `col`, returning the landing row.
    #[instrument(skip(self))]
    pub fn drop_disc(&mut self, col: usize, side: Side) -> Result<usize, MoveError> {
        if col >= COLUMNS {
            return Err(MoveError::OutOfBounds(col));
        }
        let row = self.landing_row(col).ok_or(MoveError::ColumnFull(col))?;
        self.cells[row][col] = Some(side);
        Ok(row)
    }

    /// Side owning a run of four in any row, column or diagonal.
    pub fn winner(&self) -> Option<Side> {
        for row in 0..ROWS {
            for col in 0..COLUMNS {
                let Some(side) = self.cells[row][col] else {
                    continue;
                };
                if DIRECTIONS
                    .iter()
                    .any(|&dir| self.run_length(row, col, dir, side) >= RUN)
                {
                    return Some(side);
                }
            }
        }
        None
    }

    fn run_length(&self, row: usize, col: usize, (dr, dc): (isize, isize), side: Side) -> usize {
        (0..RUN)
            .take_while(|&k| {
                let r = row as isize + dr * k as isize;
                let c = col as isize + dc * k as isize;
                r >= 0 && c >= 0 && self.get(r as usize, c as usize) == Some(side)
            })
            .count()
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.cells {
            for cell in row {
                let c = match cell {
                    Some(Side::Human) => 'X',
                    Some(Side::Opponent) => 'O',
                    None => '.',
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "{}", (0..COLUMNS).map(|c| c.to_string()).collect::<String>())
    }
}

/// A Connect Four match. The human always drops first.
#[derive(Debug, Clone)]
pub struct ConnectFour {
    grid: Grid,
    to_move: Side,
    status: Status,
    rng: ArcadeRng,
}

impl ConnectFour {
    /// Starts a match with an OS-seeded opponent.
    #[instrument]
    pub fn new() -> Self {
        Self::with_rng(rng::from_entropy())
    }

    /// Starts a match with a deterministic opponent.
    #[instrument]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(rng::seeded(seed))
    }

    /// Starts a match whose opponent draws from `rng`.
    pub fn with_rng(rng: ArcadeRng) -> Self {
        Self {
            grid: Grid::new(),
            to_move: Side::Human,
            status: Status::Ongoing,
            rng,
        }
    }

    /// Current grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Drops a disc for `side`, then settles win or draw.
    #[instrument(skip(self))]
    pub fn play(&mut self, side: Side, col: usize) -> Result<usize, MoveError> {
        if self.status.is_terminal() {
            return Err(MoveError::GameOver);
        }
        if side != self.to_move {
            return Err(MoveError::NotYourTurn(side));
        }
        let row = self.grid.drop_disc(col, side)?;
        debug!(?side, col, row, "Disc dropped");

        if let Some(winner) = self.grid.winner() {
            self.status = Status::Finished(Outcome::for_winner(winner));
            info!(?winner, "Four in a row");
        } else if self.grid.is_full() {
            self.status = Status::Finished(Outcome::Draw);
            info!("Grid full, draw");
        } else {
            self.to_move = side.other();
        }
        Ok(row)
    }
}

impl Default for ConnectFour {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for ConnectFour {
    /// Column index, 0 on the left.
    type Command = usize;

    fn game_id(&self) -> GameId {
        GameId::ConnectFour
    }

    fn apply(&mut self, col: usize) -> Result<(), MoveError> {
        self.play(Side::Human, col).map(|_| ())
    }

    fn status(&self) -> Status {
        self.status
    }

    fn score(&self) -> u32 {
        0
    }

    #[instrument(skip(self))]
    fn reset(&mut self) {
        self.grid = Grid::new();
        self.to_move = Side::Human;
        self.status = Status::Ongoing;
    }
}

impl TurnBased for ConnectFour {
    fn to_move(&self) -> Side {
        self.to_move
    }

    /// Drops into a uniformly random legal column.
    #[instrument(skip(self))]
    fn reply(&mut self) -> Result<(), MoveError> {
        if self.status.is_terminal() {
            return Err(MoveError::GameOver);
        }
        if self.to_move != Side::Opponent {
            return Err(MoveError::NotYourTurn(Side::Opponent));
        }
        let col = *self
            .grid
            .legal_columns()
            .choose(&mut self.rng)
            .ok_or(MoveError::NoLegalMoves)?;
        self.play(Side::Opponent, col).map(|_| ())
    }
}

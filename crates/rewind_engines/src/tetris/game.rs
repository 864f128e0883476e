//! Tetris engine: movement, rotation with wall kicks, locking and scoring.

use super::board::{Board, WIDTH};
use super::piece::{Shape, Tetromino};
use crate::engine::{Engine, GameId, MoveError, Outcome, RealTime, Status};
use crate::rng::{self, ArcadeRng};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Points for clearing 1, 2, 3 or 4 rows at once, before the level factor.
pub const ROW_POINTS: [u32; 4] = [40, 100, 300, 1200];
/// Cleared rows needed to gain a level.
pub const ROWS_PER_LEVEL: u32 = 10;
/// Gravity interval at level 1.
pub const BASE_DROP_INTERVAL: Duration = Duration::from_millis(1000);
/// Gravity speed-up per level.
pub const DROP_INTERVAL_STEP: Duration = Duration::from_millis(100);
/// Gravity never gets faster than this.
pub const MIN_DROP_INTERVAL: Duration = Duration::from_millis(100);
/// How many upcoming pieces are visible.
pub const LOOKAHEAD: usize = 1;
/// Column where new pieces appear.
pub const SPAWN_X: i32 = WIDTH as i32 / 2 - 2;

/// Player input for Tetris.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TetrisCommand {
    /// Shift one column left.
    MoveLeft,
    /// Shift one column right.
    MoveRight,
    /// Drop one row, locking if blocked.
    SoftDrop,
    /// Drop to the floor and lock.
    HardDrop,
    /// Quarter turn clockwise, with wall kicks.
    RotateCw,
}

/// The falling piece before it locks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ActivePiece {
    kind: Tetromino,
    shape: Shape,
    rotation: u8,
    x: i32,
    y: i32,
}

impl ActivePiece {
    fn spawn(kind: Tetromino) -> Self {
        Self {
            kind,
            shape: kind.shape(),
            rotation: 0,
            x: SPAWN_X,
            y: 0,
        }
    }
}

/// Everything a renderer needs to draw a Tetris session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct TetrisState {
    board: Board,
    active: Option<ActivePiece>,
    queue: VecDeque<Tetromino>,
    score: u32,
    rows: u32,
    level: u32,
    status: Status,
}

impl TetrisState {
    fn empty(board: Board) -> Self {
        Self {
            board,
            active: None,
            queue: VecDeque::with_capacity(LOOKAHEAD),
            score: 0,
            rows: 0,
            level: 1,
            status: Status::Ongoing,
        }
    }
}

impl std::fmt::Display for TetrisState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut board = self.board.clone();
        if let Some(piece) = &self.active {
            board.merge(&piece.shape, piece.kind, piece.x, piece.y);
        }
        write!(f, "{}", board)?;
        writeln!(
            f,
            "score {}  rows {}  level {}  next {}",
            self.score,
            self.rows,
            self.level,
            self.queue.iter().map(|t| t.symbol()).collect::<String>()
        )
    }
}

/// Gravity interval for a level.
pub fn drop_interval(level: u32) -> Duration {
    let speedup = DROP_INTERVAL_STEP * level.saturating_sub(1);
    BASE_DROP_INTERVAL
        .saturating_sub(speedup)
        .max(MIN_DROP_INTERVAL)
}

/// Horizontal kick offsets tried after a blocked rotation.
fn kick_offsets(width: usize) -> impl Iterator<Item = i32> {
    (1..=width as i32).flat_map(|k| [k, -k])
}

/// A Tetris session.
#[derive(Debug, Clone)]
pub struct Tetris {
    state: TetrisState,
    rng: ArcadeRng,
}

impl Tetris {
    /// Starts a session with an OS-seeded random source.
    #[instrument]
    pub fn new() -> Self {
        Self::with_rng(rng::from_entropy())
    }

    /// Starts a deterministic session.
    #[instrument]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(rng::seeded(seed))
    }

    /// Starts a session drawing pieces from `rng`.
    pub fn with_rng(rng: ArcadeRng) -> Self {
        let mut game = Self {
            state: TetrisState::empty(Board::new()),
            rng,
        };
        game.fill_queue();
        game.spawn();
        game
    }

    /// Starts a session on a prepared field with scripted pieces.
    ///
    /// `pieces` are dealt in order before the random source takes over.
    #[instrument(skip(board, pieces))]
    pub fn from_setup(
        board: Board,
        pieces: impl IntoIterator<Item = Tetromino>,
        seed: u64,
    ) -> Self {
        let mut game = Self {
            state: TetrisState::empty(board),
            rng: rng::seeded(seed),
        };
        game.state.queue.extend(pieces);
        game.fill_queue();
        game.spawn();
        game
    }

    /// Current session state.
    pub fn state(&self) -> &TetrisState {
        &self.state
    }

    fn fill_queue(&mut self) {
        while self.state.queue.len() < LOOKAHEAD {
            let next = Tetromino::random(&mut self.rng);
            self.state.queue.push_back(next);
        }
    }

    /// Takes the next piece from the queue. Ends the game if it cannot be placed.
    fn spawn(&mut self) {
        let kind = match self.state.queue.pop_front() {
            Some(kind) => kind,
            None => Tetromino::random(&mut self.rng),
        };
        self.fill_queue();

        let piece = ActivePiece::spawn(kind);
        if self.state.board.fits(&piece.shape, piece.x, piece.y) {
            debug!(kind = %kind, "Piece spawned");
            self.state.active = Some(piece);
        } else {
            info!(score = self.state.score, rows = self.state.rows, "Spawn blocked, game over");
            self.state.active = None;
            self.state.status = Status::Finished(Outcome::Lose);
        }
    }

    fn active(&self) -> Result<&ActivePiece, MoveError> {
        if self.state.status.is_terminal() {
            return Err(MoveError::GameOver);
        }
        self.state.active.as_ref().ok_or(MoveError::GameOver)
    }

    #[instrument(skip(self))]
    fn shift(&mut self, dx: i32) -> Result<(), MoveError> {
        let piece = self.active()?;
        if !self.state.board.fits(&piece.shape, piece.x + dx, piece.y) {
            return Err(MoveError::Blocked);
        }
        if let Some(piece) = self.state.active.as_mut() {
            piece.x += dx;
        }
        Ok(())
    }

    /// One row down; a blocked drop locks the piece instead.
    #[instrument(skip(self))]
    fn drop_one(&mut self) -> Result<(), MoveError> {
        let piece = self.active()?;
        if self.state.board.fits(&piece.shape, piece.x, piece.y + 1) {
            if let Some(piece) = self.state.active.as_mut() {
                piece.y += 1;
            }
        } else {
            self.lock();
        }
        Ok(())
    }

    #[instrument(skip(self))]
    fn hard_drop(&mut self) -> Result<(), MoveError> {
        let piece = self.active()?;
        let mut distance = 0;
        while self
            .state
            .board
            .fits(&piece.shape, piece.x, piece.y + distance + 1)
        {
            distance += 1;
        }
        if let Some(piece) = self.state.active.as_mut() {
            piece.y += distance;
        }
        debug!(distance, "Hard drop");
        self.lock();
        Ok(())
    }

    #[instrument(skip(self))]
    fn rotate(&mut self) -> Result<(), MoveError> {
        let piece = self.active()?;
        let rotated = piece.shape.rotated_cw();
        let x = if self.state.board.fits(&rotated, piece.x, piece.y) {
            Some(piece.x)
        } else {
            kick_offsets(rotated.size())
                .map(|dx| piece.x + dx)
                .find(|&x| self.state.board.fits(&rotated, x, piece.y))
        };
        let x = x.ok_or(MoveError::Blocked)?;
        if let Some(piece) = self.state.active.as_mut() {
            piece.shape = rotated;
            piece.rotation = (piece.rotation + 1) % 4;
            piece.x = x;
        }
        Ok(())
    }

    /// Merges the active piece, sweeps rows, scores and spawns the next piece.
    fn lock(&mut self) {
        let Some(piece) = self.state.active.take() else {
            return;
        };
        self.state
            .board
            .merge(&piece.shape, piece.kind, piece.x, piece.y);

        let cleared = self.state.board.sweep();
        if cleared > 0 {
            let points = ROW_POINTS[cleared.min(ROW_POINTS.len()) - 1] * self.state.level;
            self.state.score += points;
            self.state.rows += cleared as u32;
            debug!(cleared, points, score = self.state.score, "Rows cleared");

            let level = self.state.rows / ROWS_PER_LEVEL + 1;
            if level != self.state.level {
                self.state.level = level;
                info!(level, interval_ms = drop_interval(level).as_millis() as u64, "Level up");
            }
        }
        self.spawn();
    }
}

impl Default for Tetris {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for Tetris {
    type Command = TetrisCommand;

    fn game_id(&self) -> GameId {
        GameId::Tetris
    }

    #[instrument(skip(self))]
    fn apply(&mut self, command: TetrisCommand) -> Result<(), MoveError> {
        match command {
            TetrisCommand::MoveLeft => self.shift(-1),
            TetrisCommand::MoveRight => self.shift(1),
            TetrisCommand::SoftDrop => self.drop_one(),
            TetrisCommand::HardDrop => self.hard_drop(),
            TetrisCommand::RotateCw => self.rotate(),
        }
    }

    fn status(&self) -> Status {
        self.state.status
    }

    fn score(&self) -> u32 {
        self.state.score
    }

    #[instrument(skip(self))]
    fn reset(&mut self) {
        self.state = TetrisState::empty(Board::new());
        self.fill_queue();
        self.spawn();
    }
}

impl RealTime for Tetris {
    fn tick(&mut self) -> Result<(), MoveError> {
        self.drop_one()
    }

    fn tick_interval(&self) -> Duration {
        drop_interval(self.state.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tetris::board::HEIGHT;

    #[test]
    fn test_drop_interval_floors() {
        assert_eq!(drop_interval(1), Duration::from_millis(1000));
        assert_eq!(drop_interval(4), Duration::from_millis(700));
        assert_eq!(drop_interval(10), Duration::from_millis(100));
        assert_eq!(drop_interval(25), Duration::from_millis(100));
    }

    #[test]
    fn test_kick_offsets_alternate_and_grow() {
        let offsets: Vec<i32> = kick_offsets(3).collect();
        assert_eq!(offsets, vec![1, -1, 2, -2, 3, -3]);
    }

    #[test]
    fn test_spawn_position() {
        let game = Tetris::from_setup(Board::new(), [Tetromino::T], 1);
        let piece = game.state().active().clone().unwrap();
        assert_eq!(*piece.x(), 4);
        assert_eq!(*piece.y(), 0);
        assert_eq!(*piece.kind(), Tetromino::T);
    }

    #[test]
    fn test_move_into_wall_rejected() {
        let mut game = Tetris::from_setup(Board::new(), [Tetromino::O], 1);
        for _ in 0..SPAWN_X {
            game.apply(TetrisCommand::MoveLeft).unwrap();
        }
        let before = game.state().clone();
        assert_eq!(game.apply(TetrisCommand::MoveLeft), Err(MoveError::Blocked));
        assert_eq!(game.state(), &before);
    }

    #[test]
    fn test_gravity_lands_and_locks() {
        let mut game = Tetris::from_setup(Board::new(), [Tetromino::O], 1);
        for _ in 0..HEIGHT {
            game.tick().unwrap();
        }
        assert_eq!(game.state().board().filled_count(), 4);
        assert_eq!(game.state().board().get(4, HEIGHT - 1), Some(Tetromino::O));
    }

    #[test]
    fn test_rotation_kicks_off_right_wall() {
        let mut game = Tetris::from_setup(Board::new(), [Tetromino::I], 1);
        // Vertical I occupies matrix column 1; push it flush against the right wall.
        while game.apply(TetrisCommand::MoveRight).is_ok() {}
        let x_before = *game.state().active().as_ref().unwrap().x();
        game.apply(TetrisCommand::RotateCw).unwrap();
        let piece = game.state().active().clone().unwrap();
        assert_eq!(*piece.rotation(), 1);
        assert!(*piece.x() < x_before, "kick should move the piece left");
        assert!(game.state().board().fits(piece.shape(), *piece.x(), *piece.y()));
    }
}

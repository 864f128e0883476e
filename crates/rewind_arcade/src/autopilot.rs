//! Built-in players that stand in for the keyboard.

use rewind_engines::connect_four::{COLUMNS, Grid};
use rewind_engines::pong::{BALL_SIZE, PADDLE_HEIGHT, PaddleInput};
use rewind_engines::snake::{Cell, Direction};
use rewind_engines::tetris::{Board, HEIGHT, Shape, TetrisCommand, Tetromino, WIDTH};
use rewind_engines::tictactoe::{Difficulty, Mark, Position, candidate_moves};
use rewind_engines::{ConnectFour, Engine, Pong, Side, Snake, Tetris, TicTacToe};
use tracing::{debug, instrument};

/// Chooses the human's next command from the visible state.
pub trait Autopilot<E: Engine> {
    /// Next command, or `None` to leave the engine alone this step.
    fn next_command(&mut self, engine: &E) -> Option<E::Command>;
}

// ─────────────────────────────────────────────────────────────
//  Tetris
// ─────────────────────────────────────────────────────────────

const HOLE_PENALTY: i32 = 8;
const HEIGHT_PENALTY: i32 = 2;
const CLEAR_BONUS: i32 = 20;

/// Places each piece where it leaves the stack lowest with the fewest holes.
#[derive(Debug, Clone, Copy, Default)]
pub struct TetrisPilot;

/// Rotation count and column a piece should lock in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Clockwise quarter turns from the spawn orientation.
    pub rotation: u8,
    /// Column of the shape's bounding box.
    pub x: i32,
}

impl TetrisPilot {
    /// Best landing spot for `shape` on `board`, if any orientation fits.
    #[instrument(skip_all)]
    pub fn plan(board: &Board, shape: &Shape) -> Option<Placement> {
        let mut best: Option<(i32, Placement)> = None;
        let mut rotated = shape.clone();
        for rotation in 0..4u8 {
            let size = rotated.size() as i32;
            for x in -size..WIDTH as i32 {
                if !board.fits(&rotated, x, 0) {
                    continue;
                }
                let mut y = 0;
                while board.fits(&rotated, x, y + 1) {
                    y += 1;
                }
                let rating = rate_landing(board, &rotated, x, y);
                if best.is_none_or(|(top, _)| rating > top) {
                    best = Some((rating, Placement { rotation, x }));
                }
            }
            rotated = rotated.rotated_cw();
        }
        best.map(|(_, placement)| placement)
    }
}

fn rate_landing(board: &Board, shape: &Shape, x: i32, y: i32) -> i32 {
    let mut after = board.clone();
    after.merge(shape, Tetromino::I, x, y);
    let cleared = after.sweep() as i32;
    cleared * CLEAR_BONUS - after.height() as i32 * HEIGHT_PENALTY - holes(&after) * HOLE_PENALTY
}

fn holes(board: &Board) -> i32 {
    let mut count = 0;
    for x in 0..WIDTH {
        let mut covered = false;
        for y in 0..HEIGHT {
            match board.get(x, y) {
                Some(_) => covered = true,
                None if covered => count += 1,
                None => {}
            }
        }
    }
    count
}

impl Autopilot<Tetris> for TetrisPilot {
    fn next_command(&mut self, engine: &Tetris) -> Option<TetrisCommand> {
        let piece = engine.state().active().as_ref()?;
        let spawn_shape = piece.kind().shape();
        let target = Self::plan(engine.state().board(), &spawn_shape)?;
        let command = if *piece.rotation() != target.rotation {
            TetrisCommand::RotateCw
        } else if *piece.x() < target.x {
            TetrisCommand::MoveRight
        } else if *piece.x() > target.x {
            TetrisCommand::MoveLeft
        } else {
            TetrisCommand::HardDrop
        };
        debug!(?target, ?command, "Tetris pilot");
        Some(command)
    }
}

// ─────────────────────────────────────────────────────────────
//  Snake
// ─────────────────────────────────────────────────────────────

/// Heads for the food along the shortest safe step.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnakePilot;

impl Autopilot<Snake> for SnakePilot {
    fn next_command(&mut self, engine: &Snake) -> Option<Direction> {
        let state = engine.state();
        let head = state.head();
        let tail = state.body().back().copied();
        let food = *state.food();

        let safe = |cell: Cell| {
            let vacated = tail == Some(cell) && food != Some(cell);
            cell.in_bounds() && (!state.occupies(cell) || vacated)
        };
        let distance = |cell: Cell| match food {
            Some(f) => (f.x - cell.x).abs() + (f.y - cell.y).abs(),
            None => 0,
        };

        let choice = Direction::ALL
            .into_iter()
            .filter(|&d| d != state.heading().opposite())
            .filter(|&d| safe(head.step(d)))
            .min_by_key(|&d| distance(head.step(d)))?;
        (choice != *state.pending()).then_some(choice)
    }
}

// ─────────────────────────────────────────────────────────────
//  Pong
// ─────────────────────────────────────────────────────────────

/// Keeps the paddle centered on the ball.
#[derive(Debug, Clone, Copy, Default)]
pub struct PongPilot;

impl Autopilot<Pong> for PongPilot {
    fn next_command(&mut self, engine: &Pong) -> Option<PaddleInput> {
        let state = engine.state();
        let ball_center = state.ball().y() + BALL_SIZE / 2;
        let paddle_center = state.player_y() + PADDLE_HEIGHT / 2;
        let slack = PADDLE_HEIGHT / 4;
        let input = if ball_center < paddle_center - slack {
            PaddleInput::Up
        } else if ball_center > paddle_center + slack {
            PaddleInput::Down
        } else {
            PaddleInput::Idle
        };
        (input != engine.input()).then_some(input)
    }
}

// ─────────────────────────────────────────────────────────────
//  Connect Four
// ─────────────────────────────────────────────────────────────

/// Wins when it can, blocks when it must, otherwise plays near the center.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectFourPilot;

impl ConnectFourPilot {
    fn completes_run(grid: &Grid, col: usize, side: Side) -> bool {
        let mut trial = grid.clone();
        trial.drop_disc(col, side).is_ok() && trial.winner() == Some(side)
    }
}

impl Autopilot<ConnectFour> for ConnectFourPilot {
    fn next_command(&mut self, engine: &ConnectFour) -> Option<usize> {
        if engine.is_terminal() {
            return None;
        }
        let grid = engine.grid();
        let legal = grid.legal_columns();
        let center = COLUMNS / 2;

        legal
            .iter()
            .copied()
            .find(|&c| Self::completes_run(grid, c, Side::Human))
            .or_else(|| {
                legal
                    .iter()
                    .copied()
                    .find(|&c| Self::completes_run(grid, c, Side::Opponent))
            })
            .or_else(|| legal.iter().copied().min_by_key(|&c| c.abs_diff(center)))
    }
}

// ─────────────────────────────────────────────────────────────
//  Tic-Tac-Toe
// ─────────────────────────────────────────────────────────────

/// Plays the human's side with the hard opponent's preference list.
#[derive(Debug, Clone, Copy, Default)]
pub struct TicTacToePilot;

impl Autopilot<TicTacToe> for TicTacToePilot {
    fn next_command(&mut self, engine: &TicTacToe) -> Option<Position> {
        if engine.is_terminal() {
            return None;
        }
        candidate_moves(engine.state().board(), Mark::X, Difficulty::Hard)
            .first()
            .copied()
    }
}

//! Tic-tac-toe session: human X against the AI's O.

use super::ai::{self, Difficulty};
use super::position::Position;
use super::rules::{check_winner, is_full};
use super::types::{Board, Mark, Square};
use crate::engine::{Engine, GameId, MoveError, Outcome, Side, Status, TurnBased};
use crate::rng::{self, ArcadeRng};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Board, turn and result of a tic-tac-toe match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GameState {
    board: Board,
    to_move: Mark,
    status: Status,
    history: Vec<Position>,
}

impl GameState {
    /// Creates a fresh match with X to move.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            to_move: Mark::X,
            status: Status::Ongoing,
            history: Vec::new(),
        }
    }

    /// Places `mark` and settles win or draw. Caller has validated the move.
    fn apply_move(&mut self, pos: Position, mark: Mark) {
        self.board.set(pos, Square::Occupied(mark));
        self.history.push(pos);

        if let Some(winner) = check_winner(&self.board) {
            self.status = Status::Finished(Outcome::for_winner(winner.side()));
        } else if is_full(&self.board) {
            self.status = Status::Finished(Outcome::Draw);
        } else {
            self.to_move = mark.opponent();
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// A tic-tac-toe match against an AI of randomly drawn difficulty.
#[derive(Debug, Clone)]
pub struct TicTacToe {
    state: GameState,
    difficulty: Difficulty,
    rng: ArcadeRng,
}

impl TicTacToe {
    /// Starts a match with an OS-seeded opponent.
    #[instrument]
    pub fn new() -> Self {
        Self::with_rng(rng::from_entropy())
    }

    /// Starts a deterministic match.
    #[instrument]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(rng::seeded(seed))
    }

    /// Starts a match, drawing the difficulty and AI moves from `rng`.
    pub fn with_rng(mut rng: ArcadeRng) -> Self {
        let difficulty = Difficulty::random(&mut rng);
        info!(%difficulty, "Tic-tac-toe opponent drawn");
        Self {
            state: GameState::new(),
            difficulty,
            rng,
        }
    }

    /// Starts a match against a fixed difficulty.
    #[instrument]
    pub fn with_difficulty(difficulty: Difficulty, seed: u64) -> Self {
        Self {
            state: GameState::new(),
            difficulty,
            rng: rng::seeded(seed),
        }
    }

    /// Current match state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Opponent strength for this match.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Places `mark` at `pos`.
    #[instrument(skip(self), fields(position = %pos))]
    pub fn place(&mut self, mark: Mark, pos: Position) -> Result<(), MoveError> {
        if self.state.status.is_terminal() {
            return Err(MoveError::GameOver);
        }
        if mark != self.state.to_move {
            return Err(MoveError::NotYourTurn(mark.side()));
        }
        if !self.state.board.is_empty(pos) {
            return Err(MoveError::SquareOccupied(pos.to_index()));
        }
        self.state.apply_move(pos, mark);
        debug!(%mark, status = %self.state.status, "Mark placed");
        Ok(())
    }

    /// Places the human's mark by board index (0-8).
    pub fn play_index(&mut self, index: usize) -> Result<(), MoveError> {
        let pos = Position::from_index(index).ok_or(MoveError::OutOfBounds(index))?;
        self.place(Mark::X, pos)
    }
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for TicTacToe {
    type Command = Position;

    fn game_id(&self) -> GameId {
        GameId::TicTacToe
    }

    fn apply(&mut self, pos: Position) -> Result<(), MoveError> {
        self.place(Mark::X, pos)
    }

    fn status(&self) -> Status {
        self.state.status
    }

    fn score(&self) -> u32 {
        0
    }

    /// Clears the board and draws a new difficulty.
    #[instrument(skip(self))]
    fn reset(&mut self) {
        self.state = GameState::new();
        self.difficulty = Difficulty::random(&mut self.rng);
        info!(difficulty = %self.difficulty, "Tic-tac-toe reset");
    }
}

impl TurnBased for TicTacToe {
    fn to_move(&self) -> Side {
        self.state.to_move.side()
    }

    #[instrument(skip(self), fields(difficulty = %self.difficulty))]
    fn reply(&mut self) -> Result<(), MoveError> {
        if self.state.status.is_terminal() {
            return Err(MoveError::GameOver);
        }
        if self.state.to_move != Mark::O {
            return Err(MoveError::NotYourTurn(Side::Opponent));
        }
        let pos = ai::choose_move(&self.state.board, Mark::O, self.difficulty, &mut self.rng)
            .ok_or(MoveError::NoLegalMoves)?;
        self.place(Mark::O, pos)
    }
}

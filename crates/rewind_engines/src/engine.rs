//! Shared vocabulary for every engine: game identity, turn sides, match
//! status and the traits a host drives engines through.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::instrument;

/// Reward handed to the score gateway when the human wins a turn-based game.
pub const WIN_REWARD: u32 = 100;

/// Identifies a game type. The string form is the gateway's `gameId`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GameId {
    /// Falling tetrominoes.
    Tetris,
    /// Growing snake chasing food.
    Snake,
    /// Paddle and ball against a tracking opponent.
    Pong,
    /// Gravity four-in-a-row.
    #[serde(rename = "connect4")]
    #[strum(serialize = "connect4")]
    ConnectFour,
    /// Three-in-a-row against the heuristic AI.
    TicTacToe,
}

impl GameId {
    /// Human readable title.
    pub fn title(self) -> &'static str {
        match self {
            GameId::Tetris => "Tetris",
            GameId::Snake => "Snake",
            GameId::Pong => "Pong",
            GameId::ConnectFour => "Connect 4",
            GameId::TicTacToe => "Tic-Tac-Toe",
        }
    }

    /// Whether the game alternates between the human and an opponent.
    pub fn is_turn_based(self) -> bool {
        matches!(self, GameId::ConnectFour | GameId::TicTacToe)
    }
}

/// Whose move it is in a turn-based game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The player at the keyboard. Always moves first.
    Human,
    /// The built-in opponent.
    Opponent,
}

impl Side {
    /// Returns the other side.
    pub fn other(self) -> Self {
        match self {
            Side::Human => Side::Opponent,
            Side::Opponent => Side::Human,
        }
    }
}

/// Terminal result, always from the human's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Outcome {
    /// The human won.
    Win,
    /// The human lost (or the single-player session ended).
    Lose,
    /// Nobody won.
    Draw,
}

impl Outcome {
    /// Maps a winning side to the human-perspective outcome.
    pub fn for_winner(winner: Side) -> Self {
        match winner {
            Side::Human => Outcome::Win,
            Side::Opponent => Outcome::Lose,
        }
    }
}

/// Match status. `Finished` is absorbing until the engine is reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The session accepts commands.
    Ongoing,
    /// The session is over.
    Finished(Outcome),
}

impl Status {
    /// True once the match has a result.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Finished(_))
    }

    /// The outcome, if the match is over.
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            Status::Ongoing => None,
            Status::Finished(outcome) => Some(*outcome),
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Ongoing => write!(f, "ongoing"),
            Status::Finished(outcome) => write!(f, "finished ({})", outcome),
        }
    }
}

/// Why an engine refused a command. The engine state is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The match is already over.
    #[display("Game is already over")]
    GameOver,

    /// A turn-based command arrived out of turn.
    #[display("It's not {:?}'s turn", _0)]
    NotYourTurn(Side),

    /// The piece would leave the field or overlap settled cells.
    #[display("Placement is blocked")]
    Blocked,

    /// The snake cannot turn back into its own neck.
    #[display("Cannot reverse heading")]
    ReverseHeading,

    /// The cell is outside the board.
    #[display("Cell {} is out of bounds", _0)]
    OutOfBounds(usize),

    /// The tic-tac-toe square is taken.
    #[display("Square {} is already occupied", _0)]
    SquareOccupied(usize),

    /// The connect-four column has no free cell.
    #[display("Column {} is full", _0)]
    ColumnFull(usize),

    /// The opponent had no legal move to make.
    #[display("No legal moves available")]
    NoLegalMoves,
}

impl std::error::Error for MoveError {}

/// A self-contained game simulation owned by exactly one session.
pub trait Engine {
    /// Discrete input accepted from the human.
    type Command: Copy + std::fmt::Debug;

    /// Which game this engine simulates.
    fn game_id(&self) -> GameId;

    /// Applies one human command. Errors leave the state untouched.
    fn apply(&mut self, command: Self::Command) -> Result<(), MoveError>;

    /// Current match status.
    fn status(&self) -> Status;

    /// Points accumulated so far.
    fn score(&self) -> u32;

    /// Re-initializes the session. Random elements are drawn afresh.
    fn reset(&mut self);

    /// True once the match has a result.
    fn is_terminal(&self) -> bool {
        self.status().is_terminal()
    }

    /// Points to hand to the score gateway at the terminal transition,
    /// or `None` when there is nothing worth recording.
    #[instrument(skip(self))]
    fn submittable_points(&self) -> Option<u32> {
        if !self.is_terminal() {
            return None;
        }
        if self.game_id().is_turn_based() {
            (self.status() == Status::Finished(Outcome::Win)).then_some(WIN_REWARD)
        } else {
            let score = self.score();
            (score > 0).then_some(score)
        }
    }
}

/// Engines advanced by a host timer.
pub trait RealTime: Engine {
    /// Advances the simulation by one timer tick.
    fn tick(&mut self) -> Result<(), MoveError>;

    /// How long the host waits between ticks at the current difficulty.
    fn tick_interval(&self) -> Duration;
}

/// Engines where the human and the opponent alternate.
pub trait TurnBased: Engine {
    /// Side allowed to act next.
    fn to_move(&self) -> Side;

    /// Lets the opponent make its move.
    fn reply(&mut self) -> Result<(), MoveError>;
}

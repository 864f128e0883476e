//! Pong: one paddle each, first to ten goals.
//!
//! Coordinates are integer pixels with the origin at the top-left corner.
//! The simulation runs in fixed 60 Hz frames; [`Pong::advance`] converts
//! wall-clock time into frames with an accumulator.

use crate::engine::{Engine, GameId, MoveError, Outcome, RealTime, Side, Status};
use crate::rng::{self, ArcadeRng};
use derive_getters::Getters;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Field width.
pub const FIELD_WIDTH: i32 = 600;
/// Field height.
pub const FIELD_HEIGHT: i32 = 400;
/// Paddle width.
pub const PADDLE_WIDTH: i32 = 10;
/// Paddle height.
pub const PADDLE_HEIGHT: i32 = 60;
/// Side of the square ball.
pub const BALL_SIZE: i32 = 10;
/// Human paddle travel per frame.
pub const PLAYER_SPEED: i32 = 14;
/// Opponent paddle travel per frame.
pub const AI_SPEED: i32 = 4;
/// Ball travel per frame on each axis.
pub const BALL_SPEED: i32 = 6;
/// Goals needed to finish the match.
pub const WIN_SCORE: u32 = 10;
/// Left edge of the human paddle.
pub const PLAYER_X: i32 = 10;
/// Left edge of the opponent paddle.
pub const AI_X: i32 = FIELD_WIDTH - 20;
/// Simulation frame length.
pub const FRAME: Duration = Duration::from_micros(16_667);
/// Frames in each of the "ready" and "go" pauses after a goal.
pub const PAUSE_FRAMES: u32 = 60;

const PADDLE_REST: i32 = FIELD_HEIGHT / 2 - PADDLE_HEIGHT / 2;

/// Held direction of the human paddle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaddleInput {
    /// Towards y = 0.
    Up,
    /// Towards the bottom edge.
    Down,
    /// Stay put.
    #[default]
    Idle,
}

/// Ball position and per-frame velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Ball {
    x: i32,
    y: i32,
    dx: i32,
    dy: i32,
}

impl Ball {
    fn centered(dx: i32, dy: i32) -> Self {
        Self {
            x: FIELD_WIDTH / 2,
            y: FIELD_HEIGHT / 2,
            dx,
            dy,
        }
    }

    fn center_y(&self) -> i32 {
        self.y + BALL_SIZE / 2
    }

    fn overlaps_paddle(&self, paddle_y: i32) -> bool {
        self.y + BALL_SIZE > paddle_y && self.y < paddle_y + PADDLE_HEIGHT
    }
}

/// Where the rally stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Ball in play.
    Live,
    /// First pause after a goal, with frames remaining.
    Ready(u32),
    /// Second pause after a goal, with frames remaining.
    Go(u32),
}

/// Everything a renderer needs to draw a Pong match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct PongState {
    player_y: i32,
    ai_y: i32,
    ball: Ball,
    player_score: u32,
    ai_score: u32,
    phase: Phase,
    serve_dx: i32,
    status: Status,
}

impl PongState {
    fn kickoff() -> Self {
        Self {
            player_y: PADDLE_REST,
            ai_y: PADDLE_REST,
            ball: Ball::centered(BALL_SPEED, BALL_SPEED),
            player_score: 0,
            ai_score: 0,
            phase: Phase::Live,
            serve_dx: BALL_SPEED,
            status: Status::Ongoing,
        }
    }
}

impl std::fmt::Display for PongState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // One character covers 10x20 pixels.
        const COLS: i32 = FIELD_WIDTH / 10;
        const ROWS: i32 = FIELD_HEIGHT / 20;
        for row in 0..ROWS {
            let (top, bottom) = (row * 20, row * 20 + 20);
            for col in 0..COLS {
                let x = col * 10;
                let paddle = |px: i32, py: i32| {
                    x == px && py < bottom && py + PADDLE_HEIGHT > top
                };
                let c = if paddle(PLAYER_X, self.player_y) || paddle(AI_X, self.ai_y) {
                    '|'
                } else if self.ball.x / 10 == col && self.ball.y / 20 == row {
                    'o'
                } else if col == COLS / 2 {
                    ':'
                } else {
                    ' '
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "you {}  cpu {}", self.player_score, self.ai_score)
    }
}

/// A Pong match against a paddle that tracks the ball.
#[derive(Debug, Clone)]
pub struct Pong {
    state: PongState,
    input: PaddleInput,
    accumulator: Duration,
    rng: ArcadeRng,
}

impl Pong {
    /// Starts a match with an OS-seeded random source.
    #[instrument]
    pub fn new() -> Self {
        Self::with_rng(rng::from_entropy())
    }

    /// Starts a deterministic match.
    #[instrument]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(rng::seeded(seed))
    }

    /// Starts a match drawing serve angles from `rng`.
    pub fn with_rng(rng: ArcadeRng) -> Self {
        Self {
            state: PongState::kickoff(),
            input: PaddleInput::Idle,
            accumulator: Duration::ZERO,
            rng,
        }
    }

    /// Current match state.
    pub fn state(&self) -> &PongState {
        &self.state
    }

    /// Currently held paddle input.
    pub fn input(&self) -> PaddleInput {
        self.input
    }

    /// Runs as many whole frames as `dt` (plus leftover time) covers.
    ///
    /// Returns the number of frames simulated.
    #[instrument(skip(self))]
    pub fn advance(&mut self, dt: Duration, input: PaddleInput) -> Result<u32, MoveError> {
        if self.state.status.is_terminal() {
            return Err(MoveError::GameOver);
        }
        self.input = input;
        self.accumulator += dt;
        let mut frames = 0;
        while self.accumulator >= FRAME && !self.state.status.is_terminal() {
            self.accumulator -= FRAME;
            self.step(input)?;
            frames += 1;
        }
        Ok(frames)
    }

    /// Simulates exactly one frame.
    pub fn step(&mut self, input: PaddleInput) -> Result<(), MoveError> {
        if self.state.status.is_terminal() {
            return Err(MoveError::GameOver);
        }

        match self.state.phase {
            Phase::Ready(left) if left > 1 => {
                self.state.phase = Phase::Ready(left - 1);
                return Ok(());
            }
            Phase::Ready(_) => {
                self.state.phase = Phase::Go(PAUSE_FRAMES);
                return Ok(());
            }
            Phase::Go(left) if left > 1 => {
                self.state.phase = Phase::Go(left - 1);
                return Ok(());
            }
            Phase::Go(_) => {
                self.launch();
                return Ok(());
            }
            Phase::Live => {}
        }

        self.move_opponent();
        self.move_player(input);
        self.move_ball();
        Ok(())
    }

    /// Credits a goal to `scorer` and sets up the next rally.
    #[instrument(skip(self))]
    pub fn award_point(&mut self, scorer: Side) {
        if self.state.status.is_terminal() {
            return;
        }
        let s = &mut self.state;
        match scorer {
            Side::Human => s.player_score += 1,
            Side::Opponent => s.ai_score += 1,
        }
        s.player_y = PADDLE_REST;
        s.ai_y = PADDLE_REST;
        s.ball = Ball::centered(0, 0);
        debug!(player = s.player_score, ai = s.ai_score, ?scorer, "Goal");

        if s.player_score >= WIN_SCORE || s.ai_score >= WIN_SCORE {
            let winner = if s.player_score >= WIN_SCORE {
                Side::Human
            } else {
                Side::Opponent
            };
            s.status = Status::Finished(Outcome::for_winner(winner));
            s.phase = Phase::Live;
            info!(player = s.player_score, ai = s.ai_score, status = %s.status, "Match over");
            return;
        }

        // Serve towards whoever conceded.
        s.serve_dx = match scorer {
            Side::Human => BALL_SPEED,
            Side::Opponent => -BALL_SPEED,
        };
        s.phase = Phase::Ready(PAUSE_FRAMES);
    }

    fn launch(&mut self) {
        let dy = if self.rng.gen_bool(0.5) {
            BALL_SPEED
        } else {
            -BALL_SPEED
        };
        self.state.ball = Ball::centered(self.state.serve_dx, dy);
        self.state.phase = Phase::Live;
        debug!(dx = self.state.serve_dx, dy, "Serve");
    }

    fn move_opponent(&mut self) {
        let target = self.state.ball.center_y();
        let center = self.state.ai_y + PADDLE_HEIGHT / 2;
        let delta = (target - center).clamp(-AI_SPEED, AI_SPEED);
        self.state.ai_y = (self.state.ai_y + delta).clamp(0, FIELD_HEIGHT - PADDLE_HEIGHT);
    }

    fn move_player(&mut self, input: PaddleInput) {
        let delta = match input {
            PaddleInput::Up => -PLAYER_SPEED,
            PaddleInput::Down => PLAYER_SPEED,
            PaddleInput::Idle => 0,
        };
        self.state.player_y =
            (self.state.player_y + delta).clamp(0, FIELD_HEIGHT - PADDLE_HEIGHT);
    }

    fn move_ball(&mut self) {
        let (player_y, ai_y) = (self.state.player_y, self.state.ai_y);
        let ball = &mut self.state.ball;
        ball.x += ball.dx;
        ball.y += ball.dy;

        if (ball.y <= 0 && ball.dy < 0) || (ball.y + BALL_SIZE >= FIELD_HEIGHT && ball.dy > 0) {
            ball.dy = -ball.dy;
        }

        let at_player_plane =
            ball.x <= PLAYER_X + PADDLE_WIDTH && ball.x + BALL_SIZE >= PLAYER_X;
        if ball.dx < 0 && at_player_plane && ball.overlaps_paddle(player_y) {
            ball.dx = -ball.dx;
        }

        let at_ai_plane = ball.x + BALL_SIZE >= AI_X && ball.x <= AI_X + PADDLE_WIDTH;
        if ball.dx > 0 && at_ai_plane && ball.overlaps_paddle(ai_y) {
            ball.dx = -ball.dx;
        }

        if ball.x < 0 {
            self.award_point(Side::Opponent);
        } else if ball.x > FIELD_WIDTH {
            self.award_point(Side::Human);
        }
    }
}

impl Default for Pong {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for Pong {
    type Command = PaddleInput;

    fn game_id(&self) -> GameId {
        GameId::Pong
    }

    /// Sets the held input used by subsequent ticks.
    fn apply(&mut self, command: PaddleInput) -> Result<(), MoveError> {
        if self.state.status.is_terminal() {
            return Err(MoveError::GameOver);
        }
        self.input = command;
        Ok(())
    }

    fn status(&self) -> Status {
        self.state.status
    }

    fn score(&self) -> u32 {
        self.state.player_score
    }

    #[instrument(skip(self))]
    fn reset(&mut self) {
        self.state = PongState::kickoff();
        self.input = PaddleInput::Idle;
        self.accumulator = Duration::ZERO;
    }
}

impl RealTime for Pong {
    fn tick(&mut self) -> Result<(), MoveError> {
        self.step(self.input)
    }

    fn tick_interval(&self) -> Duration {
        FRAME
    }
}

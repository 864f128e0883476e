//! Snake: a chain of cells that grows when it eats.

use crate::engine::{Engine, GameId, MoveError, Outcome, RealTime, Status};
use crate::rng::{self, ArcadeRng};
use derive_getters::Getters;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Grid width in cells.
pub const GRID_WIDTH: i32 = 24;
/// Grid height in cells.
pub const GRID_HEIGHT: i32 = 16;
/// Points per food eaten.
pub const FOOD_POINTS: u32 = 10;
/// Time between ticks.
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);
/// Starting body, head first.
pub const START_BODY: [Cell; 2] = [Cell::new(12, 7), Cell::new(12, 8)];
/// Where the first food appears.
pub const START_FOOD: Cell = Cell::new(12, 3);

/// A grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// Column, 0 at the left.
    pub x: i32,
    /// Row, 0 at the top.
    pub y: i32,
}

impl Cell {
    /// Creates a cell.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// True when the cell lies on the grid.
    pub fn in_bounds(self) -> bool {
        (0..GRID_WIDTH).contains(&self.x) && (0..GRID_HEIGHT).contains(&self.y)
    }

    /// The neighbouring cell in `direction`, possibly off the grid.
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Heading of the snake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Towards row 0.
    Up,
    /// Away from row 0.
    Down,
    /// Towards column 0.
    Left,
    /// Away from column 0.
    Right,
}

impl Direction {
    /// Every heading.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit step `(dx, dy)`.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// The 180 degree reverse.
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnakeStep {
    /// Head advanced, tail followed.
    Moved,
    /// Head reached food; the body grew.
    Ate,
    /// Head hit a wall or the body; the session ended.
    Collided,
    /// The body covers the whole grid; the session ended.
    Filled,
}

/// Everything a renderer needs to draw a Snake session.
///
/// The body is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct SnakeState {
    body: VecDeque<Cell>,
    heading: Direction,
    pending: Direction,
    food: Option<Cell>,
    score: u32,
    status: Status,
}

impl SnakeState {
    fn initial() -> Self {
        Self {
            body: START_BODY.into_iter().collect(),
            heading: Direction::Up,
            pending: Direction::Up,
            food: Some(START_FOOD),
            score: 0,
            status: Status::Ongoing,
        }
    }

    /// Head cell.
    pub fn head(&self) -> Cell {
        self.body[0]
    }

    /// True when `cell` is covered by the body.
    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }
}

impl std::fmt::Display for SnakeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..GRID_HEIGHT {
            for x in 0..GRID_WIDTH {
                let cell = Cell::new(x, y);
                let c = if self.body.front() == Some(&cell) {
                    '@'
                } else if self.occupies(cell) {
                    'o'
                } else if self.food == Some(cell) {
                    '*'
                } else {
                    '.'
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "score {}  length {}", self.score, self.body.len())
    }
}

/// A Snake session.
#[derive(Debug, Clone)]
pub struct Snake {
    state: SnakeState,
    rng: ArcadeRng,
}

impl Snake {
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

    /// Starts a session placing food with `rng`.
    pub fn with_rng(rng: ArcadeRng) -> Self {
        Self {
            state: SnakeState::initial(),
            rng,
        }
    }

    /// Starts from an arbitrary body (head first). Used for scripted positions.
    ///
    /// Returns `None` for an empty body.
    #[instrument(skip(body))]
    pub fn from_body(
        body: impl IntoIterator<Item = Cell>,
        heading: Direction,
        food: Cell,
        seed: u64,
    ) -> Option<Self> {
        let body: VecDeque<Cell> = body.into_iter().collect();
        if body.is_empty() {
            return None;
        }
        Some(Self {
            state: SnakeState {
                body,
                heading,
                pending: heading,
                food: Some(food),
                score: 0,
                status: Status::Ongoing,
            },
            rng: rng::seeded(seed),
        })
    }

    /// Current session state.
    pub fn state(&self) -> &SnakeState {
        &self.state
    }

    /// Queues a direction change for the next tick.
    ///
    /// Turning straight back onto the neck is refused.
    #[instrument(skip(self))]
    pub fn steer(&mut self, direction: Direction) -> Result<(), MoveError> {
        if self.state.status.is_terminal() {
            return Err(MoveError::GameOver);
        }
        if direction == self.state.heading.opposite() {
            return Err(MoveError::ReverseHeading);
        }
        self.state.pending = direction;
        Ok(())
    }

    /// Moves the snake one cell.
    #[instrument(skip(self))]
    pub fn advance(&mut self) -> Result<SnakeStep, MoveError> {
        if self.state.status.is_terminal() {
            return Err(MoveError::GameOver);
        }

        let direction = self.state.pending;
        let head = self.state.head().step(direction);
        let grows = self.state.food == Some(head);

        // The tail cell is vacated this tick unless the snake grows.
        let solid = if grows {
            self.state.body.len()
        } else {
            self.state.body.len() - 1
        };
        let hits_body = self.state.body.iter().take(solid).any(|&c| c == head);

        if !head.in_bounds() || hits_body {
            info!(score = self.state.score, head = ?head, "Snake collided");
            self.state.status = Status::Finished(Outcome::Lose);
            return Ok(SnakeStep::Collided);
        }

        self.state.heading = direction;
        self.state.body.push_front(head);

        if grows {
            self.state.score += FOOD_POINTS;
            debug!(score = self.state.score, length = self.state.body.len(), "Food eaten");
            if self.place_food() {
                Ok(SnakeStep::Ate)
            } else {
                info!(score = self.state.score, "Grid filled");
                self.state.status = Status::Finished(Outcome::Win);
                Ok(SnakeStep::Filled)
            }
        } else {
            self.state.body.pop_back();
            Ok(SnakeStep::Moved)
        }
    }

    /// Chooses a new food cell uniformly among the free cells.
    /// Returns false when no cell is free.
    fn place_food(&mut self) -> bool {
        let free: Vec<Cell> = (0..GRID_HEIGHT)
            .flat_map(|y| (0..GRID_WIDTH).map(move |x| Cell::new(x, y)))
            .filter(|&c| !self.state.occupies(c))
            .collect();
        self.state.food = free.choose(&mut self.rng).copied();
        self.state.food.is_some()
    }
}

impl Default for Snake {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for Snake {
    type Command = Direction;

    fn game_id(&self) -> GameId {
        GameId::Snake
    }

    fn apply(&mut self, command: Direction) -> Result<(), MoveError> {
        self.steer(command)
    }

    fn status(&self) -> Status {
        self.state.status
    }

    fn score(&self) -> u32 {
        self.state.score
    }

    #[instrument(skip(self))]
    fn reset(&mut self) {
        self.state = SnakeState::initial();
    }
}

impl RealTime for Snake {
    fn tick(&mut self) -> Result<(), MoveError> {
        self.advance().map(|_| ())
    }

    fn tick_interval(&self) -> Duration {
        TICK_INTERVAL
    }
}

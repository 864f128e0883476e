//! Tetris: a 12x20 well, seven tetrominoes, line sweeps and levels.

mod board;
mod game;
mod piece;

pub use board::{Board, HEIGHT, WIDTH};
pub use game::{
    ActivePiece, BASE_DROP_INTERVAL, LOOKAHEAD, MIN_DROP_INTERVAL, ROW_POINTS, ROWS_PER_LEVEL,
    SPAWN_X, Tetris, TetrisCommand, TetrisState, drop_interval,
};
pub use piece::{Shape, Tetromino};

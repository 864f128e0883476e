//! Tests for Tetris locking, sweeping and game over.

use rand::Rng;
use rewind_engines::tetris::{
    Board, HEIGHT, ROW_POINTS, TetrisCommand, Tetromino, WIDTH, drop_interval,
};
use rewind_engines::{Engine, MoveError, Outcome, RealTime, Status, Tetris, rng};
use std::time::Duration;

#[test]
fn test_vertical_i_clears_four_rows() {
    let board = Board::from_rows(&[
        "###########.",
        "###########.",
        "###########.",
        "###########.",
    ]);
    let mut game = Tetris::from_setup(board, [Tetromino::I], 1);
    for _ in 0..6 {
        game.apply(TetrisCommand::MoveRight).expect("Shift failed");
    }
    game.apply(TetrisCommand::HardDrop).expect("Drop failed");

    assert_eq!(game.state().board().filled_count(), 0);
    assert_eq!(*game.state().rows(), 4);
    assert_eq!(game.score(), ROW_POINTS[3]);
    assert_eq!(game.state().board().height(), HEIGHT);
}

#[test]
fn test_lock_conserves_cells() {
    let mut game = Tetris::with_seed(42);
    let mut moves = rng::seeded(7);

    for _ in 0..300 {
        if game.is_terminal() {
            break;
        }
        let rotations = moves.gen_range(0..4);
        for _ in 0..rotations {
            let _ = game.apply(TetrisCommand::RotateCw);
        }
        let shift: i32 = moves.gen_range(-6..=6);
        let command = if shift < 0 {
            TetrisCommand::MoveLeft
        } else {
            TetrisCommand::MoveRight
        };
        for _ in 0..shift.abs() {
            let _ = game.apply(command);
        }

        let cells_before = game.state().board().filled_count();
        let rows_before = *game.state().rows();
        game.apply(TetrisCommand::HardDrop).expect("Drop failed");
        let cleared = (*game.state().rows() - rows_before) as usize;

        assert_eq!(
            game.state().board().filled_count(),
            cells_before + 4 - cleared * WIDTH,
            "cleared {cleared} rows"
        );
        assert_eq!(game.state().board().height(), HEIGHT);
    }
}

#[test]
fn test_stacking_in_one_column_ends_game() {
    let mut game = Tetris::with_seed(3);
    let mut drops = 0;
    while !game.is_terminal() && drops < 100 {
        game.apply(TetrisCommand::HardDrop).expect("Drop failed");
        drops += 1;
    }
    assert_eq!(game.status(), Status::Finished(Outcome::Lose));
    assert!(game.state().active().is_none());
    assert_eq!(game.apply(TetrisCommand::MoveLeft), Err(MoveError::GameOver));
    assert_eq!(game.tick(), Err(MoveError::GameOver));
    // Nothing cleared, so nothing to submit.
    assert_eq!(game.submittable_points(), None);
}

#[test]
fn test_blocked_spawn_is_immediate_game_over() {
    let rows = vec!["#####.######"; HEIGHT];
    let game = Tetris::from_setup(Board::from_rows(&rows), [Tetromino::T], 1);
    assert_eq!(game.status(), Status::Finished(Outcome::Lose));
}

#[test]
fn test_soft_drop_moves_one_row() {
    let mut game = Tetris::from_setup(Board::new(), [Tetromino::O], 1);
    game.apply(TetrisCommand::SoftDrop).expect("Drop failed");
    let piece = game.state().active().clone().expect("Piece missing");
    assert_eq!(*piece.y(), 1);
}

/// Slides the vertical I into the right-hand well and drops it.
fn drop_into_well(game: &mut Tetris) {
    for _ in 0..6 {
        game.apply(TetrisCommand::MoveRight).expect("Shift failed");
    }
    game.apply(TetrisCommand::HardDrop).expect("Drop failed");
}

#[test]
fn test_level_multiplies_row_points() {
    let board = Board::from_rows(&["###########."; 16]);
    let mut game = Tetris::from_setup(board, [Tetromino::I; 4], 1);

    let mut progress = Vec::new();
    for _ in 0..4 {
        drop_into_well(&mut game);
        progress.push((game.score(), *game.state().rows(), *game.state().level()));
    }

    let tetris = ROW_POINTS[3];
    assert_eq!(
        progress,
        vec![
            (tetris, 4, 1),
            (tetris * 2, 8, 1),
            (tetris * 3, 12, 2),
            (tetris * 3 + tetris * 2, 16, 2),
        ]
    );
    assert_eq!(game.tick_interval(), drop_interval(2));
    assert_eq!(game.tick_interval(), Duration::from_millis(900));
    assert_eq!(game.state().board().filled_count(), 0);
}

#[test]
fn test_rotation_without_room_reverts() {
    // Row 1 has a single free column, so a horizontal I cannot fit anywhere.
    let mut rows = vec!["............"; HEIGHT];
    rows[1..4].fill("#####.######");
    let mut game = Tetris::from_setup(Board::from_rows(&rows), [Tetromino::I], 1);
    assert_eq!(game.status(), Status::Ongoing);

    let before = game.state().clone();
    assert_eq!(game.apply(TetrisCommand::RotateCw), Err(MoveError::Blocked));
    assert_eq!(game.state(), &before);
    assert_eq!(*game.state().active().as_ref().expect("Piece missing").rotation(), 0);
}

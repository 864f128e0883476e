//! Tests for Connect Four run detection and match flow.

use rewind_engines::connect_four::{COLUMNS, Grid, ROWS};
use rewind_engines::{ConnectFour, Engine, Outcome, Side, Status, TurnBased};

#[test]
fn test_horizontal_run() {
    let grid = Grid::from_rows(&[
        ".......",
        ".......",
        ".......",
        ".......",
        "OOO....",
        "..XXXX.",
    ]);
    assert_eq!(grid.winner(), Some(Side::Human));
}

#[test]
fn test_vertical_run() {
    let grid = Grid::from_rows(&[
        ".......",
        ".......",
        "......O",
        "......O",
        "X.....O",
        "XX....O",
    ]);
    assert_eq!(grid.winner(), Some(Side::Opponent));
}

#[test]
fn test_descending_diagonal_run() {
    let grid = Grid::from_rows(&[
        ".......",
        ".......",
        "X......",
        "OX.....",
        "OOX....",
        "OOOX...",
    ]);
    assert_eq!(grid.winner(), Some(Side::Human));
}

#[test]
fn test_ascending_diagonal_run() {
    let grid = Grid::from_rows(&[
        ".......",
        ".......",
        "...O...",
        "..OX...",
        ".OXX...",
        "OXXX...",
    ]);
    assert_eq!(grid.winner(), Some(Side::Opponent));
}

#[test]
fn test_played_vertical_win_ends_match() {
    let mut game = ConnectFour::with_seed(1);
    for _ in 0..3 {
        game.play(Side::Human, 0).expect("Human drop failed");
        game.play(Side::Opponent, 1).expect("Opponent drop failed");
    }
    game.play(Side::Human, 0).expect("Winning drop failed");
    assert_eq!(game.status(), Status::Finished(Outcome::Win));
    assert_eq!(game.submittable_points(), Some(100));
    assert_eq!(game.reply(), Err(rewind_engines::MoveError::GameOver));
}

#[test]
fn test_full_grid_without_run_is_draw() {
    // Fills to XXOOXXO / OOXXOOX repeated, which has no line of four.
    let columns = [
        2, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 3, 3, 3, 3, 3, 3, 6, 4, 4, 4, 4, 4,
        4, 5, 5, 5, 5, 5, 5, 6, 6, 6, 6, 6,
    ];
    assert_eq!(columns.len(), ROWS * COLUMNS);

    let mut game = ConnectFour::with_seed(1);
    for col in columns {
        let side = game.to_move();
        game.play(side, col).expect("Drop failed");
    }
    assert!(game.grid().is_full());
    assert_eq!(game.status(), Status::Finished(Outcome::Draw));
    assert_eq!(game.submittable_points(), None);
}

#[test]
fn test_random_opponent_plays_to_completion() {
    for seed in 0..20 {
        let mut game = ConnectFour::with_seed(seed);
        while !game.is_terminal() {
            let col = game.grid().legal_columns()[0];
            game.apply(col).expect("Human drop failed");
            if !game.is_terminal() {
                game.reply().expect("Opponent reply failed");
            }
        }
        assert!(game.status().outcome().is_some());
    }
}

//! Exhaustive checks of the tic-tac-toe opponent.

use rewind_engines::tictactoe::rules::{check_winner, is_full};
use rewind_engines::tictactoe::{Board, Difficulty, Mark, Position, candidate_moves};
use rewind_engines::{Engine, Outcome, Side, Status, TicTacToe, TurnBased};

/// Walks every human line against every move the hard AI might pick.
/// Returns how many finished games were reached.
fn explore(board: Board, finished: &mut usize) {
    for pos in Position::valid_moves(&board) {
        let after_human = board.with(pos, Mark::X);
        assert_ne!(
            check_winner(&after_human),
            Some(Mark::X),
            "human won:\n{after_human}"
        );
        if is_full(&after_human) {
            *finished += 1;
            continue;
        }

        let replies = candidate_moves(&after_human, Mark::O, Difficulty::Hard);
        assert!(!replies.is_empty(), "no reply on:\n{after_human}");
        for reply in replies {
            assert!(after_human.is_empty(reply));
            let after_ai = after_human.with(reply, Mark::O);
            if check_winner(&after_ai).is_some() || is_full(&after_ai) {
                *finished += 1;
                continue;
            }
            explore(after_ai, finished);
        }
    }
}

#[test]
fn test_hard_opponent_never_loses() {
    let mut finished = 0;
    explore(Board::new(), &mut finished);
    assert!(finished > 0);
}

#[test]
fn test_easy_and_normal_consider_every_empty_square() {
    let board = Board::from_marks("X.. .O. ...");
    for difficulty in [Difficulty::Easy, Difficulty::Normal] {
        assert_eq!(candidate_moves(&board, Mark::O, difficulty).len(), 7);
    }
}

#[test]
fn test_hard_match_never_won_by_human() {
    for seed in 0..30 {
        let mut game = TicTacToe::with_difficulty(Difficulty::Hard, seed);
        let mut next = 0;
        while !game.is_terminal() {
            if game.to_move() == Side::Human {
                let free = Position::valid_moves(game.state().board());
                game.apply(free[next % free.len()]).expect("Human move failed");
                next += seed as usize + 1;
            } else {
                game.reply().expect("AI move failed");
            }
        }
        assert_ne!(game.status(), Status::Finished(Outcome::Win));
        assert_eq!(game.submittable_points(), None);
    }
}

#[test]
fn test_difficulty_drawn_from_seed() {
    let seen: std::collections::HashSet<Difficulty> = (0..64)
        .map(|seed| TicTacToe::with_seed(seed).difficulty())
        .collect();
    assert_eq!(seen.len(), 3);
}

//! The tic-tac-toe opponent.
//!
//! The hard player walks a fixed preference list: complete its own line,
//! block the human's line, then take the center, a corner or an edge. The
//! last three tiers only consider squares after which the human has no
//! forced win, found by exhaustive search.

use super::position::Position;
use super::rules::{check_winner, is_full};
use super::types::{Board, Mark};
use crate::rng::ArcadeRng;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Probability that a normal opponent plays the hard move.
pub const NORMAL_SKILL: f64 = 0.7;

/// How well the opponent plays.
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
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    /// Uniformly random empty square.
    Easy,
    /// Hard move most of the time, random otherwise.
    Normal,
    /// Never loses.
    Hard,
}

impl Difficulty {
    /// All levels.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    /// Draws a level uniformly at random.
    pub fn random(rng: &mut ArcadeRng) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Squares the hard opponent may pick, any one of which it picks at random.
#[instrument(skip(board))]
pub fn hard_candidates(board: &Board, mark: Mark) -> Vec<Position> {
    let empty = Position::valid_moves(board);
    if empty.is_empty() {
        return empty;
    }

    let completes = |who: Mark| {
        empty
            .iter()
            .copied()
            .find(|&pos| check_winner(&board.with(pos, who)) == Some(who))
    };
    if let Some(pos) = completes(mark) {
        return vec![pos];
    }
    if let Some(pos) = completes(mark.opponent()) {
        return vec![pos];
    }

    let safe = |pos: &Position| {
        value(&board.with(*pos, mark), mark.opponent(), mark.opponent()) < 1
    };
    preference_tiers(board)
        .into_iter()
        .map(|tier| tier.into_iter().filter(|p| safe(p)).collect::<Vec<_>>())
        .find(|tier| !tier.is_empty())
        .or_else(|| {
            preference_tiers(board)
                .into_iter()
                .find(|tier| !tier.is_empty())
        })
        .unwrap_or(empty)
}

/// Every square `difficulty` could possibly pick on `board`.
pub fn candidate_moves(board: &Board, mark: Mark, difficulty: Difficulty) -> Vec<Position> {
    match difficulty {
        Difficulty::Hard => hard_candidates(board, mark),
        Difficulty::Easy | Difficulty::Normal => Position::valid_moves(board),
    }
}

/// Picks the opponent's next square, or `None` on a full board.
#[instrument(skip(board, rng))]
pub fn choose_move(
    board: &Board,
    mark: Mark,
    difficulty: Difficulty,
    rng: &mut ArcadeRng,
) -> Option<Position> {
    let plays_hard = match difficulty {
        Difficulty::Easy => false,
        Difficulty::Normal => rng.gen_bool(NORMAL_SKILL),
        Difficulty::Hard => true,
    };
    let pool = if plays_hard {
        hard_candidates(board, mark)
    } else {
        Position::valid_moves(board)
    };
    let choice = pool.choose(rng).copied();
    debug!(?choice, plays_hard, "AI move chosen");
    choice
}

/// Center, then corners, then edges; only empty squares.
fn preference_tiers(board: &Board) -> [Vec<Position>; 3] {
    let free = |cells: &[Position]| {
        cells
            .iter()
            .copied()
            .filter(|&p| board.is_empty(p))
            .collect::<Vec<_>>()
    };
    [
        free(&[Position::Center]),
        free(&Position::CORNERS),
        free(&Position::EDGES),
    ]
}

/// Game value with `to_move` about to play, scored for `hero`:
/// 1 if `hero` can force a win, 0 for a draw, -1 if `hero` loses.
fn value(board: &Board, to_move: Mark, hero: Mark) -> i8 {
    if let Some(winner) = check_winner(board) {
        return if winner == hero { 1 } else { -1 };
    }
    if is_full(board) {
        return 0;
    }
    let outcomes = Position::valid_moves(board)
        .into_iter()
        .map(|pos| value(&board.with(pos, to_move), to_move.opponent(), hero));
    if to_move == hero {
        outcomes.max().unwrap_or(0)
    } else {
        outcomes.min().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng;

    #[test]
    fn test_takes_winning_square() {
        let board = Board::from_marks("OO. XX. X..");
        assert_eq!(hard_candidates(&board, Mark::O), vec![Position::TopRight]);
    }

    #[test]
    fn test_blocks_open_line() {
        let board = Board::from_marks("XX. .O. ...");
        assert_eq!(hard_candidates(&board, Mark::O), vec![Position::TopRight]);
    }

    #[test]
    fn test_prefers_center() {
        let board = Board::from_marks("X.. ... ...");
        assert_eq!(hard_candidates(&board, Mark::O), vec![Position::Center]);
    }

    #[test]
    fn test_avoids_corner_after_opposite_corners() {
        // X took opposite corners around O's center; a corner reply loses to a fork.
        let board = Board::from_marks("X.. .O. ..X");
        let moves = hard_candidates(&board, Mark::O);
        assert!(!moves.is_empty());
        assert!(moves.iter().all(|p| Position::EDGES.contains(p)), "{moves:?}");
    }

    #[test]
    fn test_easy_picks_empty_square() {
        let board = Board::from_marks("XOX OX. ...");
        let mut rng = rng::seeded(11);
        for _ in 0..20 {
            let pos = choose_move(&board, Mark::O, Difficulty::Easy, &mut rng).unwrap();
            assert!(board.is_empty(pos));
        }
    }

    #[test]
    fn test_full_board_has_no_move() {
        let board = Board::from_marks("XOX OXX OXO");
        let mut rng = rng::seeded(1);
        assert_eq!(choose_move(&board, Mark::O, Difficulty::Hard, &mut rng), None);
    }
}

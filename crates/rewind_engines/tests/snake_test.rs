//! Tests for Snake movement and collision on hand-built bodies.

use rewind_engines::snake::{Cell, Direction, SnakeStep};
use rewind_engines::{Engine, Outcome, Snake, Status};

/// Twelve cells folded into three rows, head at the top-right end,
/// tail at the bottom-left.
fn zig_zag() -> Snake {
    let body = [
        (3, 0),
        (2, 0),
        (1, 0),
        (0, 0),
        (0, 1),
        (1, 1),
        (2, 1),
        (3, 1),
        (3, 2),
        (2, 2),
        (1, 2),
        (0, 2),
    ]
    .map(|(x, y)| Cell::new(x, y));
    Snake::from_body(body, Direction::Right, Cell::new(20, 10), 1).expect("Empty body")
}

#[test]
fn test_zig_zag_free_cell_succeeds() {
    let mut snake = zig_zag();
    assert_eq!(snake.advance(), Ok(SnakeStep::Moved));
    assert_eq!(snake.state().head(), Cell::new(4, 0));
    assert_eq!(snake.state().body().len(), 12);
    assert!(!snake.state().occupies(Cell::new(0, 2)));
    assert_eq!(snake.status(), Status::Ongoing);
}

#[test]
fn test_zig_zag_body_hit_terminates() {
    let mut snake = zig_zag();
    snake.steer(Direction::Down).expect("Steer failed");
    assert_eq!(snake.advance(), Ok(SnakeStep::Collided));
    assert_eq!(snake.status(), Status::Finished(Outcome::Lose));
}

#[test]
fn test_zig_zag_wall_hit_terminates() {
    let mut snake = zig_zag();
    snake.steer(Direction::Up).expect("Steer failed");
    assert_eq!(snake.advance(), Ok(SnakeStep::Collided));
    assert!(snake.is_terminal());
}

#[test]
fn test_head_may_follow_tail() {
    // A 2x2 ring: moving down puts the head where the tail leaves.
    let body = [(1, 1), (2, 1), (2, 2), (1, 2)].map(|(x, y)| Cell::new(x, y));
    let mut snake =
        Snake::from_body(body, Direction::Left, Cell::new(10, 10), 1).expect("Empty body");
    snake.steer(Direction::Down).expect("Steer failed");
    assert_eq!(snake.advance(), Ok(SnakeStep::Moved));
    assert_eq!(snake.state().head(), Cell::new(1, 2));
}

#[test]
fn test_eating_keeps_tail_in_place() {
    let body = [(1, 1), (1, 0), (2, 0), (2, 1)].map(|(x, y)| Cell::new(x, y));
    let mut snake =
        Snake::from_body(body, Direction::Down, Cell::new(1, 2), 1).expect("Empty body");
    assert_eq!(snake.advance(), Ok(SnakeStep::Ate));
    assert_eq!(snake.state().body().len(), 5);
    assert!(snake.state().occupies(Cell::new(2, 1)));
    assert_eq!(*snake.state().score(), 10);
}

#[test]
fn test_score_submitted_only_when_positive() {
    let mut snake = Snake::with_seed(2);
    snake.steer(Direction::Left).expect("Steer failed");
    while !snake.is_terminal() {
        snake.advance().expect("Advance failed");
    }
    assert_eq!(snake.submittable_points(), None);
}

#[test]
fn test_empty_body_rejected() {
    assert!(Snake::from_body(Vec::new(), Direction::Up, Cell::new(1, 1), 1).is_none());
}

//! Submission lifecycle of arcade sessions against a scripted gateway.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rewind_arcade::gateway::{Account, AuthSession, GameInfo, ScoreRecord};
use rewind_arcade::{ArcadeSession, GatewayError, RetryPolicy, ScoreGateway, Submission};
use rewind_engines::snake::{Cell, Direction};
use rewind_engines::{ConnectFour, Engine, GameId, Side, Snake};

/// Fails the first `failures` submissions with `error`, then accepts.
struct ScriptedGateway {
    failures: u32,
    error: GatewayError,
    calls: Mutex<Vec<(GameId, u32)>>,
}

impl ScriptedGateway {
    fn accepting() -> Arc<Self> {
        Self::failing(0, GatewayError::Transport("unused".into()))
    }

    fn failing(failures: u32, error: GatewayError) -> Arc<Self> {
        Arc::new(Self {
            failures,
            error,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<(GameId, u32)> {
        self.calls.lock().expect("lock").clone()
    }
}

fn record(game: GameId, points: u32) -> ScoreRecord {
    serde_json::from_value(serde_json::json!({
        "id": 1,
        "userId": 7,
        "username": "tester",
        "gameId": game.to_string(),
        "gameName": game.title(),
        "points": points,
        "date": "2026-01-01T00:00:00",
    }))
    .expect("valid record")
}

#[async_trait]
impl ScoreGateway for ScriptedGateway {
    async fn submit_score(
        &self,
        _token: &str,
        game: GameId,
        points: u32,
    ) -> Result<ScoreRecord, GatewayError> {
        let attempt = {
            let mut calls = self.calls.lock().expect("lock");
            calls.push((game, points));
            calls.len() as u32
        };
        if attempt <= self.failures {
            Err(self.error.clone())
        } else {
            Ok(record(game, points))
        }
    }

    async fn leaderboard(&self, _: GameId, _: u32) -> Result<Vec<ScoreRecord>, GatewayError> {
        Ok(Vec::new())
    }

    async fn games(&self) -> Result<Vec<GameInfo>, GatewayError> {
        Ok(Vec::new())
    }

    async fn register(&self, _: &str, _: &str, _: &str) -> Result<AuthSession, GatewayError> {
        Err(GatewayError::Unauthorized("not scripted".into()))
    }

    async fn login(&self, _: &str, _: &str) -> Result<AuthSession, GatewayError> {
        Err(GatewayError::Unauthorized("not scripted".into()))
    }

    async fn me(&self, _: &str) -> Result<Account, GatewayError> {
        Err(GatewayError::Unauthorized("not scripted".into()))
    }
}

/// Snake one step from food at the top wall: eats, then hits the wall with 10 points.
fn doomed_snake() -> Snake {
    Snake::from_body(
        [Cell::new(0, 1), Cell::new(0, 2)],
        Direction::Up,
        Cell::new(0, 0),
        1,
    )
    .expect("Snake body")
}

fn finish(session: &mut ArcadeSession<Snake>) {
    session.engine_mut().advance().expect("eat");
    session.engine_mut().advance().expect("collide");
    assert!(session.engine().is_terminal());
}

fn no_wait(retries: u32) -> RetryPolicy {
    RetryPolicy::new(retries, Duration::ZERO)
}

#[tokio::test]
async fn test_pending_until_terminal() {
    let gateway = ScriptedGateway::accepting();
    let mut session = ArcadeSession::attributed(doomed_snake(), gateway.clone(), Some("t".into()));
    session.engine_mut().advance().expect("eat");
    assert_eq!(*session.observe().await, Submission::Pending);
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn test_submits_exactly_once() {
    let gateway = ScriptedGateway::accepting();
    let mut session = ArcadeSession::attributed(doomed_snake(), gateway.clone(), Some("t".into()));
    finish(&mut session);

    let first = session.observe().await.clone();
    let second = session.observe().await.clone();
    assert!(matches!(first, Submission::Submitted(ref r) if *r.points() == 10));
    assert_eq!(first, second);
    assert_eq!(gateway.calls(), vec![(GameId::Snake, 10)]);
}

#[tokio::test]
async fn test_without_token_not_attributed() {
    let gateway = ScriptedGateway::accepting();
    let mut session = ArcadeSession::attributed(doomed_snake(), gateway.clone(), None);
    finish(&mut session);
    assert_eq!(*session.observe().await, Submission::NotAttributed);
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn test_zero_points_nothing_to_submit() {
    let gateway = ScriptedGateway::accepting();
    let snake = Snake::from_body(
        [Cell::new(0, 0), Cell::new(0, 1)],
        Direction::Up,
        Cell::new(5, 5),
        1,
    )
    .expect("Snake body");
    let mut session = ArcadeSession::attributed(snake, gateway.clone(), Some("t".into()));
    session.engine_mut().advance().expect("collide");
    assert_eq!(*session.observe().await, Submission::NothingToSubmit);
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn test_transient_failures_retried() {
    let gateway = ScriptedGateway::failing(
        2,
        GatewayError::Server {
            status: 503,
            message: "busy".into(),
        },
    );
    let mut session = ArcadeSession::attributed(doomed_snake(), gateway.clone(), Some("t".into()))
        .with_retry(no_wait(2));
    finish(&mut session);
    assert!(matches!(session.observe().await, Submission::Submitted(_)));
    assert_eq!(gateway.calls().len(), 3);
}

#[tokio::test]
async fn test_retries_are_bounded() {
    let gateway = ScriptedGateway::failing(u32::MAX, GatewayError::Transport("refused".into()));
    let mut session = ArcadeSession::attributed(doomed_snake(), gateway.clone(), Some("t".into()))
        .with_retry(no_wait(1));
    finish(&mut session);
    assert_eq!(
        *session.observe().await,
        Submission::Failed(GatewayError::Transport("refused".into()))
    );
    assert_eq!(gateway.calls().len(), 2);
}

#[tokio::test]
async fn test_rejection_not_retried() {
    let gateway = ScriptedGateway::failing(u32::MAX, GatewayError::Unauthorized("Invalid token".into()));
    let mut session = ArcadeSession::attributed(doomed_snake(), gateway.clone(), Some("t".into()))
        .with_retry(no_wait(5));
    finish(&mut session);
    assert!(matches!(session.observe().await, Submission::Failed(GatewayError::Unauthorized(_))));
    assert_eq!(gateway.calls().len(), 1);
}

#[tokio::test]
async fn test_reset_rearms_submission() {
    let gateway = ScriptedGateway::accepting();
    let mut session = ArcadeSession::attributed(Snake::with_seed(4), gateway.clone(), Some("t".into()));
    session.reset();
    assert_eq!(*session.submission(), Submission::Pending);

    let mut session = ArcadeSession::attributed(doomed_snake(), gateway.clone(), Some("t".into()));
    finish(&mut session);
    session.observe().await;
    session.reset();
    assert_eq!(*session.submission(), Submission::Pending);
    assert!(!session.engine().is_terminal());
    assert_eq!(session.engine().score(), 0);
}

#[tokio::test]
async fn test_turn_based_win_submits_reward() {
    let gateway = ScriptedGateway::accepting();
    let mut session = ArcadeSession::attributed(ConnectFour::with_seed(1), gateway.clone(), Some("t".into()));
    for (human, opponent) in [(0, 6), (1, 6), (2, 5)] {
        session.engine_mut().play(Side::Human, human).expect("human");
        session.engine_mut().play(Side::Opponent, opponent).expect("opponent");
    }
    session.apply(3).expect("winning drop");
    session.observe().await;
    assert_eq!(gateway.calls(), vec![(GameId::ConnectFour, 100)]);
}

#[tokio::test]
async fn test_turn_based_loss_submits_nothing() {
    let gateway = ScriptedGateway::accepting();
    let mut session = ArcadeSession::attributed(ConnectFour::with_seed(1), gateway.clone(), Some("t".into()));
    for human in [0, 1, 0, 1] {
        session.engine_mut().play(Side::Human, human).expect("human");
        session.engine_mut().play(Side::Opponent, 6).expect("opponent");
    }
    assert_eq!(*session.observe().await, Submission::NothingToSubmit);
    assert!(gateway.calls().is_empty());
}

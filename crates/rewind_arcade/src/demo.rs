//! Headless demo sessions: any game, played by its autopilot.

use std::sync::Arc;

use derive_getters::Getters;
use rewind_engines::{ConnectFour, Engine, GameId, Pong, Snake, Tetris, TicTacToe};
use tracing::instrument;

use crate::autopilot::{ConnectFourPilot, PongPilot, SnakePilot, TetrisPilot, TicTacToePilot};
use crate::gateway::ScoreGateway;
use crate::runner::{MAX_TICKS, Pacing, RunReport, run_real_time, run_turn_based};
use crate::session::{ArcadeSession, RetryPolicy};

/// Everything a demo run needs besides the game.
#[derive(Clone)]
pub struct DemoOptions {
    seed: Option<u64>,
    pacing: Pacing,
    gateway: Option<Arc<dyn ScoreGateway>>,
    token: Option<String>,
    retry: RetryPolicy,
    max_ticks: u64,
}

impl std::fmt::Debug for DemoOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DemoOptions")
            .field("seed", &self.seed)
            .field("pacing", &self.pacing)
            .field("submits", &self.gateway.is_some())
            .field("max_ticks", &self.max_ticks)
            .finish()
    }
}

impl DemoOptions {
    /// Unpaced, unsubmitted, with an optional fixed seed.
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            seed,
            pacing: Pacing::unpaced(),
            gateway: None,
            token: None,
            retry: RetryPolicy::default(),
            max_ticks: MAX_TICKS,
        }
    }

    /// Sets the pacing.
    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Submits the result through `gateway` as the owner of `token`.
    pub fn with_gateway(
        mut self,
        gateway: Arc<dyn ScoreGateway>,
        token: Option<String>,
        retry: RetryPolicy,
    ) -> Self {
        self.gateway = Some(gateway);
        self.token = token;
        self.retry = retry;
        self
    }

    /// Caps the number of ticks of a real-time game.
    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    fn session<E: Engine>(&self, engine: E) -> ArcadeSession<E> {
        match &self.gateway {
            Some(gateway) => ArcadeSession::attributed(engine, Arc::clone(gateway), self.token.clone())
                .with_retry(self.retry),
            None => ArcadeSession::offline(engine),
        }
    }
}

/// Result of a demo: the run report and the final board as text.
#[derive(Debug, Clone, Getters)]
pub struct DemoResult {
    report: RunReport,
    board: String,
}

/// Plays one session of `game` to the end.
#[instrument]
pub async fn play(game: GameId, options: DemoOptions) -> DemoResult {
    let seed = options.seed;
    let pacing = options.pacing;
    let max_ticks = options.max_ticks;

    match game {
        GameId::Tetris => {
            let engine = seed.map_or_else(Tetris::new, Tetris::with_seed);
            let mut session = options.session(engine);
            let report = run_real_time(&mut session, &mut TetrisPilot, pacing, max_ticks).await;
            DemoResult {
                report,
                board: session.engine().state().to_string(),
            }
        }
        GameId::Snake => {
            let engine = seed.map_or_else(Snake::new, Snake::with_seed);
            let mut session = options.session(engine);
            let report = run_real_time(&mut session, &mut SnakePilot, pacing, max_ticks).await;
            DemoResult {
                report,
                board: session.engine().state().to_string(),
            }
        }
        GameId::Pong => {
            let engine = seed.map_or_else(Pong::new, Pong::with_seed);
            let mut session = options.session(engine);
            let report = run_real_time(&mut session, &mut PongPilot, pacing, max_ticks).await;
            DemoResult {
                report,
                board: session.engine().state().to_string(),
            }
        }
        GameId::ConnectFour => {
            let engine = seed.map_or_else(ConnectFour::new, ConnectFour::with_seed);
            let mut session = options.session(engine);
            let report = run_turn_based(&mut session, &mut ConnectFourPilot, pacing).await;
            DemoResult {
                report,
                board: session.engine().grid().to_string(),
            }
        }
        GameId::TicTacToe => {
            let engine = seed.map_or_else(TicTacToe::new, TicTacToe::with_seed);
            let mut session = options.session(engine);
            let report = run_turn_based(&mut session, &mut TicTacToePilot, pacing).await;
            DemoResult {
                report,
                board: session.engine().state().board().to_string(),
            }
        }
    }
}

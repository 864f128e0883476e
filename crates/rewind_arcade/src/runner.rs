//! Drives a session to completion with an autopilot.

use std::time::Duration;

use derive_getters::Getters;
use rewind_engines::{Engine, GameId, Outcome, RealTime, Side, TurnBased};
use tracing::{debug, info, instrument};

use crate::autopilot::Autopilot;
use crate::session::{ArcadeSession, Submission};

/// Step budget for a real-time demo.
pub const MAX_TICKS: u64 = 200_000;

/// Whether and how long the runner sleeps between steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    enabled: bool,
    reply_delay: Duration,
}

impl Pacing {
    /// Sleeps for each tick interval and `reply_delay` before each reply.
    pub fn realtime(reply_delay: Duration) -> Self {
        Self {
            enabled: true,
            reply_delay,
        }
    }

    /// Runs as fast as possible.
    pub fn unpaced() -> Self {
        Self {
            enabled: false,
            reply_delay: Duration::ZERO,
        }
    }

    async fn wait(&self, duration: Duration) {
        if self.enabled && !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct RunReport {
    game: GameId,
    outcome: Option<Outcome>,
    score: u32,
    steps: u64,
    submission: Submission,
}

impl std::fmt::Display for RunReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let outcome = self
            .outcome
            .map(|o| o.to_string())
            .unwrap_or_else(|| "unfinished".to_string());
        write!(
            f,
            "{}: {} with {} points after {} steps",
            self.game.title(),
            outcome,
            self.score,
            self.steps
        )
    }
}

fn report<E: Engine>(session: &ArcadeSession<E>, steps: u64) -> RunReport {
    let engine = session.engine();
    RunReport {
        game: engine.game_id(),
        outcome: engine.status().outcome(),
        score: engine.score(),
        steps,
        submission: session.submission().clone(),
    }
}

/// Plays a timer-driven game: one autopilot command, then one tick, per step.
#[instrument(skip_all, fields(game = %session.engine().game_id()))]
pub async fn run_real_time<E, A>(
    session: &mut ArcadeSession<E>,
    pilot: &mut A,
    pacing: Pacing,
    max_ticks: u64,
) -> RunReport
where
    E: RealTime,
    A: Autopilot<E>,
{
    let mut steps = 0;
    while !session.engine().is_terminal() && steps < max_ticks {
        if let Some(command) = pilot.next_command(session.engine())
            && let Err(e) = session.apply(command)
        {
            debug!(error = %e, "Command refused");
        }
        if let Err(e) = session.engine_mut().tick() {
            debug!(error = %e, "Tick refused");
        }
        steps += 1;
        session.observe().await;
        pacing.wait(session.engine().tick_interval()).await;
    }
    session.observe().await;
    let report = report(session, steps);
    info!(%report, "Run finished");
    report
}

/// Plays an alternating game: the autopilot moves for the human, then the
/// opponent replies after the pacing delay.
#[instrument(skip_all, fields(game = %session.engine().game_id()))]
pub async fn run_turn_based<E, A>(
    session: &mut ArcadeSession<E>,
    pilot: &mut A,
    pacing: Pacing,
) -> RunReport
where
    E: TurnBased,
    A: Autopilot<E>,
{
    let mut steps = 0;
    while !session.engine().is_terminal() {
        match session.engine().to_move() {
            Side::Human => {
                let Some(command) = pilot.next_command(session.engine()) else {
                    debug!("Autopilot has no move");
                    break;
                };
                if let Err(e) = session.apply(command) {
                    debug!(error = %e, "Autopilot move refused");
                    break;
                }
            }
            Side::Opponent => {
                pacing.wait(pacing.reply_delay).await;
                if let Err(e) = session.engine_mut().reply() {
                    debug!(error = %e, "Opponent could not reply");
                    break;
                }
            }
        }
        steps += 1;
        session.observe().await;
    }
    session.observe().await;
    let report = report(session, steps);
    info!(%report, "Run finished");
    report
}

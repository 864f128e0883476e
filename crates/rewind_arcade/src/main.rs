//! Rewind Arcade - Unified CLI
//!
//! Gateway server, headless demos and leaderboard queries.

#![warn(missing_docs)]

mod cli;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use rewind_arcade::demo::{self, DemoOptions};
use rewind_arcade::{ArcadeConfig, HttpScoreGateway, Pacing, RetryPolicy, ScoreGateway, Submission};
use rewind_engines::GameId;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,rewind_arcade=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ArcadeConfig::load(Some(cli.config.as_path()))?;
    if let Some(url) = cli.gateway_url {
        config.set_gateway_url(url);
    }
    if cli.token.is_some() {
        config.set_token(cli.token);
    }

    match cli.command {
        Command::Serve {
            host,
            port,
            db_path,
        } => run_server(host, port, db_path.unwrap_or_else(|| config.db_path().clone())).await,
        Command::Demo {
            game,
            seed,
            submit,
            fast,
        } => {
            if fast {
                config.set_pacing(false);
            }
            run_demo(&config, game, seed, submit).await
        }
        Command::Leaderboard { game, limit } => show_leaderboard(&config, game, limit).await,
        Command::Register {
            username,
            email,
            password,
        } => {
            let gateway = HttpScoreGateway::new(config.gateway_url());
            let session = gateway.register(&username, &email, &password).await?;
            println!("{}", session.token());
            Ok(())
        }
        Command::Login { email, password } => {
            let gateway = HttpScoreGateway::new(config.gateway_url());
            let session = gateway.login(&email, &password).await?;
            info!(username = %session.user().username(), "Logged in");
            println!("{}", session.token());
            Ok(())
        }
        Command::Games => {
            let gateway = HttpScoreGateway::new(config.gateway_url());
            for game in gateway.games().await? {
                println!("{:<10} {}", game.id(), game.name());
            }
            Ok(())
        }
    }
}

/// Run the score gateway
#[instrument]
async fn run_server(host: String, port: u16, db_path: String) -> Result<()> {
    info!("Starting Rewind Arcade score gateway");
    rewind_server::serve(&host, port, &db_path).await?;
    Ok(())
}

/// Play one autopilot session and print the result
#[instrument(skip(config))]
async fn run_demo(
    config: &ArcadeConfig,
    game: GameId,
    seed: Option<u64>,
    submit: bool,
) -> Result<()> {
    let pacing = if *config.pacing() {
        Pacing::realtime(config.reply_delay())
    } else {
        Pacing::unpaced()
    };
    let mut options = DemoOptions::new(seed).with_pacing(pacing);
    if submit {
        if config.token().is_none() {
            warn!("No token configured; the result will not be attributed");
        }
        let gateway: Arc<dyn ScoreGateway> = Arc::new(HttpScoreGateway::new(config.gateway_url()));
        let retry = RetryPolicy::new(*config.submit_retries(), config.retry_backoff());
        options = options.with_gateway(gateway, config.token().clone(), retry);
    }

    let result = demo::play(game, options).await;
    println!("{}", result.board());
    println!("{}", result.report());
    match result.report().submission() {
        Submission::Submitted(record) => {
            println!("Best score for {}: {}", record.username(), record.points())
        }
        Submission::Failed(e) => println!("Score not saved: {}", e),
        Submission::NotAttributed if submit => println!("Score not saved: not logged in"),
        _ => {}
    }
    Ok(())
}

/// Print the top scores of one game
#[instrument(skip(config))]
async fn show_leaderboard(config: &ArcadeConfig, game: GameId, limit: u32) -> Result<()> {
    let gateway = HttpScoreGateway::new(config.gateway_url());
    let scores = gateway.leaderboard(game, limit).await?;
    println!("{} top {}", game.title(), limit);
    for (rank, score) in scores.iter().enumerate() {
        println!("{:>3}. {:<16} {:>8}", rank + 1, score.username(), score.points());
    }
    Ok(())
}

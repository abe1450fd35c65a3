use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use no_thanks_ai::{
    Agent, Driver, GameReport, GameService, HttpGameService, LocalGame, ServiceConfig,
    DEFAULT_API_URL,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Plays No Thanks! against the game service, or locally with --offline.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// Number of games to play
    #[arg(long, default_value_t = 20)]
    games: usize,
    /// Bearer token for the game service
    #[arg(long, env = "NO_THANKS_TOKEN", hide_env_values = true)]
    token: Option<String>,
    #[arg(long, env = "NO_THANKS_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
    /// Failed submissions in a row before a game is abandoned (0 = never)
    #[arg(long, default_value_t = 10)]
    max_action_failures: u32,
    /// Play against the in-process engine instead of the service
    #[arg(long)]
    offline: bool,
    /// Extra heuristic players in offline games
    #[arg(long, default_value_t = 3)]
    opponents: usize,
    /// Seed for the offline deck shuffle
    #[arg(long)]
    seed: Option<u64>,
    /// Offline seats: `heuristic`, `human-<name>`, or a path to an agent executable
    seats: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "no_thanks_ai=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let agents = cli
        .seats
        .iter()
        .enumerate()
        .map(|(i, arg)| Agent::from_arg(arg, i))
        .collect::<anyhow::Result<Vec<_>>>()?;

    if cli.offline {
        let mut names: Vec<String> = agents.iter().map(|a| a.name().to_owned()).collect();
        names.extend((1..=cli.opponents).map(|i| format!("Bot {i}")));
        let local = LocalGame::new(names, cli.seed)?;
        play(Driver::new(local, agents, cli.max_action_failures), cli.games);
    } else {
        if !agents.is_empty() {
            bail!("Seats can only be chosen for --offline games");
        }
        let token = cli
            .token
            .context("No token given, pass --token or set NO_THANKS_TOKEN")?;
        let config = ServiceConfig {
            base_url: cli.api_url,
            token,
            timeout: Duration::from_secs(cli.timeout_secs),
        };
        let service = HttpGameService::new(config)?;
        play(Driver::new(service, agents, cli.max_action_failures), cli.games);
    }
    Ok(())
}

fn play<S: GameService>(mut driver: Driver<S>, games: usize) {
    let reports = driver.run(games);
    for report in &reports {
        print_standings(report);
    }
    println!("\n{} of {} games have been played.", reports.len(), games);
}

fn print_standings(report: &GameReport) {
    println!("\nGame {} over! Final scores:", report.game_id);
    println!("{:<15} {:<10} {:<12} Cards", "Name", "Score", "Money Left");
    println!("{}", "-".repeat(50));
    for (score, player) in report.scores.iter().zip(&report.final_state.players) {
        let cards: Vec<String> = player.cards.iter().map(|s| s.to_string()).collect();
        println!(
            "{:<15} {:<10} {:<12} {}",
            score.name,
            score.score,
            score.money_left,
            cards.join(", ")
        );
    }
}

//! Balance tooling for the combat simulator.
//!
//! `balance report` sweeps many seeded runs and prints the aggregate, `balance combat` plays a
//! single TOML combat template and prints its log.

mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Combat, Report};
use tracing_subscriber::EnvFilter;

lazy_static::lazy_static! {
    pub static ref OPTIMAL_THREAD_COUNT: usize = num_cpus::get().max(1);
}

#[derive(Parser)]
#[command(name = "balance")]
#[command(about = "Balance simulations for the deck-building combat engine", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Simulate many runs and aggregate win rate, deadliest enemy and card usage
    Report(Report),

    /// Play one combat template with its script or the greedy strategy
    Combat(Combat),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    tracing::info!(catalog_cards = gamedata::CARDS.len(), "launch");

    let cli = Cli::parse();

    match cli.command {
        Command::Report(cmd) => cmd.execute(),
        Command::Combat(cmd) => cmd.execute(),
    }
}

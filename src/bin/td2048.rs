//! td2048 CLI - train and inspect tabular TD(λ) agents for 2048
//!
//! This CLI provides:
//! - Training from scratch or from a saved knowledge file
//! - Inspecting saved knowledge files
//!
//! The training report is a CSV stream on stdout. Logs go to stderr and are
//! controlled with `RUST_LOG` (default `warn`).

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "td2048")]
#[command(version, about = "Tabular TD(λ) learning for 2048", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train an agent, optionally continuing from saved knowledge
    Train(Box<td2048::cli::commands::train::TrainArgs>),

    /// Print metadata and the most visited states of a knowledge file
    Inspect(td2048::cli::commands::inspect::InspectArgs),
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> Result<()> {
    init_logging()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => td2048::cli::commands::train::execute(*args),
        Commands::Inspect(args) => td2048::cli::commands::inspect::execute(args),
    }
}

//! Inspect command - summarize a saved knowledge file

use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    adapters::MsgPackRepository,
    cli::output::{format_number, or_dash, print_kv, print_section},
    ports::KnowledgeRepository,
};

#[derive(Parser, Debug)]
#[command(about = "Inspect saved knowledge")]
pub struct InspectArgs {
    /// Knowledge file written by `train --output`
    pub path: PathBuf,

    /// Most visited states to print (0 prints all)
    #[arg(long, short = 'l', default_value_t = 10)]
    pub limit: usize,
}

/// Execute the inspect command
pub fn execute(args: InspectArgs) -> Result<()> {
    let saved = MsgPackRepository::new()
        .load(&args.path)
        .with_context(|| format!("Failed to load knowledge from {}", args.path.display()))?;

    print_section(&format!("Knowledge file: {}", args.path.display()));
    let metadata = &saved.metadata;
    print_kv("Format version", &saved.version.to_string());
    print_kv(
        "Episodes trained",
        &or_dash(metadata.episodes_trained.map(format_number)),
    );
    print_kv("Alpha", &or_dash(metadata.alpha));
    print_kv("Epsilon", &or_dash(metadata.epsilon));
    print_kv("Lambda", &or_dash(metadata.lambda));
    print_kv("Seed", &or_dash(metadata.seed));
    print_kv("Saved at", &or_dash(metadata.saved_at.as_deref()));
    print_kv("States", &format_number(saved.knowledge().size()));

    println!();
    println!("{}", saved.knowledge());

    let mut stdout = io::stdout().lock();
    saved.knowledge().write_dump(&mut stdout, args.limit)?;
    stdout.flush()?;

    Ok(())
}

//! Train command - learn action values by playing 2048

use std::{
    fs::File,
    io::{self, Write},
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;
use tracing::info;

use crate::{
    adapters::MsgPackRepository,
    game::Game2048,
    knowledge::{KnowledgeBase, SavedKnowledge, TrainingMetadata},
    pipeline::{
        CsvReportObserver, DEFAULT_MAX_STEPS, ProgressObserver, TrainingConfig, TrainingPipeline,
        TrainingResult,
    },
    ports::KnowledgeRepository,
};

#[derive(Debug, Serialize)]
struct TrainingSummaryFile<'a> {
    training: &'a TrainingResult,
    config: &'a TrainingConfig,
    episodes_before: usize,
    states_loaded: usize,
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Treat trailing separators or missing filename as a directory target.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

fn timestamp() -> Option<String> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .map(|elapsed| elapsed.as_secs().to_string())
}

#[derive(Parser, Debug)]
#[command(about = "Train an agent on 2048")]
pub struct TrainArgs {
    /// Saved knowledge to continue training from
    pub input: Option<PathBuf>,

    /// Step size of the incremental average
    #[arg(long, default_value_t = 0.1)]
    pub alpha: f64,

    /// Probability of taking a random action
    #[arg(long, default_value_t = 0.1)]
    pub epsilon: f64,

    /// Decay of the truncated λ-return
    #[arg(long, default_value_t = 0.9)]
    pub lambda: f64,

    /// Number of training episodes
    #[arg(long, short = 'n', default_value_t = 10_000)]
    pub episodes: usize,

    /// Write a report line every this many episodes
    #[arg(long, default_value_t = 100)]
    pub report_frequency: usize,

    /// Output file for learned knowledge
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Hard cap on steps per episode
    #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
    pub max_steps: usize,

    /// Show progress bar on stderr
    #[arg(long, default_value_t = false)]
    pub progress: bool,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Most visited states to print after training (0 prints all)
    #[arg(long, default_value_t = 10)]
    pub dump: usize,

    /// Keep playing after a move that leaves the board unchanged
    #[arg(long, default_value_t = false)]
    pub allow_illegal_moves: bool,
}

impl TrainArgs {
    fn training_config(&self) -> TrainingConfig {
        TrainingConfig {
            episodes: self.episodes,
            report_frequency: self.report_frequency,
            alpha: self.alpha,
            epsilon: self.epsilon,
            lambda: self.lambda,
            max_steps: self.max_steps,
            seed: self.seed,
        }
    }
}

/// Load the starting knowledge and the episodes it was trained for
fn load_knowledge(
    repository: &impl KnowledgeRepository,
    input: Option<&Path>,
) -> Result<(KnowledgeBase, usize)> {
    let Some(path) = input else {
        return Ok((KnowledgeBase::new(), 0));
    };

    let saved = repository
        .load(path)
        .with_context(|| format!("Failed to load knowledge from {}", path.display()))?;
    let episodes = saved.metadata.episodes_trained.unwrap_or(0);
    let knowledge = saved.into_knowledge()?;
    info!(
        states = knowledge.size(),
        episodes,
        path = %path.display(),
        "loaded knowledge"
    );
    Ok((knowledge, episodes))
}

/// Execute the train command
pub fn execute(args: TrainArgs) -> Result<()> {
    let repository = MsgPackRepository::new();
    let (mut knowledge, episodes_before) = load_knowledge(&repository, args.input.as_deref())?;
    let states_loaded = knowledge.size();

    let config = args.training_config();
    let mut pipeline = TrainingPipeline::new(config.clone())
        .context("Invalid training parameters")?
        .with_observer(Box::new(CsvReportObserver::new(io::stdout())));
    if args.progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }

    // Tile spawns draw from a stream separate from policy draws.
    let env_seed = args
        .seed
        .map_or_else(rand::random, |seed| seed.wrapping_add(1));
    let mut env = Game2048::new(env_seed).with_illegal_move_ends_episode(!args.allow_illegal_moves);

    info!(episodes = config.episodes, states_loaded, "starting training");
    let result = pipeline.run(&mut env, &mut knowledge)?;

    println!(
        "{} moves took {:?}. {:.1} moves per second",
        result.total_moves, result.elapsed, result.moves_per_second
    );
    println!("{knowledge}");

    let metadata = TrainingMetadata {
        episodes_trained: Some(episodes_before + result.episodes),
        alpha: Some(config.alpha),
        epsilon: Some(config.epsilon),
        lambda: Some(config.lambda),
        seed: config.seed,
        saved_at: timestamp(),
    };
    let saved = SavedKnowledge::new(knowledge, metadata);

    if let Some(output_path) = &args.output {
        repository
            .save(&saved, output_path)
            .with_context(|| format!("Failed to save knowledge to {}", output_path.display()))?;
        println!("Knowledge saved to: {}", output_path.display());
    }

    if let Some(raw) = &args.summary {
        let summary_path = sanitize_summary_path(raw);
        if let Some(parent) = summary_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let summary = TrainingSummaryFile {
            training: &result,
            config: &config,
            episodes_before,
            states_loaded,
        };
        let file = File::create(&summary_path)?;
        to_writer_pretty(file, &summary)?;
        println!("Summary written to {}", summary_path.display());
    }

    let mut stdout = io::stdout().lock();
    saved.knowledge().write_dump(&mut stdout, args.dump)?;
    stdout.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_path_normalization() {
        assert_eq!(
            sanitize_summary_path(Path::new("out/run")),
            PathBuf::from("out/run.json")
        );
        assert_eq!(
            sanitize_summary_path(Path::new("out/run.JSON")),
            PathBuf::from("out/run.JSON")
        );
        let dir = format!("out{}", std::path::MAIN_SEPARATOR);
        assert_eq!(
            sanitize_summary_path(Path::new(&dir)),
            Path::new("out").join("training_summary.json")
        );
    }

    #[test]
    fn test_args_defaults() {
        let args = TrainArgs::parse_from(["train"]);
        let config = args.training_config();
        assert_eq!(config, TrainingConfig::default());
        assert_eq!(args.dump, 10);
        assert!(args.input.is_none());
        assert!(!args.allow_illegal_moves);
    }
}

//! Training pipeline
//!
//! This module provides the pieces of the learning loop:
//! - Rolling out one episode under an ε-greedy policy
//! - Turning a trajectory into truncated TD(λ) targets
//! - Rolling statistics and the periodic report stream
//! - Observers that turn reports into CSV, progress bars or in-memory metrics

pub mod episode;
pub mod observers;
pub mod returns;
pub mod stats;
pub mod training;

pub use episode::{DEFAULT_MAX_STEPS, EpisodeOutcome, EpisodeRunner, Trajectory, TrajectoryStep};
// Re-export observer implementations (adapters)
pub use observers::{CsvReportObserver, MetricsObserver, ProgressObserver};
pub use returns::{MAX_RETURN_TERMS, ReturnEstimator, td_lambda_targets};
pub use stats::{EpisodeSummary, ROLLING_WINDOW, ReportRecord, RollingWindow, TrainingStats};
pub use training::{TrainingConfig, TrainingPipeline, TrainingResult};

pub use crate::ports::Observer;

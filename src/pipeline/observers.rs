//! Observer implementations for training pipelines
//!
//! Observers allow composable reporting during training without coupling
//! the training loop to specific output formats.

use std::{
    io::Write,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use indicatif::{ProgressBar, ProgressStyle};

use super::{
    stats::{EpisodeSummary, ReportRecord},
    training::TrainingResult,
};
use crate::{Result, ports::Observer};

/// CSV observer - writes the report stream
///
/// Emits the header when training starts and one record per report.
pub struct CsvReportObserver<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvReportObserver<W> {
    pub fn new(inner: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        Self { writer }
    }

    /// Flush and return the underlying writer
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| crate::Error::from(e.into_error()))
    }
}

impl<W: Write> Observer for CsvReportObserver<W> {
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        self.writer.write_record(ReportRecord::HEADER)?;
        self.writer.flush()?;
        Ok(())
    }

    fn on_report(&mut self, record: &ReportRecord) -> Result<()> {
        self.writer.serialize(record)?;
        self.writer.flush()?;
        Ok(())
    }

    fn on_training_end(&mut self, _result: &TrainingResult) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self { progress_bar: None }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, summary: &EpisodeSummary) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.set_position(episode as u64 + 1);
            pb.set_message(format!("states:{}", summary.states_known));
        }
        Ok(())
    }

    fn on_training_end(&mut self, result: &TrainingResult) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(format!("states:{}", result.states_known));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Metrics {
    reports: Vec<ReportRecord>,
    episodes: usize,
    total_steps: usize,
    truncated: usize,
}

/// Metrics observer - keeps every report in memory
///
/// Clones share storage, so a clone handed to a pipeline can be read back
/// through the handle that was kept after training.
#[derive(Debug, Clone, Default)]
pub struct MetricsObserver {
    inner: Arc<Mutex<Metrics>>,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self::default()
    }

    fn metrics(&self) -> MutexGuard<'_, Metrics> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All report records so far
    pub fn reports(&self) -> Vec<ReportRecord> {
        self.metrics().reports.clone()
    }

    pub fn last_report(&self) -> Option<ReportRecord> {
        self.metrics().reports.last().cloned()
    }

    pub fn episodes(&self) -> usize {
        self.metrics().episodes
    }

    pub fn truncated_episodes(&self) -> usize {
        self.metrics().truncated
    }

    /// Get average episode length
    pub fn avg_episode_length(&self) -> f64 {
        let metrics = self.metrics();
        if metrics.episodes == 0 {
            0.0
        } else {
            metrics.total_steps as f64 / metrics.episodes as f64
        }
    }
}

impl Observer for MetricsObserver {
    fn on_episode_end(&mut self, _episode: usize, summary: &EpisodeSummary) -> Result<()> {
        let mut metrics = self.metrics();
        metrics.episodes += 1;
        metrics.total_steps += summary.steps;
        if summary.truncated {
            metrics.truncated += 1;
        }
        Ok(())
    }

    fn on_report(&mut self, record: &ReportRecord) -> Result<()> {
        self.metrics().reports.push(record.clone());
        Ok(())
    }
}

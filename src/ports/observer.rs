//! Observer port - abstraction for training observation and reporting
//!
//! This port defines the interface for observing training events,
//! allowing composable reporting without coupling the training loop
//! to specific output formats.

use crate::{
    Result,
    pipeline::{EpisodeSummary, ReportRecord, TrainingResult},
};

/// Observer trait for monitoring training
///
/// Observers can be composed to collect different kinds of output during
/// training:
/// - CSV report stream
/// - Progress bars for user feedback
/// - In-memory metrics for tests and summaries
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - Once at the beginning
/// 2. For each episode:
///    - `on_episode_end(episode, summary)`
///    - `on_report(record)` - Only on reporting episodes
/// 3. `on_training_end(result)` - Once at the end
///
/// # Examples
///
/// ```no_run
/// use td2048::{pipeline::EpisodeSummary, ports::Observer};
///
/// struct StepCounter {
///     steps: usize,
/// }
///
/// impl Observer for StepCounter {
///     fn on_episode_end(
///         &mut self,
///         _episode: usize,
///         summary: &EpisodeSummary,
///     ) -> td2048::Result<()> {
///         self.steps += summary.steps;
///         Ok(())
///     }
/// }
/// ```
pub trait Observer {
    /// Called when training starts.
    ///
    /// # Default Implementation
    ///
    /// Does nothing. Override to initialize observation state.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each episode has been folded into the knowledge base.
    ///
    /// # Parameters
    ///
    /// * `episode` - Index of the episode (0-based)
    /// * `summary` - Per-episode figures (steps, reward, MSE, ...)
    fn on_episode_end(&mut self, _episode: usize, _summary: &EpisodeSummary) -> Result<()> {
        Ok(())
    }

    /// Called every `report_frequency` episodes with the rolling summary.
    fn on_report(&mut self, _record: &ReportRecord) -> Result<()> {
        Ok(())
    }

    /// Called when training completes.
    ///
    /// Use this to flush writers or finish progress displays.
    fn on_training_end(&mut self, _result: &TrainingResult) -> Result<()> {
        Ok(())
    }
}

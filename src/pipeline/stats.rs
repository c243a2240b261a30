//! Rolling training statistics and report records

use serde::{Deserialize, Serialize};

/// Episodes covered by the rolling averages
pub const ROLLING_WINDOW: usize = 100;

/// Fixed-size circular buffer of recent values.
///
/// Starts zero-filled and the mean always divides by the full capacity, so
/// averages ramp up over the first `capacity` episodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingWindow {
    values: Vec<f64>,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            values: vec![0.0; capacity.max(1)],
        }
    }

    pub fn capacity(&self) -> usize {
        self.values.len()
    }

    /// Overwrite the slot for `episode`
    pub fn record(&mut self, episode: usize, value: f64) {
        let slot = episode % self.values.len();
        self.values[slot] = value;
    }

    pub fn mean(&self) -> f64 {
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }
}

impl Default for RollingWindow {
    fn default() -> Self {
        Self::new(ROLLING_WINDOW)
    }
}

/// Figures for one trained episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub steps: usize,
    pub cumulative_reward: f64,
    pub best_actions_used: usize,
    pub highest_tile: u32,
    /// Mean squared error of the pre-update estimates against the targets
    pub mse: f64,
    pub truncated: bool,
    /// Known states after the episode was folded in
    pub states_known: usize,
}

/// One line of the CSV report stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    #[serde(rename = "Episode")]
    pub episode: usize,
    #[serde(rename = "Steps")]
    pub steps: usize,
    /// Rolling mean cumulative reward
    #[serde(rename = "Cumulative reward")]
    pub cumulative_reward: f64,
    #[serde(rename = "High score")]
    pub high_score: f64,
    /// Rolling mean highest tile
    #[serde(rename = "Highest tile")]
    pub highest_tile: f64,
    #[serde(rename = "Best actions used")]
    pub best_actions_used: usize,
    #[serde(rename = "States known")]
    pub states_known: usize,
    #[serde(rename = "States learnt since previous report")]
    pub states_learnt: usize,
    /// Rolling mean squared error
    #[serde(rename = "mse")]
    pub mse: f64,
}

impl ReportRecord {
    /// Column names, in field order
    pub const HEADER: [&'static str; 9] = [
        "Episode",
        "Steps",
        "Cumulative reward",
        "High score",
        "Highest tile",
        "Best actions used",
        "States known",
        "States learnt since previous report",
        "mse",
    ];
}

/// Accumulated reporting state, threaded through each training step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingStats {
    mse: RollingWindow,
    cumulative_reward: RollingWindow,
    highest_tile: RollingWindow,
    /// Best cumulative reward of any episode
    pub high_score: f64,
    /// Known states at the last report
    pub previous_knowledge_size: usize,
    /// Steps played across all episodes
    pub total_moves: usize,
    pub episodes_completed: usize,
    pub truncated_episodes: usize,
}

impl TrainingStats {
    pub fn new() -> Self {
        Self::with_window(ROLLING_WINDOW)
    }

    pub fn with_window(capacity: usize) -> Self {
        Self {
            mse: RollingWindow::new(capacity),
            cumulative_reward: RollingWindow::new(capacity),
            highest_tile: RollingWindow::new(capacity),
            high_score: 0.0,
            previous_knowledge_size: 0,
            total_moves: 0,
            episodes_completed: 0,
            truncated_episodes: 0,
        }
    }

    /// Baseline the "states learnt" column against already-loaded knowledge
    pub fn with_known_states(mut self, states: usize) -> Self {
        self.previous_knowledge_size = states;
        self
    }

    /// Fold one episode into the rolling windows and counters
    pub fn record(&mut self, episode: usize, summary: &EpisodeSummary) {
        self.mse.record(episode, summary.mse);
        self.cumulative_reward
            .record(episode, summary.cumulative_reward);
        self.highest_tile
            .record(episode, f64::from(summary.highest_tile));

        if summary.cumulative_reward > self.high_score {
            self.high_score = summary.cumulative_reward;
        }
        self.total_moves += summary.steps;
        self.episodes_completed += 1;
        if summary.truncated {
            self.truncated_episodes += 1;
        }
    }

    /// Build the report line for `episode` and restart the learnt-states count
    pub fn report(&mut self, episode: usize, summary: &EpisodeSummary) -> ReportRecord {
        let record = ReportRecord {
            episode,
            steps: summary.steps,
            cumulative_reward: self.mean_cumulative_reward(),
            high_score: self.high_score,
            highest_tile: self.mean_highest_tile(),
            best_actions_used: summary.best_actions_used,
            states_known: summary.states_known,
            states_learnt: summary
                .states_known
                .saturating_sub(self.previous_knowledge_size),
            mse: self.mean_mse(),
        };
        self.previous_knowledge_size = summary.states_known;
        record
    }

    pub fn mean_mse(&self) -> f64 {
        self.mse.mean()
    }

    pub fn mean_cumulative_reward(&self) -> f64 {
        self.cumulative_reward.mean()
    }

    pub fn mean_highest_tile(&self) -> f64 {
        self.highest_tile.mean()
    }
}

impl Default for TrainingStats {
    fn default() -> Self {
        Self::new()
    }
}

//! Training loop for the tabular agent

use std::time::{Duration, Instant};

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    episode::{DEFAULT_MAX_STEPS, EpisodeRunner},
    returns::ReturnEstimator,
    stats::{EpisodeSummary, TrainingStats},
};
use crate::{
    Error, Result,
    knowledge::KnowledgeBase,
    policy::EpsilonGreedy,
    ports::{Environment, Observer},
};

/// Training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of episodes to play
    pub episodes: usize,

    /// Emit a report every this many episodes (episode 0 always reports)
    pub report_frequency: usize,

    /// Step size α of the incremental average
    pub alpha: f64,

    /// Exploration probability ε
    pub epsilon: f64,

    /// Return decay λ
    pub lambda: f64,

    /// Hard cap on steps per episode
    pub max_steps: usize,

    /// Random seed for policy draws and tie-breaks
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 10_000,
            report_frequency: 100,
            alpha: 0.1,
            epsilon: 0.1,
            lambda: 0.9,
            max_steps: DEFAULT_MAX_STEPS,
            seed: None,
        }
    }
}

impl TrainingConfig {
    /// Reject parameter combinations the learning rule cannot use
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(Error::InvalidConfiguration { message });

        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return invalid(format!("alpha must be in (0, 1], got {}", self.alpha));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return invalid(format!("epsilon must be in [0, 1], got {}", self.epsilon));
        }
        if !(0.0..1.0).contains(&self.lambda) {
            return invalid(format!("lambda must be in [0, 1), got {}", self.lambda));
        }
        if self.report_frequency == 0 {
            return invalid("report frequency must be at least 1".to_string());
        }
        if self.max_steps == 0 {
            return invalid("max steps must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Result of a training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Episodes played
    pub episodes: usize,

    /// Steps played across all episodes
    pub total_moves: usize,

    /// Wall-clock time of the run
    pub elapsed: Duration,

    /// Throughput in steps per second
    pub moves_per_second: f64,

    /// Best cumulative reward of any episode
    pub high_score: f64,

    /// Known states at the end of the run
    pub states_known: usize,

    /// Rolling statistics at the end of the run
    pub stats: TrainingStats,
}

impl TrainingResult {
    pub fn new(stats: TrainingStats, elapsed: Duration, states_known: usize) -> Self {
        let seconds = elapsed.as_secs_f64();
        let moves_per_second = if seconds > 0.0 {
            stats.total_moves as f64 / seconds
        } else {
            0.0
        };

        Self {
            episodes: stats.episodes_completed,
            total_moves: stats.total_moves,
            elapsed,
            moves_per_second,
            high_score: stats.high_score,
            states_known,
            stats,
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Training pipeline: plays episodes, computes returns, updates knowledge
pub struct TrainingPipeline {
    config: TrainingConfig,
    runner: EpisodeRunner,
    estimator: ReturnEstimator,
    rng: StdRng,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the config fails validation.
    pub fn new(config: TrainingConfig) -> Result<Self> {
        config.validate()?;
        let policy = EpsilonGreedy::new(config.epsilon)?;
        let estimator = ReturnEstimator::new(config.lambda)?;

        Ok(Self {
            runner: EpisodeRunner::new(policy, config.max_steps),
            estimator,
            rng: build_rng(config.seed),
            observers: Vec::new(),
            config,
        })
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Run every configured episode against `env`, updating `knowledge`
    pub fn run<E>(&mut self, env: &mut E, knowledge: &mut KnowledgeBase) -> Result<TrainingResult>
    where
        E: Environment + ?Sized,
    {
        let start = Instant::now();
        let mut stats = TrainingStats::new().with_known_states(knowledge.size());

        for observer in &mut self.observers {
            observer.on_training_start(self.config.episodes)?;
        }

        for episode in 0..self.config.episodes {
            let (next, _) = self.train_episode(env, knowledge, stats, episode)?;
            stats = next;
        }

        let result = TrainingResult::new(stats, start.elapsed(), knowledge.size());

        for observer in &mut self.observers {
            observer.on_training_end(&result)?;
        }

        Ok(result)
    }

    /// Play and learn from a single episode.
    ///
    /// `stats` is consumed and the updated value returned, so the rolling
    /// windows can be inspected between episodes.
    pub fn train_episode<E>(
        &mut self,
        env: &mut E,
        knowledge: &mut KnowledgeBase,
        mut stats: TrainingStats,
        episode: usize,
    ) -> Result<(TrainingStats, EpisodeSummary)>
    where
        E: Environment + ?Sized,
    {
        let outcome = self.runner.run(env, knowledge, &mut self.rng);
        let targets = self.estimator.targets(&outcome.trajectory);

        // Errors are measured against estimates from before this episode.
        let squared_error: f64 = outcome
            .trajectory
            .steps()
            .iter()
            .zip(&targets)
            .map(|(step, target)| {
                let error = target - knowledge.get_estimate(&step.state, step.action);
                error * error
            })
            .sum();
        let mse = if targets.is_empty() {
            0.0
        } else {
            squared_error / targets.len() as f64
        };

        for (step, target) in outcome.trajectory.into_steps().into_iter().zip(targets) {
            knowledge.add(step.state, step.action, target, self.config.alpha);
        }

        let summary = EpisodeSummary {
            steps: outcome.steps,
            cumulative_reward: outcome.cumulative_reward,
            best_actions_used: outcome.best_actions_used,
            highest_tile: outcome.highest_tile,
            mse,
            truncated: outcome.truncated,
            states_known: knowledge.size(),
        };
        stats.record(episode, &summary);

        for observer in &mut self.observers {
            observer.on_episode_end(episode, &summary)?;
        }

        if episode.is_multiple_of(self.config.report_frequency) {
            let record = stats.report(episode, &summary);
            debug!(episode, states = record.states_known, "report");
            for observer in &mut self.observers {
                observer.on_report(&record)?;
            }
        }

        Ok((stats, summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        game::Game2048,
        ports::{Step, StepInfo},
        types::Action,
    };

    fn small_config() -> TrainingConfig {
        TrainingConfig {
            episodes: 20,
            report_frequency: 5,
            seed: Some(42),
            ..TrainingConfig::default()
        }
    }

    #[test]
    fn test_defaults_match_documented_values() {
        let config = TrainingConfig::default();
        assert_eq!(config.alpha, 0.1);
        assert_eq!(config.epsilon, 0.1);
        assert_eq!(config.lambda, 0.9);
        assert_eq!(config.episodes, 10_000);
        assert_eq!(config.report_frequency, 100);
        assert_eq!(config.max_steps, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_configs_are_rejected() {
        let cases = [
            TrainingConfig {
                alpha: 0.0,
                ..TrainingConfig::default()
            },
            TrainingConfig {
                epsilon: 1.1,
                ..TrainingConfig::default()
            },
            TrainingConfig {
                lambda: 1.0,
                ..TrainingConfig::default()
            },
            TrainingConfig {
                report_frequency: 0,
                ..TrainingConfig::default()
            },
            TrainingConfig {
                max_steps: 0,
                ..TrainingConfig::default()
            },
        ];
        for config in cases {
            assert!(matches!(
                TrainingPipeline::new(config),
                Err(Error::InvalidConfiguration { .. })
            ));
        }
    }

    #[test]
    fn test_training_pipeline_on_2048() {
        let mut pipeline = TrainingPipeline::new(small_config()).unwrap();
        let mut env = Game2048::new(7);
        let mut knowledge = KnowledgeBase::new();

        let result = pipeline.run(&mut env, &mut knowledge).unwrap();

        assert_eq!(result.episodes, 20);
        assert!(result.total_moves >= 20);
        assert!(knowledge.size() > 0);
        assert_eq!(result.states_known, knowledge.size());

        let visits: u64 = knowledge.iter().map(|(_, node)| node.visit_count()).sum();
        assert_eq!(visits as usize, result.total_moves);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let run = || {
            let mut pipeline = TrainingPipeline::new(small_config()).unwrap();
            let mut env = Game2048::new(3);
            let mut knowledge = KnowledgeBase::new();
            let result = pipeline.run(&mut env, &mut knowledge).unwrap();
            (result.total_moves, result.high_score, knowledge)
        };

        let (moves_a, score_a, knowledge_a) = run();
        let (moves_b, score_b, knowledge_b) = run();
        assert_eq!(moves_a, moves_b);
        assert_eq!(score_a, score_b);
        assert_eq!(knowledge_a, knowledge_b);
    }

    /// Three unit-reward steps through distinct states, then done.
    struct ThreeSteps {
        position: u32,
    }

    impl Environment for ThreeSteps {
        type Observation = [u32; 1];

        fn reset(&mut self) -> [u32; 1] {
            self.position = 0;
            [0]
        }

        fn step(&mut self, _action: Action) -> Step<[u32; 1]> {
            self.position += 1;
            Step {
                observation: [self.position],
                reward: 1.0,
                done: self.position == 3,
                info: StepInfo::default(),
            }
        }

        fn sample_action(&mut self) -> Action {
            Action::Up
        }

        fn highest_tile(&self) -> u32 {
            self.position
        }
    }

    #[test]
    fn test_mse_uses_pre_update_estimates() {
        let config = TrainingConfig {
            episodes: 2,
            report_frequency: 1,
            alpha: 1.0,
            epsilon: 0.0,
            seed: Some(1),
            ..TrainingConfig::default()
        };
        let mut pipeline = TrainingPipeline::new(config).unwrap();
        let mut env = ThreeSteps { position: 0 };
        let mut knowledge = KnowledgeBase::new();

        // Targets for three unit rewards at λ=0.9 are [0.271, 0.19, 0.1];
        // the first episode measures them against zero priors.
        let (stats, first) = pipeline
            .train_episode(&mut env, &mut knowledge, TrainingStats::new(), 0)
            .unwrap();
        let expected = (0.271_f64.powi(2) + 0.19_f64.powi(2) + 0.1_f64.powi(2)) / 3.0;
        assert!((first.mse - expected).abs() < 1e-12);
        assert_eq!(first.best_actions_used, 0);

        // α=1 copied the targets in, so replaying the same path is error-free.
        let (stats, second) = pipeline
            .train_episode(&mut env, &mut knowledge, stats, 1)
            .unwrap();
        assert!(second.mse.abs() < 1e-12);
        assert_eq!(second.best_actions_used, 3);
        assert_eq!(stats.episodes_completed, 2);
        assert_eq!(stats.high_score, 3.0);
    }
}

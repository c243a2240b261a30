//! Single-episode rollout

use rand::Rng;
use tracing::debug;

use crate::{
    knowledge::KnowledgeBase,
    policy::EpsilonGreedy,
    ports::Environment,
    types::{Action, Fingerprint},
};

/// Default hard cap on steps per episode
pub const DEFAULT_MAX_STEPS: usize = 1000;

/// One recorded step: the state acted from, the action, and its reward
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryStep {
    pub state: Fingerprint,
    pub action: Action,
    pub reward: f64,
}

/// Ordered record of one episode
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    steps: Vec<TrajectoryStep>,
}

impl Trajectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, state: Fingerprint, action: Action, reward: f64) {
        self.steps.push(TrajectoryStep {
            state,
            action,
            reward,
        });
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[TrajectoryStep] {
        &self.steps
    }

    /// Per-step rewards in order
    pub fn rewards(&self) -> Vec<f64> {
        self.steps.iter().map(|step| step.reward).collect()
    }

    pub fn into_steps(self) -> Vec<TrajectoryStep> {
        self.steps
    }
}

/// Everything the training loop needs from one played episode
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeOutcome {
    pub trajectory: Trajectory,
    /// Steps played
    pub steps: usize,
    pub cumulative_reward: f64,
    /// Decisions taken from knowledge rather than sampled
    pub best_actions_used: usize,
    /// Highest tile on the final board
    pub highest_tile: u32,
    /// Stopped by the step cap rather than by the environment
    pub truncated: bool,
}

/// Plays episodes with an ε-greedy policy over read-only knowledge
#[derive(Debug, Clone, Copy)]
pub struct EpisodeRunner {
    policy: EpsilonGreedy,
    max_steps: usize,
}

impl EpisodeRunner {
    pub fn new(policy: EpsilonGreedy, max_steps: usize) -> Self {
        Self { policy, max_steps }
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Play one episode to termination or the step cap.
    pub fn run<E, R>(&self, env: &mut E, knowledge: &KnowledgeBase, rng: &mut R) -> EpisodeOutcome
    where
        E: Environment + ?Sized,
        R: Rng + ?Sized,
    {
        let mut observation = env.reset();
        let mut trajectory = Trajectory::new();
        let mut cumulative_reward = 0.0;
        let mut best_actions_used = 0;
        let mut done = false;

        while !done && trajectory.len() < self.max_steps {
            let state = Fingerprint::from_cells(observation.as_ref());
            let decision = self.policy.select(knowledge, &state, env, rng);
            if decision.exploited {
                best_actions_used += 1;
            }

            let step = env.step(decision.action);
            trajectory.push(state, decision.action, step.reward);
            cumulative_reward += step.reward;
            observation = step.observation;
            done = step.done;
        }

        let steps = trajectory.len();
        let truncated = !done;
        if truncated {
            debug!(steps, "episode truncated at step cap");
        }

        EpisodeOutcome {
            trajectory,
            steps,
            cumulative_reward,
            best_actions_used,
            highest_tile: env.highest_tile(),
            truncated,
        }
    }
}

//! Epsilon-greedy action selection

use rand::Rng;

use crate::{
    Error, Result,
    knowledge::KnowledgeBase,
    ports::Environment,
    types::{Action, Fingerprint},
};

/// An action together with how it was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub action: Action,
    /// Chosen as the best known action rather than sampled
    pub exploited: bool,
}

/// ε-greedy selector over a [`KnowledgeBase`].
///
/// Draws `r` uniformly from [0, 1). When `r > ε` and the state has been seen
/// before, the node's best action is played. Otherwise the environment
/// samples a random action, so unseen states are always explored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpsilonGreedy {
    epsilon: f64,
}

impl EpsilonGreedy {
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] unless `0 <= epsilon <= 1`.
    pub fn new(epsilon: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&epsilon) {
            return Err(Error::InvalidConfiguration {
                message: format!("epsilon must be in [0, 1], got {epsilon}"),
            });
        }
        Ok(Self { epsilon })
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn select<E, R>(
        &self,
        knowledge: &KnowledgeBase,
        state: &Fingerprint,
        env: &mut E,
        rng: &mut R,
    ) -> Decision
    where
        E: Environment + ?Sized,
        R: Rng + ?Sized,
    {
        if rng.random::<f64>() > self.epsilon {
            if let Some(node) = knowledge.get_node(state) {
                return Decision {
                    action: node.best_action(rng),
                    exploited: true,
                };
            }
        }

        Decision {
            action: env.sample_action(),
            exploited: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::ports::{Step, StepInfo};

    /// Samples always return `Up`, so any other action came from knowledge.
    struct UpOnly;

    impl Environment for UpOnly {
        type Observation = [u32; 1];

        fn reset(&mut self) -> [u32; 1] {
            [0]
        }

        fn step(&mut self, _action: Action) -> Step<[u32; 1]> {
            Step {
                observation: [0],
                reward: 0.0,
                done: true,
                info: StepInfo::default(),
            }
        }

        fn sample_action(&mut self) -> Action {
            Action::Up
        }

        fn highest_tile(&self) -> u32 {
            0
        }
    }

    fn knowledge_preferring_left(state: &Fingerprint) -> KnowledgeBase {
        let mut knowledge = KnowledgeBase::new();
        knowledge.add(state.clone(), Action::Left, 10.0, 1.0);
        knowledge
    }

    #[test]
    fn test_rejects_out_of_range_epsilon() {
        assert!(EpsilonGreedy::new(-0.1).is_err());
        assert!(EpsilonGreedy::new(1.5).is_err());
        assert!(EpsilonGreedy::new(0.0).is_ok());
        assert!(EpsilonGreedy::new(1.0).is_ok());
    }

    #[test]
    fn test_unknown_state_always_explores() {
        let policy = EpsilonGreedy::new(0.0).unwrap();
        let knowledge = KnowledgeBase::new();
        let state = Fingerprint::from_cells(&[1, 2, 3]);
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..100 {
            let decision = policy.select(&knowledge, &state, &mut UpOnly, &mut rng);
            assert_eq!(decision.action, Action::Up);
            assert!(!decision.exploited);
        }
    }

    #[test]
    fn test_zero_epsilon_exploits_known_state() {
        let policy = EpsilonGreedy::new(0.0).unwrap();
        let state = Fingerprint::from_cells(&[4]);
        let knowledge = knowledge_preferring_left(&state);
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..100 {
            let decision = policy.select(&knowledge, &state, &mut UpOnly, &mut rng);
            assert_eq!(decision.action, Action::Left);
            assert!(decision.exploited);
        }
    }

    #[test]
    fn test_full_epsilon_never_exploits() {
        let policy = EpsilonGreedy::new(1.0).unwrap();
        let state = Fingerprint::from_cells(&[4]);
        let knowledge = knowledge_preferring_left(&state);
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..100 {
            let decision = policy.select(&knowledge, &state, &mut UpOnly, &mut rng);
            assert!(!decision.exploited);
        }
    }

    #[test]
    fn test_exploration_rate_matches_epsilon() {
        let policy = EpsilonGreedy::new(0.3).unwrap();
        let state = Fingerprint::from_cells(&[4]);
        let knowledge = knowledge_preferring_left(&state);
        let mut rng = StdRng::seed_from_u64(17);

        let trials = 10_000;
        let explored = (0..trials)
            .filter(|_| !policy.select(&knowledge, &state, &mut UpOnly, &mut rng).exploited)
            .count();
        let rate = explored as f64 / trials as f64;
        assert!((rate - 0.3).abs() < 0.03, "exploration rate {rate}");
    }
}

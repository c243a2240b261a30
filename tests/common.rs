//! Common test utilities for the td2048 test suite.
//!
//! Deterministic mock environments shared across integration tests.

#![allow(dead_code)]

use rand::{Rng, SeedableRng, rngs::StdRng};
use td2048::{
    Action,
    ports::{Environment, Step, StepInfo},
};

/// Pays a reward of 1 per step and ends after a fixed number of steps.
///
/// Observations are the step index, so every episode visits the same
/// sequence of states whatever the actions.
pub struct ConstantRewardEnv {
    position: u32,
    length: u32,
    rng: StdRng,
}

impl ConstantRewardEnv {
    pub fn new(length: u32, seed: u64) -> Self {
        Self {
            position: 0,
            length,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Environment for ConstantRewardEnv {
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
            done: self.position >= self.length,
            info: StepInfo::default(),
        }
    }

    fn sample_action(&mut self) -> Action {
        Action::ALL[self.rng.random_range(0..Action::ALL.len())]
    }

    fn highest_tile(&self) -> u32 {
        self.position
    }
}

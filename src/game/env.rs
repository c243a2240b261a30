//! Seeded 2048 environment

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    game::board::Board,
    ports::{Environment, Step, StepInfo},
    types::Action,
};

/// The 2048 game behind the [`Environment`] port.
///
/// Rewards are the sum of tiles created by merges. A move that leaves the
/// board unchanged is illegal; by default it ends the episode with zero
/// reward.
#[derive(Debug, Clone)]
pub struct Game2048 {
    board: Board,
    score: u64,
    illegal_move_ends_episode: bool,
    rng: StdRng,
}

impl Game2048 {
    /// Create a game whose tile spawns and sampled actions derive from `seed`
    pub fn new(seed: u64) -> Self {
        Self {
            board: Board::EMPTY,
            score: 0,
            illegal_move_ends_episode: true,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Choose whether an illegal move ends the episode (`true`, the
    /// default) or is a zero-reward no-op.
    pub fn with_illegal_move_ends_episode(mut self, ends: bool) -> Self {
        self.illegal_move_ends_episode = ends;
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Cumulative merge score of the current episode
    pub fn score(&self) -> u64 {
        self.score
    }
}

impl Environment for Game2048 {
    type Observation = Board;

    fn reset(&mut self) -> Board {
        self.score = 0;
        self.board = Board::EMPTY
            .with_random_tile(&mut self.rng)
            .with_random_tile(&mut self.rng);
        self.board
    }

    fn step(&mut self, action: Action) -> Step<Board> {
        let (shifted, merged) = self.board.shift(action);

        if shifted == self.board {
            return Step {
                observation: self.board,
                reward: 0.0,
                done: self.illegal_move_ends_episode || !self.board.has_moves(),
                info: StepInfo { illegal_move: true },
            };
        }

        self.score += u64::from(merged);
        self.board = shifted.with_random_tile(&mut self.rng);

        Step {
            observation: self.board,
            reward: f64::from(merged),
            done: !self.board.has_moves(),
            info: StepInfo::default(),
        }
    }

    fn sample_action(&mut self) -> Action {
        Action::ALL[self.rng.random_range(0..Action::ALL.len())]
    }

    fn highest_tile(&self) -> u32 {
        self.board.highest_tile()
    }
}

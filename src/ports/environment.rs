//! Environment port - abstraction over the game being learned
//!
//! The learning core only ever talks to this trait. Any game whose
//! observations flatten to a slice of integers can be trained against.

use crate::types::Action;

/// Diagnostic side-channel returned with every step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepInfo {
    /// The requested move did not change the board
    pub illegal_move: bool,
}

/// Result of applying one action
#[derive(Debug, Clone, PartialEq)]
pub struct Step<O> {
    /// Observation after the action
    pub observation: O,
    /// Immediate reward for the action
    pub reward: f64,
    /// The episode has ended
    pub done: bool,
    pub info: StepInfo,
}

/// Environment trait - fixed capability interface for a single-agent game
///
/// # Design Philosophy
///
/// This trait represents a **port** in hexagonal architecture. The training
/// pipeline depends on it, concrete games are **adapters** that implement
/// it.
///
/// # Examples
///
/// ```
/// use td2048::{
///     ports::{Environment, Step, StepInfo},
///     types::Action,
/// };
///
/// struct Corridor {
///     position: u32,
/// }
///
/// impl Environment for Corridor {
///     type Observation = [u32; 1];
///
///     fn reset(&mut self) -> Self::Observation {
///         self.position = 0;
///         [self.position]
///     }
///
///     fn step(&mut self, _action: Action) -> Step<Self::Observation> {
///         self.position += 1;
///         Step {
///             observation: [self.position],
///             reward: 1.0,
///             done: self.position == 5,
///             info: StepInfo::default(),
///         }
///     }
///
///     fn sample_action(&mut self) -> Action {
///         Action::Right
///     }
///
///     fn highest_tile(&self) -> u32 {
///         self.position
///     }
/// }
/// ```
pub trait Environment {
    /// Observation type; flattened cells become the state fingerprint
    type Observation: AsRef<[u32]>;

    /// Start a new episode and return the initial observation.
    fn reset(&mut self) -> Self::Observation;

    /// Apply `action` to the current state.
    fn step(&mut self, action: Action) -> Step<Self::Observation>;

    /// Draw a uniformly random action from the action space.
    fn sample_action(&mut self) -> Action;

    /// Highest tile reached in the current episode.
    fn highest_tile(&self) -> u32;
}

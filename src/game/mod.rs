//! 2048 game implementation
//!
//! A plain array board plus an [`Environment`](crate::ports::Environment)
//! adapter. The learning core never depends on this module directly.

pub mod board;
pub mod env;

pub use board::Board;
pub use env::Game2048;

//! Tabular TD(λ) learning for 2048
//!
//! This crate provides:
//! - A deterministic, seedable 2048 environment behind an `Environment` port
//! - A state-keyed knowledge base of incremental action-value estimates
//! - An ε-greedy policy with uniform random tie-breaking
//! - A training pipeline with truncated λ-returns and rolling statistics
//! - MessagePack persistence of learned knowledge

pub mod adapters;
pub mod cli;
pub mod error;
pub mod game;
pub mod knowledge;
pub mod pipeline;
pub mod policy;
pub mod ports;
pub mod types;

pub use error::{Error, Result};
pub use knowledge::{ActionValueNode, KnowledgeBase};
pub use types::{Action, Fingerprint};

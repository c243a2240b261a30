//! Ports (trait boundaries) for external dependencies.
//!
//! This module defines the interfaces between the learning core and the
//! outside world. The core owns these traits; games, storage and reporting
//! implement them.

pub mod environment;
pub mod observer;
pub mod repository;

pub use environment::{Environment, Step, StepInfo};
pub use observer::Observer;
pub use repository::KnowledgeRepository;

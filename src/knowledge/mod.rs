//! Tabular action-value knowledge
//!
//! The agent's entire memory is a table keyed by board fingerprint. Each
//! entry ([`ActionValueNode`]) keeps a return estimate and an update count for
//! the four moves. Estimates are revised with a constant-step-size
//! incremental average:
//!
//! ```text
//! Q(s,a) ← Q(s,a) + α(G - Q(s,a))
//! ```
//!
//! where `G` is a truncated TD(λ) return computed once the episode ends.
//!
//! ## Usage Example
//!
//! ```
//! use td2048::knowledge::KnowledgeBase;
//! use td2048::types::{Action, Fingerprint};
//!
//! let mut knowledge = KnowledgeBase::new();
//! let state = Fingerprint::from_cells(&[2, 0, 0, 2]);
//!
//! assert_eq!(knowledge.get_estimate(&state, Action::Left), 0.0);
//! knowledge.add(state.clone(), Action::Left, 4.0, 0.5);
//! assert_eq!(knowledge.get_estimate(&state, Action::Left), 2.0);
//! ```

pub mod base;
pub mod node;
pub mod serialization;

pub use base::KnowledgeBase;
pub use node::ActionValueNode;
pub use serialization::{SavedKnowledge, TrainingMetadata};

//! Serialization support for learned knowledge.

use serde::{Deserialize, Serialize};

use crate::{Result, error::Error, knowledge::base::KnowledgeBase};

/// Metadata about the runs that produced a knowledge file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetadata {
    /// Episodes trained, summed across resumed runs
    pub episodes_trained: Option<usize>,
    /// Step size used by the most recent run
    pub alpha: Option<f64>,
    /// Exploration rate used by the most recent run
    pub epsilon: Option<f64>,
    /// Return decay used by the most recent run
    pub lambda: Option<f64>,
    /// Random seed of the most recent run (if any)
    pub seed: Option<u64>,
    /// Seconds since the Unix epoch when saved
    pub saved_at: Option<String>,
}

/// Versioned envelope written to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedKnowledge {
    pub version: u32,
    knowledge: KnowledgeBase,
    pub metadata: TrainingMetadata,
}

impl SavedKnowledge {
    pub const VERSION: u32 = 1;

    pub fn new(knowledge: KnowledgeBase, metadata: TrainingMetadata) -> Self {
        Self {
            version: Self::VERSION,
            knowledge,
            metadata,
        }
    }

    /// Borrow the stored knowledge without version checks
    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Unwrap the knowledge, rejecting formats this build cannot read
    pub fn into_knowledge(self) -> Result<KnowledgeBase> {
        self.check_version()?;
        Ok(self.knowledge)
    }

    pub fn check_version(&self) -> Result<()> {
        if self.version != Self::VERSION {
            return Err(Error::UnsupportedVersion {
                found: self.version,
                expected: Self::VERSION,
            });
        }
        Ok(())
    }

    /// Encode as MessagePack bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        rmp_serde::to_vec(self).map_err(|e| Error::SerializationContext {
            operation: "serialize knowledge to MessagePack".to_string(),
            message: e.to_string(),
        })
    }

    /// Decode from MessagePack bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let saved: Self =
            rmp_serde::from_slice(bytes).map_err(|e| Error::SerializationContext {
                operation: "deserialize knowledge from MessagePack".to_string(),
                message: e.to_string(),
            })?;
        saved.check_version()?;
        Ok(saved)
    }
}

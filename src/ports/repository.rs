//! Repository port for knowledge persistence.
//!
//! This module defines the trait boundary between the learning core and
//! storage of trained knowledge.

use std::path::Path;

use crate::{Result, knowledge::SavedKnowledge};

/// Port for persisting and loading trained knowledge.
///
/// # Examples
///
/// ```no_run
/// use td2048::knowledge::SavedKnowledge;
/// use td2048::ports::KnowledgeRepository;
/// use std::path::Path;
///
/// fn checkpoint<R: KnowledgeRepository>(
///     repo: &R,
///     saved: &SavedKnowledge,
///     path: &Path,
/// ) -> td2048::Result<()> {
///     repo.save(saved, path)
/// }
/// ```
pub trait KnowledgeRepository {
    /// Save knowledge to persistent storage.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The path cannot be created or written to
    /// - Serialization fails
    fn save(&self, saved: &SavedKnowledge, path: &Path) -> Result<()>;

    /// Load knowledge from persistent storage.
    ///
    /// Partially readable input is never returned; any decoding problem
    /// fails the whole load.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file does not exist or cannot be read
    /// - The content is malformed or of an unsupported version
    fn load(&self, path: &Path) -> Result<SavedKnowledge>;
}

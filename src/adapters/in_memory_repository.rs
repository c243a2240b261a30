//! In-memory knowledge repository for testing.
//!
//! This adapter provides a pure in-memory implementation of
//! KnowledgeRepository, enabling fast tests without any file system I/O.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{Result, error::Error, knowledge::SavedKnowledge, ports::KnowledgeRepository};

/// In-memory repository for testing.
///
/// Stores encoded knowledge in a shared HashMap. Bytes go through the same
/// MessagePack encoding as the on-disk adapter, so a round trip here
/// exercises the real serialization path.
///
/// # Examples
///
/// ```
/// use td2048::adapters::InMemoryRepository;
/// use td2048::knowledge::{KnowledgeBase, SavedKnowledge, TrainingMetadata};
/// use td2048::ports::KnowledgeRepository;
/// use std::path::Path;
///
/// let repo = InMemoryRepository::new();
/// let saved = SavedKnowledge::new(KnowledgeBase::new(), TrainingMetadata::default());
///
/// repo.save(&saved, Path::new("run-1"))?;
/// let loaded = repo.load(Path::new("run-1"))?;
/// assert_eq!(loaded, saved);
/// # Ok::<(), td2048::Error>(())
/// ```
///
/// # Thread Safety
///
/// All clones share the same underlying storage.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently stored.
    pub fn count(&self) -> usize {
        self.storage().len()
    }

    /// Clear all stored entries.
    pub fn clear(&self) {
        self.storage().clear();
    }

    /// Check if an entry exists at the given path.
    pub fn contains(&self, path: &Path) -> bool {
        self.storage().contains_key(&Self::key(path))
    }

    /// Store raw bytes under `path`, bypassing encoding.
    ///
    /// Lets tests plant corrupt or foreign data.
    pub fn insert_raw(&self, path: &Path, bytes: Vec<u8>) {
        self.storage().insert(Self::key(path), bytes);
    }

    fn key(path: &Path) -> String {
        path.to_string_lossy().to_string()
    }

    fn storage(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KnowledgeRepository for InMemoryRepository {
    fn save(&self, saved: &SavedKnowledge, path: &Path) -> Result<()> {
        let bytes = saved.to_bytes()?;
        self.storage().insert(Self::key(path), bytes);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedKnowledge> {
        let storage = self.storage();

        let bytes = storage.get(&Self::key(path)).ok_or_else(|| Error::Io {
            operation: format!("load knowledge from in-memory storage at {path:?}"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "key not found in memory"),
        })?;

        SavedKnowledge::from_bytes(bytes)
    }
}

//! MessagePack implementation of the knowledge repository.
//!
//! This adapter implements the KnowledgeRepository port using rmp_serde for
//! compact binary serialization.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use tracing::info;

use crate::{Result, error::Error, knowledge::SavedKnowledge, ports::KnowledgeRepository};

/// MessagePack-based knowledge repository.
///
/// # Examples
///
/// ```no_run
/// use td2048::adapters::MsgPackRepository;
/// use td2048::knowledge::{KnowledgeBase, SavedKnowledge, TrainingMetadata};
/// use td2048::ports::KnowledgeRepository;
/// use std::path::Path;
///
/// let repo = MsgPackRepository;
/// let saved = SavedKnowledge::new(KnowledgeBase::new(), TrainingMetadata::default());
///
/// repo.save(&saved, Path::new("knowledge.msgpack"))?;
/// let loaded = repo.load(Path::new("knowledge.msgpack"))?;
/// # Ok::<(), td2048::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    /// Create a new MessagePack repository.
    pub fn new() -> Self {
        Self
    }
}

impl KnowledgeRepository for MsgPackRepository {
    fn save(&self, saved: &SavedKnowledge, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, saved).map_err(|e| {
            Error::SerializationContext {
                operation: "serialize knowledge to MessagePack".to_string(),
                message: e.to_string(),
            }
        })?;
        writer.flush().map_err(|source| Error::Io {
            operation: format!("flush file {path:?}"),
            source,
        })?;

        info!(
            path = %path.display(),
            states = saved.knowledge().size(),
            "saved knowledge"
        );
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedKnowledge> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;
        let reader = BufReader::new(file);

        let saved: SavedKnowledge =
            rmp_serde::decode::from_read(reader).map_err(|e| Error::SerializationContext {
                operation: "deserialize knowledge from MessagePack".to_string(),
                message: e.to_string(),
            })?;
        saved.check_version()?;

        info!(
            path = %path.display(),
            states = saved.knowledge().size(),
            "loaded knowledge"
        );
        Ok(saved)
    }
}

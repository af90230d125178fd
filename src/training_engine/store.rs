//! Storage collaborator for the stats record.
//!
//! The trainer reads the record once at start-up and writes a full
//! replacement after every grade and every reset. Stores never see partial
//! updates.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::training_engine::stats::StoredStats;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("stats store I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed stats record: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

pub trait StatsStore {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&mut self) -> StoreResult<Option<StoredStats>>;

    fn save(&mut self, stats: &StoredStats) -> StoreResult<()>;
}

/// Keeps the serialised record in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blob: Option<String>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing JSON record (which may be malformed).
    pub fn with_blob(blob: impl Into<String>) -> Self {
        MemoryStore { blob: Some(blob.into()), saves: 0 }
    }

    pub fn blob(&self) -> Option<&str> {
        self.blob.as_deref()
    }

    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl StatsStore for MemoryStore {
    fn load(&mut self) -> StoreResult<Option<StoredStats>> {
        match &self.blob {
            Some(blob) => Ok(Some(serde_json::from_str(blob)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, stats: &StoredStats) -> StoreResult<()> {
        self.blob = Some(serde_json::to_string(stats)?);
        self.saves += 1;
        Ok(())
    }
}

/// One JSON file, replaced wholesale on every save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        JsonFileStore { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StatsStore for JsonFileStore {
    fn load(&mut self) -> StoreResult<Option<StoredStats>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(serde_json::from_str(&text)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, stats: &StoredStats) -> StoreResult<()> {
        let text = serde_json::to_string_pretty(stats)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

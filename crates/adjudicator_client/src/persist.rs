use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use adjudicator_core::StorageKey;
use tempfile::NamedTempFile;
use thiserror::Error;

/// File holding the durable key/value storage inside the storage directory.
pub const STORAGE_FILENAME: &str = "client_storage.json";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("storage directory unusable: {0}")]
    StorageDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("storage file is malformed: {0}")]
    Format(String),
}

/// Client-side storage that outlives the current job, read by later pages.
pub trait DurableStore: Send + Sync {
    fn set(&self, key: StorageKey, value: &str) -> Result<(), PersistError>;
    fn get(&self, key: StorageKey) -> Result<Option<String>, PersistError>;
}

/// Create the storage directory if needed. An existing non-directory is an error.
pub fn ensure_storage_dir(dir: &Path) -> Result<(), PersistError> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(PersistError::StorageDir(format!(
            "{} is not a directory",
            dir.display()
        ))),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(|e| PersistError::StorageDir(e.to_string()))
        }
        Err(err) => Err(PersistError::StorageDir(err.to_string())),
    }
}

/// JSON object file in a storage directory, replaced atomically on every set.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        let path = dir.join(STORAGE_FILENAME);
        Self {
            dir,
            path,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, PersistError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) if err.kind() == io::ErrorKind::NotADirectory => {
                return Err(PersistError::StorageDir(format!(
                    "{} is not a directory",
                    self.dir.display()
                )))
            }
            Err(err) => return Err(err.into()),
        };
        serde_json::from_str(&content).map_err(|e| PersistError::Format(e.to_string()))
    }

    // Readers never observe a half-written file: stage next to it, then rename.
    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), PersistError> {
        let content =
            serde_json::to_vec_pretty(entries).map_err(|e| PersistError::Format(e.to_string()))?;

        let mut staged = NamedTempFile::new_in(&self.dir)?;
        staged.write_all(&content)?;
        staged.as_file().sync_all()?;
        staged
            .persist(&self.path)
            .map_err(|e| PersistError::Io(e.error))?;
        Ok(())
    }
}

impl DurableStore for FileStore {
    fn set(&self, key: StorageKey, value: &str) -> Result<(), PersistError> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        ensure_storage_dir(&self.dir)?;
        let mut entries = self.load()?;
        entries.insert(key.as_str().to_string(), value.to_string());
        self.save(&entries)
    }

    fn get(&self, key: StorageKey) -> Result<Option<String>, PersistError> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(self.load()?.remove(key.as_str()))
    }
}

/// In-process storage for hosts without a storage directory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<StorageKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DurableStore for MemoryStore {
    fn set(&self, key: StorageKey, value: &str) -> Result<(), PersistError> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key, value.to_string());
        Ok(())
    }

    fn get(&self, key: StorageKey) -> Result<Option<String>, PersistError> {
        Ok(self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&key)
            .cloned())
    }
}

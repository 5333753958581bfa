//! Journal persistence.
//!
//! The whole journal is one JSON array stored under one key. Writes replace
//! the blob wholesale.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::log::Journal;
use crate::error::ReadingResult;

/// A string store addressed by key.
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, or `None` if nothing was stored.
    fn get(&self, key: &str) -> ReadingResult<Option<String>>;

    /// Replace the value under `key`.
    fn set(&self, key: &str, value: &str) -> ReadingResult<()>;
}

/// Stores each key as `<key>.json` inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Use `dir` for storage. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> ReadingResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> ReadingResult<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        if let Err(e) = write_synced(&tmp, value).and_then(|()| fs::rename(&tmp, &path)) {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                tracing::debug!(path = %tmp.display(), error = %cleanup, "temp file not removed");
            }
            return Err(e.into());
        }
        Ok(())
    }
}

fn write_synced(path: &Path, value: &str) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(value.as_bytes())?;
    file.sync_all()
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> ReadingResult<Option<String>> {
        Ok(self.values().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ReadingResult<()> {
        self.values().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Loads and saves the journal blob under one key.
#[derive(Clone)]
pub struct JournalStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl std::fmt::Debug for JournalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JournalStore")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl JournalStore {
    /// Persist under `key` in `store`.
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// An in-memory journal store, for tests and throwaway sessions.
    pub fn in_memory(key: impl Into<String>) -> Self {
        Self::new(Arc::new(MemoryStore::new()), key)
    }

    /// The storage key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the journal. Missing, unreadable, or malformed data yields an
    /// empty journal.
    pub fn load(&self) -> Journal {
        let text = match self.store.get(&self.key) {
            Ok(Some(text)) => text,
            Ok(None) => return Journal::new(),
            Err(e) => {
                tracing::warn!(
                    key = %self.key,
                    error = %e,
                    "journal unreadable, starting empty"
                );
                return Journal::new();
            }
        };
        match serde_json::from_str(&text) {
            Ok(journal) => journal,
            Err(e) => {
                tracing::warn!(
                    key = %self.key,
                    error = %e,
                    "journal blob malformed, starting empty"
                );
                Journal::new()
            }
        }
    }

    /// Replace the stored journal.
    pub fn save(&self, journal: &Journal) -> ReadingResult<()> {
        let text = serde_json::to_string(journal)?;
        self.store.set(&self.key, &text)
    }
}

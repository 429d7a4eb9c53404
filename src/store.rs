// src/store.rs

use crate::errors::{ColloquyError, ColloquyResult};
use log::debug;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// String-keyed persistence for session state. Mirrors the browser
/// localStorage contract the session was designed against: `load` returns
/// the raw stored string (callers decode), `save` replaces it wholesale.
pub trait KeyValueStore {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&mut self, key: &str, value: &str) -> ColloquyResult<()>;
}

/// Stores all keys in a single JSON object file. Loaded once at open;
/// every `save` rewrites the whole file so the on-disk state always
/// matches the last mutation.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileStore {
    pub fn open(path: PathBuf) -> ColloquyResult<Self> {
        let mut entries = HashMap::new();
        if path.exists() {
            let raw = fs::read_to_string(&path)
                .map_err(|e| ColloquyError::storage(format!("failed to read store file: {}", e)))?;
            match serde_json::from_str::<HashMap<String, Value>>(&raw) {
                Ok(map) => {
                    for (key, value) in map {
                        let value = match value {
                            Value::String(s) => s,
                            other => other.to_string(),
                        };
                        entries.insert(key, value);
                    }
                }
                Err(e) => {
                    // A corrupt store file loses its contents rather than
                    // taking the whole session down with it.
                    log::warn!("store file {} is not valid JSON ({}), starting empty", path.display(), e);
                }
            }
        }
        debug!("opened store at {} with {} entries", path.display(), entries.len());
        Ok(FileStore { path, entries })
    }

    /// Default location under the user's config directory.
    pub fn default_path() -> ColloquyResult<PathBuf> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| ColloquyError::storage("could not determine home directory"))?;
        Ok(home_dir.join(".config").join("colloquy").join("store.json"))
    }

    fn flush(&self) -> ColloquyResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ColloquyError::storage(format!("failed to create store directory: {}", e))
            })?;
        }
        let raw = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| ColloquyError::storage(format!("failed to serialize store: {}", e)))?;
        fs::write(&self.path, raw)
            .map_err(|e| ColloquyError::storage(format!("failed to write store file: {}", e)))
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: &str) -> ColloquyResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

/// In-memory store for tests and embedders that manage persistence
/// themselves.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: &str) -> ColloquyResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

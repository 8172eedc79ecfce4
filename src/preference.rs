//! Durable key-value slot for the chosen language.
//!
//! The page only ever stores one entry (`siegemind-language`), but the slot
//! is modelled as a small key-value store so the key stays configurable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::{debug, warn};

/// Default key the landing page stores its language under.
pub const LANGUAGE_PREFERENCE_KEY: &str = "siegemind-language";

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("failed to access preference file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize preferences: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Host-provided persistent key-value storage.
///
/// Reads never fail: unreadable storage is the same as an empty slot.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

/// One stored value with the time it was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPreference {
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

/// Preferences persisted as a JSON object in a single file.
///
/// Every write rewrites the whole file; the parent directory is created on
/// first write.
#[derive(Debug, Clone)]
pub struct FilePreferences {
    path: PathBuf,
}

impl FilePreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> BTreeMap<String, StoredPreference> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                warn!(
                    "Failed to read preferences from {}: {}",
                    self.path.display(),
                    e
                );
                return BTreeMap::new();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!(
                "Ignoring corrupt preference file {}: {}",
                self.path.display(),
                e
            );
            BTreeMap::new()
        })
    }
}

impl PreferenceStore for FilePreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.read_all().remove(key).map(|stored| stored.value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut entries = self.read_all();
        entries.insert(
            key.to_string(),
            StoredPreference {
                value: value.to_string(),
                updated_at: Utc::now(),
            },
        );

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| PreferenceError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(&entries)?;
        std::fs::write(&self.path, json).map_err(|source| PreferenceError::Io {
            path: self.path.clone(),
            source,
        })?;

        debug!("Saved preference {} to {}", key, self.path.display());
        Ok(())
    }
}

/// Process-local preferences. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    entries: Arc<Mutex<HashMap<String, String>>>,
    writes: Arc<Mutex<usize>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a single saved entry.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let prefs = Self::new();
        prefs
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        prefs
    }

    /// Number of successful `set` calls.
    pub fn writes(&self) -> usize {
        *self.writes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        *self.writes.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }
}

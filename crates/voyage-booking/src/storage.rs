//! # Key/Value Storage
//!
//! Persistence seam for the auth session.
//!
//! ```text
//! ┌──────────────┐   set("auth", json)   ┌────────────────────────────────┐
//! │  AuthStore   │ ────────────────────► │ dyn KeyValueStorage            │
//! │ {user,token} │ ◄──────────────────── │  ├── MemoryStorage (HashMap)   │
//! └──────────────┘   get("auth")         │  └── FileStorage  (key.json)   │
//!                                        └────────────────────────────────┘
//! ```
//!
//! Values are opaque strings; callers choose the encoding (JSON for auth).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

use crate::config::{BookingConfig, StorageBackend, StorageConfig};
use crate::error::{BookingError, BookingResult};

pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> BookingResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> BookingResult<()>;

    fn remove(&self, key: &str) -> BookingResult<()>;
}

/// Builds the backend named in the configuration.
pub fn from_config(config: &StorageConfig) -> BookingResult<Arc<dyn KeyValueStorage>> {
    match config.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryStorage::new())),
        StorageBackend::File => {
            let dir = config
                .directory
                .clone()
                .or_else(BookingConfig::default_data_dir)
                .ok_or_else(|| BookingError::Config("No data directory available for file storage".into()))?;
            Ok(Arc::new(FileStorage::new(dir)?))
        }
    }
}

// =============================================================================
// Memory Storage
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> BookingResult<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> BookingResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> BookingResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

// =============================================================================
// File Storage
// =============================================================================

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Creates the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> BookingResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        debug!(?dir, "File storage ready");
        Ok(FileStorage { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> BookingResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(BookingError::Storage(format!("Invalid storage key: '{}'", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> BookingResult<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> BookingResult<()> {
        let path = self.path_for(key)?;
        // Readers never see a partially written file.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> BookingResult<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

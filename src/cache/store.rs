// Cache storage layer.
// Keeps API responses in a single JSON file keyed by request, written atomically.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::Result;

/// Current time as milliseconds since the Unix epoch.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// A cached API response with its last-access time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Raw response payload.
    pub data: Value,
    /// Last read or write, milliseconds since epoch.
    pub timestamp: i64,
}

impl CacheEntry {
    /// Create an entry stamped with the current time.
    pub fn new(data: Value) -> Self {
        Self::with_timestamp(data, now_ms())
    }

    pub fn with_timestamp(data: Value, timestamp: i64) -> Self {
        Self { data, timestamp }
    }

    /// Mark the entry as accessed at `now`. Never moves the timestamp backwards.
    pub fn touch(&mut self, now: i64) {
        self.timestamp = self.timestamp.max(now);
    }
}

/// In-memory view of the cache file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheStore {
    entries: BTreeMap<String, CacheEntry>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut CacheEntry> {
        self.entries.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or replace the entry stored under `key`.
    pub fn insert(&mut self, key: impl Into<String>, entry: CacheEntry) {
        self.entries.insert(key.into(), entry);
    }

    pub fn remove(&mut self, key: &str) -> Option<CacheEntry> {
        self.entries.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CacheEntry)> {
        self.entries.iter()
    }

    pub(crate) fn into_entries(self) -> BTreeMap<String, CacheEntry> {
        self.entries
    }

    pub(crate) fn from_entries(entries: BTreeMap<String, CacheEntry>) -> Self {
        Self { entries }
    }

    /// Parse the on-disk representation, dropping values that are not entries.
    fn parse(contents: &str) -> serde_json::Result<Self> {
        let raw: BTreeMap<String, Value> = serde_json::from_str(contents)?;
        let mut entries = BTreeMap::new();
        for (key, value) in raw {
            match serde_json::from_value::<CacheEntry>(value) {
                Ok(entry) => {
                    entries.insert(key, entry);
                }
                Err(e) => debug!(%key, error = %e, "skipping malformed cache entry"),
            }
        }
        Ok(Self { entries })
    }
}

/// The cache file on disk.
#[derive(Debug, Clone)]
pub struct CacheFile {
    path: PathBuf,
}

impl CacheFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole store.
    ///
    /// A missing file is initialized with an empty placeholder. A file that
    /// cannot be read or parsed yields an empty store; neither case fails.
    pub fn load(&self) -> CacheStore {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "cache file missing, initializing");
            if let Err(e) = write_atomic(&self.path, b"{}") {
                warn!(path = %self.path.display(), error = %e, "failed to initialize cache file");
            }
            return CacheStore::new();
        }

        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read cache file");
                return CacheStore::new();
            }
        };

        match CacheStore::parse(&contents) {
            Ok(store) => {
                debug!(entries = store.len(), "loaded cache");
                store
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cache file is corrupt, starting empty");
                CacheStore::new()
            }
        }
    }

    /// Overwrite the file with the full store.
    pub fn save(&self, store: &CacheStore) -> Result<()> {
        let json = serde_json::to_string_pretty(store)?;
        write_atomic(&self.path, json.as_bytes())?;
        debug!(entries = store.len(), "saved cache");
        Ok(())
    }

    /// Delete the cache file. Deleting a missing file succeeds.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "cache cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Write via a uniquely named temp file and rename so readers never see a
/// partial file. Concurrent writers each persist their own temp file; the
/// last rename wins.
fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut file = NamedTempFile::new_in(parent)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;

    Ok(())
}

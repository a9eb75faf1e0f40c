//! Collection snapshot caching

use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::Clock;
use crate::error::{Result, WastearrError};
use crate::media::MediaItem;

/// Default cache TTL: 72 hours
pub const DEFAULT_TTL_HOURS: i64 = 72;

/// Bumped whenever the on-disk layout of a record changes
const FORMAT_VERSION: u32 = 1;

/// On-disk record for one source collection
#[derive(Debug, Serialize, Deserialize)]
struct CachedCollection {
    version: u32,
    source_key: String,
    fetched_at: DateTime<Utc>,
    items: Vec<MediaItem>,
}

/// A fresh snapshot of one source's collection
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub source_key: String,
    pub fetched_at: DateTime<Utc>,
    pub items: Vec<MediaItem>,
}

/// Durable store of collection snapshots, one file per source key
pub struct CacheStore {
    dir: PathBuf,
    ttl: Duration,
    clock: Box<dyn Clock>,
}

impl CacheStore {
    /// Create a store in `dir` with the default TTL
    pub fn new(dir: &Path, clock: impl Clock + 'static) -> Self {
        Self::with_ttl(dir, clock, Duration::hours(DEFAULT_TTL_HOURS))
    }

    /// Create with custom TTL
    pub fn with_ttl(dir: &Path, clock: impl Clock + 'static, ttl: Duration) -> Self {
        Self {
            dir: dir.to_path_buf(),
            ttl,
            clock: Box::new(clock),
        }
    }

    /// Current time according to the store's clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Directory holding the cache files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(WastearrError::InvalidArgument(format!(
                "Invalid cache key: {:?}",
                key
            )));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }

    /// Get the snapshot for `key` if one exists and is younger than the TTL.
    ///
    /// Missing, unreadable, corrupted and expired entries are all misses.
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        let path = match self.entry_path(key) {
            Ok(path) => path,
            Err(e) => {
                debug!("{}", e);
                return None;
            }
        };

        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(key, "No cached collection");
                return None;
            }
            Err(e) => {
                debug!(key, error = %e, "Cached collection unreadable, ignoring");
                return None;
            }
        };

        let cached: CachedCollection = match serde_json::from_str(&data) {
            Ok(cached) => cached,
            Err(e) => {
                debug!(key, error = %e, "Cached collection corrupted, ignoring");
                return None;
            }
        };

        if cached.version != FORMAT_VERSION || cached.source_key != key {
            debug!(key, version = cached.version, "Cached collection has foreign layout, ignoring");
            return None;
        }

        let now = self.clock.now();
        if cached.fetched_at > now {
            debug!(key, fetched_at = %cached.fetched_at, "Cached collection is from the future, ignoring");
            return None;
        }

        let age = now - cached.fetched_at;
        if age >= self.ttl {
            info!(key, age_hours = age.num_hours(), "Cached collection expired");
            return None;
        }

        info!(key, items = cached.items.len(), "Using cached collection from {}", path.display());
        Some(CacheEntry {
            source_key: cached.source_key,
            fetched_at: cached.fetched_at,
            items: cached.items,
        })
    }

    /// Atomically replace the snapshot for `key`.
    ///
    /// The record is written to a temporary file in the cache directory and
    /// renamed over the old one, so readers see either the old snapshot or the
    /// new one, never a partial write.
    pub fn put(&self, key: &str, items: &[MediaItem], fetched_at: DateTime<Utc>) -> Result<()> {
        let path = self.entry_path(key)?;
        fs::create_dir_all(&self.dir)?;

        let cached = CachedCollection {
            version: FORMAT_VERSION,
            source_key: key.to_string(),
            fetched_at,
            items: items.to_vec(),
        };

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer(&mut writer, &cached)?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| WastearrError::Io(e.error))?;

        info!(key, items = items.len(), "Saved collection to {}", path.display());
        Ok(())
    }

    /// Remove the snapshot for `key`
    pub fn invalidate(&self, key: &str) -> Result<()> {
        let path = self.entry_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove every snapshot
    pub fn invalidate_all(&self) -> Result<()> {
        if self.dir.exists() {
            fs::remove_dir_all(&self.dir)?;
        }
        Ok(())
    }
}

//! Cache facade
//!
//! Orchestrates the entry store and the index manager. The manifest is
//! authoritative: `has` answers from the index alone, `get` follows the
//! indexed hash to the entry file, `set` writes a fresh file then
//! re-points the index, and the startup sweep reconciles the two after
//! crashes or partial writes.
//!
//! Consistency discipline: `set` and `delete` are not transactional. A
//! failure between the file write and the manifest save leaves either an
//! orphaned file or a dangling index entry, both of which the next
//! startup sweep reclaims. Callers needing stronger guarantees must
//! serialize access externally; the core is single-process and
//! synchronous by design.

use crate::config::CacheConfig;
use crate::error::{CacheError, CacheResult};
use crate::store::{unique_hash, upsert, CacheRecord, EntryStore, IndexManager};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

/// File-backed JSON key/value cache.
///
/// Construction validates the storage layout and runs one sweep over
/// the manifest; a cache whose setup failed is never handed out.
pub struct JsonCache {
    config: CacheConfig,
    entries: EntryStore,
    index: IndexManager,
}

impl JsonCache {
    /// Open (or initialize) a cache at the configured storage path.
    ///
    /// Creates the storage directory and manifest file if the config
    /// allows, then sweeps expired and orphaned index entries.
    pub fn new(config: CacheConfig) -> CacheResult<Self> {
        config.validate()?;

        let cache = Self {
            entries: EntryStore::new(
                config.storage_path.clone(),
                config.json_style,
                config.compress,
            ),
            index: IndexManager::new(config.index_path(), config.json_style),
            config,
        };
        cache.sweep()?;
        Ok(cache)
    }

    /// Open a cache with default configuration.
    pub fn open_default() -> CacheResult<Self> {
        Self::new(CacheConfig::default())
    }

    /// Whether `key` is present in the manifest.
    ///
    /// Reflects the index only: neither expiration nor the existence of
    /// the backing file is checked.
    pub fn has(&self, key: &str) -> CacheResult<bool> {
        Ok(self.index.load()?.contains_key(key))
    }

    /// Fetch the value cached under `key`.
    ///
    /// Any per-key failure past the index lookup (missing file, gzip
    /// damage, unparseable JSON) degrades to `Ok(None)`. Corrupted
    /// cache data must never be worse than no cache.
    pub fn get(&self, key: &str) -> CacheResult<Option<Value>> {
        let manifest = self.index.load()?;
        let Some(entry) = manifest.get(key) else {
            return Ok(None);
        };

        match self.entries.read(&entry.hash) {
            Ok(Some(record)) => Ok(Some(record.data)),
            Ok(None) => Ok(None),
            Err(e) => {
                debug!("Treating unreadable entry for {key} as a miss: {e}");
                Ok(None)
            }
        }
    }

    /// Store `value` under `key` with the configured lifetime.
    ///
    /// Always writes a new entry file, even when overwriting; the old
    /// file becomes an orphan for the next sweep. Returns `Ok(false)`
    /// when a filesystem write fails on either the entry file or the
    /// manifest; encoding and compression failures are errors.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> CacheResult<bool> {
        let hash = unique_hash();
        let expiration = Utc::now().timestamp() + self.config.lifetime;
        let record = CacheRecord {
            data: serde_json::to_value(value).map_err(CacheError::Encode)?,
            expiration,
        };

        let entry_ok = match self.entries.write(&hash, &record) {
            Ok(()) => true,
            Err(e) if e.is_io() => {
                debug!("Entry write failed for {key}: {e}");
                false
            }
            Err(e) => return Err(e),
        };

        // The index is updated even if the entry write failed; the
        // dangling reference is reclaimed by the next sweep.
        let mut manifest = self.index.load()?;
        upsert(&mut manifest, key, hash, expiration);
        let index_ok = match self.index.save(&manifest) {
            Ok(()) => true,
            Err(e) if e.is_io() => {
                debug!("Index save failed for {key}: {e}");
                false
            }
            Err(e) => return Err(e),
        };

        Ok(entry_ok && index_ok)
    }

    /// Remove `key` and its backing file.
    ///
    /// `Ok(false)` if the key is absent or the backing file is already
    /// gone (the index entry then waits for the sweep). The manifest is
    /// only persisted after the file deletion succeeds, so a failed
    /// delete leaves the on-disk index unchanged.
    pub fn delete(&self, key: &str) -> CacheResult<bool> {
        let mut manifest = self.index.load()?;
        let Some(entry) = manifest.get(key) else {
            return Ok(false);
        };

        if !self.entries.exists(&entry.hash) {
            return Ok(false);
        }

        let hash = entry.hash.clone();
        manifest.remove(key);
        if self.entries.delete(&hash).is_err() {
            return Ok(false);
        }
        self.index.save(&manifest)?;
        Ok(true)
    }

    /// Byte size of the file backing `key`, `None` if the key is absent
    /// or the file is missing.
    pub fn size(&self, key: &str) -> CacheResult<Option<u64>> {
        let manifest = self.index.load()?;
        Ok(manifest.get(key).and_then(|e| self.entries.size(&e.hash)))
    }

    /// Number of keys currently in the manifest.
    pub fn len(&self) -> CacheResult<usize> {
        Ok(self.index.load()?.len())
    }

    /// Whether the manifest holds no keys.
    pub fn is_empty(&self) -> CacheResult<bool> {
        Ok(self.index.load()?.is_empty())
    }

    /// The configuration this cache was opened with.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Drop expired and orphaned index entries, persisting once.
    ///
    /// An entry whose file exists and is expired loses both the file
    /// and the index slot. An entry whose file is missing loses the
    /// index slot regardless of expiration. Live unexpired entries are
    /// untouched, and no file reachable from a live entry is deleted.
    fn sweep(&self) -> CacheResult<()> {
        let mut manifest = self.index.load()?;
        let now = Utc::now().timestamp();
        let before = manifest.len();

        manifest.retain(|key, entry| {
            if self.entries.exists(&entry.hash) {
                if entry.expiration < now {
                    debug!("Sweeping expired key {key}");
                    // Best effort: a file that survives deletion is
                    // unreferenced afterwards and harmless.
                    let _ = self.entries.delete(&entry.hash);
                    false
                } else {
                    true
                }
            } else {
                debug!("Sweeping dangling key {key}");
                false
            }
        });

        if manifest.len() != before {
            info!("Sweep removed {} of {} entries", before - manifest.len(), before);
        }
        self.index.save(&manifest)
    }
}

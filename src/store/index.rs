//! Manifest index
//!
//! A single JSON file maps each key to the hash of its backing entry
//! file and an expiration timestamp. The manifest is the sole source of
//! truth for which keys exist; entry files it does not reference are
//! orphans awaiting the sweep.
//!
//! Every mutation is a full load-then-save of the whole manifest. That
//! is the concurrency hazard and the simplicity win: there is no
//! incremental format to keep consistent.

use crate::config::JsonStyle;
use crate::error::{CacheError, CacheResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Metadata for one key in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Filename hash of the backing entry file
    pub hash: String,
    /// Expiration as unix seconds
    pub expiration: i64,
}

/// In-memory form of the manifest file.
pub type Manifest = BTreeMap<String, IndexEntry>;

/// Insert or replace the entry for `key`. Pure in-memory update;
/// persisting the manifest is the caller's job.
pub fn upsert(manifest: &mut Manifest, key: &str, hash: String, expiration: i64) {
    manifest.insert(key.to_string(), IndexEntry { hash, expiration });
}

/// Loads and saves the manifest file.
#[derive(Debug, Clone)]
pub struct IndexManager {
    path: PathBuf,
    style: JsonStyle,
}

impl IndexManager {
    pub fn new(path: PathBuf, style: JsonStyle) -> Self {
        Self { path, style }
    }

    /// Read and parse the manifest file.
    ///
    /// A missing file is an error: setup guarantees it exists, so its
    /// absence means something outside the cache removed it. Empty or
    /// unparseable content degrades to an empty manifest instead.
    pub fn load(&self) -> CacheResult<Manifest> {
        if !self.path.is_file() {
            return Err(CacheError::IndexUnavailable(self.path.clone()));
        }

        let content = fs::read(&self.path)
            .map_err(|e| CacheError::io(format!("reading index {}", self.path.display()), e))?;

        if content.is_empty() {
            return Ok(Manifest::new());
        }

        match serde_json::from_slice(&content) {
            Ok(manifest) => Ok(manifest),
            Err(e) => {
                warn!("Index {} is corrupt, treating as empty: {}", self.path.display(), e);
                Ok(Manifest::new())
            }
        }
    }

    /// Serialize and persist the manifest.
    ///
    /// A `BTreeMap` always serializes as a JSON object, so an empty
    /// manifest lands on disk as `{}` rather than `[]`.
    pub fn save(&self, manifest: &Manifest) -> CacheResult<()> {
        let json = self.style.to_vec(manifest).map_err(CacheError::Encode)?;

        fs::write(&self.path, &json)
            .map_err(|e| CacheError::io(format!("writing index {}", self.path.display()), e))?;

        debug!("Saved index with {} entries", manifest.len());
        Ok(())
    }

    /// Path of the manifest file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

//! Cache configuration
//!
//! A typed configuration struct with documented defaults, validated once
//! at construction time. Validation resolves the storage directory and
//! manifest path, creating them when the force-create flags allow it and
//! failing fast when they don't.

use crate::error::{CacheError, CacheResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// How entry files and the manifest are rendered as JSON.
///
/// Stands in for serializer flag knobs in other ecosystems; serde_json
/// never escapes unicode or slashes, so only the layout varies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonStyle {
    /// Single-line output (default)
    #[default]
    Compact,
    /// Human-readable indented output
    Pretty,
}

impl JsonStyle {
    /// Serialize a value according to this style.
    pub fn to_vec<T: Serialize>(&self, value: &T) -> serde_json::Result<Vec<u8>> {
        match self {
            Self::Compact => serde_json::to_vec(value),
            Self::Pretty => serde_json::to_vec_pretty(value),
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding entry files and the manifest
    pub storage_path: PathBuf,

    /// Manifest filename inside `storage_path`
    pub index_file: String,

    /// Default lifetime applied to new entries, in seconds
    pub lifetime: i64,

    /// Create `storage_path` if missing instead of failing setup
    pub create_storage_path: bool,

    /// Create the manifest file if missing instead of failing setup
    pub create_index_file: bool,

    /// JSON rendering for entry files and the manifest
    pub json_style: JsonStyle,

    /// Gzip entry files at maximal compression
    pub compress: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
            index_file: "index.json".to_string(),
            lifetime: 60,
            create_storage_path: true,
            create_index_file: true,
            json_style: JsonStyle::Compact,
            compress: true,
        }
    }
}

impl CacheConfig {
    /// Create a config rooted at a specific storage directory,
    /// defaults elsewhere.
    pub fn at(storage_path: impl Into<PathBuf>) -> Self {
        Self {
            storage_path: storage_path.into(),
            ..Self::default()
        }
    }

    /// Full path of the manifest file.
    pub fn index_path(&self) -> PathBuf {
        self.storage_path.join(&self.index_file)
    }

    /// Resolve the storage directory and manifest file, creating them
    /// when the force-create flags allow it.
    ///
    /// Fails with a setup error if either is missing and auto-creation
    /// is disabled. Called once by `JsonCache::new`.
    pub fn validate(&self) -> CacheResult<()> {
        if !self.storage_path.is_dir() {
            if !self.create_storage_path {
                return Err(CacheError::StoragePathMissing(self.storage_path.clone()));
            }
            fs::create_dir_all(&self.storage_path).map_err(|e| {
                CacheError::io(
                    format!("creating storage path {}", self.storage_path.display()),
                    e,
                )
            })?;
            debug!("Created storage path {}", self.storage_path.display());
        }

        let index_path = self.index_path();
        if !index_path.is_file() {
            if !self.create_index_file {
                return Err(CacheError::IndexFileMissing(index_path));
            }
            // An empty manifest file parses as an empty manifest.
            fs::write(&index_path, b"").map_err(|e| {
                CacheError::io(format!("creating index file {}", index_path.display()), e)
            })?;
            debug!("Created index file {}", index_path.display());
        }

        Ok(())
    }
}

/// Default storage directory: `<platform cache dir>/jcache`
pub fn default_storage_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("jcache")
}

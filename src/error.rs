//! Error types for jcache
//!
//! All modules use `CacheResult<T>` as their return type.
//!
//! Per-key read failures (corrupt entry files, bad JSON, decompression
//! failures) never surface here; the facade degrades them to a cache
//! miss. Errors are reserved for setup problems, encoding failures, and
//! filesystem faults the caller may want to act on.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for jcache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// All errors that can occur in jcache
#[derive(Error, Debug)]
pub enum CacheError {
    // Setup errors
    #[error("Storage path does not exist: {}. Enable create_storage_path or create it manually.", .0.display())]
    StoragePathMissing(PathBuf),

    #[error("Index file does not exist: {}. Enable create_index_file or create it manually.", .0.display())]
    IndexFileMissing(PathBuf),

    /// The manifest file vanished after construction. Only reachable if
    /// something outside the cache removed it.
    #[error("Index file is missing at load time: {}", .0.display())]
    IndexUnavailable(PathBuf),

    // Codec errors
    #[error("JSON encoding failed: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Compression failed for entry {hash}: {source}")]
    Compress {
        hash: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Decompression failed for entry {hash}: {source}")]
    Decompress {
        hash: String,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // CLI errors
    #[error("Value is not valid JSON: {0}")]
    InvalidValue(#[source] serde_json::Error),
}

impl CacheError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// True for filesystem faults that `set`/`delete` report as a
    /// boolean failure rather than an error.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

//! jcache - file-backed JSON key/value cache
//!
//! Values are serialized to JSON (optionally gzip-compressed), persisted
//! as one file per entry, and indexed by a single on-disk manifest that
//! maps keys to filename hashes and expiration timestamps. A sweep at
//! construction reconciles the manifest with the files on disk.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod store;

pub use cache::JsonCache;
pub use config::{CacheConfig, JsonStyle};
pub use error::{CacheError, CacheResult};

//! Per-entry payload storage
//!
//! Each cached value lives in its own file under the storage directory,
//! named by a unique hash and holding the serialized record, optionally
//! gzip-compressed. The hash is a filename, never a content address:
//! storing the same value twice produces two files.

use crate::config::JsonStyle;
use crate::error::{CacheError, CacheResult};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;
use uuid::Uuid;

/// One cached value as stored on disk.
///
/// The `expiration` field duplicates the owning index entry's and is
/// informational; the manifest is authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheRecord {
    /// The cached value
    pub data: serde_json::Value,
    /// Expiration as unix seconds
    pub expiration: i64,
}

/// Generate a unique entry filename hash.
///
/// SHA-256 over a fresh UUIDv4 and a nanosecond timestamp. Collision
/// resistance is all that matters here; the hash carries no information
/// about the stored value.
pub fn unique_hash() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();

    let mut hasher = Sha256::new();
    hasher.update(Uuid::new_v4().as_bytes());
    hasher.update(nanos.to_le_bytes());
    hex::encode(hasher.finalize())
}

/// Reads and writes entry files for one storage directory.
#[derive(Debug, Clone)]
pub struct EntryStore {
    dir: PathBuf,
    style: JsonStyle,
    compress: bool,
}

impl EntryStore {
    pub fn new(dir: PathBuf, style: JsonStyle, compress: bool) -> Self {
        Self {
            dir,
            style,
            compress,
        }
    }

    /// Path of the file backing `hash`.
    pub fn entry_path(&self, hash: &str) -> PathBuf {
        self.dir.join(format!("{hash}.json"))
    }

    /// Serialize and persist a record under `hash`.
    ///
    /// Direct write, no rename dance: a torn file is indistinguishable
    /// from a corrupt one and reads back as a miss.
    pub fn write(&self, hash: &str, record: &CacheRecord) -> CacheResult<()> {
        let json = self.style.to_vec(record).map_err(CacheError::Encode)?;

        let bytes = if self.compress {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
            encoder
                .write_all(&json)
                .and_then(|()| encoder.finish())
                .map_err(|e| CacheError::Compress {
                    hash: hash.to_string(),
                    source: e,
                })?
        } else {
            json
        };

        let path = self.entry_path(hash);
        fs::write(&path, &bytes)
            .map_err(|e| CacheError::io(format!("writing entry {}", path.display()), e))?;

        debug!("Wrote entry {} ({} bytes)", hash, bytes.len());
        Ok(())
    }

    /// Read the record stored under `hash`.
    ///
    /// A missing file or unparseable JSON is `Ok(None)`; the caller
    /// treats it as a miss. A gzip failure is reported as a
    /// `Decompress` error so the facade can decide.
    pub fn read(&self, hash: &str) -> CacheResult<Option<CacheRecord>> {
        let path = self.entry_path(hash);
        let raw = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(_) => return Ok(None),
        };

        let json = if self.compress {
            let mut decoder = GzDecoder::new(raw.as_slice());
            let mut buf = Vec::new();
            decoder
                .read_to_end(&mut buf)
                .map_err(|e| CacheError::Decompress {
                    hash: hash.to_string(),
                    source: e,
                })?;
            buf
        } else {
            raw
        };

        Ok(serde_json::from_slice(&json).ok())
    }

    /// Remove the file backing `hash`.
    pub fn delete(&self, hash: &str) -> CacheResult<()> {
        let path = self.entry_path(hash);
        fs::remove_file(&path)
            .map_err(|e| CacheError::io(format!("deleting entry {}", path.display()), e))?;
        debug!("Deleted entry {}", hash);
        Ok(())
    }

    /// Whether the file backing `hash` exists.
    pub fn exists(&self, hash: &str) -> bool {
        self.entry_path(hash).is_file()
    }

    /// Byte size of the file backing `hash`, `None` if absent.
    pub fn size(&self, hash: &str) -> Option<u64> {
        fs::metadata(self.entry_path(hash)).ok().map(|m| m.len())
    }

    /// Storage directory this store writes into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn store(temp: &TempDir, compress: bool) -> EntryStore {
        EntryStore::new(temp.path().to_path_buf(), JsonStyle::Compact, compress)
    }

    fn record(value: serde_json::Value) -> CacheRecord {
        CacheRecord {
            data: value,
            expiration: 4102444800,
        }
    }

    #[test]
    fn unique_hash_is_unique_and_hex() {
        let a = unique_hash();
        let b = unique_hash();
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn write_read_round_trip_compressed() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp, true);

        let hash = unique_hash();
        store.write(&hash, &record(json!({"a": 1, "b": [true, null]}))).unwrap();

        let read = store.read(&hash).unwrap().unwrap();
        assert_eq!(read.data, json!({"a": 1, "b": [true, null]}));
    }

    #[test]
    fn write_read_round_trip_uncompressed() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp, false);

        let hash = unique_hash();
        store.write(&hash, &record(json!("plain"))).unwrap();

        let read = store.read(&hash).unwrap().unwrap();
        assert_eq!(read.data, json!("plain"));
    }

    #[test]
    fn compressed_file_has_gzip_magic() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp, true);

        let hash = unique_hash();
        store.write(&hash, &record(json!({"a": 1}))).unwrap();

        let bytes = fs::read(store.entry_path(&hash)).unwrap();
        assert_eq!(&bytes[..2], &[0x1f, 0x8b]);
        assert!(serde_json::from_slice::<serde_json::Value>(&bytes).is_err());
    }

    #[test]
    fn uncompressed_file_is_raw_json() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp, false);

        let hash = unique_hash();
        store.write(&hash, &record(json!({"a": 1}))).unwrap();

        let bytes = fs::read(store.entry_path(&hash)).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["data"], json!({"a": 1}));
    }

    #[test]
    fn missing_file_reads_as_none() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp, true);
        assert!(store.read("deadbeef").unwrap().is_none());
    }

    #[test]
    fn truncated_gzip_is_decompress_error() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp, true);

        let hash = unique_hash();
        store.write(&hash, &record(json!({"a": 1}))).unwrap();
        let bytes = fs::read(store.entry_path(&hash)).unwrap();
        fs::write(store.entry_path(&hash), &bytes[..4]).unwrap();

        let err = store.read(&hash).unwrap_err();
        assert!(matches!(err, CacheError::Decompress { .. }));
    }

    #[test]
    fn garbage_json_reads_as_none() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp, false);

        fs::write(store.entry_path("junk"), b"not json at all").unwrap();
        assert!(store.read("junk").unwrap().is_none());
    }

    #[test]
    fn size_reports_file_length() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp, false);

        let hash = unique_hash();
        store.write(&hash, &record(json!({"a": 1}))).unwrap();

        let expected = fs::metadata(store.entry_path(&hash)).unwrap().len();
        assert_eq!(store.size(&hash), Some(expected));
        assert!(expected > 0);
        assert_eq!(store.size("missing"), None);
    }

    #[test]
    fn delete_removes_file() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp, true);

        let hash = unique_hash();
        store.write(&hash, &record(json!(1))).unwrap();
        assert!(store.exists(&hash));

        store.delete(&hash).unwrap();
        assert!(!store.exists(&hash));
        assert!(store.delete(&hash).is_err());
    }
}

//! On-disk storage layers
//!
//! Two pieces keep the cache durable: the entry store holds one file
//! per cached value, and the index manager holds the single manifest
//! that says which keys exist and which file backs each one. The facade
//! in [`crate::cache`] keeps the two consistent.

pub mod entry;
pub mod index;

pub use entry::{unique_hash, CacheRecord, EntryStore};
pub use index::{upsert, IndexEntry, IndexManager, Manifest};

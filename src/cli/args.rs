//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// jcache - file-backed JSON key/value cache
///
/// Stores JSON values under string keys as individual files indexed by
/// an on-disk manifest, with per-entry expiration.
#[derive(Parser, Debug)]
#[command(name = "jcache")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Storage directory for entry files and the manifest
    #[arg(short, long, global = true, env = "JCACHE_STORAGE_PATH")]
    pub storage_path: Option<PathBuf>,

    /// Manifest filename inside the storage directory
    #[arg(long, global = true, default_value = "index.json")]
    pub index_file: String,

    /// Lifetime in seconds applied to new entries
    #[arg(short, long, global = true, default_value_t = 60)]
    pub lifetime: i64,

    /// Store entry files as raw JSON instead of gzip
    #[arg(long, global = true)]
    pub no_compress: bool,

    /// Pretty-print JSON on disk
    #[arg(long, global = true)]
    pub pretty: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store a JSON value under a key
    Set(SetArgs),

    /// Print the value cached under a key
    Get(KeyArgs),

    /// Check whether a key is present in the index
    Has(KeyArgs),

    /// Remove a key and its backing file
    Delete(KeyArgs),

    /// Print the byte size of a key's backing file
    Size(KeyArgs),

    /// Sweep expired and orphaned entries, then report the live count
    Sweep,
}

/// Arguments for the set command
#[derive(Parser, Debug)]
pub struct SetArgs {
    /// Cache key
    pub key: String,

    /// JSON value (reads stdin when omitted)
    pub value: Option<String>,
}

/// Arguments for key-only commands (get, has, delete, size)
#[derive(Parser, Debug)]
pub struct KeyArgs {
    /// Cache key
    pub key: String,
}

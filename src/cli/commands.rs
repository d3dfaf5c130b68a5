//! CLI command implementations
//!
//! Each handler takes the already-opened cache (construction ran the
//! startup sweep), performs one operation, and reports on stdout.
//! Misses exit non-zero so shell pipelines can branch on them.

use crate::cache::JsonCache;
use crate::cli::args::{KeyArgs, SetArgs};
use crate::error::{CacheError, CacheResult};
use console::style;
use serde_json::Value;
use std::io::Read;
use std::process::ExitCode;
use tracing::debug;

/// Store a value under a key.
pub fn set(cache: &JsonCache, args: SetArgs) -> CacheResult<ExitCode> {
    let raw = match args.value {
        Some(value) => value,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| CacheError::io("reading value from stdin", e))?;
            buf
        }
    };
    let value: Value = serde_json::from_str(&raw).map_err(CacheError::InvalidValue)?;

    if cache.set(&args.key, &value)? {
        debug!("Stored key {}", args.key);
        println!("{}", style("stored").green());
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!("{}", style("write failed").red());
        Ok(ExitCode::FAILURE)
    }
}

/// Print the value cached under a key; exit 1 on a miss.
pub fn get(cache: &JsonCache, args: KeyArgs) -> CacheResult<ExitCode> {
    match cache.get(&args.key)? {
        Some(value) => {
            let rendered =
                serde_json::to_string_pretty(&value).map_err(CacheError::Encode)?;
            println!("{rendered}");
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("{}", style("miss").yellow());
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Report whether a key is present in the index.
pub fn has(cache: &JsonCache, args: KeyArgs) -> CacheResult<ExitCode> {
    if cache.has(&args.key)? {
        println!("true");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("false");
        Ok(ExitCode::FAILURE)
    }
}

/// Remove a key and its backing file.
pub fn delete(cache: &JsonCache, args: KeyArgs) -> CacheResult<ExitCode> {
    if cache.delete(&args.key)? {
        println!("{}", style("deleted").green());
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!("{}", style("not found").yellow());
        Ok(ExitCode::FAILURE)
    }
}

/// Print the byte size of a key's backing file.
pub fn size(cache: &JsonCache, args: KeyArgs) -> CacheResult<ExitCode> {
    match cache.size(&args.key)? {
        Some(bytes) => {
            println!("{bytes}");
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("{}", style("not found").yellow());
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Report the live entry count after the startup sweep.
pub fn sweep(cache: &JsonCache) -> CacheResult<ExitCode> {
    let live = cache.len()?;
    println!("{live} live entries");
    Ok(ExitCode::SUCCESS)
}

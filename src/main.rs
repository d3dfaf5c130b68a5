//! jcache - file-backed JSON key/value cache
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use jcache::cli::{commands, Cli, Commands};
use jcache::config::{default_storage_path, CacheConfig, JsonStyle};
use jcache::error::CacheResult;
use jcache::JsonCache;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> CacheResult<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging: 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("jcache=warn"),
        1 => EnvFilter::new("jcache=info"),
        _ => EnvFilter::new("jcache=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    let config = CacheConfig {
        storage_path: cli.storage_path.unwrap_or_else(default_storage_path),
        index_file: cli.index_file,
        lifetime: cli.lifetime,
        compress: !cli.no_compress,
        json_style: if cli.pretty {
            JsonStyle::Pretty
        } else {
            JsonStyle::Compact
        },
        ..CacheConfig::default()
    };

    // Construction runs the startup sweep.
    let cache = JsonCache::new(config)?;

    match cli.command {
        Commands::Set(args) => commands::set(&cache, args),
        Commands::Get(args) => commands::get(&cache, args),
        Commands::Has(args) => commands::has(&cache, args),
        Commands::Delete(args) => commands::delete(&cache, args),
        Commands::Size(args) => commands::size(&cache, args),
        Commands::Sweep => commands::sweep(&cache),
    }
}

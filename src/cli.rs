//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

use crate::services::ImportMode;

/// livelink - short path resolver with expiring redirects and WeChat live codes
#[derive(Parser)]
#[command(name = "livelink")]
#[command(version)]
#[command(about = "Short path resolver with expiring redirects", long_about = None)]
pub struct Cli {
    /// Configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Print mappings that are expired or expire soon
    Report,

    /// Delete expired mappings once
    Sweep {
        /// Rows deleted per batch (default: maintenance.purge_batch_size)
        #[arg(long)]
        batch_size: Option<u64>,
    },

    /// Import mappings from the legacy key-value store
    Import {
        /// JSON export of the legacy store (`{ "path": {...} }`)
        #[arg(long, conflicts_with = "from_redis")]
        from_file: Option<String>,

        /// Read from Redis (import.redis_url)
        #[arg(long)]
        from_redis: bool,

        /// How to treat paths that already exist
        #[arg(long, value_enum, default_value_t = ImportMode::Skip)]
        mode: ImportMode,
    },

    /// Print a sample configuration file
    ConfigGen,
}

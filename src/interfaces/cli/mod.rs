//! CLI interface module
//!
//! One-shot commands that run against the store without the HTTP server.

pub mod commands;

use crate::cli::Commands;
use crate::errors::LivelinkError;
use crate::storage::StorageFactory;
use commands::{expiry_report, import_legacy, print_sample_config, sweep_expired};
use std::fmt;

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<LivelinkError> for CliError {
    fn from(err: LivelinkError) -> Self {
        match err {
            LivelinkError::StorageError(msg) => CliError::StorageError(msg),
            LivelinkError::Config(msg) | LivelinkError::Serialization(msg) => {
                CliError::ParseError(msg)
            }
            other => CliError::CommandError(other.to_string()),
        }
    }
}

/// Run a one-shot CLI command
///
/// `Serve` is handled by the runtime, not here.
pub async fn run_cli_command(cmd: Commands) -> Result<(), CliError> {
    if let Commands::ConfigGen = cmd {
        print_sample_config();
        return Ok(());
    }

    let storage = StorageFactory::create()
        .await
        .map_err(|e| CliError::StorageError(e.to_string()))?;

    match cmd {
        Commands::Report => expiry_report(storage).await,
        Commands::Sweep { batch_size } => sweep_expired(storage, batch_size).await,
        Commands::Import {
            from_file,
            from_redis,
            mode,
        } => import_legacy(storage, from_file, from_redis, mode).await,
        Commands::ConfigGen => unreachable!("handled above"),
        Commands::Serve => Err(CliError::CommandError(
            "serve is not a one-shot command".to_string(),
        )),
    }
}

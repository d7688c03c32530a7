//! CLI interface module
//!
//! This module provides command-line interface functionality for reelink.

pub mod commands;

use std::fmt;

use crate::cli::{Commands, ConfigCommands};
use crate::config::AppConfig;
use crate::runtime::lifetime::startup::prepare_registry;
use commands::{
    add_link, config_generate, list_links, remove_link, resolve_link, search_links, suggest_aliases,
};

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

impl From<crate::errors::ReelinkError> for CliError {
    fn from(err: crate::errors::ReelinkError) -> Self {
        use crate::errors::ReelinkError;
        match err {
            ReelinkError::Validation(_) | ReelinkError::AliasConflict(_) => {
                CliError::ParseError(err.format_simple())
            }
            ReelinkError::StorageRead(_)
            | ReelinkError::StorageWrite(_)
            | ReelinkError::StoragePluginNotFound(_)
            | ReelinkError::Serialization(_) => CliError::StorageError(err.format_simple()),
            _ => CliError::CommandError(err.format_simple()),
        }
    }
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(cmd: Commands, config: &AppConfig) -> Result<(), CliError> {
    match cmd {
        // config 命令不需要打开存储
        Commands::Config {
            action: ConfigCommands::Generate { output_path, force },
        } => config_generate(output_path, force).await,
        Commands::Serve => Err(CliError::CommandError(
            "serve is handled by the server mode".to_string(),
        )),
        other => run_registry_command(other, config).await,
    }
}

async fn run_registry_command(cmd: Commands, config: &AppConfig) -> Result<(), CliError> {
    let mut registry = prepare_registry(config).await?;

    match cmd {
        Commands::Add { url, alias } => {
            add_link(&mut registry, &config.server.base_url, url, alias).await
        }
        Commands::Resolve { key } => resolve_link(&mut registry, &key).await,
        Commands::Remove { id } => remove_link(&mut registry, &id).await,
        Commands::List => list_links(&registry, &config.server.base_url),
        Commands::Search { query } => search_links(&registry, &config.server.base_url, &query),
        Commands::Suggest { url } => suggest_aliases(&registry, &url).await,
        Commands::Serve | Commands::Config { .. } => Err(CliError::CommandError(
            "command does not operate on the link registry".to_string(),
        )),
    }
}

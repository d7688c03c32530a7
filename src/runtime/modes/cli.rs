//! CLI mode
//!
//! This module delegates to the actual CLI implementation.

use crate::cli::Commands;
use crate::config::AppConfig;
use crate::interfaces::cli::CliError;

/// Run CLI mode
pub async fn run_cli(command: Commands, config: &AppConfig) -> Result<(), CliError> {
    crate::interfaces::cli::run_cli_command(command, config).await
}

//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for reelink using clap's derive macros.

use clap::{Parser, Subcommand};

/// reelink - A catalog-style URL shortener
#[derive(Parser, Debug)]
#[command(name = "reelink")]
#[command(version)]
#[command(about = "A catalog-style URL shortener", long_about = None)]
pub struct Cli {
    /// Configuration file path (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP front end (default when no command is given)
    Serve,

    /// Create a short link
    Add {
        /// Target URL
        url: String,

        /// Human-readable alias, used instead of the short code in share links
        #[arg(long, short = 'a')]
        alias: Option<String>,
    },

    /// Resolve a short code or alias, counting one visit
    Resolve {
        /// Short code, alias, or a path ending in one
        key: String,
    },

    /// Remove a short link by id
    Remove {
        /// Record id
        id: String,
    },

    /// List all short links, newest first
    List,

    /// Search titles, aliases and short codes
    Search {
        /// Case-insensitive substring
        query: String,
    },

    /// Ask the metadata service for alias ideas
    Suggest {
        /// Target URL
        url: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

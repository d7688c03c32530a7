//! Reelink - A catalog-style URL shortener
//!
//! Short links are stored as one ordered table (newest first) in a
//! pluggable key-value store. Each link gets a generated short code, an
//! optional alias and catalog metadata (title, category, poster) from a
//! metadata service that falls back to fixed values when unavailable.
//!
//! # Architecture
//! - `storage`: Key-value backends and the persisted link table
//! - `services`: Link registry and metadata suggesters
//! - `api`: HTTP front end (`?c=` redirects, catalog, link management)
//! - `interfaces`: Command-line interface
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging setup

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;

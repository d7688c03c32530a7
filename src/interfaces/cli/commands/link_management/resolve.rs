//! Resolve command

use colored::Colorize;

use crate::errors::ReelinkError;
use crate::interfaces::cli::CliError;
use crate::services::LinkRegistry;

pub async fn resolve_link(registry: &mut LinkRegistry, key: &str) -> Result<(), CliError> {
    match registry.resolve(key).await? {
        Some(link) => {
            println!(
                "{} {} -> {} {}",
                "▶".bold().red(),
                link.title.bold(),
                link.original_url.blue().underline(),
                format!("(clicks: {})", link.clicks).dimmed()
            );
            Ok(())
        }
        None => Err(ReelinkError::not_found(format!("No short link for '{}'", key)).into()),
    }
}

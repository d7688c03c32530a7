//! Add link command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::{CreateLinkRequest, LinkRegistry};

pub async fn add_link(
    registry: &mut LinkRegistry,
    base_url: &str,
    url: String,
    alias: Option<String>,
) -> Result<(), CliError> {
    let link = registry
        .create(CreateLinkRequest {
            original_url: url,
            alias,
        })
        .await?;

    println!(
        "{} Added short link: {} -> {}",
        "✓".bold().green(),
        link.route_key().cyan(),
        link.original_url.blue().underline()
    );
    println!(
        "  {} {} {}",
        link.title.bold(),
        "·".dimmed(),
        link.category.yellow()
    );
    println!(
        "  {} {}",
        "Share:".dimmed(),
        LinkRegistry::share_url(base_url, &link).magenta()
    );
    println!("  {} {}", "Id:".dimmed(), link.id.dimmed());

    Ok(())
}

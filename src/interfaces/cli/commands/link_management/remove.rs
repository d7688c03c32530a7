//! Remove link command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::LinkRegistry;

pub async fn remove_link(registry: &mut LinkRegistry, id: &str) -> Result<(), CliError> {
    let label = registry.get(id).map(|link| link.route_key().to_string());

    if registry.remove(id).await? {
        println!(
            "{} Deleted short link: {}",
            "✓".bold().green(),
            label.unwrap_or_else(|| id.to_string()).cyan()
        );
    } else {
        println!("{} No short link with id {}", "ℹ".bold().blue(), id.cyan());
    }

    Ok(())
}

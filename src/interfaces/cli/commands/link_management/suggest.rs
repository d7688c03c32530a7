//! Alias suggestion command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::LinkRegistry;

pub async fn suggest_aliases(registry: &LinkRegistry, url: &str) -> Result<(), CliError> {
    let suggestions = registry.suggest_aliases(url).await;

    println!("{}", "Alias ideas:".bold().green());
    for alias in suggestions {
        println!("  {} {}", "•".dimmed(), alias.cyan());
    }
    Ok(())
}

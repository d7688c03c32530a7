//! List and search commands

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::LinkRegistry;
use crate::storage::ShortLinkRecord;

fn print_link(base_url: &str, link: &ShortLinkRecord) {
    let mut info_parts = vec![format!(
        "{} -> {}",
        link.route_key().cyan(),
        link.original_url.blue().underline()
    )];

    if link.alias.is_some() {
        info_parts.push(format!("[{}]", link.short_code).dimmed().to_string());
    }

    info_parts.push(format!("\"{}\"", link.title).bold().to_string());
    info_parts.push(link.category.yellow().to_string());

    if link.clicks > 0 {
        info_parts.push(
            format!("(clicks: {})", link.clicks)
                .dimmed()
                .cyan()
                .to_string(),
        );
    }

    println!("  {}", info_parts.join(" "));
    println!("    {} {}", "id".dimmed(), link.id.dimmed());
    println!(
        "    {} {}",
        "share".dimmed(),
        LinkRegistry::share_url(base_url, link).dimmed()
    );
}

fn print_links(base_url: &str, heading: &str, links: &[ShortLinkRecord]) {
    if links.is_empty() {
        println!("{} No short links found", "ℹ".bold().blue());
        return;
    }

    println!("{}", heading.bold().green());
    println!();
    for link in links {
        print_link(base_url, link);
    }
    println!();
    println!(
        "{} Total {} short links",
        "ℹ".bold().blue(),
        links.len().to_string().green()
    );
}

pub fn list_links(registry: &LinkRegistry, base_url: &str) -> Result<(), CliError> {
    print_links(base_url, "Short link list:", registry.records());
    Ok(())
}

pub fn search_links(registry: &LinkRegistry, base_url: &str, query: &str) -> Result<(), CliError> {
    let hits = registry.search(query);
    print_links(base_url, &format!("Matches for \"{}\":", query), &hits);
    Ok(())
}

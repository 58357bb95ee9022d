//! Stats command implementation.

use crate::output::{self, OutputFormat};
use anyhow::Result;
use colored::Colorize;
use repowiki_core::WikiSession;

/// Prints summary numbers for the current scan.
pub async fn execute(session: &mut WikiSession, output: OutputFormat) -> Result<()> {
    session.ensure_loaded().await?;
    let stats = session.stats();

    match output {
        OutputFormat::Text => {
            let config = session.config();
            println!(
                "{} {}/{} (branch {})",
                "Repository:".bold(),
                config.repo.owner,
                config.repo.name,
                config.repo.branch
            );
            println!("{} {}", "Pages:".bold(), stats.pages);
            println!("{} {}", "Categories:".bold(), stats.categories);
            println!("{} {}", "Directories:".bold(), stats.directories);
            println!(
                "{} {}",
                "Content:".bold(),
                output::format_size(stats.total_bytes)
            );
            match stats.captured_at {
                Some(at) => println!("{} {}", "Scanned:".bold(), at.to_rfc3339()),
                None => println!("{} never", "Scanned:".bold()),
            }
        }
        OutputFormat::Json => output::print_json(&stats)?,
    }

    Ok(())
}

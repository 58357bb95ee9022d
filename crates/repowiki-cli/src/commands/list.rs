//! List command implementation.

use crate::output::{self, OutputFormat};
use anyhow::Result;
use colored::Colorize;
use repowiki_core::{PageRecord, WikiSession};

/// Lists every page, grouped by category, optionally filtered to one
/// category.
pub async fn execute(
    session: &mut WikiSession,
    category: Option<&str>,
    output: OutputFormat,
) -> Result<()> {
    session.ensure_loaded().await?;

    let pages: Vec<&PageRecord> = session
        .pages()
        .iter()
        .filter(|p| category.is_none_or(|c| p.category == c))
        .collect();

    match output {
        OutputFormat::Text => {
            if pages.is_empty() {
                match category {
                    Some(c) => println!("No pages in category '{c}'."),
                    None => println!("No pages found. Run 'repowiki scan' first."),
                }
                return Ok(());
            }

            println!("{} pages", pages.len().to_string().bold());
            let mut current_category = "";
            for &page in &pages {
                if page.category != current_category {
                    current_category = &page.category;
                    println!("{}", current_category.bold());
                }
                print!("  ");
                output::print_page_line(page);
            }
        }
        OutputFormat::Json => output::print_json(&pages)?,
    }

    Ok(())
}

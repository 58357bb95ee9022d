//! Search command implementation.

use crate::output::{self, OutputFormat, SearchHitOut};
use anyhow::{Context, Result};
use colored::Colorize;
use repowiki_core::{ViewState, WikiSession};

/// Runs a query against the wiki and prints the ranked results.
///
/// `fast` skips building the content-enriched index and falls back to
/// substring matching over bare page metadata.
pub async fn execute(
    session: &mut WikiSession,
    query: &str,
    limit: usize,
    fast: bool,
    output: OutputFormat,
) -> Result<()> {
    session
        .ensure_loaded()
        .await
        .context("could not load the page index")?;

    if fast {
        let mut hits = session.quick_search(query);
        hits.truncate(limit);
        match output {
            OutputFormat::Text => {
                println!("{} pages match '{}'", hits.len().to_string().bold(), query);
                for page in &hits {
                    output::print_page_line(page);
                }
            }
            OutputFormat::Json => output::print_json(&hits)?,
        }
        return Ok(());
    }

    let mut results = session.search(query).await?;
    results.truncate(limit);

    match output {
        OutputFormat::Text => {
            if results.is_empty() {
                println!("Nothing found for '{query}'.");
                println!("Try other keywords, or 'repowiki list' to browse all pages.");
                return Ok(());
            }

            println!(
                "{} results for '{}'",
                results.len().to_string().bold(),
                query
            );
            for result in &results {
                output::print_search_hit(result);
            }
            output::print_deep_link(&ViewState::Search(query.to_string()));
        }
        OutputFormat::Json => {
            let hits: Vec<SearchHitOut<'_>> = results
                .iter()
                .map(|r| SearchHitOut {
                    score: r.score,
                    title: &r.page.title,
                    logical_path: &r.page.logical_path,
                    category: &r.page.category,
                    excerpt: &r.excerpt,
                })
                .collect();
            output::print_json(&hits)?;
        }
    }

    Ok(())
}

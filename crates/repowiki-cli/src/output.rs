//! Output formatting shared by the command modules.
//!
//! Text output is for humans (colors, alignment, a trailing deep link);
//! JSON output is a single machine-readable value on stdout. Logs always
//! go to stderr so JSON stays parseable.

use clap::ValueEnum;
use colored::Colorize;
use repowiki_core::{PageRecord, SearchResult, ViewState};
use serde::Serialize;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, colored.
    Text,
    /// Machine-readable JSON.
    Json,
}

/// Serializable shape of one search hit.
#[derive(Debug, Serialize)]
pub struct SearchHitOut<'a> {
    /// Match score.
    pub score: u32,
    /// Page title.
    pub title: &'a str,
    /// Logical path.
    pub logical_path: &'a str,
    /// Category label.
    pub category: &'a str,
    /// Context around the match, possibly empty.
    pub excerpt: &'a str,
}

/// Prints one search result line pair.
pub fn print_search_hit(result: &SearchResult) {
    println!(
        "{:>4}  {}  {}",
        result.score.to_string().bold(),
        result.page.logical_path.cyan(),
        result.page.title
    );
    if !result.excerpt.is_empty() {
        println!("      {}", result.excerpt.bright_black());
    }
}

/// Prints one page line: logical path, title, size.
pub fn print_page_line(page: &PageRecord) {
    println!(
        "{}  {}  {}",
        page.logical_path.cyan(),
        page.title,
        format_size(page.size).bright_black()
    );
}

/// Prints the deep link for a view to stderr, keeping stdout clean.
pub fn print_deep_link(state: &ViewState) {
    eprintln!("{}", state.to_query().bright_black());
}

/// Serializes a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Human-friendly byte size.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else {
        format!("{} KB", bytes.div_ceil(1024))
    }
}

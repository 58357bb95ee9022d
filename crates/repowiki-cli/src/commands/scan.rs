//! Scan command implementation.

use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use repowiki_core::WikiSession;
use std::time::Duration;

/// Scans the repository now, bypassing any cached result, and prints a
/// summary.
pub async fn execute(session: &mut WikiSession) -> Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message("Scanning repository structure...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = session.scan().await;
    spinner.finish_and_clear();

    if let Err(err) = result {
        // Leave the user with a way forward, never a dead end.
        eprintln!("{}", "Scan failed. Run 'repowiki scan' to retry.".yellow());
        return Err(err.into());
    }

    let stats = session.stats();
    println!(
        "Scanned {} pages in {} categories.",
        stats.pages.to_string().bold(),
        stats.categories.to_string().bold()
    );

    for warning in session.warnings() {
        println!("{} {}", "warning:".yellow().bold(), warning);
    }

    Ok(())
}

//! Show command implementation.

use anyhow::{anyhow, Result};
use colored::Colorize;
use repowiki_core::{ViewState, WikiSession};

use crate::output;

/// Renders one page to stdout.
pub async fn execute(session: &mut WikiSession, page: &str, raw: bool) -> Result<()> {
    session.ensure_loaded().await?;

    match session.page_body(page).await {
        Ok(body) => {
            if raw {
                print!("{body}");
                if !body.ends_with('\n') {
                    println!();
                }
            } else {
                println!("{}", session.render(&body));
            }
            output::print_deep_link(&ViewState::Page(page.to_string()));
            Ok(())
        }
        Err(err) => {
            eprintln!("{} '{}': {}", "Could not load".red().bold(), page, err);

            // Offer a way back to a known-good view.
            let needle = page.rsplit('/').next().unwrap_or(page);
            let near = session.quick_search(needle);
            if near.is_empty() {
                eprintln!("Run 'repowiki list' to see the available pages.");
            } else {
                eprintln!("Closest pages:");
                for candidate in near.iter().take(5) {
                    eprintln!("  {}", candidate.logical_path.cyan());
                }
            }

            Err(anyhow!("page '{page}' is unavailable"))
        }
    }
}

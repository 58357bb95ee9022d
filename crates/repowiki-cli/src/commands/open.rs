//! Open command implementation: restores a deep-linked view.

use anyhow::Result;
use repowiki_core::{ViewState, WikiSession};

use crate::commands::{list, search, show};
use crate::output::OutputFormat;

/// Dispatches a `?page=…` / `?search=…` query string to the matching view.
/// Anything else lands on the page listing, the closest thing to a home
/// view.
pub async fn execute(session: &mut WikiSession, link: &str) -> Result<()> {
    match ViewState::parse(link) {
        ViewState::Page(logical_path) => show::execute(session, &logical_path, false).await,
        ViewState::Search(query) => {
            search::execute(session, &query, 10, false, OutputFormat::Text).await
        }
        ViewState::Home => list::execute(session, None, OutputFormat::Text).await,
    }
}

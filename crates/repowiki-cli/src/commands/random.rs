//! Random page command implementation.

use anyhow::{anyhow, Result};
use repowiki_core::WikiSession;

use crate::commands::show;

/// Picks an arbitrary page and renders it like `show`.
pub async fn execute(session: &mut WikiSession) -> Result<()> {
    session.ensure_loaded().await?;

    let logical_path = session
        .random_page()
        .map(|p| p.logical_path.clone())
        .ok_or_else(|| anyhow!("no pages scanned yet; run 'repowiki scan' first"))?;

    show::execute(session, &logical_path, false).await
}

//! # repowiki-core
//!
//! Core functionality for repowiki - turning a repository of Markdown pages
//! into a browsable, searchable wiki.
//!
//! Everything happens client-side against the repository's contents API:
//! a recursive scan reconstructs the page tree from flat directory
//! listings, the tree is flattened into a page index, a scored search
//! engine and a Markdown renderer operate on that index, and scan results
//! are cached locally with a freshness window.
//!
//! ## Architecture
//!
//! - **Source adapter** ([`source`]): the [`ContentSource`] trait and its
//!   GitHub implementation; one listing request per directory, no retries.
//! - **Tree builder** ([`tree`]): bounded depth-first reconstruction that
//!   tolerates per-subtree failures and falls back to the repository root
//!   when the pages root is missing.
//! - **Page index** ([`pages`], [`types`]): the flat [`PageRecord`] list
//!   every other component consumes.
//! - **Search** ([`search`]): normalized text index with exact, substring,
//!   and edit-distance scoring, plus a metadata-only fallback mode.
//! - **Renderer** ([`render`]): ordered regex substitution pipeline with
//!   wiki-link resolution against the page index.
//! - **Cache** ([`cache`]): advisory JSON envelope with a time-to-live.
//! - **Session** ([`session`]): the dependency-injected context object
//!   wiring the above together for a running instance.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use repowiki_core::{Config, WikiSession};
//!
//! # async fn run() -> repowiki_core::Result<()> {
//! let mut config = Config::load()?;
//! config.set_repo_slug("octocat/wiki")?;
//!
//! let mut session = WikiSession::new(config)?;
//! session.ensure_loaded().await?;
//!
//! for hit in session.search("getting started").await? {
//!     println!("{:>4}  {}", hit.score, hit.page.logical_path);
//! }
//! # Ok(())
//! # }
//! ```

/// Local persistence of scan results with a freshness window.
pub mod cache;
/// Configuration loading and layering.
pub mod config;
/// Deep-link query-string encoding of views.
pub mod deeplink;
/// Error types and result alias.
pub mod error;
/// Tree flattening into page records.
pub mod pages;
/// Markdown-to-markup conversion.
pub mod render;
/// Scored in-memory search.
pub mod search;
/// Remote content source adapter.
pub mod source;
/// The per-run session context.
pub mod session;
/// Recursive tree reconstruction.
pub mod tree;
/// Core data types.
pub mod types;

#[cfg(test)]
mod testutil;

pub use cache::{CacheEnvelope, CacheStore};
pub use config::{CacheConfig, Config, IndexConfig, RepoConfig, ScanConfig, DOC_EXTENSION};
pub use deeplink::ViewState;
pub use error::{Error, Result};
pub use render::{strip_markdown, Renderer};
pub use search::{quick_query, SearchIndex, SearchIndexEntry, SearchResult};
pub use session::{LoadOrigin, WikiSession};
pub use source::{ContentSource, GitHubSource, RemoteEntry};
pub use tree::{build_tree, ScanOutcome};
pub use types::{ContentNode, NodeKind, PageRecord, WikiStats, UNCATEGORIZED};

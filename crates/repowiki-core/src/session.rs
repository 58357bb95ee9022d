//! The wiki session: one explicit context object owning the scanned state.
//!
//! Everything downstream of the configuration hangs off a [`WikiSession`]
//! constructed at startup and passed to whoever needs it; there is no
//! process-wide singleton. The session loads cache-first, scans on miss,
//! and hands out pages, search results, rendered markup, and stats.

use crate::cache::{CacheEnvelope, CacheStore};
use crate::config::Config;
use crate::pages::extract_pages;
use crate::render::Renderer;
use crate::search::{quick_query, SearchIndex, SearchResult};
use crate::source::{ContentSource, GitHubSource};
use crate::tree::build_tree;
use crate::types::{ContentNode, PageRecord, WikiStats};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

/// Where the session's current page set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    /// Nothing loaded yet.
    Empty,
    /// Restored from the cache envelope.
    Cache,
    /// Produced by a live scan.
    Scan,
}

/// A running wiki session.
pub struct WikiSession {
    config: Config,
    source: Box<dyn ContentSource>,
    cache: CacheStore,

    pages: Vec<PageRecord>,
    tree: Option<ContentNode>,
    index: Option<SearchIndex>,
    warnings: Vec<String>,
    captured_at: Option<DateTime<Utc>>,
    origin: LoadOrigin,

    // Bumped per scan; async results carrying an older generation are
    // discarded instead of overwriting fresher state.
    generation: u64,
    index_generation: u64,
}

impl WikiSession {
    /// Creates a session talking to the configured repository.
    pub fn new(config: Config) -> Result<Self> {
        config.require_repo()?;
        let source = GitHubSource::new(config.api_base())?;
        let cache = CacheStore::new(&config)?;
        Ok(Self::with_parts(config, Box::new(source), cache))
    }

    /// Creates a session from explicit parts (dependency injection for
    /// tests and alternative sources).
    #[must_use]
    pub fn with_parts(config: Config, source: Box<dyn ContentSource>, cache: CacheStore) -> Self {
        Self {
            config,
            source,
            cache,
            pages: Vec::new(),
            tree: None,
            index: None,
            warnings: Vec::new(),
            captured_at: None,
            origin: LoadOrigin::Empty,
            generation: 0,
            index_generation: 0,
        }
    }

    /// The session's configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The current page index, empty before the first load.
    #[must_use]
    pub fn pages(&self) -> &[PageRecord] {
        &self.pages
    }

    /// The scanned content tree, when one is loaded.
    #[must_use]
    pub fn tree(&self) -> Option<&ContentNode> {
        self.tree.as_ref()
    }

    /// Warnings accumulated by the most recent scan.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Where the current page set came from.
    #[must_use]
    pub fn origin(&self) -> LoadOrigin {
        self.origin
    }

    /// When the current page set was captured.
    #[must_use]
    pub fn captured_at(&self) -> Option<DateTime<Utc>> {
        self.captured_at
    }

    /// Loads pages from the cache when a fresh envelope exists, otherwise
    /// performs a scan. Does nothing when pages are already loaded.
    pub async fn ensure_loaded(&mut self) -> Result<()> {
        if self.origin != LoadOrigin::Empty {
            return Ok(());
        }

        if let Some(envelope) = self.cache.load() {
            info!(
                "restored {} pages cached at {}",
                envelope.pages.len(),
                envelope.captured_at
            );
            self.pages = envelope.pages;
            self.tree = envelope.tree;
            self.captured_at = Some(envelope.captured_at);
            self.origin = LoadOrigin::Cache;
            return Ok(());
        }

        self.scan().await
    }

    /// Scans the repository, replacing the session's pages, tree, and
    /// (lazily rebuilt) search index, and persists the new envelope.
    pub async fn scan(&mut self) -> Result<()> {
        self.generation += 1;
        let generation = self.generation;

        let outcome = build_tree(self.source.as_ref(), &self.config).await?;

        if generation != self.generation {
            debug!("discarding superseded scan (generation {})", generation);
            return Ok(());
        }

        let pages = extract_pages(&outcome.root, &self.config);
        let captured_at = Utc::now();

        self.cache.save(&CacheEnvelope {
            pages: pages.clone(),
            tree: Some(outcome.root.clone()),
            captured_at,
        });

        info!(
            "scan finished: {} pages, {} warnings",
            pages.len(),
            outcome.warnings.len()
        );

        self.pages = pages;
        self.tree = Some(outcome.root);
        self.warnings = outcome.warnings;
        self.captured_at = Some(captured_at);
        self.origin = LoadOrigin::Scan;
        self.index = None;
        Ok(())
    }

    /// Builds the content-enriched search index for the current pages if it
    /// is missing or belongs to a previous scan.
    pub async fn build_index(&mut self) -> Result<()> {
        if self.index.is_some() && self.index_generation == self.generation {
            return Ok(());
        }

        let generation = self.generation;
        let index = SearchIndex::build(&self.pages, self.source.as_ref(), &self.config.index).await;

        if generation != self.generation {
            debug!("discarding superseded index (generation {})", generation);
            return Ok(());
        }
        self.index = Some(index);
        self.index_generation = generation;
        Ok(())
    }

    /// Searches with the full scored index, building it on first use.
    pub async fn search(&mut self, query: &str) -> Result<Vec<SearchResult>> {
        self.ensure_loaded().await?;
        self.build_index().await?;
        match &self.index {
            Some(index) => Ok(index.query(query)),
            None => Ok(Vec::new()),
        }
    }

    /// Substring-only search over bare metadata; usable before any index
    /// has been built.
    #[must_use]
    pub fn quick_search(&self, query: &str) -> Vec<PageRecord> {
        quick_query(&self.pages, query)
    }

    /// Looks up a page by logical path.
    #[must_use]
    pub fn page(&self, logical_path: &str) -> Option<&PageRecord> {
        self.pages.iter().find(|p| p.logical_path == logical_path)
    }

    /// Fetches the raw Markdown body of a page.
    pub async fn page_body(&self, logical_path: &str) -> Result<String> {
        let page = self
            .page(logical_path)
            .ok_or_else(|| Error::NotFound(format!("no page at '{logical_path}'")))?;
        self.source.fetch_raw(&page.download_url).await
    }

    /// Renders a Markdown body against the current page index.
    #[must_use]
    pub fn render(&self, markdown: &str) -> String {
        Renderer::new(&self.pages, &self.config).render(markdown)
    }

    /// Summary numbers for the current page set.
    #[must_use]
    pub fn stats(&self) -> WikiStats {
        WikiStats::compute(&self.pages, self.tree.as_ref(), self.captured_at)
    }

    /// An arbitrary page, or `None` while the index is empty.
    #[must_use]
    pub fn random_page(&self) -> Option<&PageRecord> {
        if self.pages.is_empty() {
            return None;
        }
        // Wall-clock jitter is plenty for "surprise me".
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.subsec_nanos() as usize)
            .unwrap_or(0);
        self.pages.get(nanos % self.pages.len())
    }
}

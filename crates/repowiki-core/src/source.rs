//! Remote content source adapter.
//!
//! Wraps the repository contents API behind the [`ContentSource`] trait so
//! the tree builder and search indexer can run against an in-memory source in
//! tests. The production implementation, [`GitHubSource`], performs one
//! network round-trip per call and never retries; failure containment is the
//! caller's job.

use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

/// One entry of a directory listing as returned by the contents API.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteEntry {
    /// Entry name, including the file extension for files.
    pub name: String,
    /// Repository-relative path.
    pub path: String,
    /// `"file"` or `"dir"`; anything else is skipped by callers.
    #[serde(rename = "type")]
    pub kind: String,
    /// Raw content address, present for files.
    #[serde(default)]
    pub download_url: Option<String>,
    /// Size in bytes, present for files.
    #[serde(default)]
    pub size: Option<u64>,
}

impl RemoteEntry {
    /// Whether this entry is a directory.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == "dir"
    }

    /// Whether this entry is a regular file.
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == "file"
    }
}

// The contents API returns a JSON array for directories and a bare object
// when the path addresses a file directly.
#[derive(Deserialize)]
#[serde(untagged)]
enum Listing {
    Many(Vec<RemoteEntry>),
    One(RemoteEntry),
}

/// Listing and raw-content access to a remote repository.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Lists the entries under `path` (empty string for the repository root).
    async fn list(&self, path: &str) -> Result<Vec<RemoteEntry>>;

    /// Fetches the raw body behind a download address.
    async fn fetch_raw(&self, url: &str) -> Result<String>;
}

/// [`ContentSource`] backed by the GitHub contents API.
pub struct GitHubSource {
    client: Client,
    api_base: String,
}

impl GitHubSource {
    /// Creates a source for the given contents API base URL.
    pub fn new(api_base: impl Into<String>) -> Result<Self> {
        Self::with_timeout(api_base, Duration::from_secs(30))
    }

    /// Creates a source with a custom request timeout (primarily for tests).
    pub fn with_timeout(api_base: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("repowiki/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(Error::Network)?;
        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    fn listing_url(&self, path: &str) -> String {
        if path.is_empty() {
            self.api_base.clone()
        } else {
            format!("{}/{}", self.api_base, path.trim_matches('/'))
        }
    }

    fn check_status(status: StatusCode, url: &str) -> Result<()> {
        if status.is_success() {
            return Ok(());
        }
        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(format!("'{url}' does not exist")));
        }
        if status == StatusCode::FORBIDDEN {
            return Err(Error::RateLimited {
                url: url.to_string(),
            });
        }
        Err(Error::Http {
            status: status.as_u16(),
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl ContentSource for GitHubSource {
    async fn list(&self, path: &str) -> Result<Vec<RemoteEntry>> {
        let url = self.listing_url(path);
        debug!("listing {}", url);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?;
        Self::check_status(response.status(), &url)?;

        let body = response.text().await?;
        let listing: Listing = serde_json::from_str(&body)?;
        let entries = match listing {
            Listing::Many(entries) => entries,
            Listing::One(entry) => vec![entry],
        };

        debug!("{} entries under '{}'", entries.len(), path);
        Ok(entries)
    }

    async fn fetch_raw(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        Self::check_status(response.status(), url)?;

        let content = response.text().await?;
        info!("fetched {} bytes from {}", content.len(), url);
        Ok(content)
    }
}

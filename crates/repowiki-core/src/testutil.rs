//! In-memory [`ContentSource`] for unit tests.

use crate::source::{ContentSource, RemoteEntry};
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;

/// A scripted content source: canned listings, canned bodies, and paths
/// that fail with a chosen status.
#[derive(Default)]
pub struct MockSource {
    listings: HashMap<String, Vec<RemoteEntry>>,
    failures: HashMap<String, u16>,
    bodies: HashMap<String, String>,
}

impl MockSource {
    /// Creates an empty source; every call fails with `NotFound`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A directory entry named after the last path segment.
    #[must_use]
    pub fn dir(path: &str) -> RemoteEntry {
        RemoteEntry {
            name: path.rsplit('/').next().unwrap_or(path).to_string(),
            path: path.to_string(),
            kind: "dir".to_string(),
            download_url: None,
            size: None,
        }
    }

    /// A file entry with a synthesized download address.
    #[must_use]
    pub fn file(path: &str, size: u64) -> RemoteEntry {
        RemoteEntry {
            name: path.rsplit('/').next().unwrap_or(path).to_string(),
            path: path.to_string(),
            kind: "file".to_string(),
            download_url: Some(format!("https://raw.example.com/{path}")),
            size: Some(size),
        }
    }

    /// Scripts the listing for `path`.
    #[must_use]
    pub fn listing(mut self, path: &str, entries: Vec<RemoteEntry>) -> Self {
        self.listings.insert(path.to_string(), entries);
        self
    }

    /// Makes listing `path` fail with an HTTP-like status.
    #[must_use]
    pub fn failing(mut self, path: &str, status: u16) -> Self {
        self.failures.insert(path.to_string(), status);
        self
    }

    /// Scripts the raw body served at the download address for `path`
    /// (matching the address [`MockSource::file`] synthesizes).
    #[must_use]
    pub fn body(mut self, path: &str, content: &str) -> Self {
        self.bodies
            .insert(format!("https://raw.example.com/{path}"), content.to_string());
        self
    }
}

#[async_trait]
impl ContentSource for MockSource {
    async fn list(&self, path: &str) -> Result<Vec<RemoteEntry>> {
        if let Some(&status) = self.failures.get(path) {
            if status == 404 {
                return Err(Error::NotFound(format!("'{path}' does not exist")));
            }
            if status == 403 {
                return Err(Error::RateLimited {
                    url: path.to_string(),
                });
            }
            return Err(Error::Http {
                status,
                url: path.to_string(),
            });
        }
        self.listings
            .get(path)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("'{path}' does not exist")))
    }

    async fn fetch_raw(&self, url: &str) -> Result<String> {
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| Error::NotFound(url.to_string()))
    }
}

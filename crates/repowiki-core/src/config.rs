//! Configuration for repowiki.
//!
//! Configuration is layered: built-in defaults, then an optional TOML file in
//! the platform config directory, then `REPOWIKI_*` environment variables,
//! then whatever the caller sets programmatically (CLI flags end up here).
//!
//! ## Example configuration file
//!
//! ```toml
//! [repo]
//! owner = "horp"
//! name = "horp-wiki"
//! branch = "main"
//!
//! [scan]
//! pages_root = "pages"
//! max_depth = 12
//! max_nodes = 2048
//!
//! [index]
//! max_content_pages = 20
//! snippet_chars = 480
//!
//! [cache]
//! refresh_hours = 24
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Document extension recognized during scans. Files with any other
/// extension are ignored by the tree builder.
pub const DOC_EXTENSION: &str = ".md";

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which repository to scan.
    pub repo: RepoConfig,
    /// Tree traversal settings.
    pub scan: ScanConfig,
    /// Search index settings.
    pub index: IndexConfig,
    /// Cache envelope settings.
    pub cache: CacheConfig,
}

/// Remote repository coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoConfig {
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub name: String,
    /// Branch raw content is served from.
    pub branch: String,
}

/// Limits and layout for the repository scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Directory inside the repository holding the wiki pages.
    pub pages_root: String,
    /// Maximum directory depth the scan will recurse into. Deeper
    /// directories are pruned with a warning rather than followed.
    pub max_depth: usize,
    /// Maximum number of tree nodes a scan may produce before it stops
    /// attaching new ones.
    pub max_nodes: usize,
}

/// Search indexing limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// At most this many pages have their content fetched for the index;
    /// the rest are indexed from metadata only.
    pub max_content_pages: usize,
    /// Number of characters of stripped content kept as the index snippet.
    pub snippet_chars: usize,
}

/// Cache freshness settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Scan results older than this many hours are treated as absent.
    pub refresh_hours: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repo: RepoConfig::default(),
            scan: ScanConfig::default(),
            index: IndexConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            owner: String::new(),
            name: String::new(),
            branch: "main".to_string(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            pages_root: "pages".to_string(),
            max_depth: 12,
            max_nodes: 2048,
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            max_content_pages: 20,
            snippet_chars: 480,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { refresh_hours: 24 }
    }
}

impl Config {
    /// Loads configuration from the default location, falling back to
    /// defaults when no file exists.
    pub fn load() -> Result<Self> {
        let path = Self::config_file()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from an explicit TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)?;
        Ok(config)
    }

    /// Saves the configuration to the default location.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)?;
        fs::write(&path, raw)?;
        Ok(())
    }

    /// Resolves the configuration file path, honoring `REPOWIKI_CONFIG_DIR`.
    pub fn config_file() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var("REPOWIKI_CONFIG_DIR") {
            let trimmed = dir.trim();
            if !trimmed.is_empty() {
                return Ok(PathBuf::from(trimmed).join("config.toml"));
            }
        }

        let dirs = directories::ProjectDirs::from("dev", "repowiki", "repowiki")
            .ok_or_else(|| Error::Config("failed to determine config directory".into()))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Sets the repository from an `owner/name` slug.
    pub fn set_repo_slug(&mut self, slug: &str) -> Result<()> {
        let (owner, name) = slug
            .split_once('/')
            .ok_or_else(|| Error::Config(format!("expected owner/name, got '{slug}'")))?;
        if owner.is_empty() || name.is_empty() {
            return Err(Error::Config(format!("expected owner/name, got '{slug}'")));
        }
        self.repo.owner = owner.to_string();
        self.repo.name = name.to_string();
        Ok(())
    }

    /// Validates that the configuration names a repository.
    pub fn require_repo(&self) -> Result<()> {
        if self.repo.owner.is_empty() || self.repo.name.is_empty() {
            return Err(Error::Config(
                "no repository configured; pass --repo owner/name or set [repo] in config.toml"
                    .into(),
            ));
        }
        Ok(())
    }

    /// Base URL of the contents listing API for the configured repository.
    ///
    /// `REPOWIKI_API_BASE` overrides the default host, which lets tests point
    /// the adapter at a local mock server.
    #[must_use]
    pub fn api_base(&self) -> String {
        if let Ok(base) = std::env::var("REPOWIKI_API_BASE") {
            let trimmed = base.trim_end_matches('/');
            if !trimmed.is_empty() {
                return trimmed.to_string();
            }
        }
        format!(
            "https://api.github.com/repos/{}/{}/contents",
            self.repo.owner, self.repo.name
        )
    }

    /// Base URL raw page bodies and relative image sources resolve against.
    ///
    /// `REPOWIKI_RAW_BASE` overrides the default host.
    #[must_use]
    pub fn raw_base(&self) -> String {
        if let Ok(base) = std::env::var("REPOWIKI_RAW_BASE") {
            let trimmed = base.trim_end_matches('/');
            if !trimmed.is_empty() {
                return trimmed.to_string();
            }
        }
        format!(
            "https://raw.githubusercontent.com/{}/{}/{}",
            self.repo.owner, self.repo.name, self.repo.branch
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = Config::default();
        assert_eq!(config.repo.branch, "main");
        assert_eq!(config.scan.pages_root, "pages");
        assert_eq!(config.cache.refresh_hours, 24);
        assert!(config.scan.max_depth > 0);
        assert!(config.index.max_content_pages > 0);
    }

    #[test]
    fn repo_slug_parsing() {
        let mut config = Config::default();
        config.set_repo_slug("octo/wiki").unwrap();
        assert_eq!(config.repo.owner, "octo");
        assert_eq!(config.repo.name, "wiki");

        assert!(config.set_repo_slug("no-slash").is_err());
        assert!(config.set_repo_slug("/name").is_err());
        assert!(config.set_repo_slug("owner/").is_err());
    }

    #[test]
    fn require_repo_rejects_empty() {
        let config = Config::default();
        assert!(config.require_repo().is_err());

        let mut config = Config::default();
        config.set_repo_slug("octo/wiki").unwrap();
        assert!(config.require_repo().is_ok());
    }

    #[test]
    fn api_base_uses_repo_coordinates() {
        let mut config = Config::default();
        config.set_repo_slug("octo/wiki").unwrap();
        // Only assert the default shape when the test environment does not
        // override the base.
        if std::env::var("REPOWIKI_API_BASE").is_err() {
            assert_eq!(
                config.api_base(),
                "https://api.github.com/repos/octo/wiki/contents"
            );
        }
        if std::env::var("REPOWIKI_RAW_BASE").is_err() {
            assert_eq!(
                config.raw_base(),
                "https://raw.githubusercontent.com/octo/wiki/main"
            );
        }
    }

    #[test]
    fn toml_round_trip() {
        let mut config = Config::default();
        config.set_repo_slug("octo/wiki").unwrap();
        config.cache.refresh_hours = 12;
        let raw = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&raw).unwrap();
        assert_eq!(parsed.repo.owner, "octo");
        assert_eq!(parsed.cache.refresh_hours, 12);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[repo]\nowner = \"octo\"\nname = \"wiki\"\n").unwrap();
        assert_eq!(parsed.repo.owner, "octo");
        assert_eq!(parsed.repo.branch, "main");
        assert_eq!(parsed.scan.pages_root, "pages");
    }
}

//! Local persistence of scan results.
//!
//! One JSON envelope per repository, stamped with its capture time. The
//! cache is advisory: `save` never raises (a failed write only costs the
//! next startup a re-scan) and `load` treats absence, corruption, and
//! staleness identically as a miss.

use crate::config::Config;
use crate::types::{ContentNode, PageRecord};
use crate::{Error, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// The serialized scan result crossing session boundaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEnvelope {
    /// Flattened page index.
    pub pages: Vec<PageRecord>,
    /// The content tree the pages came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree: Option<ContentNode>,
    /// When the scan completed.
    pub captured_at: DateTime<Utc>,
}

/// Reads and writes the cache envelope for one repository.
pub struct CacheStore {
    path: PathBuf,
    refresh_hours: u32,
}

impl CacheStore {
    /// Creates a store for the configured repository.
    ///
    /// The data directory honors `REPOWIKI_DATA_DIR`, then the platform
    /// data dir, then `~/.repowiki`.
    pub fn new(config: &Config) -> Result<Self> {
        let root = Self::data_dir()?;
        let file = format!("{}--{}.json", config.repo.owner, config.repo.name);
        Ok(Self {
            path: root.join("scans").join(file),
            refresh_hours: config.cache.refresh_hours,
        })
    }

    /// Creates a store writing to an explicit file path.
    #[must_use]
    pub fn at_path(path: PathBuf, refresh_hours: u32) -> Self {
        Self {
            path,
            refresh_hours,
        }
    }

    fn data_dir() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var("REPOWIKI_DATA_DIR") {
            let trimmed = dir.trim();
            if !trimmed.is_empty() {
                return Ok(PathBuf::from(trimmed));
            }
        }

        if let Some(dirs) = directories::ProjectDirs::from("dev", "repowiki", "repowiki") {
            return Ok(dirs.data_dir().to_path_buf());
        }

        let base = directories::BaseDirs::new()
            .ok_or_else(|| Error::Config("failed to determine home directory".into()))?;
        Ok(base.home_dir().join(".repowiki"))
    }

    /// Persists the envelope. Fire-and-forget: failures are logged and
    /// swallowed, since losing the cache only forces a re-scan.
    pub fn save(&self, envelope: &CacheEnvelope) {
        if let Err(err) = self.try_save(envelope) {
            warn!("could not persist scan cache at {:?}: {}", self.path, err);
        }
    }

    fn try_save(&self, envelope: &CacheEnvelope) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string(envelope)?;
        fs::write(&self.path, raw)?;
        debug!("cached {} pages at {:?}", envelope.pages.len(), self.path);
        Ok(())
    }

    /// Loads a fresh envelope, or `None` when the entry is absent, cannot
    /// be parsed, or is older than the configured refresh interval. Never
    /// raises.
    #[must_use]
    pub fn load(&self) -> Option<CacheEnvelope> {
        let raw = fs::read_to_string(&self.path).ok()?;

        let envelope: CacheEnvelope = match serde_json::from_str(&raw) {
            Ok(envelope) => envelope,
            Err(err) => {
                // Corrupt cache is a miss, never an error.
                warn!("discarding unreadable scan cache at {:?}: {}", self.path, err);
                return None;
            }
        };

        if !self.is_fresh(envelope.captured_at) {
            debug!(
                "scan cache from {} is past the {}h refresh window",
                envelope.captured_at, self.refresh_hours
            );
            return None;
        }

        Some(envelope)
    }

    fn is_fresh(&self, captured_at: DateTime<Utc>) -> bool {
        Utc::now() - captured_at <= Duration::hours(i64::from(self.refresh_hours))
    }
}

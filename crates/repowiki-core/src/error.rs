//! Error types and handling for repowiki-core operations.
//!
//! Errors fall into a few groups: transport failures talking to the remote
//! repository (with the HTTP status preserved where one exists), lookup
//! failures against the in-memory page index, the distinguished "nothing to
//! scan" condition, and the usual I/O, configuration, and serialization
//! suspects. Cache corruption is intentionally *not* represented here: the
//! cache layer treats it as a miss and never raises it to callers.

use thiserror::Error;

/// The main error type for repowiki-core operations.
///
/// All public fallible functions in this crate return [`Result<T>`].
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The remote request could not be completed at the transport level
    /// (connection failure, timeout, malformed URL).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The remote listing API answered with a non-success status.
    #[error("HTTP {status} from '{url}'")]
    Http {
        /// Status code returned by the server.
        status: u16,
        /// URL that produced the failure.
        url: String,
    },

    /// The remote listing API answered 403. The contents API uses this status
    /// for rate limiting, so it is kept distinct from [`Error::Http`] for
    /// diagnostics.
    #[error("Rate limited (403) by '{url}'")]
    RateLimited {
        /// URL that produced the failure.
        url: String,
    },

    /// Requested resource was not found (404 from the remote, or a logical
    /// page absent from the index at view time).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Neither the configured pages root nor the repository-root fallback
    /// yielded a single document file.
    #[error("No content found: {0}")]
    NoContentFound(String),

    /// Configuration is invalid or inaccessible.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl Error {
    /// Check whether the error might be recoverable by retrying the
    /// operation (a fresh `scan` after a transient network hiccup, for
    /// example).
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::RateLimited { .. } => true,
            Self::Http { status, .. } => *status >= 500,
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }

    /// Error category as a static string, for logging and diagnostics.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Network(_) | Self::Http { .. } => "transport",
            Self::RateLimited { .. } => "rate_limited",
            Self::NotFound(_) => "not_found",
            Self::NoContentFound(_) => "no_content",
            Self::Config(_) => "config",
            Self::Serialization(_) => "serialization",
        }
    }
}

/// Convenience alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

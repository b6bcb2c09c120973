use thiserror::Error;

use crate::domain::error::DomainError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// A single odds sub-fetch failed.
///
/// These never abort a scan cycle; the affected feed is skipped.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("request for {feed} failed: {source}")]
    Http {
        feed: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request for {feed} returned status {status}")]
    Status { feed: String, status: u16 },

    #[error("request for {feed} timed out after {after_ms}ms")]
    Timeout { feed: String, after_ms: u64 },

    #[error("response for {feed} is not an event list: {reason}")]
    Decode { feed: String, reason: String },

    #[error("odds source is not configured: {0}")]
    NotConfigured(String),
}

impl SourceError {
    /// The feed key the failure belongs to, if any.
    pub fn feed(&self) -> Option<&str> {
        match self {
            Self::Http { feed, .. }
            | Self::Status { feed, .. }
            | Self::Timeout { feed, .. }
            | Self::Decode { feed, .. } => Some(feed),
            Self::NotConfigured(_) => None,
        }
    }
}

/// Persistence failures. Fatal for the cycle that hit them.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read {key}: {reason}")]
    Read { key: String, reason: String },

    #[error("failed to write {key}: {reason}")]
    Write { key: String, reason: String },

    #[error("stored value under {key} is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to lock {path}: {reason}")]
    Lock { path: String, reason: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("opportunity not found: {0}")]
    NotFound(String),

    #[error("not authorized to {action}")]
    Unauthorized { action: String },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

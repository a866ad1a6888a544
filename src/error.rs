use std::time::Duration;
use thiserror::Error;

/// Errors raised by a page fetcher
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to connect to WebDriver at {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("navigation to {url} failed: {source}")]
    Navigation {
        url: String,
        #[source]
        source: fantoccini::error::CmdError,
    },

    #[error("timed out after {timeout:?} loading {url}")]
    Timeout { url: String, timeout: Duration },

    /// Used by non-browser fetchers (fixtures, alternative backends)
    #[error("could not load {url}: {reason}")]
    Unavailable { url: String, reason: String },
}

impl FetchError {
    /// URL the failure relates to (the driver URL for connection failures)
    pub fn url(&self) -> &str {
        match self {
            FetchError::Connect { url, .. }
            | FetchError::Navigation { url, .. }
            | FetchError::Timeout { url, .. }
            | FetchError::Unavailable { url, .. } => url,
        }
    }
}

/// Errors raised while assembling the run configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed config file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },

    #[error("invalid pattern for {name}: {source}")]
    Pattern {
        name: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("unknown timezone {0:?}")]
    Timezone(String),

    #[error("invalid base URL {0:?}")]
    BaseUrl(String),
}

/// Errors that end a run early
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("aborting run: {0}")]
    Fetch(#[from] FetchError),

    #[error("cannot write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

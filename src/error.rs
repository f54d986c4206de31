use std::path::PathBuf;
use thiserror::Error;

/// Failure to retrieve or persist a single page
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport error, timeout, or non-success HTTP status
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The URL has no scheme or host to mirror under
    #[error("cannot mirror invalid URL {0:?}")]
    InvalidUrl(String),

    /// The mirror file could not be written
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure while turning a mirrored HTML tree into text artifacts
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to walk {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors surfaced by the batch orchestrator
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid seed URL {url:?}: {reason}")]
    InvalidSeed { url: String, reason: String },

    #[error("invalid URL pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error("record task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

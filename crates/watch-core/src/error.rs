use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by report-watch.
#[derive(Error, Debug)]
pub enum WatchError {
    /// The HTTP request could not be completed (connect, timeout, body read).
    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The server answered with a non-success status code.
    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    /// A document could not be read from a local directory source.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configured source location is neither a URL nor a usable path.
    #[error("Invalid source location: {0}")]
    InvalidSource(String),

    /// Neither the index nor the latest report could be loaded.
    #[error("No report documents available: {0}")]
    NothingLoaded(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience alias used throughout the watch crates.
pub type Result<T> = std::result::Result<T, WatchError>;

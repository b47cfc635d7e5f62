//! Where report documents come from.
//!
//! Reports are static markdown files published side by side:
//! `index.md`, `latest.md`, and the dated report files the index links to.
//! They are read either over plain HTTP GET or straight from a directory.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;
use watch_core::{Result, WatchError};

/// Name of the index document listing every report.
pub const INDEX_DOC: &str = "index.md";
/// Name of the document holding the most recent report.
pub const LATEST_DOC: &str = "latest.md";

/// A location that serves report documents by name.
pub trait DocumentSource {
    /// Fetch the document `name`, relative to the source's base location.
    fn fetch(&self, name: &str) -> impl Future<Output = Result<String>> + Send;

    /// Human-readable base location, for logs and the header line.
    fn describe(&self) -> String;
}

// ── HttpSource ────────────────────────────────────────────────────────────────

/// Documents served over HTTP(S) under a base URL.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base: Url,
}

impl HttpSource {
    /// Build a source for `base`. A missing trailing `/` is added so that
    /// document names resolve inside the base path instead of replacing its
    /// last segment.
    pub fn new(base: &str, timeout: Duration) -> Result<Self> {
        let mut base =
            Url::parse(base).map_err(|e| WatchError::InvalidSource(format!("{base}: {e}")))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("report-watch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| WatchError::Config(format!("HTTP client: {e}")))?;

        Ok(Self { client, base })
    }

    /// Absolute URL of the document `name`.
    pub fn url_for(&self, name: &str) -> Result<Url> {
        self.base
            .join(name)
            .map_err(|e| WatchError::InvalidSource(format!("{name}: {e}")))
    }
}

impl DocumentSource for HttpSource {
    async fn fetch(&self, name: &str) -> Result<String> {
        let url = self.url_for(name)?;
        tracing::debug!(%url, "GET");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| WatchError::Http {
                url: url.to_string(),
                source: Box::new(e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(WatchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| WatchError::Http {
            url: url.to_string(),
            source: Box::new(e),
        })
    }

    fn describe(&self) -> String {
        self.base.to_string()
    }
}

// ── DirSource ─────────────────────────────────────────────────────────────────

/// Documents read from a local directory.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DocumentSource for DirSource {
    async fn fetch(&self, name: &str) -> Result<String> {
        let path = self.root.join(name);
        tracing::debug!(path = %path.display(), "read");
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| WatchError::FileRead { path, source })
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

// ── Source ────────────────────────────────────────────────────────────────────

/// The source picked from a `--source` value.
#[derive(Debug, Clone)]
pub enum Source {
    Http(HttpSource),
    Dir(DirSource),
}

impl Source {
    /// `http://` and `https://` locations are fetched over HTTP; anything
    /// without a scheme is treated as a directory path.
    pub fn from_location(location: &str, timeout: Duration) -> Result<Self> {
        let trimmed = location.trim();
        if trimmed.is_empty() {
            return Err(WatchError::InvalidSource("empty location".to_string()));
        }

        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return HttpSource::new(trimmed, timeout).map(Source::Http);
        }
        if trimmed.contains("://") {
            return Err(WatchError::InvalidSource(format!(
                "{trimmed}: only http, https and local directories are supported"
            )));
        }

        Ok(Source::Dir(DirSource::new(trimmed)))
    }
}

impl DocumentSource for Source {
    async fn fetch(&self, name: &str) -> Result<String> {
        match self {
            Source::Http(s) => s.fetch(name).await,
            Source::Dir(s) => s.fetch(name).await,
        }
    }

    fn describe(&self) -> String {
        match self {
            Source::Http(s) => s.describe(),
            Source::Dir(s) => s.describe(),
        }
    }
}

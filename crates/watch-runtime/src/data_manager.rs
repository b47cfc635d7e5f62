//! TTL-cached data manager for the refresh runtime.
//!
//! Wraps [`SnapshotLoader::load`] with a configurable time-to-live cache and
//! retry logic. Callers use [`DataManager::get_data`] to obtain a
//! fresh-or-cached [`ReportSnapshot`]; the manager handles staleness checks,
//! up to three fetch attempts with back-off, and fallback to the previous
//! snapshot on failure.

use std::time::{Duration, Instant};

use watch_core::ReportSnapshot;
use watch_data::{DocumentSource, SnapshotLoader};

/// Default cache TTL in seconds.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 30;

/// Maximum number of fetch attempts before giving up and returning stale data.
const MAX_RETRY_ATTEMPTS: u32 = 3;

// ── DataManager ───────────────────────────────────────────────────────────────

/// TTL-cached wrapper around a [`SnapshotLoader`].
pub struct DataManager<S> {
    loader: SnapshotLoader<S>,
    /// Maximum age of cached data before it is considered stale.
    cache_ttl: Duration,
    /// Most recently fetched snapshot.
    cache: Option<ReportSnapshot>,
    /// When the cache was last populated.
    cache_timestamp: Option<Instant>,
    /// The `today` the cached snapshot was classified against.
    cache_day: Option<String>,
    /// Human-readable description of the last error encountered.
    last_error: Option<String>,
}

impl<S: DocumentSource> DataManager<S> {
    pub fn new(loader: SnapshotLoader<S>, cache_ttl_secs: u64) -> Self {
        Self {
            loader,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            cache: None,
            cache_timestamp: None,
            cache_day: None,
            last_error: None,
        }
    }

    pub fn loader(&self) -> &SnapshotLoader<S> {
        &self.loader
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Return a snapshot classified against `today`, using the cache when it
    /// is still valid.
    ///
    /// When `force_refresh` is `true` the cache is bypassed. A change of
    /// `today` also bypasses it, since the cached today flags would be
    /// wrong. On fetch failure the previous snapshot (if any) is returned.
    pub async fn get_data(&mut self, today: &str, force_refresh: bool) -> Option<&ReportSnapshot> {
        if !force_refresh && self.is_cache_valid(today) {
            tracing::debug!("returning cached snapshot");
            return self.cache.as_ref();
        }

        match self.fetch_with_retry(today).await {
            Ok(snapshot) => {
                tracing::debug!(reports = snapshot.records.len(), "snapshot cache updated");
                self.cache = Some(snapshot);
                self.cache_timestamp = Some(Instant::now());
                self.cache_day = Some(today.to_string());
                self.last_error = None;
                self.cache.as_ref()
            }
            Err(e) => {
                tracing::warn!(error = %e, "fetch failed; falling back to cached snapshot");
                self.last_error = Some(e);
                self.cache.as_ref()
            }
        }
    }

    /// Discard the current cache, forcing the next [`Self::get_data`] call to fetch.
    pub fn invalidate_cache(&mut self) {
        self.cache = None;
        self.cache_timestamp = None;
        self.cache_day = None;
        tracing::debug!("cache invalidated");
    }

    /// Age of the current cache entry, or `None` if nothing has been fetched.
    pub fn cache_age(&self) -> Option<Duration> {
        self.cache_timestamp.map(|ts| ts.elapsed())
    }

    /// Description of the last fetch error, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    // ── Private helpers ───────────────────────────────────────────────────

    fn is_cache_valid(&self, today: &str) -> bool {
        match (self.cache.as_ref(), self.cache_timestamp) {
            (Some(_), Some(ts)) => {
                ts.elapsed() < self.cache_ttl && self.cache_day.as_deref() == Some(today)
            }
            _ => false,
        }
    }

    /// Up to [`MAX_RETRY_ATTEMPTS`] loads; back-off 0 ms → 100 ms → 200 ms.
    async fn fetch_with_retry(&self, today: &str) -> Result<ReportSnapshot, String> {
        let mut last_err = String::new();

        for attempt in 0..MAX_RETRY_ATTEMPTS {
            if attempt > 0 {
                let sleep_ms = u64::from(attempt) * 100;
                tracing::debug!(attempt, sleep_ms, "retrying fetch after back-off");
                tokio::time::sleep(Duration::from_millis(sleep_ms)).await;
            }

            match self.loader.load(today).await {
                Ok(snapshot) => return Ok(snapshot),
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "fetch attempt failed");
                    last_err = e.to_string();
                }
            }
        }

        Err(last_err)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! One refresh cycle: fetch both documents, parse, derive.

use chrono::Utc;
use watch_core::stats::extract_progress;
use watch_core::{IndexParser, ReportSnapshot, Result, WatchError};

use crate::source::{DocumentSource, INDEX_DOC, LATEST_DOC};

/// Fetches `index.md` and `latest.md` from a source and turns them into a
/// [`ReportSnapshot`].
#[derive(Debug, Clone)]
pub struct SnapshotLoader<S> {
    source: S,
    parser: IndexParser,
}

impl<S: DocumentSource> SnapshotLoader<S> {
    pub fn new(source: S, parser: IndexParser) -> Self {
        Self { source, parser }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn parser(&self) -> &IndexParser {
        &self.parser
    }

    /// Fetch and parse both documents, classifying records against `today`.
    ///
    /// The two fetches run concurrently and fail independently: a snapshot
    /// is returned as long as either document loaded, with the other side's
    /// failure recorded on it. Only when both fail is the load an error.
    pub async fn load(&self, today: &str) -> Result<ReportSnapshot> {
        let (index, latest) = tokio::join!(
            self.source.fetch(INDEX_DOC),
            self.source.fetch(LATEST_DOC)
        );

        let mut snapshot = ReportSnapshot::empty(Utc::now());

        match index {
            Ok(text) => snapshot.records = self.parser.parse(&text, today),
            Err(e) => {
                tracing::warn!(error = %e, document = INDEX_DOC, "fetch failed");
                snapshot.index_error = Some(e.to_string());
            }
        }

        match latest {
            Ok(markdown) => {
                snapshot.progress = extract_progress(&markdown);
                snapshot.latest_markdown = Some(markdown);
            }
            Err(e) => {
                tracing::warn!(error = %e, document = LATEST_DOC, "fetch failed");
                snapshot.latest_error = Some(e.to_string());
            }
        }

        if let (Some(index_err), Some(latest_err)) = (&snapshot.index_error, &snapshot.latest_error)
        {
            return Err(WatchError::NothingLoaded(format!(
                "{INDEX_DOC}: {index_err}; {LATEST_DOC}: {latest_err}"
            )));
        }

        tracing::info!(
            source = %self.source.describe(),
            reports = snapshot.records.len(),
            progress = ?snapshot.progress,
            "snapshot loaded"
        );
        Ok(snapshot)
    }
}

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One report entry parsed from the index document.
///
/// Fields are private so a record cannot change after the parser has built
/// it; every parse produces a fresh collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRecord {
    title: String,
    path: String,
    date: String,
    time: String,
    is_today: bool,
    timestamp: Option<DateTime<Utc>>,
}

impl ReportRecord {
    pub(crate) fn new(
        title: String,
        path: String,
        date: String,
        time: String,
        is_today: bool,
        timestamp: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            title,
            path,
            date,
            time,
            is_today,
            timestamp,
        }
    }

    /// Display label taken from the link text.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Relative link target, e.g. `2026-02-21/report_00-00.md`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Calendar date `YYYY-MM-DD` taken from the path.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Time of day `HH:MM` taken from the path.
    pub fn time(&self) -> &str {
        &self.time
    }

    /// `true` when the record's date equals the date supplied to the parser.
    pub fn is_today(&self) -> bool {
        self.is_today
    }

    /// Instant of `date` + `time` in the parser's timezone.
    ///
    /// `None` when the date or time is not a real calendar value (for
    /// example `2026-02-30` or `25:61`), or when the local time does not
    /// exist in that timezone.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }
}

/// Everything fetched in one refresh cycle.
///
/// The index and the latest report are fetched independently, so either
/// side may carry an error while the other holds data.
#[derive(Debug, Clone)]
pub struct ReportSnapshot {
    /// Parsed index, newest first. Empty when the index failed to load.
    pub records: Vec<ReportRecord>,
    /// Raw markdown of `latest.md`, if it loaded.
    pub latest_markdown: Option<String>,
    /// Progress percentage found in the latest report.
    pub progress: Option<u8>,
    /// Description of the index fetch failure, if any.
    pub index_error: Option<String>,
    /// Description of the latest-report fetch failure, if any.
    pub latest_error: Option<String>,
    /// When the fetch completed.
    pub fetched_at: DateTime<Utc>,
}

impl ReportSnapshot {
    /// A snapshot with no data and no errors, stamped at `fetched_at`.
    pub fn empty(fetched_at: DateTime<Utc>) -> Self {
        Self {
            records: Vec::new(),
            latest_markdown: None,
            progress: None,
            index_error: None,
            latest_error: None,
            fetched_at,
        }
    }

    /// `true` when the index loaded, even if it listed no reports.
    pub fn index_loaded(&self) -> bool {
        self.index_error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(ts: Option<DateTime<Utc>>) -> ReportRecord {
        ReportRecord::new(
            "2026-02-21 00:00".to_string(),
            "2026-02-21/report_00-00.md".to_string(),
            "2026-02-21".to_string(),
            "00:00".to_string(),
            true,
            ts,
        )
    }

    #[test]
    fn test_record_accessors() {
        let ts = Utc.with_ymd_and_hms(2026, 2, 21, 0, 0, 0).unwrap();
        let r = record(Some(ts));
        assert_eq!(r.title(), "2026-02-21 00:00");
        assert_eq!(r.path(), "2026-02-21/report_00-00.md");
        assert_eq!(r.date(), "2026-02-21");
        assert_eq!(r.time(), "00:00");
        assert!(r.is_today());
        assert_eq!(r.timestamp(), Some(ts));
    }

    #[test]
    fn test_record_without_timestamp() {
        assert!(record(None).timestamp().is_none());
    }

    #[test]
    fn test_record_serializes_fields() {
        let json = serde_json::to_value(record(None)).unwrap();
        assert_eq!(json["path"], "2026-02-21/report_00-00.md");
        assert_eq!(json["is_today"], true);
        assert!(json["timestamp"].is_null());
    }

    #[test]
    fn test_empty_snapshot() {
        let now = Utc.with_ymd_and_hms(2026, 2, 21, 8, 0, 0).unwrap();
        let snap = ReportSnapshot::empty(now);
        assert!(snap.records.is_empty());
        assert!(snap.latest_markdown.is_none());
        assert!(snap.progress.is_none());
        assert!(snap.index_loaded());
        assert_eq!(snap.fetched_at, now);
    }
}

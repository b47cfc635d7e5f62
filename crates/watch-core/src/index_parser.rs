//! Parser for the report index document.
//!
//! The index lists one report per line as a markdown link:
//!
//! ```text
//! [2026-02-21 00:00](2026-02-21/report_00-00.md)
//! ```
//!
//! Lines that do not carry such a link, or whose target does not have the
//! exact `YYYY-MM-DD/report_HH-MM.md` shape, are skipped. Parsing never
//! fails; a document with no usable lines yields an empty collection.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::ReportRecord;

static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("regex is valid"));

static REPORT_PATH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2})/report_(\d{2}-\d{2})\.md$").expect("regex is valid")
});

/// Parses index text into [`ReportRecord`]s, newest first.
///
/// The timezone decides how a record's date and time map to an instant. It
/// has no influence on today classification, which compares date strings.
#[derive(Debug, Clone, Copy)]
pub struct IndexParser {
    tz: Tz,
}

impl Default for IndexParser {
    fn default() -> Self {
        Self { tz: Tz::UTC }
    }
}

impl IndexParser {
    /// Create a parser that interprets report times in `tz`.
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// The timezone report times are interpreted in.
    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Parse `text` and classify records against `today` (`YYYY-MM-DD`).
    ///
    /// Records whose date or time is not a real value keep a `None`
    /// timestamp and sort after every valid record.
    pub fn parse(&self, text: &str, today: &str) -> Vec<ReportRecord> {
        let mut records: Vec<ReportRecord> = text
            .split('\n')
            .filter_map(|line| self.parse_line(line, today))
            .collect();

        // Option orders None below Some, so invalid instants land last.
        records.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));

        tracing::debug!(records = records.len(), "parsed report index");
        records
    }

    fn parse_line(&self, line: &str, today: &str) -> Option<ReportRecord> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let link = LINK_RE.captures(line)?;
        let title = &link[1];
        let path = &link[2];

        let shape = REPORT_PATH_RE.captures(path)?;
        let date = shape[1].to_string();
        let time = shape[2].replacen('-', ":", 1);

        let timestamp = self.instant_of(&date, &time);
        let is_today = date == today;

        Some(ReportRecord::new(
            title.to_string(),
            path.to_string(),
            date,
            time,
            is_today,
            timestamp,
        ))
    }

    /// Combine `YYYY-MM-DD` and `HH:MM` into an instant in this parser's zone.
    fn instant_of(&self, date: &str, time: &str) -> Option<DateTime<Utc>> {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
        let time = NaiveTime::parse_from_str(time, "%H:%M").ok()?;
        self.tz
            .from_local_datetime(&date.and_time(time))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Parse `text` with report times interpreted as UTC.
pub fn parse_index(text: &str, today: &str) -> Vec<ReportRecord> {
    IndexParser::default().parse(text, today)
}

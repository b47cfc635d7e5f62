//! Dashboard state as a plain value.
//!
//! A [`DashboardState`] is rebuilt from the previous state and a fresh
//! [`ReportSnapshot`]; nothing is mutated in place. The refresh task only
//! produces snapshots and the UI owns the current state value.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

use crate::formatting::{format_clock, format_countdown, format_relative};
use crate::models::{ReportRecord, ReportSnapshot};
use crate::stats::{self, ReportStats, DEFAULT_RECENT_LIMIT};
use crate::time_utils::{self, DEFAULT_REPORT_INTERVAL_HOURS};

/// Knobs that shape a [`DashboardState`].
#[derive(Debug, Clone, Copy)]
pub struct DashboardOptions {
    /// Spacing between published reports.
    pub report_interval: Duration,
    /// How many records the recent list holds.
    pub recent_limit: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            report_interval: Duration::hours(i64::from(DEFAULT_REPORT_INTERVAL_HOURS)),
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}

/// Display strings for the time panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeInfo {
    /// Countdown to the next report, `HH:MM`.
    pub next_update: String,
    /// Age of the last successful refresh, e.g. `"5m ago"`; `"never"` before the first.
    pub last_update: String,
    /// Wall-clock time of the last refresh in the display timezone.
    pub last_check: String,
}

/// Everything the presentation layer needs to draw the dashboard.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub stats: ReportStats,
    pub today: Vec<ReportRecord>,
    pub recent: Vec<ReportRecord>,
    /// Overall progress percentage, carried over when a report omits it.
    pub progress: Option<u8>,
    pub latest_markdown: Option<String>,
    pub latest_error: Option<String>,
    pub index_error: Option<String>,
    /// When the snapshot behind this state was fetched.
    pub last_update: Option<DateTime<Utc>>,
    pub next_report_due: Option<DateTime<Utc>>,
}

impl DashboardState {
    /// Build the state that follows `self` once `snapshot` has arrived.
    ///
    /// A failed index keeps the previous counts but clears both lists so
    /// the error is visible; a failed latest report clears the report pane.
    pub fn apply(&self, snapshot: &ReportSnapshot, opts: &DashboardOptions) -> DashboardState {
        let now = snapshot.fetched_at;

        let (stats, today, recent, anchor) = if snapshot.index_loaded() {
            let records = &snapshot.records;
            (
                ReportStats::from_records(records),
                stats::today_only(records),
                stats::recent(records, opts.recent_limit).to_vec(),
                records.iter().find_map(|r| r.timestamp()),
            )
        } else {
            (self.stats, Vec::new(), Vec::new(), None)
        };

        let next_due = match anchor {
            Some(ts) => time_utils::next_report_due(Some(ts), opts.report_interval, now),
            None => self
                .next_report_due
                .filter(|due| *due > now)
                .unwrap_or_else(|| time_utils::next_report_due(None, opts.report_interval, now)),
        };

        DashboardState {
            stats,
            today,
            recent,
            progress: snapshot.progress.or(self.progress),
            latest_markdown: snapshot.latest_markdown.clone(),
            latest_error: snapshot.latest_error.clone(),
            index_error: snapshot.index_error.clone(),
            last_update: Some(now),
            next_report_due: Some(next_due),
        }
    }

    /// `true` once at least one snapshot has been applied.
    pub fn has_data(&self) -> bool {
        self.last_update.is_some()
    }

    /// Time left until the next report, zero when overdue or unknown.
    pub fn countdown(&self, now: DateTime<Utc>) -> Duration {
        self.next_report_due
            .map(|due| time_utils::countdown(due, now))
            .unwrap_or_else(Duration::zero)
    }

    /// Strings for the time panel, rendered in `tz`.
    pub fn time_info(&self, now: DateTime<Utc>, tz: Tz) -> TimeInfo {
        TimeInfo {
            next_update: format_countdown(self.countdown(now)),
            last_update: self
                .last_update
                .map(|t| format_relative(t, now))
                .unwrap_or_else(|| "never".to_string()),
            last_check: self
                .last_update
                .map(|t| format_clock(t, tz))
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use tracing::warn;

/// Default spacing between published reports.
pub const DEFAULT_REPORT_INTERVAL_HOURS: u32 = 4;

// ── Timezone ──────────────────────────────────────────────────────────────────

/// Detect the IANA timezone name of the running system.
///
/// Uses the `iana-time-zone` crate directly – no subprocess calls.
/// Falls back to `"UTC"` if detection fails.
pub fn get_system_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string())
}

/// Resolve an IANA name to a [`Tz`].
///
/// If `tz_name` is not recognised, falls back to UTC and logs a warning.
pub fn resolve_timezone(tz_name: &str) -> Tz {
    tz_name.parse::<Tz>().unwrap_or_else(|_| {
        warn!(timezone = tz_name, "unrecognised timezone, falling back to UTC");
        Tz::UTC
    })
}

/// Validate that `tz_name` is a recognised IANA timezone identifier.
pub fn validate_timezone(tz_name: &str) -> bool {
    tz_name.parse::<Tz>().is_ok()
}

/// The calendar date of `now` in `tz`, formatted `YYYY-MM-DD`.
///
/// This is the value handed to the index parser for today classification.
pub fn today_in(tz: Tz, now: DateTime<Utc>) -> String {
    now.with_timezone(&tz).format("%Y-%m-%d").to_string()
}

// ── Report schedule ───────────────────────────────────────────────────────────

/// When the next report is expected.
///
/// Reports are published every `interval`; the next one is due one interval
/// after the newest report. With no dated report to anchor on, the next one
/// is assumed to be a full interval away from `now`.
pub fn next_report_due(
    latest: Option<DateTime<Utc>>,
    interval: Duration,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    match latest {
        Some(ts) => ts + interval,
        None => now + interval,
    }
}

/// Time left until `due`, never negative.
pub fn countdown(due: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    let left = due - now;
    if left < Duration::zero() {
        Duration::zero()
    } else {
        left
    }
}

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

/// Format a countdown as zero-padded `HH:MM`.
///
/// Negative durations are shown as `00:00`; hours are not wrapped at 24.
///
/// # Examples
///
/// ```
/// use chrono::Duration;
/// use watch_core::formatting::format_countdown;
///
/// assert_eq!(format_countdown(Duration::minutes(150)), "02:30");
/// assert_eq!(format_countdown(Duration::hours(4)), "04:00");
/// assert_eq!(format_countdown(Duration::seconds(59)), "00:00");
/// assert_eq!(format_countdown(Duration::hours(-1)), "00:00");
/// ```
pub fn format_countdown(left: Duration) -> String {
    let minutes = left.num_minutes().max(0);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Describe how long ago `then` was, relative to `now`.
///
/// * `< 1 min`  → `"just now"`
/// * `< 1 h`    → `"12m ago"`
/// * `< 24 h`   → `"3h ago"`
/// * otherwise  → `"2d ago"`
///
/// # Examples
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use watch_core::formatting::format_relative;
///
/// let now = Utc.with_ymd_and_hms(2026, 2, 21, 12, 0, 0).unwrap();
/// assert_eq!(format_relative(now, now), "just now");
/// assert_eq!(format_relative(now - Duration::minutes(12), now), "12m ago");
/// assert_eq!(format_relative(now - Duration::hours(3), now), "3h ago");
/// assert_eq!(format_relative(now - Duration::days(2), now), "2d ago");
/// ```
pub fn format_relative(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now - then;
    if diff < Duration::minutes(1) {
        "just now".to_string()
    } else if diff < Duration::hours(1) {
        format!("{}m ago", diff.num_minutes())
    } else if diff < Duration::days(1) {
        format!("{}h ago", diff.num_hours())
    } else {
        format!("{}d ago", diff.num_days())
    }
}

/// Format an instant as `YYYY-MM-DD HH:MM` in `tz` (24-hour clock).
pub fn format_clock(dt: DateTime<Utc>, tz: Tz) -> String {
    dt.with_timezone(&tz).format("%Y-%m-%d %H:%M").to_string()
}

/// Format an instant as `HH:MM:SS` in `tz`.
pub fn format_time_of_day(dt: DateTime<Utc>, tz: Tz) -> String {
    dt.with_timezone(&tz).format("%H:%M:%S").to_string()
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 21, 12, 0, 0).unwrap()
    }

    // ── format_countdown ─────────────────────────────────────────────────────

    #[test]
    fn test_countdown_zero() {
        assert_eq!(format_countdown(Duration::zero()), "00:00");
    }

    #[test]
    fn test_countdown_over_a_day() {
        assert_eq!(format_countdown(Duration::hours(30) + Duration::minutes(5)), "30:05");
    }

    #[test]
    fn test_countdown_truncates_seconds() {
        assert_eq!(format_countdown(Duration::seconds(3_599)), "00:59");
    }

    // ── format_relative ──────────────────────────────────────────────────────

    #[test]
    fn test_relative_boundaries() {
        let now = noon();
        assert_eq!(format_relative(now - Duration::seconds(59), now), "just now");
        assert_eq!(format_relative(now - Duration::seconds(60), now), "1m ago");
        assert_eq!(format_relative(now - Duration::minutes(59), now), "59m ago");
        assert_eq!(format_relative(now - Duration::minutes(60), now), "1h ago");
        assert_eq!(format_relative(now - Duration::hours(23), now), "23h ago");
        assert_eq!(format_relative(now - Duration::hours(24), now), "1d ago");
    }

    #[test]
    fn test_relative_future_is_just_now() {
        let now = noon();
        assert_eq!(format_relative(now + Duration::minutes(5), now), "just now");
    }

    // ── format_clock / format_time_of_day ────────────────────────────────────

    #[test]
    fn test_format_clock_utc() {
        assert_eq!(format_clock(noon(), Tz::UTC), "2026-02-21 12:00");
    }

    #[test]
    fn test_format_clock_named_zone() {
        assert_eq!(
            format_clock(noon(), chrono_tz::Asia::Shanghai),
            "2026-02-21 20:00"
        );
    }

    #[test]
    fn test_format_time_of_day() {
        let dt = Utc.with_ymd_and_hms(2026, 2, 21, 7, 5, 9).unwrap();
        assert_eq!(format_time_of_day(dt, Tz::UTC), "07:05:09");
    }
}

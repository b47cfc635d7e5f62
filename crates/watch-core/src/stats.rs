//! Derived figures over a parsed report collection.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::models::ReportRecord;

/// Number of reports shown in the "recent" list unless configured otherwise.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

static PROGRESS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:整体进度[：:]|overall progress:)\s*(\d+)%").expect("regex is valid")
});

/// Report counts shown in the stats panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportStats {
    /// Every record in the index.
    pub total: usize,
    /// Records dated today.
    pub today: usize,
}

impl ReportStats {
    /// Count `records`, and the subset flagged as today.
    pub fn from_records(records: &[ReportRecord]) -> Self {
        Self {
            total: records.len(),
            today: records.iter().filter(|r| r.is_today()).count(),
        }
    }
}

/// The first `limit` records in collection order (newest first after parsing).
pub fn recent(records: &[ReportRecord], limit: usize) -> &[ReportRecord] {
    &records[..limit.min(records.len())]
}

/// Records dated today, in collection order.
pub fn today_only(records: &[ReportRecord]) -> Vec<ReportRecord> {
    records.iter().filter(|r| r.is_today()).cloned().collect()
}

/// Pull the overall progress percentage out of a report's markdown.
///
/// Recognises `整体进度：42%` / `整体进度: 42%` and `Overall progress: 42%`.
/// Values above 100 are clamped.
pub fn extract_progress(markdown: &str) -> Option<u8> {
    let caps = PROGRESS_RE.captures(markdown)?;
    let value: u64 = caps[1].parse().ok()?;
    Some(value.min(100) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index_parser::parse_index;

    const INDEX: &str = "\
# Reports
[2026-02-21 08:00](2026-02-21/report_08-00.md)
[2026-02-20 20:00](2026-02-20/report_20-00.md)
[2026-02-21 04:00](2026-02-21/report_04-00.md)
";

    #[test]
    fn test_stats_counts_total_and_today() {
        let records = parse_index(INDEX, "2026-02-21");
        let stats = ReportStats::from_records(&records);
        assert_eq!(stats, ReportStats { total: 3, today: 2 });
    }

    #[test]
    fn test_stats_empty() {
        assert_eq!(ReportStats::from_records(&[]), ReportStats::default());
    }

    #[test]
    fn test_recent_takes_leading_records() {
        let records = parse_index(INDEX, "2026-02-21");
        let top = recent(&records, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].time(), "08:00");
        assert_eq!(top[1].time(), "04:00");
    }

    #[test]
    fn test_recent_limit_larger_than_collection() {
        let records = parse_index(INDEX, "2026-02-21");
        assert_eq!(recent(&records, 10).len(), 3);
        assert!(recent(&records, 0).is_empty());
    }

    #[test]
    fn test_today_only_filters_and_keeps_order() {
        let records = parse_index(INDEX, "2026-02-21");
        let today = today_only(&records);
        assert_eq!(today.len(), 2);
        assert!(today.iter().all(|r| r.is_today()));
        assert_eq!(today[0].time(), "08:00");
    }

    #[test]
    fn test_today_only_none_match() {
        let records = parse_index(INDEX, "2030-01-01");
        assert!(today_only(&records).is_empty());
    }

    #[test]
    fn test_extract_progress_fullwidth_colon() {
        assert_eq!(extract_progress("## 状态\n整体进度：42%\n"), Some(42));
    }

    #[test]
    fn test_extract_progress_ascii_colon_with_spaces() {
        assert_eq!(extract_progress("整体进度:   7%"), Some(7));
    }

    #[test]
    fn test_extract_progress_english_label() {
        assert_eq!(extract_progress("- Overall Progress: 65%"), Some(65));
    }

    #[test]
    fn test_extract_progress_clamps() {
        assert_eq!(extract_progress("Overall progress: 250%"), Some(100));
    }

    #[test]
    fn test_extract_progress_absent() {
        assert_eq!(extract_progress("no progress line here, 50% of nothing"), None);
        assert_eq!(extract_progress(""), None);
    }

    #[test]
    fn test_extract_progress_first_match_wins() {
        let md = "整体进度: 30%\nOverall progress: 90%";
        assert_eq!(extract_progress(md), Some(30));
    }
}

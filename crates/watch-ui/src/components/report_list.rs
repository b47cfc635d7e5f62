use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;
use watch_core::ReportRecord;

use crate::themes::Theme;

/// Badge shown instead of the date for records dated today.
pub const TODAY_BADGE: &str = "today";

/// A titled list of report records.
///
/// Each entry reads `HH:MM report  <today|date>  <path>`. An empty list is
/// the normal state before any report exists; `error` replaces the entries
/// when the index could not be loaded.
pub struct ReportList<'a> {
    pub title: &'a str,
    pub records: &'a [ReportRecord],
    pub error: Option<&'a str>,
    /// Column budget for each entry; longer paths are cut with `…`.
    pub width: usize,
    pub theme: &'a Theme,
}

impl<'a> ReportList<'a> {
    pub fn new(title: &'a str, records: &'a [ReportRecord], theme: &'a Theme) -> Self {
        Self {
            title,
            records,
            error: None,
            width: 60,
            theme,
        }
    }

    pub fn with_error(mut self, error: Option<&'a str>) -> Self {
        self.error = error;
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let mut lines = vec![Line::from(vec![
            Span::styled(self.title, self.theme.bold),
            Span::styled(format!(" ({})", self.records.len()), self.theme.dim),
        ])];

        if let Some(err) = self.error {
            lines.push(Line::from(Span::styled(
                "  Failed to load the report list",
                self.theme.error,
            )));
            lines.push(Line::from(Span::styled(format!("  {err}"), self.theme.dim)));
            return lines;
        }

        if self.records.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("  No {} yet", self.title.to_lowercase()),
                self.theme.dim,
            )));
            return lines;
        }

        lines.extend(self.records.iter().map(|r| self.entry(r)));
        lines
    }

    fn entry(&self, record: &ReportRecord) -> Line<'a> {
        let label = format!("  {} report  ", record.time());
        let badge = if record.is_today() {
            Span::styled(TODAY_BADGE.to_string(), self.theme.today_badge)
        } else {
            Span::styled(record.date().to_string(), self.theme.date_badge)
        };
        let used = label.width() + badge.content.width() + 2;
        let path = truncate_to_width(record.path(), self.width.saturating_sub(used));

        Line::from(vec![
            Span::styled(label, self.theme.report_title),
            badge,
            Span::raw("  "),
            Span::styled(path, self.theme.dim),
        ])
    }
}

/// Cut `s` to at most `max` display columns, marking the cut with `…`.
pub fn truncate_to_width(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use watch_core::parse_index;

    const INDEX: &str = "\
[a](2026-02-21/report_08-00.md)
[b](2026-02-20/report_20-00.md)
";

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_entries_show_time_and_badge() {
        let theme = Theme::dark();
        let records = parse_index(INDEX, "2026-02-21");
        let lines = ReportList::new("Recent reports", &records, &theme).to_lines();

        assert_eq!(lines.len(), 3);
        assert_eq!(text(&lines[0]), "Recent reports (2)");
        assert!(text(&lines[1]).starts_with("  08:00 report  today"));
        assert!(text(&lines[2]).starts_with("  20:00 report  2026-02-20"));
        assert_eq!(lines[1].spans[1].style, theme.today_badge);
        assert_eq!(lines[2].spans[1].style, theme.date_badge);
    }

    #[test]
    fn test_entries_include_path() {
        let theme = Theme::dark();
        let records = parse_index(INDEX, "2026-02-21");
        let lines = ReportList::new("Recent reports", &records, &theme).to_lines();
        assert!(text(&lines[1]).ends_with("2026-02-21/report_08-00.md"));
    }

    #[test]
    fn test_empty_list_is_not_an_error() {
        let theme = Theme::dark();
        let lines = ReportList::new("Today's reports", &[], &theme).to_lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(text(&lines[1]), "  No today's reports yet");
        assert_eq!(lines[1].spans[0].style, theme.dim);
    }

    #[test]
    fn test_error_replaces_entries() {
        let theme = Theme::dark();
        let records = parse_index(INDEX, "2026-02-21");
        let lines = ReportList::new("Recent reports", &records, &theme)
            .with_error(Some("HTTP 404 for http://x/index.md"))
            .to_lines();
        assert_eq!(lines.len(), 3);
        assert!(text(&lines[1]).contains("Failed to load"));
        assert_eq!(lines[1].spans[0].style, theme.error);
        assert!(text(&lines[2]).contains("HTTP 404"));
    }

    #[test]
    fn test_narrow_width_truncates_path() {
        let theme = Theme::dark();
        let records = parse_index(INDEX, "2026-02-21");
        let lines = ReportList::new("Recent", &records, &theme)
            .with_width(30)
            .to_lines();
        let path = lines[1].spans[3].content.as_ref();
        assert!(path.ends_with('…'), "got {path}");
        assert!(text(&lines[1]).width() <= 30);
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("abcdefgh", 5), "abcd…");
        assert_eq!(truncate_to_width("abc", 0), "");
        // Wide characters count two columns each.
        assert_eq!(truncate_to_width("学习报告", 5), "学习…");
    }
}

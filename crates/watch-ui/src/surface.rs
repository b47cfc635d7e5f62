//! Rendering capabilities the dashboard state is handed to.
//!
//! [`present`] walks a [`DashboardView`] and feeds each section to a
//! [`DashboardSurface`]. The terminal UI collects styled ratatui lines
//! through [`LineSurface`]; one-shot mode prints through [`TextSurface`],
//! which renders the latest report with termimad.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use ratatui::text::{Line, Span};
use termimad::crossterm::style::{Attribute, Color};
use termimad::{Alignment, MadSkin};
use watch_core::dashboard::{DashboardOptions, DashboardState, TimeInfo};
use watch_core::ReportRecord;

use crate::components::{CycleProgressBar, Header, OverallProgressBar, ReportList};
use crate::markdown::markdown_to_lines;
use crate::themes::Theme;

pub const TODAY_TITLE: &str = "Today's reports";
pub const RECENT_TITLE: &str = "Recent reports";
pub const LATEST_TITLE: &str = "Latest report";

/// A [`DashboardState`] paired with the clock-dependent strings needed to
/// draw it once.
pub struct DashboardView<'a> {
    pub state: &'a DashboardState,
    pub time: TimeInfo,
    pub countdown: Duration,
    pub report_interval: Duration,
    pub source: &'a str,
    pub timezone: &'a str,
    pub auto_update: bool,
}

impl<'a> DashboardView<'a> {
    pub fn new(
        state: &'a DashboardState,
        opts: &DashboardOptions,
        source: &'a str,
        timezone: &'a str,
        now: DateTime<Utc>,
        auto_update: bool,
    ) -> Self {
        let tz: Tz = timezone.parse().unwrap_or(Tz::UTC);
        Self {
            state,
            time: state.time_info(now, tz),
            countdown: state.countdown(now),
            report_interval: opts.report_interval,
            source,
            timezone,
            auto_update,
        }
    }
}

/// One render target for the dashboard sections.
pub trait DashboardSurface<'a> {
    fn render_header(&mut self, source: &'a str, timezone: &'a str);
    fn render_stats(&mut self, view: &DashboardView<'a>);
    fn render_today(&mut self, records: &'a [ReportRecord], error: Option<&'a str>);
    fn render_recent(&mut self, records: &'a [ReportRecord], error: Option<&'a str>);
    fn render_latest(&mut self, markdown: Option<&'a str>, error: Option<&'a str>);
}

/// Hand every section of `view` to `surface`, top to bottom.
pub fn present<'a, S: DashboardSurface<'a> + ?Sized>(surface: &mut S, view: &DashboardView<'a>) {
    let state = view.state;
    let index_error = state.index_error.as_deref();

    surface.render_header(view.source, view.timezone);
    surface.render_stats(view);
    surface.render_today(&state.today, index_error);
    surface.render_recent(&state.recent, index_error);
    surface.render_latest(state.latest_markdown.as_deref(), state.latest_error.as_deref());
}

/// Label/value rows of the stats panel.
pub fn stats_lines<'a>(view: &DashboardView<'a>, theme: &'a Theme) -> Vec<Line<'a>> {
    let stats = view.state.stats;
    let row = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label:<16}"), theme.label),
            Span::styled(value, theme.value),
        ])
    };
    let with_bar = |label: &'static str, bar: Line<'a>| {
        let mut spans = vec![Span::styled(format!("{label:<16}"), theme.label)];
        spans.extend(bar.spans);
        Line::from(spans)
    };

    vec![
        row("Total reports", stats.total.to_string()),
        row("Today's reports", stats.today.to_string()),
        with_bar(
            "Progress",
            OverallProgressBar::new(view.state.progress, theme).to_line(),
        ),
        with_bar(
            "Next report",
            CycleProgressBar::new(view.countdown, view.report_interval, theme).to_line(),
        ),
        row("Last update", view.time.last_update.clone()),
        row("Last check", view.time.last_check.clone()),
        Line::from(vec![
            Span::styled(format!("{:<16}", "Auto-update"), theme.label),
            if view.auto_update {
                Span::styled("on", theme.success)
            } else {
                Span::styled("off", theme.warning)
            },
        ]),
    ]
}

// ── LineSurface ───────────────────────────────────────────────────────────────

/// Collects each section as styled ratatui lines for the TUI panes.
pub struct LineSurface<'a> {
    theme: &'a Theme,
    /// Column budget for list entries.
    list_width: usize,
    pub header: Vec<Line<'a>>,
    pub stats: Vec<Line<'a>>,
    pub today: Vec<Line<'a>>,
    pub recent: Vec<Line<'a>>,
    pub latest: Vec<Line<'a>>,
}

impl<'a> LineSurface<'a> {
    pub fn new(theme: &'a Theme, list_width: usize) -> Self {
        Self {
            theme,
            list_width,
            header: Vec::new(),
            stats: Vec::new(),
            today: Vec::new(),
            recent: Vec::new(),
            latest: Vec::new(),
        }
    }

    fn list(&self, title: &'a str, records: &'a [ReportRecord], error: Option<&'a str>) -> Vec<Line<'a>> {
        ReportList::new(title, records, self.theme)
            .with_error(error)
            .with_width(self.list_width)
            .to_lines()
    }
}

impl<'a> DashboardSurface<'a> for LineSurface<'a> {
    fn render_header(&mut self, source: &'a str, timezone: &'a str) {
        self.header = Header::new(source, timezone, self.theme).to_lines();
    }

    fn render_stats(&mut self, view: &DashboardView<'a>) {
        self.stats = stats_lines(view, self.theme);
    }

    fn render_today(&mut self, records: &'a [ReportRecord], error: Option<&'a str>) {
        self.today = self.list(TODAY_TITLE, records, error);
    }

    fn render_recent(&mut self, records: &'a [ReportRecord], error: Option<&'a str>) {
        self.recent = self.list(RECENT_TITLE, records, error);
    }

    fn render_latest(&mut self, markdown: Option<&'a str>, error: Option<&'a str>) {
        self.latest = match (markdown, error) {
            (_, Some(err)) => vec![
                Line::from(Span::styled(
                    format!("Failed to load the latest report: {err}"),
                    self.theme.error,
                )),
                Line::from(""),
                Line::from(Span::styled("Press r to retry", self.theme.dim)),
            ],
            (Some(md), None) => markdown_to_lines(md, self.theme),
            (None, None) => vec![Line::from(Span::styled(
                "Loading latest report…",
                self.theme.dim,
            ))],
        };
    }
}

// ── TextSurface ───────────────────────────────────────────────────────────────

/// Plain-text dashboard for one-shot mode.
///
/// Sections are flattened from the same components the TUI uses; the latest
/// report is laid out by termimad at a fixed width.
pub struct TextSurface {
    theme: Theme,
    skin: MadSkin,
    width: usize,
    out: String,
}

impl TextSurface {
    /// `color` selects a styled skin for the markdown; without it the
    /// output carries no escape sequences.
    pub fn new(color: bool, width: usize) -> Self {
        let mut skin = if color {
            report_skin()
        } else {
            MadSkin::no_style()
        };
        skin.headers[0].align = Alignment::Left;
        Self {
            theme: Theme::classic(),
            skin,
            width: width.max(20),
            out: String::new(),
        }
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn push_lines(&mut self, lines: Vec<Line<'_>>) {
        for line in lines {
            let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
            self.out.push_str(text.trim_end());
            self.out.push('\n');
        }
    }

    fn push_list(&mut self, title: &str, records: &[ReportRecord], error: Option<&str>) {
        let lines = ReportList::new(title, records, &self.theme)
            .with_error(error)
            .with_width(self.width)
            .to_lines();
        let flat: Vec<Line<'static>> = lines.into_iter().map(into_owned).collect();
        self.push_lines(flat);
        self.out.push('\n');
    }
}

fn into_owned(line: Line<'_>) -> Line<'static> {
    Line::from(
        line.spans
            .into_iter()
            .map(|s| Span::styled(s.content.into_owned(), s.style))
            .collect::<Vec<_>>(),
    )
}

fn report_skin() -> MadSkin {
    let mut skin = MadSkin::default();
    skin.headers[0].set_fg(Color::Magenta);
    skin.headers[0].add_attr(Attribute::Bold);
    skin.headers[1].set_fg(Color::Yellow);
    skin.headers[1].add_attr(Attribute::Bold);
    skin.headers[2].set_fg(Color::Cyan);
    skin.bullet.set_fg(Color::Red);
    skin.inline_code.set_fg(Color::Green);
    skin.code_block.set_fg(Color::Yellow);
    skin
}

impl<'a> DashboardSurface<'a> for TextSurface {
    fn render_header(&mut self, source: &'a str, timezone: &'a str) {
        let lines: Vec<Line<'static>> = Header::new(source, timezone, &self.theme)
            .to_lines()
            .into_iter()
            .map(into_owned)
            .collect();
        self.push_lines(lines);
    }

    fn render_stats(&mut self, view: &DashboardView<'a>) {
        let lines: Vec<Line<'static>> = stats_lines(view, &self.theme)
            .into_iter()
            .map(into_owned)
            .collect();
        self.push_lines(lines);
        self.out.push('\n');
    }

    fn render_today(&mut self, records: &'a [ReportRecord], error: Option<&'a str>) {
        self.push_list(TODAY_TITLE, records, error);
    }

    fn render_recent(&mut self, records: &'a [ReportRecord], error: Option<&'a str>) {
        self.push_list(RECENT_TITLE, records, error);
    }

    fn render_latest(&mut self, markdown: Option<&'a str>, error: Option<&'a str>) {
        self.out.push_str(LATEST_TITLE);
        self.out.push('\n');
        self.out.push_str(&"-".repeat(LATEST_TITLE.len()));
        self.out.push('\n');
        match (markdown, error) {
            (_, Some(err)) => {
                self.out
                    .push_str(&format!("Failed to load the latest report: {err}\n"));
            }
            (Some(md), None) => {
                let rendered = self.skin.text(md, Some(self.width)).to_string();
                self.out.push_str(&rendered);
            }
            (None, None) => self.out.push_str("No latest report\n"),
        }
    }
}

/// Current terminal width, or 80 columns when it cannot be queried.
pub fn terminal_width() -> usize {
    crossterm::terminal::size()
        .map(|(w, _)| usize::from(w))
        .unwrap_or(80)
}

/// Render the whole dashboard as plain text.
pub fn render_text(view: &DashboardView<'_>, color: bool, width: usize) -> String {
    let mut surface = TextSurface::new(color, width);
    present(&mut surface, view);
    surface.finish()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use watch_core::ReportSnapshot;

    const INDEX: &str = "\
[a](2026-02-21/report_08-00.md)
[b](2026-02-21/report_04-00.md)
[c](2026-02-20/report_20-00.md)
";

    const LATEST: &str = "# Daily report\n\nOverall progress: 35%\n\n- item one\n";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 21, 10, 0, 0).unwrap()
    }

    fn state(index: Result<&str, &str>, latest: Result<&str, &str>) -> DashboardState {
        let mut snap = ReportSnapshot::empty(now());
        match index {
            Ok(text) => snap.records = watch_core::parse_index(text, "2026-02-21"),
            Err(e) => snap.index_error = Some(e.to_string()),
        }
        match latest {
            Ok(md) => {
                snap.latest_markdown = Some(md.to_string());
                snap.progress = watch_core::stats::extract_progress(md);
            }
            Err(e) => snap.latest_error = Some(e.to_string()),
        }
        DashboardState::default().apply(&snap, &DashboardOptions::default())
    }

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl<'a> DashboardSurface<'a> for Recorder {
        fn render_header(&mut self, source: &'a str, _timezone: &'a str) {
            self.calls.push(format!("header {source}"));
        }
        fn render_stats(&mut self, view: &DashboardView<'a>) {
            let s = view.state.stats;
            self.calls.push(format!("stats {}/{}", s.today, s.total));
        }
        fn render_today(&mut self, records: &'a [ReportRecord], error: Option<&'a str>) {
            self.calls
                .push(format!("today {} {}", records.len(), error.is_some()));
        }
        fn render_recent(&mut self, records: &'a [ReportRecord], error: Option<&'a str>) {
            self.calls
                .push(format!("recent {} {}", records.len(), error.is_some()));
        }
        fn render_latest(&mut self, markdown: Option<&'a str>, error: Option<&'a str>) {
            self.calls
                .push(format!("latest {} {}", markdown.is_some(), error.is_some()));
        }
    }

    #[test]
    fn test_present_visits_every_section_in_order() {
        let st = state(Ok(INDEX), Ok(LATEST));
        let opts = DashboardOptions::default();
        let view = DashboardView::new(&st, &opts, "./reports", "UTC", now(), true);

        let mut rec = Recorder::default();
        present(&mut rec, &view);
        assert_eq!(
            rec.calls,
            vec![
                "header ./reports",
                "stats 2/3",
                "today 2 false",
                "recent 3 false",
                "latest true false",
            ]
        );
    }

    #[test]
    fn test_present_passes_index_error_to_both_lists() {
        let st = state(Err("HTTP 500"), Ok(LATEST));
        let opts = DashboardOptions::default();
        let view = DashboardView::new(&st, &opts, "./reports", "UTC", now(), true);

        let mut rec = Recorder::default();
        present(&mut rec, &view);
        assert_eq!(rec.calls[2], "today 0 true");
        assert_eq!(rec.calls[3], "recent 0 true");
    }

    #[test]
    fn test_stats_lines_content() {
        let theme = Theme::dark();
        let st = state(Ok(INDEX), Ok(LATEST));
        let opts = DashboardOptions::default();
        let view = DashboardView::new(&st, &opts, "./reports", "UTC", now(), false);

        let lines = stats_lines(&view, &theme);
        assert_eq!(text(&lines[0]).trim_end(), "Total reports   3");
        assert_eq!(text(&lines[1]).trim_end(), "Today's reports 2");
        assert!(text(&lines[2]).ends_with(" 35%"));
        // Latest report 08:00 UTC, interval 4h, now 10:00 → 02:00 left.
        assert!(text(&lines[3]).ends_with(" 02:00 to next report"));
        assert!(text(&lines[4]).ends_with("just now"));
        assert!(text(&lines[5]).ends_with("2026-02-21 10:00"));
        assert!(text(&lines[6]).ends_with("off"));
    }

    #[test]
    fn test_line_surface_latest_error_has_retry_hint() {
        let theme = Theme::dark();
        let st = state(Ok(INDEX), Err("HTTP 404 for latest.md"));
        let opts = DashboardOptions::default();
        let view = DashboardView::new(&st, &opts, "./reports", "UTC", now(), true);

        let mut surface = LineSurface::new(&theme, 60);
        present(&mut surface, &view);
        assert!(text(&surface.latest[0]).contains("HTTP 404"));
        assert_eq!(surface.latest[0].spans[0].style, theme.error);
        assert_eq!(text(&surface.latest[2]), "Press r to retry");
    }

    #[test]
    fn test_line_surface_sections() {
        let theme = Theme::dark();
        let st = state(Ok(INDEX), Ok(LATEST));
        let opts = DashboardOptions::default();
        let view = DashboardView::new(&st, &opts, "./reports", "UTC", now(), true);

        let mut surface = LineSurface::new(&theme, 60);
        present(&mut surface, &view);
        assert_eq!(surface.header.len(), 4);
        assert_eq!(surface.stats.len(), 7);
        assert_eq!(surface.today.len(), 3);
        assert_eq!(surface.recent.len(), 4);
        assert_eq!(text(&surface.latest[0]), "Daily report");
    }

    #[test]
    fn test_render_text_plain() {
        let st = state(Ok(INDEX), Ok(LATEST));
        let opts = DashboardOptions::default();
        let view = DashboardView::new(&st, &opts, "http://localhost:8000/", "UTC", now(), true);

        let out = render_text(&view, false, 80);
        assert!(out.contains("LEARNING REPORT WATCH"));
        assert!(out.contains("[ http://localhost:8000/ | UTC ]"));
        assert!(out.contains("Total reports   3"));
        assert!(out.contains("Today's reports (2)"));
        assert!(out.contains("08:00 report  today"));
        assert!(out.contains("20:00 report  2026-02-20"));
        assert!(out.contains("Latest report"));
        assert!(out.contains("Daily report"));
        assert!(out.contains("item one"));
        assert!(!out.contains('\u{1b}'), "plain output must not carry escapes");
    }

    #[test]
    fn test_render_text_empty_index() {
        let st = state(Ok(""), Err("connection refused"));
        let opts = DashboardOptions::default();
        let view = DashboardView::new(&st, &opts, "./reports", "UTC", now(), true);

        let out = render_text(&view, false, 80);
        assert!(out.contains("No today's reports yet"));
        assert!(out.contains("No recent reports yet"));
        assert!(out.contains("Failed to load the latest report: connection refused"));
    }
}

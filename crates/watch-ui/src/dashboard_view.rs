//! Full-screen dashboard layout for the report-watch TUI.
//!
//! ```text
//! ┌ header + stats ───────────────────────────────┐
//! │ today's reports        │ recent reports       │
//! ├ latest report (scrollable) ───────────────────┤
//! │ key hints / toasts                            │
//! ```

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::components::Toasts;
use crate::surface::{present, DashboardView, LineSurface, LATEST_TITLE};
use crate::themes::Theme;

/// Most rows either list pane may take, borders included.
const MAX_LIST_HEIGHT: u16 = 14;

/// Line count as a layout length, saturating at `u16::MAX`.
fn row_count(lines: usize) -> u16 {
    u16::try_from(lines).unwrap_or(u16::MAX)
}

/// Height of the list panes for `rows` entries, borders included.
fn list_pane_height(rows: usize) -> u16 {
    row_count(rows).saturating_add(2).min(MAX_LIST_HEIGHT)
}

/// Render the dashboard into `area`.
///
/// `scroll` is the first visible row of the latest-report pane.
pub fn render_dashboard(
    frame: &mut Frame,
    area: Rect,
    view: &DashboardView<'_>,
    theme: &Theme,
    toasts: &Toasts,
    scroll: u16,
) {
    let list_width = usize::from(area.width / 2).saturating_sub(2);
    let mut surface = LineSurface::new(theme, list_width);
    present(&mut surface, view);

    let LineSurface {
        header,
        stats,
        today,
        recent,
        latest,
        ..
    } = surface;

    let top_height = row_count(header.len() + stats.len());
    let list_height = list_pane_height(today.len().max(recent.len()));
    let footer = footer_lines(theme, toasts);
    let footer_height = row_count(footer.len());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(top_height),
            Constraint::Length(list_height),
            Constraint::Min(3),
            Constraint::Length(footer_height),
        ])
        .split(area);

    let mut top = header;
    top.extend(stats);
    frame.render_widget(Paragraph::new(Text::from(top)), chunks[0]);

    let lists = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    frame.render_widget(
        Paragraph::new(Text::from(today))
            .block(Block::default().borders(Borders::ALL).border_style(theme.separator)),
        lists[0],
    );
    frame.render_widget(
        Paragraph::new(Text::from(recent))
            .block(Block::default().borders(Borders::ALL).border_style(theme.separator)),
        lists[1],
    );

    frame.render_widget(
        Paragraph::new(Text::from(latest))
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.separator)
                    .title(format!(" {LATEST_TITLE} ")),
            ),
        chunks[2],
    );

    frame.render_widget(Paragraph::new(Text::from(footer)), chunks[3]);
}

fn footer_lines<'a>(theme: &'a Theme, toasts: &Toasts) -> Vec<Line<'a>> {
    let mut lines = toasts.to_lines(theme);
    lines.push(Line::from(vec![
        Span::styled("q", theme.bold),
        Span::styled(" quit  ", theme.dim),
        Span::styled("r", theme.bold),
        Span::styled(" refresh  ", theme.dim),
        Span::styled("a", theme.bold),
        Span::styled(" auto-update  ", theme.dim),
        Span::styled("↑/↓", theme.bold),
        Span::styled(" scroll report", theme.dim),
    ]));
    lines
}

/// Render the waiting screen shown until the first snapshot arrives.
///
/// `error` is the last fetch failure, when the first attempts failed.
pub fn render_waiting(
    frame: &mut Frame,
    area: Rect,
    source: &str,
    error: Option<&str>,
    theme: &Theme,
    toasts: &Toasts,
) {
    let mut text = vec![
        Line::from(""),
        Line::from(Span::styled(format!("Loading reports from {source}…"), theme.info)),
        Line::from(""),
    ];
    if let Some(err) = error {
        text.push(Line::from(Span::styled("Failed to load data", theme.error)));
        text.push(Line::from(Span::styled(err.to_string(), theme.dim)));
        text.push(Line::from(""));
        text.push(Line::from(Span::styled("Press 'r' to retry", theme.dim)));
    }
    text.push(Line::from(Span::styled(
        "Press 'q' or Ctrl+C to exit",
        theme.dim,
    )));
    text.extend(toasts.to_lines(theme));

    let paragraph = Paragraph::new(Text::from(text))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Report Watch "),
        );
    frame.render_widget(paragraph, area);
}

// ── Tests ──────────────────────────────────────────────────────────────────────

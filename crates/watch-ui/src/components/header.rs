use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Decorative sparkle string placed either side of the application title.
pub const SPARKLES: &str = "✦ ✧ ✦ ✧";

/// Width of the `=` rule under the title.
pub const SEPARATOR_WIDTH: usize = 60;

/// Dashboard header rendering four lines:
///
/// 1. Application title with sparkle decorations.
/// 2. A 60-column `=` separator.
/// 3. Source and timezone in `[ source | timezone ]` format.
/// 4. An empty line.
pub struct Header<'a> {
    /// Where reports are read from (URL or directory).
    pub source: &'a str,
    /// Display timezone name (e.g. "UTC", "Asia/Shanghai").
    pub timezone: &'a str,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(source: &'a str, timezone: &'a str, theme: &'a Theme) -> Self {
        Self {
            source,
            timezone,
            theme,
        }
    }

    /// Render the header as exactly four lines.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        vec![
            Line::from(vec![
                Span::styled(SPARKLES, self.theme.header_sparkle),
                Span::styled(" LEARNING REPORT WATCH ", self.theme.header),
                Span::styled(SPARKLES, self.theme.header_sparkle),
            ]),
            Line::from(Span::styled(
                "=".repeat(SEPARATOR_WIDTH),
                self.theme.separator,
            )),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.source, self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.timezone, self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

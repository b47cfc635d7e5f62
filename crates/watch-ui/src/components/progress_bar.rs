use crate::themes::Theme;
use chrono::Duration;
use ratatui::text::{Line, Span};
use watch_core::formatting::format_countdown;

/// Configuration controlling visual appearance of a progress bar.
pub struct ProgressBarConfig {
    /// Width in terminal columns of the bar portion (excluding label).
    pub width: u16,
    pub filled_char: char,
    pub empty_char: char,
}

impl Default for ProgressBarConfig {
    fn default() -> Self {
        Self {
            width: 40,
            filled_char: '\u{2588}', // █  FULL BLOCK
            empty_char: '\u{2591}',  // ░  LIGHT SHADE
        }
    }
}

fn bar_spans<'a>(percentage: f64, config: &ProgressBarConfig, theme: &'a Theme) -> [Span<'a>; 2] {
    let clamped = percentage.clamp(0.0, 100.0);
    let filled = ((clamped / 100.0) * f64::from(config.width)) as u16;
    let empty = config.width.saturating_sub(filled);

    let filled_str = config.filled_char.to_string().repeat(filled as usize);
    let empty_str = config.empty_char.to_string().repeat(empty as usize);

    [
        Span::styled(filled_str, theme.progress_style(clamped)),
        Span::styled(empty_str, theme.progress_empty),
    ]
}

// ── OverallProgressBar ───────────────────────────────────────────────────────

/// The overall learning progress taken from the latest report.
///
/// Without a known percentage the bar stays empty and the label says so.
pub struct OverallProgressBar<'a> {
    pub percentage: Option<u8>,
    pub theme: &'a Theme,
    pub config: ProgressBarConfig,
}

impl<'a> OverallProgressBar<'a> {
    pub fn new(percentage: Option<u8>, theme: &'a Theme) -> Self {
        Self {
            percentage,
            theme,
            config: ProgressBarConfig::default(),
        }
    }

    pub fn to_line(&self) -> Line<'a> {
        let pct = f64::from(self.percentage.unwrap_or(0));
        let label = match self.percentage {
            Some(p) => format!(" {p}%"),
            None => " no progress reported".to_string(),
        };

        let [filled, empty] = bar_spans(pct, &self.config, self.theme);
        Line::from(vec![
            filled,
            empty,
            Span::styled(label, self.theme.progress_label),
        ])
    }
}

// ── CycleProgressBar ─────────────────────────────────────────────────────────

/// How far the current report interval has run, with the countdown to the
/// next report as label.
pub struct CycleProgressBar<'a> {
    /// Time left until the next report is due.
    pub remaining: Duration,
    /// Length of one report interval.
    pub interval: Duration,
    pub theme: &'a Theme,
    pub config: ProgressBarConfig,
}

impl<'a> CycleProgressBar<'a> {
    pub fn new(remaining: Duration, interval: Duration, theme: &'a Theme) -> Self {
        Self {
            remaining,
            interval,
            theme,
            config: ProgressBarConfig::default(),
        }
    }

    /// Share of the interval already elapsed, in percent.
    pub fn percentage(&self) -> f64 {
        let total = self.interval.num_seconds();
        if total <= 0 {
            return 0.0;
        }
        let left = self.remaining.num_seconds().clamp(0, total);
        (total - left) as f64 / total as f64 * 100.0
    }

    pub fn to_line(&self) -> Line<'a> {
        let [filled, empty] = bar_spans(self.percentage(), &self.config, self.theme);
        Line::from(vec![
            filled,
            empty,
            Span::styled(
                format!(" {} to next report", format_countdown(self.remaining)),
                self.theme.progress_label,
            ),
        ])
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

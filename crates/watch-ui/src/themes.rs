use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`. Background values
/// 0–6 are considered dark; 7–15 are considered light. Anything else yields
/// `BackgroundType::Unknown`.
pub fn detect_background() -> BackgroundType {
    std::env::var("COLORFGBG")
        .ok()
        .map(|val| background_from_colorfgbg(&val))
        .unwrap_or(BackgroundType::Unknown)
}

fn background_from_colorfgbg(val: &str) -> BackgroundType {
    match val.split(';').next_back().and_then(|bg| bg.parse::<u8>().ok()) {
        Some(bg) if bg <= 6 => BackgroundType::Dark,
        Some(_) => BackgroundType::Light,
        None => BackgroundType::Unknown,
    }
}

fn fg(color: Color) -> Style {
    Style::default().fg(color)
}

fn bold(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Every style the dashboard components draw with.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub header_sparkle: Style,
    pub separator: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub bold: Style,
    pub label: Style,
    pub value: Style,

    // ── Status ───────────────────────────────────────────────────────────────
    pub info: Style,
    pub success: Style,
    pub warning: Style,
    pub error: Style,

    // ── Progress bar ─────────────────────────────────────────────────────────
    /// Filled portion below 50 %.
    pub progress_low: Style,
    /// Filled portion between 50 % and 80 %.
    pub progress_medium: Style,
    /// Filled portion at or above 80 %.
    pub progress_high: Style,
    pub progress_empty: Style,
    pub progress_label: Style,

    // ── Report lists ─────────────────────────────────────────────────────────
    pub report_title: Style,
    pub today_badge: Style,
    pub date_badge: Style,

    // ── Latest report markdown ───────────────────────────────────────────────
    pub md_heading: Style,
    pub md_subheading: Style,
    pub md_bullet: Style,
    pub md_code: Style,
    pub md_rule: Style,

    // ── Notifications ────────────────────────────────────────────────────────
    pub notification_info: Style,
    pub notification_success: Style,
    pub notification_warning: Style,
    pub notification_error: Style,
}

impl Theme {
    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: bold(Color::Cyan),
            header_sparkle: fg(Color::Yellow),
            separator: fg(Color::DarkGray),

            text: fg(Color::White),
            dim: fg(Color::DarkGray),
            bold: bold(Color::White),
            label: fg(Color::Gray),
            value: bold(Color::White),

            info: fg(Color::Cyan),
            success: fg(Color::Green),
            warning: fg(Color::Yellow),
            error: fg(Color::Red),

            progress_low: fg(Color::Cyan),
            progress_medium: fg(Color::Yellow),
            progress_high: fg(Color::Green),
            progress_empty: fg(Color::DarkGray),
            progress_label: fg(Color::Gray),

            report_title: fg(Color::White),
            today_badge: bold(Color::Green),
            date_badge: fg(Color::Gray),

            md_heading: bold(Color::Magenta),
            md_subheading: bold(Color::Yellow),
            md_bullet: fg(Color::Red),
            md_code: fg(Color::LightYellow),
            md_rule: fg(Color::DarkGray),

            notification_info: fg(Color::Cyan),
            notification_success: fg(Color::Green),
            notification_warning: fg(Color::Yellow),
            notification_error: bold(Color::Red),
        }
    }

    /// Light-background terminal theme.
    ///
    /// Uses dark colours for text so that content stays legible against a
    /// white or light-grey terminal canvas.
    pub fn light() -> Self {
        Self {
            header: bold(Color::Blue),
            header_sparkle: fg(Color::Magenta),
            separator: fg(Color::Gray),

            text: fg(Color::Black),
            dim: fg(Color::Gray),
            bold: bold(Color::Black),
            label: fg(Color::DarkGray),
            value: bold(Color::Black),

            info: fg(Color::Blue),
            success: fg(Color::Green),
            warning: fg(Color::Yellow),
            error: fg(Color::Red),

            progress_low: fg(Color::Blue),
            progress_medium: fg(Color::Yellow),
            progress_high: fg(Color::Green),
            progress_empty: fg(Color::Gray),
            progress_label: fg(Color::DarkGray),

            report_title: fg(Color::Black),
            today_badge: bold(Color::Green),
            date_badge: fg(Color::DarkGray),

            md_heading: bold(Color::Magenta),
            md_subheading: bold(Color::Blue),
            md_bullet: fg(Color::Red),
            md_code: fg(Color::DarkGray),
            md_rule: fg(Color::Gray),

            notification_info: fg(Color::Blue),
            notification_success: fg(Color::Green),
            notification_warning: fg(Color::Yellow),
            notification_error: bold(Color::Red),
        }
    }

    /// Classic terminal theme using only the basic 8-colour ANSI palette.
    ///
    /// Avoids bold modifiers for compatibility with minimal terminal
    /// emulators.
    pub fn classic() -> Self {
        Self {
            header: fg(Color::Cyan),
            header_sparkle: fg(Color::White),
            separator: fg(Color::DarkGray),

            text: fg(Color::White),
            dim: fg(Color::DarkGray),
            bold: fg(Color::White),
            label: fg(Color::Gray),
            value: fg(Color::White),

            info: fg(Color::Cyan),
            success: fg(Color::Green),
            warning: fg(Color::Yellow),
            error: fg(Color::Red),

            progress_low: fg(Color::Cyan),
            progress_medium: fg(Color::Yellow),
            progress_high: fg(Color::Green),
            progress_empty: fg(Color::DarkGray),
            progress_label: fg(Color::White),

            report_title: fg(Color::White),
            today_badge: fg(Color::Green),
            date_badge: fg(Color::Gray),

            md_heading: fg(Color::Magenta),
            md_subheading: fg(Color::Yellow),
            md_bullet: fg(Color::Red),
            md_code: fg(Color::Yellow),
            md_rule: fg(Color::DarkGray),

            notification_info: fg(Color::Cyan),
            notification_success: fg(Color::Green),
            notification_warning: fg(Color::Yellow),
            notification_error: fg(Color::Red),
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Construct a theme by name. Falls back to `auto_detect` for unknown
    /// names (including `"auto"`).
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    /// Fill style for a given progress percentage.
    ///
    /// * `< 50 %`  → `progress_low`
    /// * `50–80 %` → `progress_medium`
    /// * `≥ 80 %`  → `progress_high`
    pub fn progress_style(&self, percentage: f64) -> Style {
        if percentage >= 80.0 {
            self.progress_high
        } else if percentage >= 50.0 {
            self.progress_medium
        } else {
            self.progress_low
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    #[test]
    fn test_dark_theme_creation() {
        let t = Theme::dark();
        assert_eq!(t.header.fg, Some(Color::Cyan));
        assert_eq!(t.success.fg, Some(Color::Green));
        assert_eq!(t.error.fg, Some(Color::Red));
        assert_eq!(t.today_badge.fg, Some(Color::Green));
        assert!(t.md_heading.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_light_theme_creation() {
        let t = Theme::light();
        assert_eq!(t.header.fg, Some(Color::Blue));
        assert_eq!(t.text.fg, Some(Color::Black));
        assert_eq!(t.report_title.fg, Some(Color::Black));
    }

    #[test]
    fn test_classic_theme_has_no_bold() {
        let t = Theme::classic();
        assert!(!t.bold.add_modifier.contains(Modifier::BOLD));
        assert!(!t.header.add_modifier.contains(Modifier::BOLD));
        assert!(!t.notification_error.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Theme::from_name("dark").header.fg, Some(Color::Cyan));
        assert_eq!(Theme::from_name("light").header.fg, Some(Color::Blue));
        assert!(!Theme::from_name("classic")
            .header
            .add_modifier
            .contains(Modifier::BOLD));
    }

    #[test]
    fn test_from_name_unknown_falls_back() {
        let t = Theme::from_name("does-not-exist");
        assert!(t.header.fg.is_some());
    }

    #[test]
    fn test_background_from_colorfgbg() {
        assert_eq!(background_from_colorfgbg("15;0"), BackgroundType::Dark);
        assert_eq!(background_from_colorfgbg("0;15"), BackgroundType::Light);
        assert_eq!(background_from_colorfgbg("0;default"), BackgroundType::Unknown);
        assert_eq!(background_from_colorfgbg(""), BackgroundType::Unknown);
    }

    #[test]
    fn test_progress_style_thresholds() {
        let t = Theme::dark();
        assert_eq!(t.progress_style(0.0).fg, Some(Color::Cyan));
        assert_eq!(t.progress_style(49.9).fg, Some(Color::Cyan));
        assert_eq!(t.progress_style(50.0).fg, Some(Color::Yellow));
        assert_eq!(t.progress_style(79.9).fg, Some(Color::Yellow));
        assert_eq!(t.progress_style(80.0).fg, Some(Color::Green));
        assert_eq!(t.progress_style(100.0).fg, Some(Color::Green));
    }
}

//! Short-lived status messages shown under the dashboard.

use std::time::{Duration, Instant};

use ratatui::style::Style;
use ratatui::text::{Line, Span};

use crate::themes::Theme;

/// How long a toast stays on screen.
pub const TOAST_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Warning,
    Error,
}

impl ToastKind {
    fn icon(self) -> &'static str {
        match self {
            ToastKind::Info => "ℹ",
            ToastKind::Success => "✔",
            ToastKind::Warning => "⚠",
            ToastKind::Error => "✖",
        }
    }

    fn style(self, theme: &Theme) -> Style {
        match self {
            ToastKind::Info => theme.notification_info,
            ToastKind::Success => theme.notification_success,
            ToastKind::Warning => theme.notification_warning,
            ToastKind::Error => theme.notification_error,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub shown_at: Instant,
}

/// Queue of visible toasts, oldest first.
#[derive(Debug, Default)]
pub struct Toasts {
    items: Vec<Toast>,
}

impl Toasts {
    pub fn push(&mut self, message: impl Into<String>, kind: ToastKind, now: Instant) {
        self.items.push(Toast {
            message: message.into(),
            kind,
            shown_at: now,
        });
    }

    /// Drop every toast older than [`TOAST_TTL`].
    pub fn prune(&mut self, now: Instant) {
        self.items
            .retain(|t| now.saturating_duration_since(t.shown_at) < TOAST_TTL);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn to_lines<'a>(&self, theme: &'a Theme) -> Vec<Line<'a>> {
        self.items
            .iter()
            .map(|t| {
                let style = t.kind.style(theme);
                Line::from(vec![
                    Span::styled(format!("{} ", t.kind.icon()), style),
                    Span::styled(t.message.clone(), style),
                ])
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toasts_expire_after_ttl() {
        let start = Instant::now();
        let mut toasts = Toasts::default();
        toasts.push("Refreshing…", ToastKind::Info, start);
        toasts.push("Data updated", ToastKind::Success, start + Duration::from_secs(2));

        toasts.prune(start + Duration::from_millis(2_999));
        assert_eq!(toasts.len(), 2);

        toasts.prune(start + TOAST_TTL);
        assert_eq!(toasts.len(), 1);

        toasts.prune(start + Duration::from_secs(5));
        assert!(toasts.is_empty());
    }

    #[test]
    fn test_toast_lines_use_kind_style() {
        let theme = Theme::dark();
        let mut toasts = Toasts::default();
        toasts.push("Failed to load data", ToastKind::Error, Instant::now());

        let lines = toasts.to_lines(&theme);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].spans[1].content, "Failed to load data");
        assert_eq!(lines[0].spans[1].style, theme.notification_error);
    }
}

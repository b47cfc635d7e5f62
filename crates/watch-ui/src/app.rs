//! Main application state and TUI event loop for report-watch.
//!
//! [`App`] owns the theme, the current [`DashboardState`] value, the toast
//! queue, and the auto-update flag. Refresh results arrive on a channel
//! from the runtime; key presses are turned into [`KeyAction`]s and sent
//! back through the [`RefreshHandle`].

use std::io;
use std::time::{Duration, Instant};

use chrono::Utc;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use tokio::sync::{mpsc, oneshot};

use watch_core::dashboard::{DashboardOptions, DashboardState};
use watch_runtime::orchestrator::{RefreshHandle, RefreshTrigger, RefreshUpdate};

use crate::components::{ToastKind, Toasts};
use crate::dashboard_view;
use crate::surface::DashboardView;
use crate::themes::Theme;

/// What a key press asks the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Refresh,
    ToggleAutoUpdate,
    ScrollUp,
    ScrollDown,
    None,
}

/// Map a key event to an action.
pub fn key_action(key: KeyEvent) -> KeyAction {
    if key.kind == KeyEventKind::Release {
        return KeyAction::None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Quit,
        KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Refresh,
        KeyCode::Char('a') | KeyCode::Char('A') => KeyAction::ToggleAutoUpdate,
        KeyCode::Up | KeyCode::Char('k') => KeyAction::ScrollUp,
        KeyCode::Down | KeyCode::Char('j') => KeyAction::ScrollDown,
        _ => KeyAction::None,
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the report-watch TUI.
pub struct App {
    pub theme: Theme,
    /// Source location shown in the header.
    pub source: String,
    /// Display timezone name.
    pub timezone: String,
    pub options: DashboardOptions,
    /// Current dashboard value, replaced on every refresh.
    pub state: DashboardState,
    /// Whether scheduled refreshes are running.
    pub auto_update: bool,
    pub toasts: Toasts,
    /// Last fetch failure, shown on the waiting screen.
    pub last_error: Option<String>,
    /// First visible row of the latest-report pane.
    pub scroll: u16,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
}

impl App {
    pub fn new(
        theme_name: &str,
        source: String,
        timezone: String,
        options: DashboardOptions,
        auto_update: bool,
    ) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            source,
            timezone,
            options,
            state: DashboardState::default(),
            auto_update,
            toasts: Toasts::default(),
            last_error: None,
            scroll: 0,
            should_quit: false,
        }
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the dashboard TUI, receiving refresh results from `rx`.
    ///
    /// Uses `crossterm::event::poll` (synchronous, with a 250 ms timeout) so
    /// the terminal event loop stays on the current thread while updates
    /// arrive on the async channel via `try_recv`. A message on `shutdown`
    /// ends the loop the same way `q` does, so the terminal is restored.
    pub async fn run(
        mut self,
        mut rx: mpsc::Receiver<RefreshUpdate>,
        handle: RefreshHandle,
        mut shutdown: oneshot::Receiver<()>,
    ) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            self.toasts.prune(Instant::now());
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => self.handle_action(key_action(key), &handle),
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            loop {
                match rx.try_recv() {
                    Ok(update) => self.apply_update(update),
                    Err(mpsc::error::TryRecvError::Empty) => break,
                    Err(mpsc::error::TryRecvError::Disconnected) => {
                        self.should_quit = true;
                        break;
                    }
                }
            }

            self.check_shutdown(&mut shutdown);
            if self.should_quit {
                break Ok(());
            }
        };

        handle.abort();

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    // ── State transitions ─────────────────────────────────────────────────────

    /// Quit once a shutdown request arrives. A dropped sender is ignored.
    pub fn check_shutdown(&mut self, shutdown: &mut oneshot::Receiver<()>) {
        if shutdown.try_recv().is_ok() {
            self.should_quit = true;
        }
    }

    /// React to a key press, forwarding refresh commands through `handle`.
    pub fn handle_action(&mut self, action: KeyAction, handle: &RefreshHandle) {
        let now = Instant::now();
        match action {
            KeyAction::Quit => self.should_quit = true,
            KeyAction::Refresh => {
                if handle.refresh() {
                    self.toasts.push("Refreshing…", ToastKind::Info, now);
                }
            }
            KeyAction::ToggleAutoUpdate => {
                let enabled = !self.auto_update;
                if handle.set_auto_update(enabled) {
                    self.auto_update = enabled;
                    if enabled {
                        self.toasts.push("Auto-update enabled", ToastKind::Success, now);
                    } else {
                        self.toasts.push("Auto-update disabled", ToastKind::Warning, now);
                    }
                }
            }
            KeyAction::ScrollUp => self.scroll = self.scroll.saturating_sub(1),
            KeyAction::ScrollDown => self.scroll = self.scroll.saturating_add(1),
            KeyAction::None => {}
        }
    }

    /// Fold a refresh result into the dashboard state.
    ///
    /// A failed fetch keeps the current state and raises an error toast.
    /// A fresh snapshot replaces the state; manual refreshes confirm with a
    /// success toast.
    pub fn apply_update(&mut self, update: RefreshUpdate) {
        let now = Instant::now();
        self.auto_update = update.auto_update;

        if let Some(err) = update.error {
            self.toasts.push("Failed to load data", ToastKind::Error, now);
            self.last_error = Some(err);
            return;
        }
        self.last_error = None;

        if let Some(snapshot) = update.snapshot {
            let next = self.state.apply(&snapshot, &self.options);
            if next.latest_markdown != self.state.latest_markdown {
                self.scroll = 0;
            }
            self.state = next;
            if update.trigger == RefreshTrigger::Manual {
                self.toasts.push("Data updated", ToastKind::Success, now);
            }
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        if !self.state.has_data() {
            dashboard_view::render_waiting(
                frame,
                area,
                &self.source,
                self.last_error.as_deref(),
                &self.theme,
                &self.toasts,
            );
            return;
        }

        let view = DashboardView::new(
            &self.state,
            &self.options,
            &self.source,
            &self.timezone,
            Utc::now(),
            self.auto_update,
        );
        dashboard_view::render_dashboard(frame, area, &view, &self.theme, &self.toasts, self.scroll);
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::parser::ValueSource;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};
use serde::{Deserialize, Serialize};

use crate::dashboard::DashboardOptions;
use crate::time_utils;

/// Name of the per-user state directory under `$HOME`.
pub const APP_DIR: &str = ".report-watch";

/// File inside [`APP_DIR`] holding the remembered preferences.
pub const PREFERENCES_FILE: &str = "last_used.json";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Watch a folder of generated markdown reports from the terminal
#[derive(Parser, Debug, Clone)]
#[command(name = "report-watch", version)]
pub struct Settings {
    /// Base URL or local directory holding index.md and latest.md
    #[arg(long, default_value = "http://localhost:8000/", env = "REPORT_WATCH_SOURCE")]
    pub source: String,

    /// Refresh interval in seconds (30-3600)
    #[arg(long, default_value = "300", value_parser = clap::value_parser!(u32).range(30..=3600))]
    pub refresh_rate: u32,

    /// Hours between published reports (1-48)
    #[arg(long, default_value = "4", value_parser = clap::value_parser!(u32).range(1..=48))]
    pub report_interval_hours: u32,

    /// Number of reports in the recent list (1-100)
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u32).range(1..=100))]
    pub recent_limit: u32,

    /// HTTP request timeout in seconds
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u64).range(1..=120))]
    pub timeout_secs: u64,

    /// IANA timezone for report times, or "auto" for the system zone
    #[arg(long, default_value = "auto")]
    pub timezone: String,

    /// Colour theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Start with automatic refresh turned off
    #[arg(long)]
    pub no_auto_update: bool,

    /// Fetch once, print the dashboard as text and exit
    #[arg(long)]
    pub once: bool,

    /// Log verbosity
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Shorthand for --log-level DEBUG
    #[arg(long)]
    pub debug: bool,

    /// Forget remembered preferences before starting
    #[arg(long)]
    pub clear: bool,
}

// ── Saved preferences ──────────────────────────────────────────────────────────

/// Values remembered between runs so a bare `report-watch` reopens the
/// same source with the same look.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SavedPreferences {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_rate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_limit: Option<u32>,
}

impl SavedPreferences {
    /// `~/.report-watch/last_used.json`, or the same under `.` without a home.
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::path_under(&home)
    }

    pub fn path_under(home: &Path) -> PathBuf {
        home.join(APP_DIR).join(PREFERENCES_FILE)
    }

    /// Read preferences from `path`. A missing or unreadable file yields
    /// empty preferences.
    pub fn read(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str(&content) {
            Ok(prefs) => prefs,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable preferences");
                Self::default()
            }
        }
    }

    /// Replace the file at `path` with these preferences.
    ///
    /// The JSON goes to a sibling temp file first and is renamed into place,
    /// so a reader never sees a half-written file.
    pub fn write(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let body = serde_json::to_vec_pretty(self).map_err(std::io::Error::other)?;
        let staging = path.with_extension("json.tmp");
        std::fs::write(&staging, body)?;
        std::fs::rename(&staging, path)
    }

    /// Delete the file at `path`; absent files are not an error.
    pub fn remove(path: &Path) -> std::io::Result<()> {
        match std::fs::remove_file(path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

impl From<&Settings> for SavedPreferences {
    fn from(s: &Settings) -> Self {
        Self {
            source: Some(s.source.clone()),
            theme: Some(s.theme.clone()),
            timezone: Some(s.timezone.clone()),
            refresh_rate: Some(s.refresh_rate),
            recent_limit: Some(s.recent_limit),
        }
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Settings for this process: command line first, then remembered
    /// preferences, then defaults. Exits with clap's usage message on bad
    /// arguments.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os(), &SavedPreferences::default_path())
            .unwrap_or_else(|e| e.exit())
    }

    /// [`Settings::load`] with explicit arguments and preferences file.
    ///
    /// Preferences only fill values the user did not give on the command
    /// line or through the environment. The merged result is written back
    /// unless `--clear` was passed, which deletes the file instead.
    pub fn load_from_args<I, T>(args: I, prefs_path: &Path) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = Self::command().try_get_matches_from(args)?;
        let mut settings = Self::from_arg_matches(&matches)?;

        if settings.clear {
            if let Err(e) = SavedPreferences::remove(prefs_path) {
                tracing::warn!(error = %e, "could not remove saved preferences");
            }
            return Ok(settings.finalize());
        }

        let saved = SavedPreferences::read(prefs_path);
        fill(&matches, "source", &mut settings.source, saved.source);
        fill(&matches, "theme", &mut settings.theme, saved.theme);
        fill(&matches, "timezone", &mut settings.timezone, saved.timezone);
        // Arg ids are the field names, with underscores.
        fill(
            &matches,
            "refresh_rate",
            &mut settings.refresh_rate,
            saved.refresh_rate.map(|v| v.clamp(30, 3600)),
        );
        fill(
            &matches,
            "recent_limit",
            &mut settings.recent_limit,
            saved.recent_limit.map(|v| v.clamp(1, 100)),
        );

        let settings = settings.finalize();
        if let Err(e) = SavedPreferences::from(&settings).write(prefs_path) {
            tracing::warn!(error = %e, "could not save preferences");
        }
        Ok(settings)
    }

    /// Resolve `"auto"` timezone and fold `--debug` into the log level.
    fn finalize(mut self) -> Self {
        if self.timezone == "auto" {
            self.timezone = time_utils::get_system_timezone();
        }
        if self.debug {
            self.log_level = "DEBUG".to_string();
        }
        self
    }

    /// The display timezone as a [`chrono_tz::Tz`] (UTC when unrecognised).
    pub fn tz(&self) -> chrono_tz::Tz {
        time_utils::resolve_timezone(&self.timezone)
    }

    /// Layout and schedule options for the dashboard state.
    pub fn dashboard_options(&self) -> DashboardOptions {
        DashboardOptions {
            report_interval: chrono::Duration::hours(i64::from(self.report_interval_hours)),
            recent_limit: self.recent_limit as usize,
        }
    }
}

/// Overwrite `slot` with `saved` when `id` came from its default value.
fn fill<T>(matches: &ArgMatches, id: &str, slot: &mut T, saved: Option<T>) {
    let explicit = matches!(
        matches.value_source(id),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    );
    if let (false, Some(value)) = (explicit, saved) {
        *slot = value;
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use watch_core::settings::APP_DIR;

/// File name of the default TUI log.
pub const LOG_FILE_NAME: &str = "report-watch.log";

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure the `~/.report-watch/` directory hierarchy exists under `home`.
///
/// Creates `~/.report-watch/` and its `logs/` subdirectory if absent and
/// returns the application directory.
pub fn ensure_directories_in(home: &Path) -> anyhow::Result<PathBuf> {
    let app_dir = home.join(APP_DIR);
    std::fs::create_dir_all(app_dir.join("logs"))?;
    Ok(app_dir)
}

pub fn ensure_directories() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    ensure_directories_in(&home)
}

/// Where logs go when no `--log-file` was given.
///
/// The TUI owns the terminal, so its logs go to a file in the app
/// directory; one-shot mode logs to stderr.
pub fn default_log_file(app_dir: &Path, once: bool) -> Option<PathBuf> {
    (!once).then(|| app_dir.join("logs").join(LOG_FILE_NAME))
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` name to an [`EnvFilter`] directive.
pub fn filter_directive(log_level: &str) -> &'static str {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARNING" => "warn",
        "ERROR" | "CRITICAL" => "error",
        _ => "info",
    }
}

/// Initialise the global `tracing` subscriber.
///
/// `RUST_LOG` overrides `log_level` when set. With `log_file` the output is
/// appended to that file without ANSI colours; otherwise it goes to stderr.
pub fn setup_logging(log_level: &str, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(log_level)));

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
        None => {
            let layer = fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
    }

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_directories_in() {
        let tmp = TempDir::new().expect("tempdir");
        let app_dir = ensure_directories_in(tmp.path()).expect("create dirs");

        assert_eq!(app_dir, tmp.path().join(".report-watch"));
        assert!(app_dir.is_dir());
        assert!(app_dir.join("logs").is_dir(), "logs subdir must exist");
        let entries: Vec<_> = std::fs::read_dir(&app_dir)
            .expect("read app dir")
            .map(|e| e.expect("dir entry").file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("logs")]);

        // Running twice is harmless.
        ensure_directories_in(tmp.path()).expect("second run");
    }

    #[test]
    fn test_default_log_file() {
        let dir = Path::new("/home/u/.report-watch");
        assert_eq!(
            default_log_file(dir, false),
            Some(dir.join("logs").join("report-watch.log"))
        );
        assert_eq!(default_log_file(dir, true), None);
    }

    #[test]
    fn test_filter_directive() {
        assert_eq!(filter_directive("DEBUG"), "debug");
        assert_eq!(filter_directive("critical"), "error");
        assert_eq!(filter_directive("WARNING"), "warn");
        assert_eq!(filter_directive("ERROR"), "error");
        assert_eq!(filter_directive("INFO"), "info");
        assert_eq!(filter_directive("nonsense"), "info");
    }
}

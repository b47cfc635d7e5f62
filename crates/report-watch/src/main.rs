mod bootstrap;

use std::io::IsTerminal;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::sync::oneshot;
use watch_core::dashboard::DashboardState;
use watch_core::settings::Settings;
use watch_core::time_utils::today_in;
use watch_core::IndexParser;
use watch_data::{SnapshotLoader, Source};
use watch_runtime::data_manager::DataManager;
use watch_runtime::orchestrator::RefreshOrchestrator;
use watch_ui::app::App;
use watch_ui::surface::{render_text, terminal_width, DashboardView};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load();

    let app_dir = bootstrap::ensure_directories()?;
    let log_file = settings
        .log_file
        .clone()
        .or_else(|| bootstrap::default_log_file(&app_dir, settings.once));
    bootstrap::setup_logging(&settings.log_level, log_file.as_deref())?;

    tracing::info!("report-watch v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        source = %settings.source,
        timezone = %settings.timezone,
        refresh_rate = settings.refresh_rate,
        theme = %settings.theme,
        "settings resolved"
    );

    let source = Source::from_location(&settings.source, Duration::from_secs(settings.timeout_secs))
        .with_context(|| format!("cannot use report source {:?}", settings.source))?;
    let loader = SnapshotLoader::new(source, IndexParser::new(settings.tz()));

    if settings.once {
        return run_once(&settings, loader).await;
    }

    let orchestrator = RefreshOrchestrator::new(
        loader,
        u64::from(settings.refresh_rate),
        !settings.no_auto_update,
    );
    let (rx, handle) = orchestrator.start();

    let app = App::new(
        &settings.theme,
        settings.source.clone(),
        settings.timezone.clone(),
        settings.dashboard_options(),
        !settings.no_auto_update,
    );

    // In raw mode Ctrl+C arrives as a key; a SIGINT from outside the
    // terminal is forwarded to the event loop instead.
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("SIGINT received; shutting down");
            let _ = shutdown_tx.send(());
        }
    });

    app.run(rx, handle, shutdown_rx).await?;

    tracing::info!("report-watch stopped");
    Ok(())
}

/// Fetch once, print the dashboard as text, and fail when nothing loaded.
async fn run_once(settings: &Settings, loader: SnapshotLoader<Source>) -> Result<()> {
    let tz = settings.tz();
    let today = today_in(tz, Utc::now());
    let mut manager = DataManager::new(loader, 0);

    let loaded = manager.get_data(&today, true).await.cloned();
    let Some(snapshot) = loaded else {
        let reason = manager.last_error().unwrap_or("unknown error").to_string();
        anyhow::bail!("failed to load reports from {}: {reason}", settings.source);
    };

    let options = settings.dashboard_options();
    let state = DashboardState::default().apply(&snapshot, &options);
    let view = DashboardView::new(
        &state,
        &options,
        &settings.source,
        &settings.timezone,
        Utc::now(),
        !settings.no_auto_update,
    );

    let stdout = std::io::stdout();
    let color = stdout.is_terminal();
    print!("{}", render_text(&view, color, terminal_width()));
    Ok(())
}

//! Async refresh orchestrator.
//!
//! Runs [`DataManager`] in a tokio task, sending a [`RefreshUpdate`] after
//! every fetch through an `mpsc` channel so the UI loop can consume them
//! without shared mutable state. The UI steers the task with
//! [`RefreshCommand`]s through the [`RefreshHandle`].

use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};
use watch_core::time_utils::today_in;
use watch_core::ReportSnapshot;
use watch_data::{DocumentSource, SnapshotLoader};

use crate::data_manager::{DataManager, DEFAULT_CACHE_TTL_SECS};

// ── Public types ──────────────────────────────────────────────────────────────

/// What caused a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    /// The fetch performed as soon as the task starts.
    Initial,
    /// A tick of the auto-update timer.
    Scheduled,
    /// A [`RefreshCommand::Refresh`] from the UI.
    Manual,
}

/// Instructions from the UI to the refresh task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshCommand {
    /// Fetch now, bypassing the cache.
    Refresh,
    /// Turn the periodic timer on or off.
    SetAutoUpdate(bool),
}

/// The result of one fetch, forwarded to the UI.
#[derive(Debug, Clone)]
pub struct RefreshUpdate {
    /// Newest snapshot, or the previous one when this fetch failed.
    /// `None` only when nothing has ever loaded.
    pub snapshot: Option<ReportSnapshot>,
    pub trigger: RefreshTrigger,
    /// Failure description when this fetch did not succeed.
    pub error: Option<String>,
    /// Whether the periodic timer is running after this update.
    pub auto_update: bool,
}

// ── RefreshOrchestrator ───────────────────────────────────────────────────────

/// Background refresh coordinator.
///
/// Call [`RefreshOrchestrator::start`] to spawn the refresh loop and receive
/// the update channel plus a control handle.
pub struct RefreshOrchestrator<S> {
    loader: SnapshotLoader<S>,
    /// How often the timer fires while auto-update is on.
    update_interval: Duration,
    /// Whether the timer starts enabled.
    auto_update: bool,
    cache_ttl_secs: u64,
}

impl<S> RefreshOrchestrator<S>
where
    S: DocumentSource + Send + Sync + 'static,
{
    /// Create a new orchestrator.
    ///
    /// # Parameters
    /// - `loader`               – fetches and parses the report documents.
    /// - `update_interval_secs` – seconds between scheduled refreshes.
    /// - `auto_update`          – whether scheduled refreshes start enabled.
    pub fn new(loader: SnapshotLoader<S>, update_interval_secs: u64, auto_update: bool) -> Self {
        Self {
            loader,
            update_interval: Duration::from_secs(update_interval_secs.max(1)),
            auto_update,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }

    /// Override the snapshot cache TTL.
    pub fn with_cache_ttl(mut self, secs: u64) -> Self {
        self.cache_ttl_secs = secs;
        self
    }

    /// Start the refresh loop.
    ///
    /// Returns the receiver for [`RefreshUpdate`]s and a [`RefreshHandle`]
    /// for sending commands or aborting the loop.
    pub fn start(self) -> (mpsc::Receiver<RefreshUpdate>, RefreshHandle) {
        let (tx, rx) = mpsc::channel(16);
        let (cmd_tx, cmd_rx) = mpsc::channel(16);

        let handle = tokio::spawn(async move {
            self.refresh_loop(tx, cmd_rx).await;
        });

        (
            rx,
            RefreshHandle {
                handle,
                commands: cmd_tx,
            },
        )
    }

    // ── Private implementation ────────────────────────────────────────────

    /// Fetch once immediately, then on every timer tick while auto-update is
    /// on, and whenever a refresh is requested. Exits when either channel
    /// peer goes away.
    async fn refresh_loop(
        self,
        tx: mpsc::Sender<RefreshUpdate>,
        mut commands: mpsc::Receiver<RefreshCommand>,
    ) {
        let RefreshOrchestrator {
            loader,
            update_interval,
            mut auto_update,
            cache_ttl_secs,
        } = self;
        let mut manager = DataManager::new(loader, cache_ttl_secs);

        fetch_and_send(&mut manager, &tx, RefreshTrigger::Initial, auto_update).await;

        let mut interval = time::interval(update_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick fires immediately; the initial fetch already ran.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick(), if auto_update => {
                    fetch_and_send(&mut manager, &tx, RefreshTrigger::Scheduled, auto_update).await;
                }
                command = commands.recv() => match command {
                    Some(RefreshCommand::Refresh) => {
                        fetch_and_send(&mut manager, &tx, RefreshTrigger::Manual, auto_update).await;
                    }
                    Some(RefreshCommand::SetAutoUpdate(enabled)) => {
                        tracing::info!(enabled, "auto-update toggled");
                        if enabled && !auto_update {
                            interval.reset();
                        }
                        auto_update = enabled;
                    }
                    None => {
                        tracing::debug!("command channel closed; exiting refresh loop");
                        break;
                    }
                },
                _ = tx.closed() => {
                    tracing::debug!("update channel closed; exiting refresh loop");
                    break;
                }
            }
        }
    }
}

/// Fetch through `manager` and forward the outcome on `tx`.
async fn fetch_and_send<S: DocumentSource>(
    manager: &mut DataManager<S>,
    tx: &mpsc::Sender<RefreshUpdate>,
    trigger: RefreshTrigger,
    auto_update: bool,
) {
    let tz = manager.loader().parser().timezone();
    let today = today_in(tz, Utc::now());
    let force = trigger != RefreshTrigger::Scheduled;

    let snapshot = manager.get_data(&today, force).await.cloned();
    let error = manager.last_error().map(str::to_string);

    tracing::debug!(?trigger, ok = error.is_none(), "refresh finished");

    let update = RefreshUpdate {
        snapshot,
        trigger,
        error,
        auto_update,
    };
    if let Err(e) = tx.send(update).await {
        tracing::warn!(error = %e, "failed to send refresh update; receiver dropped");
    }
}

// ── RefreshHandle ─────────────────────────────────────────────────────────────

/// A handle to the background refresh task.
pub struct RefreshHandle {
    handle: tokio::task::JoinHandle<()>,
    commands: mpsc::Sender<RefreshCommand>,
}

impl RefreshHandle {
    /// Ask the task to fetch now. Returns `false` if the request could not
    /// be queued (task gone or queue full).
    pub fn refresh(&self) -> bool {
        self.send(RefreshCommand::Refresh)
    }

    /// Turn scheduled refreshes on or off.
    pub fn set_auto_update(&self, enabled: bool) -> bool {
        self.send(RefreshCommand::SetAutoUpdate(enabled))
    }

    /// Immediately abort the refresh loop.
    pub fn abort(&self) {
        self.handle.abort();
    }

    fn send(&self, command: RefreshCommand) -> bool {
        match self.commands.try_send(command) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, ?command, "could not queue refresh command");
                false
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use watch_core::IndexParser;
    use watch_data::DirSource;

    const INDEX: &str = "[a](2026-02-21/report_08-00.md)\n[b](2026-02-21/report_12-00.md)\n";

    fn populated_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("index.md"), INDEX).unwrap();
        std::fs::write(dir.path().join("latest.md"), "Overall progress: 60%").unwrap();
        dir
    }

    fn orchestrator(dir: &TempDir, interval: u64, auto: bool) -> RefreshOrchestrator<DirSource> {
        let loader = SnapshotLoader::new(DirSource::new(dir.path()), IndexParser::default());
        RefreshOrchestrator::new(loader, interval, auto)
    }

    async fn next(rx: &mut mpsc::Receiver<RefreshUpdate>) -> RefreshUpdate {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for update")
            .expect("channel closed before receiving update")
    }

    #[test]
    fn test_orchestrator_creation() {
        let dir = populated_dir();
        let orch = orchestrator(&dir, 300, true).with_cache_ttl(5);
        assert_eq!(orch.update_interval, Duration::from_secs(300));
        assert!(orch.auto_update);
        assert_eq!(orch.cache_ttl_secs, 5);
    }

    #[test]
    fn test_zero_interval_is_raised_to_one_second() {
        let dir = populated_dir();
        let orch = orchestrator(&dir, 0, false);
        assert_eq!(orch.update_interval, Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_sends_initial_snapshot() {
        let dir = populated_dir();
        let (mut rx, handle) = orchestrator(&dir, 300, true).start();

        let update = next(&mut rx).await;
        assert_eq!(update.trigger, RefreshTrigger::Initial);
        assert!(update.error.is_none());
        assert!(update.auto_update);
        let snap = update.snapshot.expect("snapshot");
        assert_eq!(snap.records.len(), 2);
        assert_eq!(snap.progress, Some(60));

        handle.abort();
    }

    #[tokio::test]
    async fn test_initial_failure_reports_error() {
        let dir = TempDir::new().unwrap();
        let (mut rx, handle) = orchestrator(&dir, 300, true).start();

        let update = next(&mut rx).await;
        assert!(update.snapshot.is_none());
        assert!(update.error.is_some());

        handle.abort();
    }

    #[tokio::test]
    async fn test_manual_refresh_bypasses_cache() {
        let dir = populated_dir();
        let (mut rx, handle) = orchestrator(&dir, 300, false).start();
        let first = next(&mut rx).await;
        assert_eq!(first.snapshot.unwrap().records.len(), 2);

        std::fs::write(dir.path().join("index.md"), "[c](2026-02-21/report_16-00.md)\n").unwrap();
        assert!(handle.refresh());

        let second = next(&mut rx).await;
        assert_eq!(second.trigger, RefreshTrigger::Manual);
        assert_eq!(second.snapshot.unwrap().records.len(), 1);

        handle.abort();
    }

    #[tokio::test]
    async fn test_scheduled_refresh_fires() {
        let dir = populated_dir();
        let (mut rx, handle) = orchestrator(&dir, 1, true).with_cache_ttl(0).start();
        let _ = next(&mut rx).await;

        let update = next(&mut rx).await;
        assert_eq!(update.trigger, RefreshTrigger::Scheduled);

        handle.abort();
    }

    #[tokio::test]
    async fn test_auto_update_off_sends_nothing_scheduled() {
        let dir = populated_dir();
        let (mut rx, handle) = orchestrator(&dir, 1, false).start();
        let _ = next(&mut rx).await;

        let waited = tokio::time::timeout(Duration::from_millis(1_500), rx.recv()).await;
        assert!(waited.is_err(), "no scheduled update expected while disabled");

        handle.abort();
    }

    #[tokio::test]
    async fn test_toggle_auto_update_reflected_in_updates() {
        let dir = populated_dir();
        let (mut rx, handle) = orchestrator(&dir, 300, true).start();
        let _ = next(&mut rx).await;

        assert!(handle.set_auto_update(false));
        assert!(handle.refresh());
        let update = next(&mut rx).await;
        assert!(!update.auto_update);

        handle.abort();
    }

    #[tokio::test]
    async fn test_loop_exits_when_receiver_dropped() {
        let dir = populated_dir();
        let (rx, handle) = orchestrator(&dir, 300, true).start();
        drop(rx);
        tokio::time::timeout(Duration::from_secs(5), handle.handle)
            .await
            .expect("loop should exit")
            .expect("task should not panic");
    }
}

//! Polling orchestrator.
//!
//! While a session is active one background task fetches the process list
//! immediately and then on every interval tick. At most one fetch is in
//! flight. Ticks that arrive meanwhile are dropped; refresh requests that
//! arrive meanwhile collapse into a single fetch right after it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};

use super::provider::MetricsAdapter;
use super::store::SnapshotStore;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Starts polling tasks bound to a session generation.
#[derive(Clone)]
pub struct PollingOrchestrator {
    metrics: MetricsAdapter,
    store: Arc<SnapshotStore>,
    interval: Duration,
}

/// Handle to a running polling task. Dropping it stops the task.
pub struct PollHandle {
    refresh_tx: mpsc::Sender<()>,
    shutdown_tx: broadcast::Sender<()>,
    task: JoinHandle<()>,
}

impl PollingOrchestrator {
    pub fn new(metrics: MetricsAdapter, store: Arc<SnapshotStore>, interval: Duration) -> Self {
        Self {
            metrics,
            store,
            interval,
        }
    }

    /// Spawn the polling task for `generation`. Must be called inside a Tokio
    /// runtime.
    pub fn start(&self, generation: u64) -> PollHandle {
        let (refresh_tx, refresh_rx) = mpsc::channel(1);
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let task = tokio::spawn(poll_task(
            self.metrics.clone(),
            Arc::clone(&self.store),
            generation,
            self.interval,
            refresh_rx,
            shutdown_rx,
        ));

        log::debug!(
            "Polling started (generation {}, every {:?})",
            generation,
            self.interval
        );

        PollHandle {
            refresh_tx,
            shutdown_tx,
            task,
        }
    }
}

impl PollHandle {
    /// Ask for a fetch outside the regular schedule.
    ///
    /// A request made while a fetch is in flight runs once that fetch
    /// resolves, since the running fetch may have sampled the OS too early.
    /// Returns whether the request was queued; it is not when another
    /// request is already pending.
    pub fn refresh(&self) -> bool {
        self.refresh_tx.try_send(()).is_ok()
    }

    /// Stop polling. A fetch still in flight is abandoned.
    pub fn cancel(&self) {
        let _ = self.shutdown_tx.send(());
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn poll_task(
    metrics: MetricsAdapter,
    store: Arc<SnapshotStore>,
    generation: u64,
    period: Duration,
    mut refresh_rx: mpsc::Receiver<()>,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut refresh_pending = false;

    loop {
        if refresh_pending {
            refresh_pending = false;
            log::trace!("Running refresh requested during the previous fetch");
        } else {
            tokio::select! {
                biased;
                _ = shutdown.recv() => break,
                _ = ticker.tick() => {}
                Some(()) = refresh_rx.recv() => {
                    log::trace!("Manual refresh requested");
                }
            }
        }

        let started = Instant::now();
        let records = tokio::select! {
            biased;
            _ = shutdown.recv() => break,
            records = metrics.list_processes() => records,
        };

        // Any number of requests made during the fetch become one follow-up.
        while refresh_rx.try_recv().is_ok() {
            refresh_pending = true;
        }
        if started.elapsed() >= period {
            ticker.reset();
        }

        if !store.apply(generation, records) {
            log::debug!("Dropping fetch for stale generation {}", generation);
            break;
        }
    }

    log::debug!("Polling stopped (generation {})", generation);
}

//! Background autosave.
//!
//! The latest project state is handed to [`Autosave::notify`] after every
//! change. A background task writes it:
//!
//! - once the debounce period passes without another change (each change
//!   restarts the wait, so only the last state in a burst is written);
//! - on every tick of a fixed interval.
//!
//! Requests with an empty forest are never written.

use crate::config::AutosaveConfig;
use crate::persistence::{Persistence, SaveRequest};
use playground_storage::Storage;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Handle to a running autosave task.
pub struct Autosave {
    tx: watch::Sender<Option<SaveRequest>>,
    cancel: CancellationToken,
    save_count: Arc<AtomicU64>,
    handle: Option<JoinHandle<()>>,
}

impl Autosave {
    /// Start the autosave task on the current tokio runtime.
    pub fn spawn<S: Storage + 'static>(persistence: Persistence<S>, config: &AutosaveConfig) -> Self {
        let (tx, rx) = watch::channel(None);
        let cancel = CancellationToken::new();
        let save_count = Arc::new(AtomicU64::new(0));

        let worker = Worker {
            persistence,
            rx,
            cancel: cancel.clone(),
            save_count: Arc::clone(&save_count),
            debounce: config.debounce(),
            interval: config.interval(),
        };
        let handle = tokio::spawn(worker.run());

        Self {
            tx,
            cancel,
            save_count,
            handle: Some(handle),
        }
    }

    /// Record the latest state and restart the debounce.
    pub fn notify(&self, request: SaveRequest) {
        self.tx.send_replace(Some(request));
    }

    /// Number of completed writes.
    pub fn save_count(&self) -> u64 {
        self.save_count.load(Ordering::Relaxed)
    }

    /// Stop both timers and wait for the task to end. Pending changes are
    /// not written.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "autosave task ended abnormally");
            }
        }
    }
}

impl Drop for Autosave {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

struct Worker<S> {
    persistence: Persistence<S>,
    rx: watch::Receiver<Option<SaveRequest>>,
    cancel: CancellationToken,
    save_count: Arc<AtomicU64>,
    debounce: Duration,
    interval: Duration,
}

impl<S: Storage> Worker<S> {
    async fn run(mut self) {
        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut deadline: Option<Instant> = None;

        debug!(
            debounce_ms = self.debounce.as_millis() as u64,
            interval_ms = self.interval.as_millis() as u64,
            "autosave started"
        );

        loop {
            let debounce_at = deadline.unwrap_or_else(Instant::now);
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                changed = self.rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    deadline = Some(Instant::now() + self.debounce);
                }
                _ = tokio::time::sleep_until(debounce_at), if deadline.is_some() => {
                    deadline = None;
                    self.save_latest("debounce").await;
                }
                _ = ticker.tick() => {
                    self.save_latest("interval").await;
                }
            }
        }

        debug!("autosave stopped");
    }

    async fn save_latest(&mut self, trigger: &'static str) {
        let latest = self.rx.borrow_and_update().clone();
        let Some(request) = latest else {
            return;
        };
        if request.files.is_empty() {
            debug!(trigger, "skipping autosave of empty project");
            return;
        }

        match self.persistence.save(&request, false).await {
            Ok(_) => {
                self.save_count.fetch_add(1, Ordering::Relaxed);
                debug!(trigger, identity = %request.identity, "autosaved");
            }
            Err(e) => warn!(trigger, error = %e, "autosave failed"),
        }
    }
}

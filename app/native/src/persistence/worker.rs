//! Debounced, fire-and-forget persistence.
//!
//! ```text
//! Session ──notify(snapshot)──> [watch: latest only] ──> PersistWorker ──save──> SettingsStore
//!                                                          │
//!                                                          └─ waits for `debounce` of quiet,
//!                                                             saves on the blocking pool
//! ```
//!
//! The session never waits on the worker and never learns whether a save
//! succeeded. Only the newest snapshot is held, so a burst of any length
//! ends with the final board on disk. Failed saves are retried with
//! exponential backoff and then logged. When every handle is dropped the
//! worker flushes what it holds and exits.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use super::document::StoredSettings;
use super::error::{PersistError, PersistResult};
use super::store::SettingsStore;
use crate::config::PersistenceConfig;

// ============================================================================
// Policy
// ============================================================================

/// Timing for the persistence worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistPolicy {
    /// Quiet period before a save.
    pub debounce: Duration,
    /// Extra attempts after the first failed save.
    pub retries: u32,
    /// Delay before the first retry; doubles on each further retry.
    pub retry_delay: Duration,
}

impl Default for PersistPolicy {
    fn default() -> Self { Self::from(&PersistenceConfig::default()) }
}

impl From<&PersistenceConfig> for PersistPolicy {
    fn from(config: &PersistenceConfig) -> Self {
        Self {
            debounce: Duration::from_millis(config.debounce_ms),
            retries: config.retries,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        }
    }
}

impl PersistPolicy {
    /// Delay before retry number `attempt` (0-based).
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.retry_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Runs `op` until it succeeds, retrying with exponential backoff.
///
/// [`PersistError::NotFound`](super::PersistError::NotFound) is returned
/// immediately.
///
/// # Errors
///
/// Returns the last error once all retries are used up.
pub async fn retry_with_backoff<T, F, Fut>(policy: &PersistPolicy, mut op: F) -> PersistResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = PersistResult<T>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_not_found() || attempt >= policy.retries => return Err(err),
            Err(err) => {
                let delay = policy.backoff(attempt);
                attempt += 1;
                tracing::warn!(
                    error = %err,
                    attempt,
                    retries = policy.retries,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "persistence failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

// ============================================================================
// Handle
// ============================================================================

/// Sending side of the persistence channel.
///
/// Cheap to clone. `notify` never blocks.
#[derive(Clone, Debug)]
pub struct PersistHandle {
    tx: Arc<watch::Sender<Option<StoredSettings>>>,
}

impl PersistHandle {
    /// Replaces the pending snapshot.
    ///
    /// A stopped worker is logged and otherwise ignored.
    pub fn notify(&self, snapshot: StoredSettings) {
        if self.tx.send(Some(snapshot)).is_err() {
            tracing::debug!("persistence worker stopped, dropping snapshot");
        }
    }
}

// ============================================================================
// Worker
// ============================================================================

/// Receiving side of the persistence channel.
pub struct PersistWorker<S> {
    rx: watch::Receiver<Option<StoredSettings>>,
    store: Arc<S>,
    policy: PersistPolicy,
}

/// Creates a connected handle and worker.
///
/// Spawn [`PersistWorker::run`] on a tokio runtime.
pub fn persistence_channel<S>(store: S, policy: PersistPolicy) -> (PersistHandle, PersistWorker<S>)
where S: SettingsStore + 'static {
    let (tx, rx) = watch::channel(None);
    (PersistHandle { tx: Arc::new(tx) }, PersistWorker { rx, store: Arc::new(store), policy })
}

impl<S: SettingsStore + 'static> PersistWorker<S> {
    /// Processes snapshots until every handle is dropped.
    ///
    /// Returns the number of documents written.
    pub async fn run(mut self) -> usize {
        let mut saved = 0;

        // An unseen value is reported before the closed channel.
        while self.rx.changed().await.is_ok() {
            let mut closed = false;
            loop {
                match tokio::time::timeout(self.policy.debounce, self.rx.changed()).await {
                    Ok(Ok(())) => {}
                    Ok(Err(_)) => {
                        closed = true;
                        break;
                    }
                    Err(_) => break,
                }
            }

            let latest = self.rx.borrow_and_update().clone();
            if let Some(latest) = latest
                && self.save(latest).await
            {
                saved += 1;
            }
            if closed {
                break;
            }
        }

        tracing::debug!(saved, "persistence worker stopped");
        saved
    }

    async fn save(&self, settings: StoredSettings) -> bool {
        let settings = Arc::new(settings);
        let result = retry_with_backoff(&self.policy, || {
            let store = Arc::clone(&self.store);
            let settings = Arc::clone(&settings);
            async move {
                tokio::task::spawn_blocking(move || store.save(&settings))
                    .await
                    .map_err(|err| PersistError::Task(err.to_string()))?
            }
        })
        .await;

        match result {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(error = %err, "failed to persist settings");
                false
            }
        }
    }
}

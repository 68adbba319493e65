//! Worker pool for asynchronous hooks.
//!
//! Submitted work runs on tokio tasks; at most `concurrency` of them hold a
//! slot at once. Callers never receive a handle, but [`AsyncHookPool::drain`]
//! waits for everything submitted so far.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio_util::task::TaskTracker;

/// Bounded fire-and-forget task pool.
#[derive(Debug, Clone)]
pub struct AsyncHookPool {
    /// Tracks every spawned task for `drain`.
    tracker: TaskTracker,
    /// Concurrency slots.
    slots: Arc<Semaphore>,
    /// Configured slot count.
    concurrency: usize,
    /// Number of `drain` calls currently waiting. The tracker is reopened
    /// only when the last one leaves.
    draining: Arc<Mutex<usize>>,
}

impl AsyncHookPool {
    /// Creates a pool allowing `concurrency` tasks to run at once (minimum 1).
    pub fn new(concurrency: usize) -> Self {
        let concurrency = concurrency.max(1);
        Self {
            tracker: TaskTracker::new(),
            slots: Arc::new(Semaphore::new(concurrency)),
            concurrency,
            draining: Arc::new(Mutex::new(0)),
        }
    }

    /// Submits work. Must be called from within a tokio runtime.
    pub fn submit<F>(&self, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let slots = Arc::clone(&self.slots);
        // Handle dropped on purpose: completion is observed through `drain`
        let _ = self.tracker.spawn(async move {
            let _permit = match slots.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    tracing::warn!("Async hook pool closed, dropping submitted work");
                    return;
                }
            };
            work.await;
        });
    }

    /// Number of submitted tasks that have not finished yet.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Configured concurrency.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Waits for all submitted tasks to finish, up to `timeout`.
    ///
    /// Returns `true` if the pool became idle in time. The pool keeps
    /// accepting work afterwards. Overlapping calls each wait on their own
    /// timeout.
    pub async fn drain(&self, timeout: Duration) -> bool {
        let _turn = DrainTurn::enter(self);
        let idle = tokio::time::timeout(timeout, self.tracker.wait())
            .await
            .is_ok();

        if !idle {
            tracing::warn!(
                in_flight = self.tracker.len(),
                timeout_ms = timeout.as_millis() as u64,
                "Async hooks still running after drain timeout"
            );
        }
        idle
    }
}

/// Marks one running `drain`; leaving the last turn reopens the tracker,
/// even when the drain future is dropped early.
struct DrainTurn<'a> {
    pool: &'a AsyncHookPool,
}

impl<'a> DrainTurn<'a> {
    fn enter(pool: &'a AsyncHookPool) -> Self {
        let mut draining = pool.draining.lock().unwrap_or_else(PoisonError::into_inner);
        *draining += 1;
        pool.tracker.close();
        Self { pool }
    }
}

impl Drop for DrainTurn<'_> {
    fn drop(&mut self) {
        let mut draining = self
            .pool
            .draining
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *draining -= 1;
        if *draining == 0 {
            self.pool.tracker.reopen();
        }
    }
}

impl Default for AsyncHookPool {
    fn default() -> Self {
        Self::new(64)
    }
}

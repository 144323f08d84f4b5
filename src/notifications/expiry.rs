//! Timed dismissal of queued notifications
//!
//! Each scheduled expiry is a spawned task keyed by notification id. A
//! manual dismissal aborts the task, and a timer that fires for an id that
//! is already gone leaves the queue untouched.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::AbortHandle;
use tracing::{debug, info};

use super::center::NotificationCenter;
use super::models::{NotificationId, Toast};

struct Timer {
    generation: u64,
    handle: AbortHandle,
}

#[derive(Default)]
struct TimerRegistry {
    next_generation: u64,
    timers: HashMap<NotificationId, Timer>,
}

impl TimerRegistry {
    /// Remove the timer for `id` only if it is still the one from `generation`
    fn deregister(&mut self, id: NotificationId, generation: u64) -> bool {
        match self.timers.get(&id) {
            Some(timer) if timer.generation == generation => {
                self.timers.remove(&id);
                true
            }
            _ => false,
        }
    }
}

/// Schedules `dismiss(id)` calls on a [`NotificationCenter`].
///
/// Must be used from within a Tokio runtime.
pub struct ExpiryScheduler<P = Toast> {
    center: NotificationCenter<P>,
    registry: Arc<Mutex<TimerRegistry>>,
}

impl<P> ExpiryScheduler<P>
where
    P: Clone + Send + Sync + 'static,
{
    pub fn new(center: NotificationCenter<P>) -> Self {
        Self {
            center,
            registry: Arc::new(Mutex::new(TimerRegistry::default())),
        }
    }

    fn registry(&self) -> MutexGuard<'_, TimerRegistry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The center this scheduler dismisses from
    pub fn center(&self) -> &NotificationCenter<P> {
        &self.center
    }

    /// Enqueue with the center's default time-to-live and schedule expiry
    pub async fn enqueue(&self, payload: P) -> NotificationId {
        let duration_ms = self.center.default_duration_ms();
        self.enqueue_with_duration(payload, duration_ms).await
    }

    /// Enqueue and schedule expiry after `duration_ms`
    pub async fn enqueue_with_duration(&self, payload: P, duration_ms: u64) -> NotificationId {
        let id = self.center.enqueue_with_duration(payload, duration_ms).await;
        self.schedule(id, Duration::from_millis(duration_ms));
        id
    }

    /// Dismiss `id` after `after`, replacing any timer already set for it
    pub fn schedule(&self, id: NotificationId, after: Duration) {
        let mut registry = self.registry();
        let generation = registry.next_generation;
        registry.next_generation += 1;

        let center = self.center.clone();
        let shared = Arc::clone(&self.registry);
        // The registry lock is held until the handle is stored, so the task
        // cannot deregister before it has been registered.
        let task = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            let current = shared
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .deregister(id, generation);
            // A replaced timer may still wake once before its abort lands
            if !current {
                return;
            }
            if center.dismiss(id).await {
                info!(%id, "Notification expired");
            }
        });

        let timer = Timer {
            generation,
            handle: task.abort_handle(),
        };
        if let Some(previous) = registry.timers.insert(id, timer) {
            previous.handle.abort();
        }
    }

    /// Cancel the pending timer for `id`, returning whether one existed
    pub fn cancel(&self, id: NotificationId) -> bool {
        let timer = self.registry().timers.remove(&id);
        match timer {
            Some(timer) => {
                timer.handle.abort();
                debug!(%id, "Expiry timer cancelled");
                true
            }
            None => false,
        }
    }

    /// Dismiss now (user action) and cancel the pending timer
    pub async fn dismiss(&self, id: NotificationId) -> bool {
        self.cancel(id);
        self.center.dismiss(id).await
    }

    /// Number of timers still waiting to fire
    pub fn pending(&self) -> usize {
        self.registry().timers.len()
    }

    /// Abort every pending timer (shell teardown)
    pub fn shutdown(&self) {
        let mut registry = self.registry();
        let count = registry.timers.len();
        for (_, timer) in registry.timers.drain() {
            timer.handle.abort();
        }
        if count > 0 {
            debug!(count, "Aborted pending expiry timers");
        }
    }
}

impl<P> Clone for ExpiryScheduler<P> {
    fn clone(&self) -> Self {
        Self {
            center: self.center.clone(),
            registry: Arc::clone(&self.registry),
        }
    }
}

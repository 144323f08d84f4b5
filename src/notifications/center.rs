//! The notification queue shared by the application shell

use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tracing::debug;

use super::models::{Notification, NotificationId, SlotLayout, Toast, ToastSlot};
use super::DEFAULT_DURATION_MS;

struct CenterState<P> {
    entries: Vec<Notification<P>>,
    last_id: Option<NotificationId>,
}

/// Ordered queue of transient notifications, most recent last.
///
/// Cloning yields another handle to the same queue; pass it explicitly to
/// whatever needs to raise or dismiss toasts. The center does not own
/// timers: see [`ExpiryScheduler`](super::ExpiryScheduler).
pub struct NotificationCenter<P = Toast> {
    state: Arc<RwLock<CenterState<P>>>,
    updates: Arc<watch::Sender<Vec<Notification<P>>>>,
    default_duration_ms: u64,
}

impl<P> NotificationCenter<P>
where
    P: Clone + Send + Sync + 'static,
{
    /// Create an empty center with the default 5s time-to-live
    pub fn new() -> Self {
        Self::with_default_duration(DEFAULT_DURATION_MS)
    }

    /// Create an empty center with a custom default time-to-live
    pub fn with_default_duration(default_duration_ms: u64) -> Self {
        let (updates, _) = watch::channel(Vec::new());
        Self {
            state: Arc::new(RwLock::new(CenterState {
                entries: Vec::new(),
                last_id: None,
            })),
            updates: Arc::new(updates),
            default_duration_ms,
        }
    }

    pub fn default_duration_ms(&self) -> u64 {
        self.default_duration_ms
    }

    /// Append a notification with the default time-to-live
    pub async fn enqueue(&self, payload: P) -> NotificationId {
        self.enqueue_with_duration(payload, self.default_duration_ms)
            .await
    }

    /// Append a notification and return its id
    pub async fn enqueue_with_duration(&self, payload: P, duration_ms: u64) -> NotificationId {
        let now = chrono::Utc::now();
        let now_ms = u64::try_from(now.timestamp_millis()).unwrap_or(0);

        let mut state = self.state.write().await;
        let id = NotificationId::next(state.last_id, now_ms);
        state.last_id = Some(id);
        state.entries.push(Notification {
            id,
            payload,
            duration_ms,
            created_at: now,
        });
        self.updates.send_replace(state.entries.clone());

        debug!(%id, duration_ms, queued = state.entries.len(), "Notification enqueued");
        id
    }

    /// Remove the notification with `id`. Returns whether anything was removed;
    /// dismissing an absent id changes nothing.
    pub async fn dismiss(&self, id: NotificationId) -> bool {
        let mut state = self.state.write().await;
        let Some(pos) = state.entries.iter().position(|n| n.id == id) else {
            return false;
        };
        state.entries.remove(pos);
        self.updates.send_replace(state.entries.clone());

        debug!(%id, queued = state.entries.len(), "Notification dismissed");
        true
    }

    /// Drop every queued notification (shell teardown). Returns how many were removed.
    pub async fn clear(&self) -> usize {
        let mut state = self.state.write().await;
        let removed = state.entries.len();
        state.entries.clear();
        self.updates.send_replace(Vec::new());
        removed
    }

    /// Current queue contents in display order
    pub async fn snapshot(&self) -> Vec<Notification<P>> {
        self.state.read().await.entries.clone()
    }

    /// Look up a queued notification
    pub async fn get(&self, id: NotificationId) -> Option<Notification<P>> {
        self.state
            .read()
            .await
            .entries
            .iter()
            .find(|n| n.id == id)
            .cloned()
    }

    pub async fn contains(&self, id: NotificationId) -> bool {
        self.state.read().await.entries.iter().any(|n| n.id == id)
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Slot positions for the current queue. Offsets derive from the index,
    /// so removing an entry compacts the ones after it.
    pub async fn layout(&self, layout: &SlotLayout) -> Vec<ToastSlot> {
        let state = self.state.read().await;
        layout.arrange(state.entries.iter().map(|n| n.id))
    }

    /// Watch the queue; the receiver always holds the latest snapshot
    pub fn subscribe(&self) -> watch::Receiver<Vec<Notification<P>>> {
        self.updates.subscribe()
    }
}

impl<P> Default for NotificationCenter<P>
where
    P: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Clone for NotificationCenter<P> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            updates: Arc::clone(&self.updates),
            default_duration_ms: self.default_duration_ms,
        }
    }
}

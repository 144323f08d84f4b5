//! Notification models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::config::NotificationConfig;

/// Identifier of a queued notification.
///
/// Derived from the creation time in milliseconds, bumped past the previous
/// id when the clock has not advanced, so ids increase strictly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(u64);

impl NotificationId {
    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// Next id after `last`, preferring the current timestamp
    pub(crate) fn next(last: Option<NotificationId>, now_ms: u64) -> Self {
        match last {
            Some(NotificationId(prev)) if now_ms <= prev => NotificationId(prev + 1),
            _ => NotificationId(now_ms),
        }
    }
}

impl From<u64> for NotificationId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Toast severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    #[default]
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Success => write!(f, "success"),
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// The default notification payload: a short message with a severity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    #[serde(default)]
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub message: String,
}

impl Toast {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            title: None,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// A queued notification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification<P = Toast> {
    pub id: NotificationId,
    pub payload: P,
    pub duration_ms: u64,
    pub created_at: DateTime<Utc>,
}

impl<P> Notification<P> {
    /// Time-to-live as a `Duration`
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// When the notification is due to be dismissed, `None` if out of range
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let ttl = i64::try_from(self.duration_ms).ok()?;
        self.created_at
            .checked_add_signed(chrono::Duration::try_milliseconds(ttl)?)
    }
}

/// Position of a notification in the rendered stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToastSlot {
    pub id: NotificationId,
    pub index: usize,
    pub offset_px: u32,
}

/// Maps queue indices to stacked slot offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotLayout {
    pub base_px: u32,
    pub spacing_px: u32,
    pub max_visible: Option<usize>,
}

impl SlotLayout {
    pub fn offset(&self, index: usize) -> u32 {
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        self.base_px
            .saturating_add(self.spacing_px.saturating_mul(index))
    }

    /// Lay out ids in queue order; entries beyond `max_visible` get no slot
    pub fn arrange<I>(&self, ids: I) -> Vec<ToastSlot>
    where
        I: IntoIterator<Item = NotificationId>,
    {
        let limit = self.max_visible.unwrap_or(usize::MAX);
        ids.into_iter()
            .take(limit)
            .enumerate()
            .map(|(index, id)| ToastSlot {
                id,
                index,
                offset_px: self.offset(index),
            })
            .collect()
    }
}

impl Default for SlotLayout {
    fn default() -> Self {
        Self::from(&NotificationConfig::default())
    }
}

impl From<&NotificationConfig> for SlotLayout {
    fn from(config: &NotificationConfig) -> Self {
        Self {
            base_px: config.slot_base_px,
            spacing_px: config.slot_spacing_px,
            max_visible: config.max_visible,
        }
    }
}

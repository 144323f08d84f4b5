//! Transient toast notifications
//!
//! - [`NotificationCenter`] holds the ordered queue and exposes enqueue/dismiss
//! - [`ExpiryScheduler`] dismisses entries once their time-to-live elapses
//! - [`SlotLayout`] derives each toast's stacked position from its index
//!
//! Toasts stack in insertion order, most recent last.

pub mod center;
pub mod expiry;
pub mod models;

pub use center::NotificationCenter;
pub use expiry::ExpiryScheduler;
pub use models::{Notification, NotificationId, Severity, SlotLayout, Toast, ToastSlot};

/// Time-to-live applied when the caller does not pick one
pub const DEFAULT_DURATION_MS: u64 = 5000;

//! Salesdesk - session integrity and toast notifications
//!
//! Two independent pieces shared by the dashboard shell:
//! - [`csrf::SessionTokenGuard`] issues, stores and validates the session's CSRF token
//! - [`notifications::NotificationCenter`] queues transient toasts for the view layer

pub mod api;
pub mod cli;
pub mod config;
pub mod csrf;
pub mod error;
pub mod notifications;

pub use config::Config;
pub use csrf::{SessionToken, SessionTokenGuard};
pub use error::Error;
pub use notifications::{NotificationCenter, NotificationId, Toast};

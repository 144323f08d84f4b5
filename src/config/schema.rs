//! Configuration schema definitions

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub csrf: CsrfConfig,

    #[serde(default)]
    pub notifications: NotificationConfig,
}

/// Server configuration for the application shell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Cross-origin callers allowed to read responses and open `/ws`.
    /// Empty means same-origin only.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    4680
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

/// CSRF token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsrfConfig {
    /// Reject unsafe requests without a matching token header
    #[serde(default = "default_csrf_enabled")]
    pub enabled: bool,

    /// Header carrying the token on outgoing requests
    #[serde(default = "default_header_name")]
    pub header_name: String,

    /// Session storage key holding the token
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

fn default_csrf_enabled() -> bool {
    true
}

fn default_header_name() -> String {
    crate::csrf::CSRF_HEADER.to_string()
}

fn default_storage_key() -> String {
    crate::csrf::CSRF_STORAGE_KEY.to_string()
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self {
            enabled: default_csrf_enabled(),
            header_name: default_header_name(),
            storage_key: default_storage_key(),
        }
    }
}

/// Toast notification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_duration_ms")]
    pub default_duration_ms: u64,

    /// Vertical distance between stacked toasts
    #[serde(default = "default_slot_spacing_px")]
    pub slot_spacing_px: u32,

    /// Offset of the first toast from the screen edge
    #[serde(default = "default_slot_base_px")]
    pub slot_base_px: u32,

    /// Maximum number of toasts laid out at once (None = unlimited)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_visible: Option<usize>,
}

fn default_duration_ms() -> u64 {
    crate::notifications::DEFAULT_DURATION_MS
}

fn default_slot_spacing_px() -> u32 {
    72
}

fn default_slot_base_px() -> u32 {
    16
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: default_duration_ms(),
            slot_spacing_px: default_slot_spacing_px(),
            slot_base_px: default_slot_base_px(),
            max_visible: None,
        }
    }
}

impl Config {
    /// Address the application shell binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 4680);
        assert_eq!(config.csrf.header_name, "X-CSRF-Token");
        assert_eq!(config.csrf.storage_key, "csrf_token");
        assert!(config.csrf.enabled);
        assert_eq!(config.notifications.default_duration_ms, 5000);
        assert_eq!(config.notifications.max_visible, None);
        assert_eq!(config.bind_addr(), "127.0.0.1:4680");
        assert!(config.server.cors_origins.is_empty());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [notifications]
            default_duration_ms = 3000
            "#,
        )
        .unwrap();
        assert_eq!(config.notifications.default_duration_ms, 3000);
        assert_eq!(config.notifications.slot_spacing_px, 72);
        assert_eq!(config.csrf.header_name, "X-CSRF-Token");
    }
}

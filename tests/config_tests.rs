//! Configuration loading tests

use salesdesk::config::{load_config_from_path, Config};
use salesdesk::csrf::{MemoryStorage, SessionStorage, SessionTokenGuard};
use salesdesk::notifications::{NotificationCenter, SlotLayout, Toast};
use salesdesk::Error;
use std::fs;
use std::sync::Arc;

#[test]
fn test_load_full_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("salesdesk.toml");
    fs::write(
        &path,
        r#"
        [server]
        host = "0.0.0.0"
        port = 8080

        [csrf]
        header_name = "X-Desk-CSRF"
        storage_key = "desk_csrf"

        [notifications]
        default_duration_ms = 2500
        slot_spacing_px = 60
        slot_base_px = 8
        max_visible = 4
        "#,
    )
    .unwrap();

    let config = load_config_from_path(&path).unwrap();
    assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    assert_eq!(config.csrf.header_name, "X-Desk-CSRF");
    assert!(config.csrf.enabled);
    assert_eq!(config.notifications.max_visible, Some(4));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_config_from_path(&dir.path().join("nope.toml"));
    assert!(matches!(result, Err(Error::ConfigNotFound)));
}

#[test]
fn test_invalid_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("salesdesk.toml");
    fs::write(&path, "[server\nport = ").unwrap();
    assert!(matches!(
        load_config_from_path(&path),
        Err(Error::TomlParse(_))
    ));
}

#[test]
fn test_guard_follows_config() {
    let mut config = Config::default();
    config.csrf.storage_key = "desk_csrf".to_string();
    let storage = Arc::new(MemoryStorage::new());
    let guard = SessionTokenGuard::from_config(&config.csrf, Some(storage.clone())).unwrap();

    let token = guard.get_token().unwrap();
    assert_eq!(
        storage.get_item("desk_csrf").unwrap().as_deref(),
        Some(token.as_str())
    );
}

#[tokio::test]
async fn test_center_follows_config() {
    let mut config = Config::default();
    config.notifications.default_duration_ms = 1234;
    config.notifications.slot_base_px = 0;
    config.notifications.slot_spacing_px = 40;

    let center =
        NotificationCenter::with_default_duration(config.notifications.default_duration_ms);
    center.enqueue(Toast::info("a")).await;
    let id = center.enqueue(Toast::info("b")).await;
    assert_eq!(center.get(id).await.unwrap().duration_ms, 1234);

    let slots = center.layout(&SlotLayout::from(&config.notifications)).await;
    assert_eq!(slots[1].offset_px, 40);
}

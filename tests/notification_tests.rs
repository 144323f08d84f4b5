//! Notification queue tests

use salesdesk::notifications::{
    ExpiryScheduler, NotificationCenter, NotificationId, Severity, SlotLayout, Toast,
};
use std::collections::HashSet;
use std::time::Duration;

fn ids(snapshot: &[salesdesk::notifications::Notification]) -> Vec<NotificationId> {
    snapshot.iter().map(|n| n.id).collect()
}

#[tokio::test]
async fn test_enqueue_n_distinct_in_order() {
    let center = NotificationCenter::new();
    let mut enqueued = Vec::new();
    for i in 0..100 {
        enqueued.push(center.enqueue(Toast::info(format!("lead #{}", i))).await);
    }

    let snapshot = center.snapshot().await;
    assert_eq!(ids(&snapshot), enqueued);
    assert_eq!(enqueued.iter().collect::<HashSet<_>>().len(), 100);
    for (i, notification) in snapshot.iter().enumerate() {
        assert_eq!(notification.payload.message, format!("lead #{}", i));
    }
}

#[tokio::test]
async fn test_dismiss_removes_exactly_one() {
    let center = NotificationCenter::new();
    let mut enqueued = Vec::new();
    for i in 0..5 {
        enqueued.push(center.enqueue(Toast::info(format!("{}", i))).await);
    }

    center.dismiss(enqueued[2]).await;
    enqueued.remove(2);
    assert_eq!(ids(&center.snapshot().await), enqueued);

    center.dismiss(enqueued[0]).await;
    enqueued.remove(0);
    assert_eq!(ids(&center.snapshot().await), enqueued);
}

#[tokio::test]
async fn test_dismiss_unknown_id_is_noop() {
    let center = NotificationCenter::new();
    center.enqueue(Toast::warning("Daily intention not set")).await;
    let before = center.snapshot().await;

    assert!(!center.dismiss(NotificationId::from(42)).await);
    assert_eq!(center.snapshot().await, before);
}

#[tokio::test]
async fn test_lead_created_sync_failed_scenario() {
    let center = NotificationCenter::new();

    let a = center
        .enqueue_with_duration(Toast::success("Lead created"), 3000)
        .await;
    assert_eq!(ids(&center.snapshot().await), vec![a]);

    let b = center
        .enqueue_with_duration(Toast::error("Sync failed"), 5000)
        .await;
    assert_ne!(a, b);
    assert_eq!(ids(&center.snapshot().await), vec![a, b]);

    center.dismiss(a).await;
    assert_eq!(ids(&center.snapshot().await), vec![b]);

    center.dismiss(a).await;
    let snapshot = center.snapshot().await;
    assert_eq!(ids(&snapshot), vec![b]);
    assert_eq!(snapshot[0].duration_ms, 5000);
    assert_eq!(snapshot[0].payload.severity, Severity::Error);
}

#[tokio::test(start_paused = true)]
async fn test_toasts_expire_in_duration_order() {
    let scheduler = ExpiryScheduler::new(NotificationCenter::new());
    let short = scheduler
        .enqueue_with_duration(Toast::success("Wrap submitted"), 1000)
        .await;
    let long = scheduler
        .enqueue_with_duration(Toast::info("Remember tomorrow's intentions"), 4000)
        .await;

    tokio::time::sleep(Duration::from_millis(1500)).await;
    tokio::task::yield_now().await;
    assert_eq!(ids(&scheduler.center().snapshot().await), vec![long]);
    assert!(!scheduler.center().contains(short).await);

    tokio::time::sleep(Duration::from_millis(3000)).await;
    tokio::task::yield_now().await;
    assert!(scheduler.center().is_empty().await);
}

#[tokio::test(start_paused = true)]
async fn test_user_close_before_expiry() {
    let scheduler = ExpiryScheduler::new(NotificationCenter::new());
    let a = scheduler.enqueue(Toast::info("a")).await;
    let b = scheduler.enqueue_with_duration(Toast::info("b"), 60_000).await;

    assert!(scheduler.dismiss(a).await);
    assert!(!scheduler.dismiss(a).await);

    tokio::time::sleep(Duration::from_secs(10)).await;
    tokio::task::yield_now().await;
    assert_eq!(ids(&scheduler.center().snapshot().await), vec![b]);
}

#[tokio::test]
async fn test_layout_derives_from_index() {
    let center = NotificationCenter::new();
    let layout = SlotLayout {
        base_px: 10,
        spacing_px: 50,
        max_visible: Some(3),
    };

    let mut enqueued = Vec::new();
    for i in 0..4 {
        enqueued.push(center.enqueue(Toast::info(format!("{}", i))).await);
    }

    let slots = center.layout(&layout).await;
    assert_eq!(slots.len(), 3);
    assert_eq!(
        slots.iter().map(|s| s.offset_px).collect::<Vec<_>>(),
        vec![10, 60, 110]
    );

    center.dismiss(enqueued[0]).await;
    let slots = center.layout(&layout).await;
    assert_eq!(slots[0].id, enqueued[1]);
    assert_eq!(slots[0].offset_px, 10);
    assert_eq!(slots[2].id, enqueued[3]);
}

#[tokio::test]
async fn test_subscriber_tracks_queue() {
    let center = NotificationCenter::new();
    let mut rx = center.subscribe();

    let a = center.enqueue(Toast::info("a")).await;
    let b = center.enqueue(Toast::info("b")).await;
    center.dismiss(a).await;

    rx.changed().await.unwrap();
    let latest = rx.borrow_and_update().clone();
    assert_eq!(ids(&latest), vec![b]);
}

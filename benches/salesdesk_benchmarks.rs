use criterion::{criterion_group, criterion_main, Criterion};
use salesdesk::csrf::{generate_token, MemoryStorage, SessionTokenGuard};
use salesdesk::notifications::{NotificationCenter, SlotLayout, Toast};
use std::hint::black_box;
use std::sync::Arc;

fn bench_token_generation(c: &mut Criterion) {
    c.bench_function("token_generate", |b| b.iter(generate_token));
}

fn bench_guard(c: &mut Criterion) {
    let guard = SessionTokenGuard::new(Arc::new(MemoryStorage::new()));
    let token = guard.get_token().unwrap();

    c.bench_function("guard_get_token", |b| b.iter(|| guard.get_token()));

    c.bench_function("guard_validate_token", |b| {
        b.iter(|| guard.validate_token(black_box(token.as_str())))
    });

    c.bench_function("guard_attach_headers", |b| {
        b.iter(|| guard.attach_to_request_headers(axum::http::HeaderMap::new()))
    });
}

fn bench_notifications(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();

    c.bench_function("center_enqueue_dismiss", |b| {
        let center = NotificationCenter::new();
        b.iter(|| {
            rt.block_on(async {
                let id = center.enqueue(Toast::info("Lead created")).await;
                center.dismiss(black_box(id)).await
            })
        })
    });

    let center = NotificationCenter::new();
    rt.block_on(async {
        for i in 0..50 {
            center.enqueue(Toast::info(format!("toast {}", i))).await;
        }
    });
    let layout = SlotLayout::default();
    c.bench_function("center_layout_50", |b| {
        b.iter(|| rt.block_on(center.layout(black_box(&layout))))
    });
}

criterion_group!(
    benches,
    bench_token_generation,
    bench_guard,
    bench_notifications
);
criterion_main!(benches);

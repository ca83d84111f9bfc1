//! Teardown triggered from inside an emission

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use serde_json::json;

use crate::{NoopLogger, SignalEmitter, SubscriptionRegistry};

fn shared_registry() -> Arc<SubscriptionRegistry> {
    Arc::new(SubscriptionRegistry::new().with_logger(Arc::new(NoopLogger)))
}

fn hit_counter() -> (Arc<AtomicUsize>, impl Fn(&serde_json::Value) + Send + Sync + 'static) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    (hits, move |_: &serde_json::Value| {
        counter.fetch_add(1, Ordering::SeqCst);
    })
}

#[test]
fn test_registry_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SubscriptionRegistry>();
    assert_send_sync::<SignalEmitter>();
}

#[test]
fn test_disconnect_all_from_inside_callback() {
    let registry = shared_registry();
    let menu = Arc::new(SignalEmitter::new("popup-menu"));

    let weak: Weak<SubscriptionRegistry> = Arc::downgrade(&registry);
    registry
        .connect(&menu, "unmapped", move |_| {
            if let Some(registry) = weak.upgrade() {
                registry.disconnect_all();
            }
        })
        .unwrap();
    let (hits, count) = hit_counter();
    registry.connect(&menu, "unmapped", count).unwrap();

    // Both handlers were snapshotted before the teardown ran
    assert_eq!(menu.emit("unmapped", &json!(null)), 2);
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    assert_eq!(registry.active_count(), 0);
    assert_eq!(registry.len(), 2);
    assert_eq!(menu.unsubscribe_calls(), 2);
    assert_eq!(menu.emit("unmapped", &json!(null)), 0);
}

#[test]
fn test_group_teardown_from_inside_callback_spares_other_sources() {
    let registry = shared_registry();
    let old_client = Arc::new(SignalEmitter::new("old-client"));
    let indicator = Arc::new(SignalEmitter::new("indicator"));

    let weak = Arc::downgrade(&registry);
    let target = Arc::downgrade(&old_client);
    registry
        .connect(&old_client, "removed", move |_| {
            if let (Some(registry), Some(client)) = (weak.upgrade(), target.upgrade()) {
                registry.disconnect_by_source(&client);
            }
        })
        .unwrap();
    registry.connect(&old_client, "changed", |_| {}).unwrap();
    let (hits, count) = hit_counter();
    registry.connect(&indicator, "clicked", count).unwrap();

    old_client.emit("removed", &json!(null));

    assert_eq!(old_client.handler_count(), 0);
    assert_eq!(indicator.handler_count(), 1);
    assert_eq!(registry.active_count(), 1);
    indicator.emit("clicked", &json!(null));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn test_repeated_teardown_inside_dispatch_unsubscribes_once() {
    let registry = shared_registry();
    let button = Arc::new(SignalEmitter::new("button"));

    for _ in 0..3 {
        let weak = Arc::downgrade(&registry);
        registry
            .connect(&button, "clicked", move |_| {
                if let Some(registry) = weak.upgrade() {
                    registry.disconnect_all();
                }
            })
            .unwrap();
    }

    assert_eq!(button.emit("clicked", &json!(null)), 3);
    assert_eq!(button.unsubscribe_calls(), 3);
    assert_eq!(registry.stats().disconnected, 3);
}

#[test]
fn test_create_from_inside_callback() {
    let registry = shared_registry();
    let settings = Arc::new(SignalEmitter::new("settings"));

    let weak = Arc::downgrade(&registry);
    let source = Arc::downgrade(&settings);
    registry
        .connect(&settings, "ready", move |_| {
            if let (Some(registry), Some(settings)) = (weak.upgrade(), source.upgrade()) {
                registry.connect(&settings, "changed", |_| {}).unwrap();
            }
        })
        .unwrap();

    settings.emit("ready", &json!({ "schema": "wifi-qrcode" }));

    assert_eq!(registry.len(), 2);
    assert_eq!(settings.handler_count_for("changed"), 1);
    assert_eq!(registry.disconnect_by_source(&settings), 2);
    assert_eq!(settings.handler_count(), 0);
}

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::fakes::FakeService;
use super::{Harness, settle, wait_until};
use crate::error::OverlayError;
use crate::resources::{StringResources, TranslatedResources};

fn strings() -> HashMap<String, String> {
    [
        ("settings_title", "Settings"),
        ("save_button", "Save"),
        ("version", "2024"),
    ]
    .into_iter()
    .map(|(id, text)| (id.to_string(), text.to_string()))
    .collect()
}

fn service() -> FakeService {
    FakeService::new()
        .translation("Settings", "Ustawienia")
        .translation("Save", "Zapisz")
}

#[tokio::test]
async fn prefetch_fills_the_cache_once_ready() {
    let harness = Harness::new(service());
    harness
        .translator
        .initialize(Harness::options("pl").prefetch(Arc::new(strings())))
        .unwrap();

    wait_until(|| harness.translator.cache().len() == 2).await;
    assert_eq!(
        harness.translator.cache().get("Settings").as_deref(),
        Some("Ustawienia")
    );
    // Numeric strings are skipped
    assert!(!harness.service.requested().contains(&"2024".to_string()));
}

#[tokio::test]
async fn prefetch_before_ready_is_rejected() {
    let harness = Harness::new(service());

    let result = harness.translator.prefetch(Arc::new(strings()));
    assert!(matches!(result, Err(OverlayError::ModelNotReady)));
}

#[tokio::test]
async fn cancelled_prefetch_stops_fetching() {
    let harness = Harness::new(service().delayed(Duration::from_millis(100)));
    harness.ready().await;

    harness.translator.prefetch(Arc::new(strings())).unwrap();
    wait_until(|| harness.service.calls() == 1).await;
    harness.translator.cancel_prefetch();
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(harness.service.calls(), 1);
    assert!(harness.translator.cache().is_empty());
}

#[tokio::test]
async fn prefetch_cancelled_before_start_fetches_nothing() {
    let harness = Harness::new(service());
    harness.ready().await;

    harness.translator.prefetch(Arc::new(strings())).unwrap();
    harness.translator.cancel_prefetch();
    settle().await;

    assert_eq!(harness.service.calls(), 0);
    assert!(harness.translator.cache().is_empty());
}

#[tokio::test]
async fn new_prefetch_replaces_the_running_one() {
    let harness = Harness::new(
        service()
            .translation("Search", "Szukaj")
            .translation("Account", "Konto"),
    );
    harness.ready().await;

    harness.translator.prefetch(Arc::new(strings())).unwrap();
    let other: HashMap<String, String> = [("search", "Search"), ("account", "Account")]
        .into_iter()
        .map(|(id, text)| (id.to_string(), text.to_string()))
        .collect();
    harness.translator.prefetch(Arc::new(other)).unwrap();

    wait_until(|| harness.translator.cache().len() == 2).await;
    settle().await;

    let mut requested = harness.service.requested();
    requested.sort();
    assert_eq!(requested, ["Account", "Search"]);
    assert_eq!(harness.translator.cache().get("Settings"), None);
}

#[tokio::test]
async fn resources_read_through_the_cache_while_enabled() {
    let harness = Harness::new(service());
    harness.ready().await;
    harness.translator.prefetch(Arc::new(strings())).unwrap();
    wait_until(|| harness.translator.cache().len() == 2).await;

    let resources = TranslatedResources::wrap(strings(), harness.translator.clone());
    assert_eq!(resources.string("save_button").as_deref(), Some("Save"));

    harness.translator.set_enabled(true).unwrap();
    assert_eq!(resources.string("save_button").as_deref(), Some("Zapisz"));
    assert_eq!(resources.string("version").as_deref(), Some("2024"));
    assert_eq!(resources.string("missing"), None);
    assert_eq!(resources.ids().len(), 3);

    assert_eq!(harness.translator.translate_text("Unknown"), "Unknown");
    settle().await;
}

use std::sync::Arc;

use tokio::sync::Notify;

use super::fakes::FakeService;
use super::{Harness, locales, record_states, settle, wait_until};
use crate::error::OverlayError;
use crate::state::AvailabilityState;
use crate::translator::InitOptions;

#[tokio::test]
async fn supported_locale_is_not_required() {
    let harness = Harness::new(FakeService::new());
    let (listener, seen) = record_states();
    harness.translator.add_state_listener(&listener);

    let state = harness
        .translator
        .initialize(InitOptions::new(locales(&["en", "pl"], "pl")))
        .unwrap();

    assert_eq!(state, AvailabilityState::NotRequired);
    assert_eq!(
        *seen.lock().unwrap(),
        vec![AvailabilityState::Initialising, AvailabilityState::NotRequired]
    );
    assert!(!harness.translator.is_translation_required());
    assert!(harness.translator.is_translation_available());
}

#[tokio::test]
async fn unmapped_locale_is_not_supported() {
    let harness = Harness::new(FakeService::new());
    let (listener, seen) = record_states();
    harness.translator.add_state_listener(&listener);

    harness.translator.initialize(Harness::options("fr")).unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            AvailabilityState::Initialising,
            AvailabilityState::LocaleNotSupported
        ]
    );
    assert!(harness.translator.is_translation_required());
    assert!(!harness.translator.is_translation_available());
}

#[tokio::test]
async fn model_download_reaches_downloaded() {
    let harness = Harness::new(FakeService::new());
    let (listener, seen) = record_states();
    harness.translator.add_state_listener(&listener);

    let state = harness.translator.initialize(Harness::options("de")).unwrap();
    assert_eq!(state, AvailabilityState::ModelDownloading);

    wait_until(|| harness.translator.state() == AvailabilityState::ModelDownloaded).await;
    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            AvailabilityState::Initialising,
            AvailabilityState::ModelDownloading,
            AvailabilityState::ModelDownloaded,
        ]
    );
}

#[tokio::test]
async fn failed_download_reports_error_and_cleans_up() {
    let harness = Harness::new(FakeService::new().failing_download());
    let (listener, seen) = record_states();
    harness.translator.add_state_listener(&listener);

    harness.translator.initialize(Harness::options("de")).unwrap();
    wait_until(|| matches!(
        harness.translator.state(),
        AvailabilityState::ModelDownloadError(_)
    ))
    .await;

    let states = seen.lock().unwrap().clone();
    assert_eq!(states.len(), 3);
    assert_eq!(states[1], AvailabilityState::ModelDownloading);
    assert!(states[2].is_terminal());

    wait_until(|| harness.service.deleted().len() == 2).await;
}

#[tokio::test]
async fn late_listener_gets_current_state() {
    let harness = Harness::new(FakeService::new());
    harness.ready().await;

    let (listener, seen) = record_states();
    harness.translator.add_state_listener(&listener);

    assert_eq!(
        *seen.lock().unwrap(),
        vec![AvailabilityState::ModelDownloaded]
    );
}

#[tokio::test]
async fn dropped_listener_is_not_called() {
    let gate = Arc::new(Notify::new());
    let harness = Harness::new(FakeService::new().gated(gate.clone()));
    let (listener, seen) = record_states();
    harness.translator.add_state_listener(&listener);

    harness.translator.initialize(Harness::options("pl")).unwrap();
    drop(listener);
    gate.notify_one();

    wait_until(|| harness.translator.state() == AvailabilityState::ModelDownloaded).await;
    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            AvailabilityState::Initialising,
            AvailabilityState::ModelDownloading
        ]
    );
}

#[tokio::test]
async fn second_initialize_is_rejected() {
    let harness = Harness::new(FakeService::new());
    harness.ready().await;

    let again = harness.translator.initialize(Harness::options("de"));
    assert!(matches!(again, Err(OverlayError::AlreadyInitialized)));
    assert_eq!(harness.translator.state(), AvailabilityState::ModelDownloaded);
}

#[test]
fn initialize_needs_a_runtime() {
    let harness = Harness::new(FakeService::new());

    let result = harness.translator.initialize(Harness::options("pl"));
    assert!(matches!(result, Err(OverlayError::NoRuntime)));
    assert_eq!(harness.translator.state(), AvailabilityState::Initialising);
}

#[tokio::test]
async fn fetch_translation_waits_for_the_model() {
    let gate = Arc::new(Notify::new());
    let harness = Harness::new(FakeService::new().translation("Save", "Zapisz").gated(gate.clone()));
    harness.translator.initialize(Harness::options("pl")).unwrap();

    let early = harness.translator.fetch_translation("Save").await;
    assert!(matches!(early, Err(OverlayError::ModelNotReady)));

    gate.notify_one();
    wait_until(|| harness.translator.state().is_ready()).await;

    let text = harness.translator.fetch_translation("Save").await.unwrap();
    assert_eq!(text, "Zapisz");
    // One-off lookups bypass the cache
    assert!(harness.translator.cache().is_empty());

    let missing = harness.translator.fetch_translation("Unknown").await;
    assert!(matches!(missing, Err(OverlayError::Service(_))));
    settle().await;
}

use std::sync::{Arc, Mutex};
use std::time::Duration;

use glossa_config::Config;
use glossa_types::Locale;

use crate::animation::Animator;
use crate::element::{ElementHandle, ElementTable};
use crate::prefs::MemoryPreferences;
use crate::state::{AvailabilityState, Locales};
use crate::translator::{Collaborators, InitOptions, Translator};
use crate::widgets::{DefaultAccessorFactory, Widget};

mod availability;
mod fakes;
mod resources;

use fakes::FakeService;

pub struct Harness {
    pub translator: Translator<Widget>,
    pub elements: Arc<ElementTable<Widget>>,
    pub service: Arc<FakeService>,
}

impl Harness {
    pub fn new(service: FakeService) -> Self {
        Self::build(service, None)
    }

    pub fn animated(service: FakeService, animator: Arc<dyn Animator>) -> Self {
        Self::build(service, Some(animator))
    }

    fn build(service: FakeService, animator: Option<Arc<dyn Animator>>) -> Self {
        let mut config = Config::default();
        config.overlay.debounce_ms = 5;
        config.overlay.animation_enabled = animator.is_some();

        let elements = Arc::new(ElementTable::new());
        let service = Arc::new(service);
        let mut collaborators = Collaborators::new(
            elements.clone(),
            service.clone(),
            Arc::new(MemoryPreferences::new()),
        );
        if let Some(animator) = animator {
            collaborators = collaborators.with_animator(animator);
        }

        Self {
            translator: Translator::new(&config, collaborators),
            elements,
            service,
        }
    }

    /// English application shipping only English
    pub fn options(active: &str) -> InitOptions<Widget> {
        InitOptions::new(locales(&["en"], active)).factory(Arc::new(DefaultAccessorFactory::new()))
    }

    /// Initialize for Polish and wait for the model
    pub async fn ready(&self) {
        self.translator.initialize(Self::options("pl")).unwrap();
        wait_until(|| self.translator.state() == AvailabilityState::ModelDownloaded).await;
    }

    pub fn texts(&self, handle: ElementHandle) -> Vec<String> {
        self.elements
            .with(handle, |widget| {
                widget.texts().into_iter().map(String::from).collect()
            })
            .unwrap_or_default()
    }
}

pub fn locales(supported: &[&str], active: &str) -> Locales {
    Locales {
        default: Locale::new("en"),
        supported: supported.iter().map(|l| Locale::new(*l)).collect(),
        active: Locale::new(active),
    }
}

/// Collects every state a listener is told about
pub fn record_states() -> (
    Arc<impl Fn(&AvailabilityState) + Send + Sync + 'static>,
    Arc<Mutex<Vec<AvailabilityState>>>,
) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let listener = {
        let seen = seen.clone();
        Arc::new(move |state: &AvailabilityState| seen.lock().unwrap().push(state.clone()))
    };
    (listener, seen)
}

/// Poll `condition` for up to two seconds
pub async fn wait_until(condition: impl Fn() -> bool) {
    let waited = tokio::time::timeout(Duration::from_secs(2), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;

    assert!(waited.is_ok(), "Timeout - condition never became true");
}

/// Give the queue time to run anything still pending
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(60)).await;
}

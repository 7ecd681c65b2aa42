use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use glossa_service::{
    LanguagePair, ProviderMetadata, TranslateError, Translation, TranslationModel,
    TranslationService,
};
use tokio::sync::Notify;

use crate::accessor::{AccessorFactory, TextAccessor};
use crate::animation::Animator;
use crate::element::ElementHandle;
use crate::widgets::{DefaultAccessorFactory, Widget};

/// Scripted service: knows en, pl and de, translates only what it was told
pub struct FakeService {
    translations: HashMap<String, String>,
    failing: HashSet<String>,
    download_fails: bool,
    download_gate: Option<Arc<Notify>>,
    delay: Duration,
    requested: Mutex<Vec<String>>,
    deleted: Mutex<Vec<TranslationModel>>,
    calls: AtomicUsize,
}

impl FakeService {
    pub fn new() -> Self {
        Self {
            translations: HashMap::new(),
            failing: HashSet::new(),
            download_fails: false,
            download_gate: None,
            delay: Duration::ZERO,
            requested: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn translation(mut self, source: &str, translation: &str) -> Self {
        self.translations
            .insert(source.to_string(), translation.to_string());
        self
    }

    pub fn failing(mut self, source: &str) -> Self {
        self.failing.insert(source.to_string());
        self
    }

    pub fn failing_download(mut self) -> Self {
        self.download_fails = true;
        self
    }

    /// Model download waits until `gate` is notified
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.download_gate = Some(gate);
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<TranslationModel> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranslationService for FakeService {
    fn language_for_code(&self, code: &str) -> Option<String> {
        match code {
            "en" | "pl" | "de" => Some(code.to_uppercase()),
            _ => None,
        }
    }

    async fn download_model(&self, pair: &LanguagePair) -> Result<(), TranslateError> {
        if let Some(gate) = &self.download_gate {
            gate.notified().await;
        }
        if self.download_fails {
            return Err(TranslateError::ModelNotDownloaded(pair.to.clone()));
        }
        Ok(())
    }

    async fn translate(
        &self,
        text: &str,
        pair: &LanguagePair,
    ) -> Result<Translation, TranslateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(text.to_string());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.failing.contains(text) {
            return Err(TranslateError::RateLimitExceeded);
        }

        let translated = self
            .translations
            .get(text)
            .ok_or_else(|| TranslateError::ApiError(format!("no entry for {text}")))?;
        Ok(Translation {
            text: translated.clone(),
            from: pair.from.clone(),
            to: pair.to.clone(),
            provider: "fake".to_string(),
        })
    }

    async fn downloaded_models(&self) -> Result<Vec<TranslationModel>, TranslateError> {
        Ok(vec![
            TranslationModel {
                language: "EN".to_string(),
            },
            TranslationModel {
                language: "DE".to_string(),
            },
        ])
    }

    async fn delete_model(&self, model: &TranslationModel) -> Result<(), TranslateError> {
        self.deleted.lock().unwrap().push(model.clone());
        Ok(())
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "fake".to_string(),
            requires_api_key: false,
            offline: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fade {
    Out(ElementHandle),
    In(ElementHandle),
}

#[derive(Default)]
pub struct RecordingAnimator {
    fades: Mutex<Vec<Fade>>,
}

impl RecordingAnimator {
    pub fn fades(&self) -> Vec<Fade> {
        self.fades.lock().unwrap().clone()
    }
}

#[async_trait]
impl Animator for RecordingAnimator {
    async fn fade_out(&self, element: ElementHandle, _duration: Duration) {
        self.fades.lock().unwrap().push(Fade::Out(element));
    }

    async fn fade_in(&self, element: ElementHandle, _duration: Duration) {
        self.fades.lock().unwrap().push(Fade::In(element));
    }
}

/// Default widget accessors, counting every lookup
#[derive(Default)]
pub struct CountingFactory {
    inner: DefaultAccessorFactory,
    lookups: AtomicUsize,
}

impl CountingFactory {
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl AccessorFactory<Widget> for CountingFactory {
    fn accessor_for(&self, element: &Widget) -> Option<Arc<dyn TextAccessor<Widget>>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.accessor_for(element)
    }
}

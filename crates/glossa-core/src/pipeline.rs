use std::sync::Arc;

use glossa_service::{LanguagePair, TranslationService};
use glossa_types::TextSlots;

use crate::cache::{TranslationCache, is_same_translation};

/// Resolves text slots through the cache, falling back to the service.
#[derive(Clone)]
pub struct FetchPipeline {
    service: Arc<dyn TranslationService>,
    cache: Arc<TranslationCache>,
    pair: LanguagePair,
}

impl FetchPipeline {
    pub fn new(
        service: Arc<dyn TranslationService>,
        cache: Arc<TranslationCache>,
        pair: LanguagePair,
    ) -> Self {
        Self {
            service,
            cache,
            pair,
        }
    }

    pub fn pair(&self) -> &LanguagePair {
        &self.pair
    }

    /// Resolve every `Some` slot, left to right, one service call at a time.
    /// Slots that cannot be translated keep their original text.
    pub async fn resolve(&self, texts: TextSlots) -> TextSlots {
        let original = texts.clone();
        self.resolve_while(texts, || true).await.unwrap_or(original)
    }

    /// Like [`resolve`](Self::resolve), but gives up with `None` as soon as
    /// `alive` reports the owner of the texts is gone.
    pub async fn resolve_while(
        &self,
        texts: TextSlots,
        alive: impl Fn() -> bool,
    ) -> Option<TextSlots> {
        let mut resolved = texts.clone();

        for (index, text) in texts.iter().enumerate() {
            let Some(source) = text else {
                continue;
            };
            if !alive() {
                return None;
            }
            if let Some(translation) = self.resolve_one(source).await {
                resolved[index] = Some(translation);
            }
        }

        Some(resolved)
    }

    /// Translation to display for `source`, or `None` to keep the original.
    /// New translations are stored in the cache.
    pub async fn resolve_one(&self, source: &str) -> Option<String> {
        if let Some(cached) = self.cache.get(source) {
            return Some(cached);
        }

        match self.service.translate(source, &self.pair).await {
            Ok(translation) if is_same_translation(source, &translation.text) => {
                tracing::trace!("Translation of {source:?} matches the original");
                None
            }
            Ok(translation) => {
                tracing::trace!("Got translation: {source:?}={:?}", translation.text);
                Some(self.cache.insert(source.to_string(), translation.text))
            }
            Err(e) => {
                tracing::warn!("Failed to translate {source:?}: {e}");
                None
            }
        }
    }
}

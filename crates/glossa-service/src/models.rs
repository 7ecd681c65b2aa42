use std::sync::{PoisonError, RwLock};

use crate::{LanguagePair, TranslationModel};

/// Bookkeeping of acquired language models, shared by backends that
/// have no on-device model files of their own.
#[derive(Default)]
pub struct ModelStore {
    models: RwLock<Vec<TranslationModel>>,
}

impl ModelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record both sides of `pair` as available
    pub fn acquire(&self, pair: &LanguagePair) {
        let mut models = self.models.write().unwrap_or_else(PoisonError::into_inner);
        for language in [&pair.from, &pair.to] {
            if !models.iter().any(|m| &m.language == language) {
                models.push(TranslationModel {
                    language: language.clone(),
                });
            }
        }
    }

    pub fn contains(&self, pair: &LanguagePair) -> bool {
        let models = self.models.read().unwrap_or_else(PoisonError::into_inner);
        [&pair.from, &pair.to]
            .into_iter()
            .all(|language| models.iter().any(|m| &m.language == language))
    }

    pub fn list(&self) -> Vec<TranslationModel> {
        self.models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns false when the model was not held
    pub fn remove(&self, model: &TranslationModel) -> bool {
        let mut models = self.models.write().unwrap_or_else(PoisonError::into_inner);
        let before = models.len();
        models.retain(|m| m != model);
        models.len() != before
    }
}

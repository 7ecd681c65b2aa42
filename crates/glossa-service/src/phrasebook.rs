use std::collections::HashMap;

use async_trait::async_trait;
use glossa_types::LanguageCode;
use serde::Deserialize;

use crate::language::service_code;
use crate::models::ModelStore;
use crate::{
    LanguagePair, ProviderMetadata, TranslateError, Translation, TranslationModel,
    TranslationService,
};

const BUILTIN: &str = include_str!("../data/phrasebook.json");

#[derive(Deserialize)]
struct Phrasebook {
    source: String,
    /// target language -> source text -> translation
    targets: HashMap<String, HashMap<String, String>>,
}

/// Offline backend answering from a fixed phrasebook
pub struct PhrasebookService {
    book: Phrasebook,
    models: ModelStore,
}

impl PhrasebookService {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut book: Phrasebook = serde_json::from_str(json)?;
        book.source = book.source.to_lowercase();
        book.targets = book
            .targets
            .into_iter()
            .map(|(language, entries)| (language.to_lowercase(), entries))
            .collect();

        Ok(Self {
            book,
            models: ModelStore::new(),
        })
    }

    /// Small English phrasebook shipped with the crate
    pub fn builtin() -> serde_json::Result<Self> {
        Self::from_json(BUILTIN)
    }

    fn knows(&self, code: &str) -> bool {
        let code = code.to_lowercase();
        code == self.book.source || self.book.targets.contains_key(&code)
    }
}

#[async_trait]
impl TranslationService for PhrasebookService {
    fn language_for_code(&self, code: &str) -> Option<LanguageCode> {
        self.knows(code).then(|| service_code(code))
    }

    async fn download_model(&self, pair: &LanguagePair) -> Result<(), TranslateError> {
        if !self.knows(&pair.from) || !self.knows(&pair.to) {
            return Err(TranslateError::UnsupportedLanguagePair {
                from: pair.from.clone(),
                to: pair.to.clone(),
            });
        }

        self.models.acquire(pair);
        Ok(())
    }

    async fn translate(
        &self,
        text: &str,
        pair: &LanguagePair,
    ) -> Result<Translation, TranslateError> {
        if !self.models.contains(pair) {
            return Err(TranslateError::ModelNotDownloaded(pair.to_string()));
        }

        if pair.from.to_lowercase() != self.book.source {
            return Err(TranslateError::UnsupportedLanguagePair {
                from: pair.from.clone(),
                to: pair.to.clone(),
            });
        }

        let translated = self
            .book
            .targets
            .get(&pair.to.to_lowercase())
            .and_then(|entries| entries.get(text))
            .ok_or_else(|| TranslateError::ApiError(format!("no phrasebook entry for {text:?}")))?;

        Ok(Translation {
            text: translated.clone(),
            from: pair.from.clone(),
            to: pair.to.clone(),
            provider: "phrasebook".to_string(),
        })
    }

    async fn downloaded_models(&self) -> Result<Vec<TranslationModel>, TranslateError> {
        Ok(self.models.list())
    }

    async fn delete_model(&self, model: &TranslationModel) -> Result<(), TranslateError> {
        if self.models.remove(model) {
            Ok(())
        } else {
            Err(TranslateError::ModelNotDownloaded(model.language.clone()))
        }
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "Phrasebook".to_string(),
            requires_api_key: false,
            offline: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_maps_shipped_languages() {
        let service = PhrasebookService::builtin().unwrap();

        assert_eq!(service.language_for_code("en").as_deref(), Some("EN"));
        assert_eq!(service.language_for_code("PL").as_deref(), Some("PL"));
        assert_eq!(service.language_for_code("fr"), None);
    }

    #[tokio::test]
    async fn translates_after_download() {
        let service = PhrasebookService::builtin().unwrap();
        let pair = LanguagePair::new("EN", "PL");

        assert!(matches!(
            service.translate("Settings", &pair).await,
            Err(TranslateError::ModelNotDownloaded(_))
        ));

        service.download_model(&pair).await.unwrap();
        let translation = service.translate("Settings", &pair).await.unwrap();
        assert_eq!(translation.text, "Ustawienia");
        assert_eq!(translation.provider, "phrasebook");

        assert!(service.translate("Unknown phrase", &pair).await.is_err());
    }

    #[tokio::test]
    async fn delete_forgets_model() {
        let service = PhrasebookService::builtin().unwrap();
        let pair = LanguagePair::new("EN", "DE");
        service.download_model(&pair).await.unwrap();

        for model in service.downloaded_models().await.unwrap() {
            service.delete_model(&model).await.unwrap();
        }

        assert!(service.downloaded_models().await.unwrap().is_empty());
        assert!(
            service
                .delete_model(&TranslationModel {
                    language: "DE".into()
                })
                .await
                .is_err()
        );
    }
}

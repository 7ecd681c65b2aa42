use std::time::Duration;

use async_trait::async_trait;
use glossa_types::LanguageCode;

use crate::language::deepl_language;
use crate::models::ModelStore;
use crate::{
    LanguagePair, ProviderMetadata, TranslateError, Translation, TranslationModel,
    TranslationService,
};

/// DeepL REST backend.
///
/// DeepL translates server side, so "downloading" a model validates the pair
/// and the credentials once and records the pair as usable.
pub struct DeepLService {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
    models: ModelStore,
}

impl DeepLService {
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> Result<Self, TranslateError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key,
            api_url,
            models: ModelStore::new(),
        })
    }

    async fn request(&self, text: &str, pair: &LanguagePair) -> Result<String, TranslateError> {
        if self.api_key.is_empty() {
            return Err(TranslateError::AuthenticationError);
        }

        let params = [
            ("text", text),
            ("source_lang", pair.from.as_str()),
            ("target_lang", pair.to.as_str()),
        ];

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
            .form(&params)
            .send()
            .await?;

        if response.status() == 429 {
            return Err(TranslateError::RateLimitExceeded);
        }

        if response.status() == 403 {
            return Err(TranslateError::AuthenticationError);
        }

        if !response.status().is_success() {
            return Err(TranslateError::ApiError(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let json: serde_json::Value = response.json().await.map_err(|e| {
            TranslateError::ApiError(format!("Failed to parse response: {}", e))
        })?;

        json["translations"]
            .get(0)
            .and_then(|t| t["text"].as_str())
            .map(String::from)
            .ok_or_else(|| TranslateError::ApiError("No translation in response".to_string()))
    }
}

#[async_trait]
impl TranslationService for DeepLService {
    fn language_for_code(&self, code: &str) -> Option<LanguageCode> {
        deepl_language(code)
    }

    async fn download_model(&self, pair: &LanguagePair) -> Result<(), TranslateError> {
        if deepl_language(&pair.from).is_none() || deepl_language(&pair.to).is_none() {
            return Err(TranslateError::UnsupportedLanguagePair {
                from: pair.from.clone(),
                to: pair.to.clone(),
            });
        }

        // A throwaway request proves the key works for this pair
        self.request("OK", pair).await?;
        self.models.acquire(pair);
        tracing::debug!("DeepL pair {} ready", pair);

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

        let text = self.request(text, pair).await?;

        Ok(Translation {
            text,
            from: pair.from.clone(),
            to: pair.to.clone(),
            provider: "deepl".to_string(),
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
            name: "DeepL".to_string(),
            requires_api_key: true,
            offline: false,
        }
    }
}

use std::fmt;

use glossa_types::LanguageCode;

pub mod deepl;
pub mod language;
pub mod models;
pub mod phrasebook;

pub use deepl::DeepLService;
pub use models::ModelStore;
pub use phrasebook::PhrasebookService;

/// Translation backend contract.
///
/// Backends translate between one configured pair at a time and require the
/// pair's model to be acquired before `translate` succeeds.
#[async_trait::async_trait]
pub trait TranslationService: Send + Sync {
    /// Map an ISO 639 language code to the backend's identifier.
    /// `None` means the backend cannot translate that language.
    fn language_for_code(&self, code: &str) -> Option<LanguageCode>;

    /// Acquire whatever the backend needs to translate `pair`
    async fn download_model(&self, pair: &LanguagePair) -> Result<(), TranslateError>;

    /// Translate text from `pair.from` to `pair.to`
    async fn translate(&self, text: &str, pair: &LanguagePair)
    -> Result<Translation, TranslateError>;

    /// Models currently held by the backend
    async fn downloaded_models(&self) -> Result<Vec<TranslationModel>, TranslateError>;

    async fn delete_model(&self, model: &TranslationModel) -> Result<(), TranslateError>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguagePair {
    pub from: LanguageCode,
    pub to: LanguageCode,
}

impl LanguagePair {
    pub fn new(from: impl Into<LanguageCode>, to: impl Into<LanguageCode>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// One downloadable language model
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TranslationModel {
    pub language: LanguageCode,
}

#[derive(Debug, Clone)]
pub struct Translation {
    pub text: String,
    pub from: LanguageCode,
    pub to: LanguageCode,
    pub provider: String,
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub requires_api_key: bool,
    pub offline: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Unsupported language pair: {from} -> {to}")]
    UnsupportedLanguagePair { from: String, to: String },

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Authentication error")]
    AuthenticationError,

    #[error("Model for {0} is not downloaded")]
    ModelNotDownloaded(String),
}

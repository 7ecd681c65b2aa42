use std::env;

use serde::{Deserialize, Serialize};

fn default_provider() -> String {
    "phrasebook".to_string()
}

fn default_api_url() -> String {
    "https://api-free.deepl.com/v2/translate".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct TranslatorConfig {
    /// "deepl" or "phrasebook"
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// JSON phrasebook used by the offline provider
    #[serde(default)]
    pub phrasebook_path: Option<String>,
}

impl TranslatorConfig {
    pub fn new() -> Self {
        let api_key = env::var("DEEPL_API_KEY").unwrap_or_default();

        // Pick the remote provider automatically once a key is present
        let provider = env::var("GLOSSA_PROVIDER").unwrap_or_else(|_| {
            if api_key.is_empty() {
                default_provider()
            } else {
                "deepl".to_string()
            }
        });

        let api_url = env::var("DEEPL_API_URL").unwrap_or_else(|_| default_api_url());

        let timeout_seconds = env::var("TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_timeout_seconds);

        Self {
            provider,
            api_url,
            api_key,
            timeout_seconds,
            phrasebook_path: env::var("GLOSSA_PHRASEBOOK").ok(),
        }
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_url: default_api_url(),
            api_key: String::new(),
            timeout_seconds: default_timeout_seconds(),
            phrasebook_path: None,
        }
    }
}

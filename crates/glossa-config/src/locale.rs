use std::env;

use glossa_types::Locale;
use serde::{Deserialize, Serialize};

fn default_locale() -> String {
    "en".to_string()
}

fn default_supported_locales() -> Vec<String> {
    vec![default_locale()]
}

/// Locales the application ships resources for, plus the device locale override.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct LocaleConfig {
    /// Language the application's own strings are written in
    #[serde(default = "default_locale")]
    pub default_locale: String,
    #[serde(default = "default_supported_locales")]
    pub supported_locales: Vec<String>,
    /// Forces the active locale instead of reading it from the environment
    #[serde(default)]
    pub force_locale: Option<String>,
}

impl LocaleConfig {
    pub fn new() -> Self {
        let default_locale = env::var("GLOSSA_DEFAULT_LOCALE").unwrap_or_else(|_| default_locale());

        let supported_locales = env::var("GLOSSA_SUPPORTED_LOCALES")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_else(|_| vec![default_locale.clone()]);

        let force_locale = env::var("GLOSSA_FORCE_LOCALE").ok();

        Self {
            default_locale,
            supported_locales,
            force_locale,
        }
    }

    pub fn default_locale(&self) -> Locale {
        Locale::parse(&self.default_locale).unwrap_or_else(|| Locale::new(default_locale()))
    }

    pub fn supported_locales(&self) -> Vec<Locale> {
        self.supported_locales
            .iter()
            .filter_map(|tag| Locale::parse(tag))
            .collect()
    }

    /// Device locale: forced override, then LC_ALL / LC_MESSAGES / LANG, then the default.
    pub fn active_locale(&self) -> Locale {
        if let Some(locale) = self.force_locale.as_deref().and_then(Locale::parse) {
            return locale;
        }

        ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .filter_map(|key| env::var(key).ok())
            .find_map(|value| Locale::parse(&value))
            .unwrap_or_else(|| self.default_locale())
    }
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            default_locale: default_locale(),
            supported_locales: default_supported_locales(),
            force_locale: None,
        }
    }
}

use std::env;

use serde::{Deserialize, Serialize};

use self::locale::LocaleConfig;
use self::overlay::OverlayConfig;
use self::preferences::PreferencesConfig;
use self::translator::TranslatorConfig;

pub mod locale;
pub mod overlay;
pub mod preferences;
pub mod translator;

fn default_log_filter() -> String {
    "info,glossa_core=debug".to_string()
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct Config {
    pub overlay: OverlayConfig,
    pub locale: LocaleConfig,
    pub translator: TranslatorConfig,
    pub preferences: PreferencesConfig,

    /// Used when RUST_LOG is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Config {
    pub fn new() -> Self {
        let log_filter = env::var("GLOSSA_LOG").unwrap_or_else(|_| default_log_filter());

        Config {
            overlay: OverlayConfig::new(),
            locale: LocaleConfig::new(),
            translator: TranslatorConfig::new(),
            preferences: PreferencesConfig::new(),

            log_filter,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            overlay: OverlayConfig::default(),
            locale: LocaleConfig::default(),
            translator: TranslatorConfig::default(),
            preferences: PreferencesConfig::default(),
            log_filter: default_log_filter(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "overlay": { "debounce_ms": 40 } }"#).unwrap();

        assert_eq!(config.overlay.debounce_ms, 40);
        assert_eq!(config.overlay.fade_in_ms, 320);
        assert!(config.overlay.animation_enabled);
        assert_eq!(config.locale.default_locale, "en");
        assert_eq!(config.preferences.enabled_key, "translator.enabled");
    }
}

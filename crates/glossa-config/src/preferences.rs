use std::env;

use serde::{Deserialize, Serialize};

fn default_path() -> String {
    "glossa-preferences.json".to_string()
}

fn default_enabled_key() -> String {
    "translator.enabled".to_string()
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct PreferencesConfig {
    #[serde(default = "default_path")]
    pub path: String,
    /// Key holding the user's enable/disable choice
    #[serde(default = "default_enabled_key")]
    pub enabled_key: String,
}

impl PreferencesConfig {
    pub fn new() -> Self {
        let path = env::var("GLOSSA_PREFERENCES").unwrap_or_else(|_| default_path());

        Self {
            path,
            enabled_key: default_enabled_key(),
        }
    }
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            enabled_key: default_enabled_key(),
        }
    }
}

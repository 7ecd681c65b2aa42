use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use glossa_config::Config;
use glossa_core::{OverlayError, PreferenceStore};

/// Load a JSON config file, or build one from the environment
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::new());
    };

    tracing::info!("Loading config from {}", path.display());
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)?;
    Ok(config)
}

/// Preferences persisted as a flat JSON object
pub struct FilePreferences {
    path: PathBuf,
    values: Mutex<BTreeMap<String, bool>>,
}

impl FilePreferences {
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let data = fs::read_to_string(&path)?;
            serde_json::from_str(&data)?
        } else {
            tracing::debug!("No preferences at {}, starting empty", path.display());
            BTreeMap::new()
        };

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    fn save(&self, values: &BTreeMap<String, bool>) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(values)?)?;
        Ok(())
    }
}

impl PreferenceStore for FilePreferences {
    fn get_bool(&self, key: &str, default: bool) -> bool {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .copied()
            .unwrap_or(default)
    }

    fn set_bool(&self, key: &str, value: bool) -> Result<(), OverlayError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = values.insert(key.to_string(), value);
        if let Err(e) = self.save(&values) {
            // Memory must keep matching what is on disk
            match previous {
                Some(old) => values.insert(key.to_string(), old),
                None => values.remove(key),
            };
            tracing::warn!("Failed to save preferences to {}: {e}", self.path.display());
            return Err(OverlayError::Preferences(e.to_string()));
        }
        Ok(())
    }
}

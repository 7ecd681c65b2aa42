use crate::error::OverlayError;

/// Persisted user preferences
pub trait PreferenceStore: Send + Sync {
    fn get_bool(&self, key: &str, default: bool) -> bool;

    fn set_bool(&self, key: &str, value: bool) -> Result<(), OverlayError>;
}

/// Non-persistent store, for tests and hosts without storage
#[derive(Default)]
pub struct MemoryPreferences {
    values: scc::HashMap<String, bool>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get_bool(&self, key: &str, default: bool) -> bool {
        self.values.read_sync(key, |_, value| *value).unwrap_or(default)
    }

    fn set_bool(&self, key: &str, value: bool) -> Result<(), OverlayError> {
        let _ = self.values.upsert_sync(key.to_string(), value);
        Ok(())
    }
}

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_debounce_ms() -> u64 {
    16
}

fn default_fade_out_ms() -> u64 {
    160
}

fn default_fade_in_ms() -> u64 {
    320
}

fn default_animation_enabled() -> bool {
    true
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct OverlayConfig {
    /// Sweep requests arriving within this window collapse into one sweep
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_fade_out_ms")]
    pub fade_out_ms: u64,
    #[serde(default = "default_fade_in_ms")]
    pub fade_in_ms: u64,
    #[serde(default = "default_animation_enabled")]
    pub animation_enabled: bool,
}

impl OverlayConfig {
    pub fn new() -> Self {
        let debounce_ms = env::var("GLOSSA_DEBOUNCE_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_debounce_ms);

        let animation_enabled = env::var("GLOSSA_ANIMATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_animation_enabled);

        Self {
            debounce_ms,
            animation_enabled,
            ..Self::default()
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn fade_out(&self) -> Duration {
        Duration::from_millis(self.fade_out_ms)
    }

    pub fn fade_in(&self) -> Duration {
        Duration::from_millis(self.fade_in_ms)
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            fade_out_ms: default_fade_out_ms(),
            fade_in_ms: default_fade_in_ms(),
            animation_enabled: default_animation_enabled(),
        }
    }
}

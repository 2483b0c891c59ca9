//! Game settings and preferences
//!
//! Persisted separately from high scores in LocalStorage.

use serde::{Deserialize, Serialize};

/// Player preferences applied by the entry point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Show the FPS counter in the HUD
    pub show_fps: bool,
    /// Minimize camera motion (presentation hint for the host renderer)
    pub reduced_motion: bool,
    /// High contrast mode
    pub high_contrast: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_fps: true,
            reduced_motion: false,
            high_contrast: false,
        }
    }
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "lane_dash_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

//! Game settings and preferences
//!
//! Persisted separately from best times in LocalStorage.

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Background drone on/off (the options menu toggle)
    pub music_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Pause when the window loses focus
    pub pause_on_blur: bool,

    // === Camera ===
    /// Follow-camera smoothing per frame (0 = frozen, 1 = locked to the ball)
    pub camera_smoothing: f32,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
    /// Show best time next to each level button
    pub show_best_times: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_enabled: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.5,
            pause_on_blur: true,

            camera_smoothing: 0.05,

            show_fps: false,
            show_best_times: true,
        }
    }
}

impl Settings {
    /// Flip the music toggle, returning the new value
    pub fn toggle_music(&mut self) -> bool {
        self.music_enabled = !self.music_enabled;
        self.music_enabled
    }

    /// Clamp anything hand-edited in storage back into range
    pub fn sanitized(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
        self.camera_smoothing = self.camera_smoothing.clamp(0.0, 1.0);
        self
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "roll_a_ball_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str::<Settings>(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings.sanitized();
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_music_toggle() {
        let mut settings = Settings::default();
        assert!(settings.music_enabled);
        assert!(!settings.toggle_music());
        assert!(!settings.music_enabled);
        assert!(settings.toggle_music());
        assert!(settings.music_enabled);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"music_enabled":false}"#).unwrap();
        assert!(!settings.music_enabled);
        assert_eq!(settings.camera_smoothing, 0.05);
    }

    #[test]
    fn test_sanitized_clamps_ranges() {
        let settings = Settings {
            master_volume: 3.0,
            camera_smoothing: -1.0,
            ..Settings::default()
        }
        .sanitized();
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.camera_smoothing, 0.0);
    }
}

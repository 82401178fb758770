//! Game settings and preferences
//!
//! Persisted as JSON under their own storage key, separate from the personal
//! best.

use serde::{Deserialize, Serialize};

use crate::persistence::KeyValueStore;
use crate::sim::PoolSizes;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Preset named by a `quality=` query parameter, e.g. `?quality=low&lang=en`
    pub fn from_query(query: &str) -> Option<Self> {
        query
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "quality")
            .and_then(|(_, value)| Self::from_str(value))
    }

    /// Raindrop pool size for this preset
    pub fn raindrops(&self) -> usize {
        match self {
            QualityPreset::Low => 40,
            QualityPreset::Medium => 100,
            QualityPreset::High => 160,
        }
    }

    /// Cloud pool size for this preset
    pub fn clouds(&self) -> usize {
        match self {
            QualityPreset::Low => 3,
            QualityPreset::Medium => 5,
            QualityPreset::High => 7,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Animated highlights along the water surface
    pub water_waves: bool,
    /// Glints on the water surface
    pub sparkles: bool,
    /// Grass blades sway over time
    pub grass_sway: bool,
    /// "HEAVY RAIN!" banner when a storm starts
    pub rain_banner: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    pub muted: bool,

    // === Accessibility ===
    /// Reduced motion (freezes waves, sparkles and grass)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            water_waves: true,
            sparkles: true,
            grass_sway: true,
            rain_banner: true,

            show_fps: false,

            master_volume: 0.8,
            muted: false,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "mine_flood_settings";

    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;

        // Low preset drops the per-column surface effects
        if preset == QualityPreset::Low {
            self.sparkles = false;
            self.water_waves = false;
        }
    }

    /// Weather pool sizes for the chosen preset
    pub fn pool_sizes(&self) -> PoolSizes {
        PoolSizes {
            raindrops: self.quality.raindrops(),
            clouds: self.quality.clouds(),
        }
    }

    /// Volume actually applied to sound effects
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0)
        }
    }

    /// Load settings, falling back to defaults on a missing or unreadable entry
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Some(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring unreadable settings: {}", e);
                    Self::default()
                }
            },
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut impl KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => {
                store.set(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
            Err(e) => log::warn!("Failed to serialize settings: {}", e),
        }
    }
}

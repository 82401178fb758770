//! Data-driven game balance
//!
//! Every gameplay rate lives here so a run can be rebalanced from JSON
//! without touching the simulation.

use serde::{Deserialize, Serialize};

use crate::persistence::KeyValueStore;

/// Gameplay tuning knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Water ===
    /// Base water rise (pixels/s) before difficulty and rain
    pub water_rise_speed: f32,
    /// Water removed by one pump stroke (pixels)
    pub pump_power: f32,
    /// Seconds between accepted pump strokes
    pub pump_cooldown: f32,

    // === Difficulty ===
    /// `1 + (t * rate)^exponent`
    pub difficulty_rate: f32,
    pub difficulty_exponent: f32,

    // === Rain ===
    /// Chance per frame (not per second) that a rain event starts
    pub rain_chance_per_frame: f64,
    /// Rain event length (ms)
    pub rain_duration_ms: f32,
    /// Water rise multiplier while raining
    pub rain_water_multiplier: f32,
    /// Banner shows for the first part of a rain event (ms)
    pub rain_banner_ms: f32,

    // === Ambience ===
    pub sky_darkness_rate: f32,
    pub sky_darkness_max: f32,
    pub cloud_darkness_rate: f32,
    pub cloud_darkness_max: f32,

    // === Frame loop ===
    /// Largest delta a single frame may simulate (s)
    pub max_frame_dt: f32,
    /// Forced first frame on start/restart (s)
    pub start_nudge_dt: f32,

    // === Score service ===
    pub submit_retries: u32,
    pub submit_retry_delay_ms: u32,
    pub leaderboard_size: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            water_rise_speed: 80.0,
            pump_power: 80.0,
            pump_cooldown: 0.05,

            difficulty_rate: 0.08,
            difficulty_exponent: 1.2,

            rain_chance_per_frame: 0.002,
            rain_duration_ms: 2000.0,
            rain_water_multiplier: 2.0,
            rain_banner_ms: 500.0,

            sky_darkness_rate: 2.0,
            sky_darkness_max: 0.5,
            cloud_darkness_rate: 3.0,
            cloud_darkness_max: 0.8,

            max_frame_dt: 0.1,
            start_nudge_dt: 0.016,

            submit_retries: 3,
            submit_retry_delay_ms: 1000,
            leaderboard_size: 10,
        }
    }
}

impl Tuning {
    /// Storage key of an optional balance override
    pub const STORAGE_KEY: &'static str = "mine_flood_tuning";

    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Stored override if present and readable, otherwise the defaults
    pub fn load(store: &impl KeyValueStore) -> Self {
        let Some(json) = store.get(Self::STORAGE_KEY) else {
            return Self::default();
        };
        match Self::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning override");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring unreadable tuning override: {}", e);
                Self::default()
            }
        }
    }
}

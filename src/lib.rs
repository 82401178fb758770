//! Mine Flood - pump the water out of a mine shaft before it floods
//!
//! Core modules:
//! - `sim`: Simulation (water rise, difficulty ramp, weather, pumping)
//! - `renderer`: Procedural pixel-art renderer into an RGBA framebuffer
//! - `game`: Lifecycle controller (start, frame loop, game over, restart)
//! - `highscores`: Leaderboard, personal best and score submission
//! - `identity`: Wallet identity
//! - `persistence`: Key/value storage (LocalStorage on web)
//! - `settings`: Player preferences (quality, effects, audio)
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod game;
pub mod highscores;
pub mod identity;
#[cfg(target_arch = "wasm32")]
pub mod net;
pub mod persistence;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::{FrameOutcome, Game, GameOverReport};
pub use highscores::{Leaderboard, PersonalBest};
pub use identity::Identity;
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Scene geometry constants (canvas pixels)
pub mod consts {
    /// Canvas dimensions
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Y coordinate of the ground line; everything above is sky
    pub const GROUND_LEVEL: f32 = 200.0;

    /// Mine shaft (the pit that floods)
    pub const PIT_WIDTH: f32 = 400.0;
    pub const PIT_HEIGHT: f32 = 400.0;
    pub const PIT_X: f32 = CANVAS_WIDTH - PIT_WIDTH - 50.0;
    pub const PIT_Y: f32 = GROUND_LEVEL;

    /// Miner sprite placement - stands on the ground line
    pub const CHARACTER_WIDTH: f32 = 64.0;
    pub const CHARACTER_HEIGHT: f32 = 96.0;
    pub const CHARACTER_X: f32 = 150.0;
    pub const CHARACTER_Y: f32 = GROUND_LEVEL - CHARACTER_HEIGHT;

    /// Pump body, right of the miner
    pub const PUMP_WIDTH: f32 = 50.0;
    pub const PUMP_HEIGHT: f32 = 140.0;
    pub const PUMP_X: f32 = CHARACTER_X + CHARACTER_WIDTH + 20.0;
    pub const PUMP_Y: f32 = CHARACTER_Y + 40.0;
}

/// Water surface Y for a given water level (the pit fills bottom-up)
#[inline]
pub fn water_surface_y(water_level: f32) -> f32 {
    consts::PIT_Y + consts::PIT_HEIGHT - water_level
}

/// Shorten a `0x`-style address to `0x1234...abcd`
pub fn shorten_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_water_surface_fills_from_bottom() {
        assert_eq!(water_surface_y(0.0), consts::PIT_Y + consts::PIT_HEIGHT);
        assert_eq!(water_surface_y(consts::PIT_HEIGHT), consts::PIT_Y);
    }

    #[test]
    fn test_shorten_address() {
        assert_eq!(
            shorten_address("0x1234567890abcdef1234567890abcdef12345678"),
            "0x1234...5678"
        );
        assert_eq!(shorten_address("0xabc"), "0xabc");
    }
}

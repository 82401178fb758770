//! Colour tables for the scene and the miner

use super::framebuffer::Rgba;

// Sky
pub const SKY: Rgba = Rgba::hex(0x87CEEB);

// Ground
pub const GROUND: Rgba = Rgba::hex(0x8B4513);
pub const GROUND_DARK: Rgba = Rgba::hex(0x6E3C1E);
pub const DIRT: Rgba = Rgba::hex(0x654321);
pub const DIRT_DARK: Rgba = Rgba::hex(0x4A3219);

// Timber
pub const SUPPORT: Rgba = Rgba::hex(0x4A3728);
pub const SUPPORT_LIGHT: Rgba = Rgba::hex(0x5D483A);

// Water
pub const WATER: Rgba = Rgba::hex(0x3498DB);
pub const WATER_LIGHT: Rgba = Rgba::hex(0x5DADE2);
pub const WATER_DARK: Rgba = Rgba::hex(0x2874A6);
pub const WATER_SPARKLE: Rgba = Rgba::WHITE;

// Pump
pub const PUMP: Rgba = Rgba::hex(0x7F8C8D);
pub const PUMP_DARK: Rgba = Rgba::hex(0x626567);
pub const PUMP_LIGHT: Rgba = Rgba::hex(0x95A5A6);
pub const HANDLE_READY: Rgba = Rgba::hex(0xC0392B);
pub const HANDLE_READY_LIGHT: Rgba = Rgba::hex(0xE74C3C);

// Gold veins
pub const GOLD: Rgba = Rgba::hex(0xFFD700);
pub const GOLD_DARK: Rgba = Rgba::hex(0xB8860B);
pub const GOLD_LIGHT: Rgba = Rgba::hex(0xFFF380);

// Grass
pub const GRASS: Rgba = Rgba::hex(0x2ECC71);
pub const GRASS_DARK: Rgba = Rgba::hex(0x27AE60);
pub const GRASS_LIGHT: Rgba = Rgba::hex(0x82E0AA);

// Weather
pub const RAIN_STREAK: Rgba = Rgba::new(155, 195, 255, 128);

/// Miner sprite colours
pub mod miner {
    use super::Rgba;

    pub const SKIN: Rgba = Rgba::hex(0xFFD0A1);
    pub const SKIN_SHADOW: Rgba = Rgba::hex(0xE6B088);
    pub const SKIN_HIGHLIGHT: Rgba = Rgba::hex(0xFFE4C4);
    pub const SHIRT: Rgba = Rgba::hex(0x2980B9);
    pub const SHIRT_SHADOW: Rgba = Rgba::hex(0x1A5276);
    pub const SHIRT_HIGHLIGHT: Rgba = Rgba::hex(0x3498DB);
    pub const PANTS: Rgba = Rgba::hex(0x34495E);
    pub const PANTS_SHADOW: Rgba = Rgba::hex(0x2C3E50);
    pub const PANTS_HIGHLIGHT: Rgba = Rgba::hex(0x415B76);
    pub const BOOTS: Rgba = Rgba::hex(0x4A4A4A);
    pub const BOOTS_SHADOW: Rgba = Rgba::hex(0x353535);
    pub const BOOTS_HIGHLIGHT: Rgba = Rgba::hex(0x5C5C5C);
    pub const HELMET: Rgba = Rgba::hex(0xF1C40F);
    pub const HELMET_SHADOW: Rgba = Rgba::hex(0xD4AC0D);
    pub const HELMET_HIGHLIGHT: Rgba = Rgba::hex(0xF4D03F);
    pub const LAMP: Rgba = Rgba::WHITE;
    pub const LAMP_GLOW: Rgba = Rgba::hex(0xFFF7B3);
    pub const BELT: Rgba = Rgba::hex(0x784212);
    pub const BUCKLE: Rgba = Rgba::hex(0xB7950B);
    pub const EYE: Rgba = Rgba::BLACK;
    pub const EYE_GLINT: Rgba = Rgba::WHITE;
}

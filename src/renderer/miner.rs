//! The 8-bit miner and his hand pump
//!
//! The sprite is a table of filled rectangles relative to the character's
//! top-left corner, painted in order.

use super::framebuffer::{Framebuffer, Rgba};
use super::palette::{self, miner::*};
use crate::consts::*;

/// (x, y, w, h, colour) relative to the sprite origin
type SpriteRect = (f32, f32, f32, f32, Rgba);

/// Boots, legs, belt and shirt
const BODY: &[SpriteRect] = &[
    // Boots
    (8.0, 84.0, 20.0, 12.0, BOOTS),
    (8.0, 84.0, 20.0, 3.0, BOOTS_HIGHLIGHT),
    (24.0, 84.0, 4.0, 12.0, BOOTS_SHADOW),
    (36.0, 84.0, 20.0, 12.0, BOOTS),
    (36.0, 84.0, 20.0, 3.0, BOOTS_HIGHLIGHT),
    (52.0, 84.0, 4.0, 12.0, BOOTS_SHADOW),
    // Legs
    (8.0, 60.0, 20.0, 24.0, PANTS),
    (24.0, 60.0, 4.0, 24.0, PANTS_SHADOW),
    (8.0, 60.0, 4.0, 24.0, PANTS_HIGHLIGHT),
    (36.0, 60.0, 20.0, 24.0, PANTS),
    (52.0, 60.0, 4.0, 24.0, PANTS_SHADOW),
    (36.0, 60.0, 4.0, 24.0, PANTS_HIGHLIGHT),
    (16.0, 48.0, 32.0, 24.0, PANTS),
    (44.0, 48.0, 4.0, 24.0, PANTS_SHADOW),
    // Belt
    (16.0, 48.0, 32.0, 6.0, BELT),
    (28.0, 48.0, 8.0, 6.0, BUCKLE),
    // Shirt
    (12.0, 24.0, 40.0, 36.0, SHIRT),
    (48.0, 24.0, 4.0, 36.0, SHIRT_SHADOW),
    (12.0, 24.0, 4.0, 36.0, SHIRT_HIGHLIGHT),
];

const ARMS_IDLE: &[SpriteRect] = &[
    (0.0, 36.0, 12.0, 24.0, SHIRT),
    (8.0, 36.0, 4.0, 24.0, SHIRT_SHADOW),
    (0.0, 36.0, 4.0, 24.0, SHIRT_HIGHLIGHT),
    (52.0, 36.0, 12.0, 24.0, SHIRT),
    (60.0, 36.0, 4.0, 24.0, SHIRT_SHADOW),
    (52.0, 36.0, 4.0, 24.0, SHIRT_HIGHLIGHT),
];

/// Right arm raised onto the pump handle
const ARMS_PUMPING: &[SpriteRect] = &[
    (0.0, 30.0, 12.0, 24.0, SHIRT),
    (8.0, 30.0, 4.0, 24.0, SHIRT_SHADOW),
    (0.0, 30.0, 4.0, 24.0, SHIRT_HIGHLIGHT),
    (52.0, 18.0, 12.0, 24.0, SHIRT),
    (60.0, 18.0, 4.0, 24.0, SHIRT_SHADOW),
    (52.0, 18.0, 4.0, 24.0, SHIRT_HIGHLIGHT),
];

/// Head, helmet with lamp, face
const HEAD: &[SpriteRect] = &[
    (16.0, 8.0, 32.0, 24.0, SKIN),
    (44.0, 8.0, 4.0, 24.0, SKIN_SHADOW),
    (16.0, 8.0, 4.0, 24.0, SKIN_HIGHLIGHT),
    (14.0, 0.0, 38.0, 16.0, HELMET),
    (48.0, 0.0, 4.0, 16.0, HELMET_SHADOW),
    (14.0, 0.0, 4.0, 16.0, HELMET_HIGHLIGHT),
    (12.0, 12.0, 44.0, 8.0, HELMET),
    (12.0, 12.0, 44.0, 3.0, HELMET_HIGHLIGHT),
    (48.0, 8.0, 10.0, 10.0, LAMP),
    (46.0, 6.0, 14.0, 2.0, LAMP_GLOW),
    (46.0, 18.0, 14.0, 2.0, LAMP_GLOW),
    (46.0, 8.0, 2.0, 10.0, LAMP_GLOW),
    (58.0, 8.0, 2.0, 10.0, LAMP_GLOW),
    (24.0, 16.0, 4.0, 4.0, EYE),
    (36.0, 16.0, 4.0, 4.0, EYE),
    (24.0, 17.0, 2.0, 2.0, EYE_GLINT),
    (36.0, 17.0, 2.0, 2.0, EYE_GLINT),
    (30.0, 22.0, 12.0, 2.0, EYE),
    (30.0, 21.0, 12.0, 1.0, SKIN_SHADOW),
    (28.0, 14.0, 2.0, 6.0, SKIN_SHADOW),
];

/// The miner crouches this far while the pump input is held
const PUMP_CROUCH: f32 = 8.0;

fn paint(fb: &mut Framebuffer, rects: &[SpriteRect], origin_x: f32, origin_y: f32) {
    for &(x, y, w, h, color) in rects {
        fb.fill_rect(origin_x + x, origin_y + y, w, h, color);
    }
}

pub fn draw_character(fb: &mut Framebuffer, pumping: bool) {
    let y = CHARACTER_Y + if pumping { PUMP_CROUCH } else { 0.0 };
    paint(fb, BODY, CHARACTER_X, y);
    paint(fb, if pumping { ARMS_PUMPING } else { ARMS_IDLE }, CHARACTER_X, y);
    paint(fb, HEAD, CHARACTER_X, y);
}

/// Pump body, outlet pipe and handle. The handle is red when a stroke is
/// available and grey during cooldown; it drops while being pumped.
pub fn draw_pump(fb: &mut Framebuffer, can_pump: bool, pumping: bool) {
    // Pipe runs from the pump base down to the ground line
    let pipe_x = PUMP_X + PUMP_WIDTH / 2.0 - 10.0;
    let pipe_top = PUMP_Y + PUMP_HEIGHT;
    fb.fill_rect(pipe_x, pipe_top, 20.0, GROUND_LEVEL - pipe_top, palette::PUMP);
    let mut y = pipe_top;
    while y < GROUND_LEVEL {
        fb.fill_rect(pipe_x, y, 20.0, 2.0, palette::PUMP_DARK);
        y += 10.0;
    }

    // Body
    fb.fill_rect(PUMP_X, PUMP_Y, PUMP_WIDTH, PUMP_HEIGHT, palette::PUMP);
    fb.fill_rect(PUMP_X + 2.0, PUMP_Y + 2.0, 4.0, PUMP_HEIGHT - 4.0, palette::PUMP_LIGHT);
    fb.fill_rect(
        PUMP_X + PUMP_WIDTH - 6.0,
        PUMP_Y + 4.0,
        4.0,
        PUMP_HEIGHT - 8.0,
        palette::PUMP_DARK,
    );

    // Rivets
    for i in 0..5 {
        let ry = PUMP_Y + i as f32 * 30.0 + 10.0;
        fb.fill_rect(PUMP_X + 6.0, ry, 6.0, 6.0, palette::PUMP_LIGHT);
        fb.fill_rect(PUMP_X + 38.0, ry, 6.0, 6.0, palette::PUMP_LIGHT);
        fb.fill_rect(PUMP_X + 7.0, ry + 1.0, 2.0, 2.0, Rgba::WHITE);
        fb.fill_rect(PUMP_X + 39.0, ry + 1.0, 2.0, 2.0, Rgba::WHITE);
    }

    // Handle
    const HANDLE_W: f32 = 70.0;
    const HANDLE_H: f32 = 24.0;
    let handle_y = PUMP_Y + if pumping { 50.0 } else { 25.0 };
    let (main, highlight) = if can_pump {
        (palette::HANDLE_READY, palette::HANDLE_READY_LIGHT)
    } else {
        (palette::PUMP, palette::PUMP_LIGHT)
    };
    fb.fill_rect(PUMP_X - 10.0, handle_y + 2.0, HANDLE_W, HANDLE_H - 2.0, palette::PUMP_DARK);
    fb.fill_rect(PUMP_X - 10.0, handle_y, HANDLE_W, HANDLE_H - 4.0, main);
    fb.fill_rect(PUMP_X - 8.0, handle_y + 2.0, HANDLE_W - 4.0, 2.0, highlight);
}

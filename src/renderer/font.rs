//! 5x7 bitmap glyphs for in-canvas banners

use glam::Vec2;

use super::framebuffer::{Framebuffer, Rgba};

const GLYPH_W: usize = 5;
const GLYPH_H: usize = 7;
/// Advance includes one column of spacing
const ADVANCE: usize = GLYPH_W + 1;

/// Rows top to bottom, bit 4 is the leftmost column
fn glyph(ch: char) -> Option<[u8; GLYPH_H]> {
    let rows = match ch.to_ascii_uppercase() {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        '!' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
        _ => return None,
    };
    Some(rows)
}

/// Width in pixels of `text` at `scale`
pub fn text_width(text: &str, scale: f32) -> f32 {
    let n = text.chars().count();
    if n == 0 {
        return 0.0;
    }
    (n * ADVANCE - 1) as f32 * scale
}

/// Draw `text` horizontally centred on `anchor.x` with its baseline at `anchor.y`.
/// Characters without a glyph advance as blanks.
pub fn draw_text_centered(fb: &mut Framebuffer, text: &str, anchor: Vec2, scale: f32, color: Rgba) {
    let left = anchor.x - text_width(text, scale) / 2.0;
    let top = anchor.y - GLYPH_H as f32 * scale;

    for (i, ch) in text.chars().enumerate() {
        let Some(rows) = glyph(ch) else { continue };
        let x0 = left + (i * ADVANCE) as f32 * scale;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_W {
                if bits & (1 << (GLYPH_W - 1 - col)) != 0 {
                    fb.fill_rect(
                        x0 + col as f32 * scale,
                        top + row as f32 * scale,
                        scale,
                        scale,
                        color,
                    );
                }
            }
        }
    }
}

//! RGBA raster surface
//!
//! Coordinates are canvas pixels, `(0, 0)` top-left. Every fill uses
//! source-over blending and samples at pixel centres, so shapes drawn from the
//! same inputs always produce the same bytes.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// One pixel, laid out for `ImageData` (R, G, B, A bytes)
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque colour from `0xRRGGBB`
    pub const fn hex(rgb: u32) -> Self {
        Self::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 255)
    }

    /// Colour from float channels (0-255) and alpha (0-1), clamped
    pub fn from_f32(r: f32, g: f32, b: f32, alpha: f32) -> Self {
        let channel = |v: f32| v.clamp(0.0, 255.0).round() as u8;
        Self::new(channel(r), channel(g), channel(b), channel(alpha * 255.0))
    }

    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }

    /// `self` composited over `dst`
    fn over(self, dst: Rgba) -> Rgba {
        match self.a {
            255 => self,
            0 => dst,
            _ => {
                let sa = self.a as f32 / 255.0;
                let da = dst.a as f32 / 255.0;
                let out_a = sa + da * (1.0 - sa);
                let mix = |s: u8, d: u8| {
                    let c = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
                    c.round().clamp(0.0, 255.0) as u8
                };
                Rgba::new(
                    mix(self.r, dst.r),
                    mix(self.g, dst.g),
                    mix(self.b, dst.b),
                    (out_a * 255.0).round() as u8,
                )
            }
        }
    }
}

/// Owned pixel grid
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::TRANSPARENT; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Raw RGBA bytes, ready for `ImageData`
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    pub fn clear(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color.over(self.pixels[i]);
        }
    }

    /// Canvas-style `fillRect`: negative sizes extend left/up
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        let (x0, x1) = if w < 0.0 { (x + w, x) } else { (x, x + w) };
        let (y0, y1) = if h < 0.0 { (y + h, y) } else { (y, y + h) };

        let px0 = (x0.round() as i32).max(0);
        let py0 = (y0.round() as i32).max(0);
        let px1 = (x1.round() as i32).min(self.width as i32);
        let py1 = (y1.round() as i32).min(self.height as i32);

        for py in py0..py1 {
            for px in px0..px1 {
                self.blend_pixel(px, py, color);
            }
        }
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if radius <= 0.0 {
            return;
        }
        let r2 = radius * radius;
        let y0 = ((center.y - radius).floor() as i32).max(0);
        let y1 = ((center.y + radius).ceil() as i32).min(self.height as i32);
        let x0 = ((center.x - radius).floor() as i32).max(0);
        let x1 = ((center.x + radius).ceil() as i32).min(self.width as i32);

        for py in y0..y1 {
            let dy = py as f32 + 0.5 - center.y;
            for px in x0..x1 {
                let dx = px as f32 + 0.5 - center.x;
                if dx * dx + dy * dy <= r2 {
                    self.blend_pixel(px, py, color);
                }
            }
        }
    }

    /// 1px line, one sample per step along the major axis
    pub fn line(&mut self, from: Vec2, to: Vec2, color: Rgba) {
        let delta = to - from;
        let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0) as i32;
        for i in 0..=steps {
            let p = from.lerp(to, i as f32 / steps as f32);
            self.blend_pixel(p.x.floor() as i32, p.y.floor() as i32, color);
        }
    }

    pub fn fill_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Rgba) {
        let edge = |p: Vec2, q: Vec2, r: Vec2| (q.x - p.x) * (r.y - p.y) - (q.y - p.y) * (r.x - p.x);
        let area = edge(a, b, c);
        if area == 0.0 {
            return;
        }

        let min = a.min(b).min(c);
        let max = a.max(b).max(c);
        let x0 = (min.x.floor() as i32).max(0);
        let y0 = (min.y.floor() as i32).max(0);
        let x1 = (max.x.ceil() as i32).min(self.width as i32);
        let y1 = (max.y.ceil() as i32).min(self.height as i32);

        for py in y0..y1 {
            for px in x0..x1 {
                let p = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
                let w0 = edge(b, c, p) * area.signum();
                let w1 = edge(c, a, p) * area.signum();
                let w2 = edge(a, b, p) * area.signum();
                if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                    self.blend_pixel(px, py, color);
                }
            }
        }
    }
}

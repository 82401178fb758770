//! Full-scene painter
//!
//! `draw_scene` is a pure read of `GameState`: it never mutates simulation
//! state. Decorative motion (grass sway, waves, sparkles) is a function of the
//! explicit `time` argument and pixel position only.

use glam::Vec2;

use super::font;
use super::framebuffer::{Framebuffer, Rgba};
use super::miner;
use super::palette;
use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{Cloud, GameState, Raindrop, WeatherState};
use crate::water_surface_y;

/// Which decorative effects to paint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub water_waves: bool,
    pub sparkles: bool,
    pub grass_sway: bool,
    pub rain_banner: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            water_waves: true,
            sparkles: true,
            grass_sway: true,
            rain_banner: true,
        }
    }
}

impl RenderOptions {
    /// Reduced motion switches off every animated decoration
    pub fn from_settings(settings: &Settings) -> Self {
        let animate = !settings.reduced_motion;
        Self {
            water_waves: settings.water_waves && animate,
            sparkles: settings.sparkles && animate,
            grass_sway: settings.grass_sway && animate,
            rain_banner: settings.rain_banner,
        }
    }
}

/// Paint the whole scene back to front. `time` is the animation clock in seconds.
pub fn draw_scene(fb: &mut Framebuffer, state: &GameState, time: f64, options: &RenderOptions) {
    fb.clear(Rgba::TRANSPARENT);

    draw_sky(fb, &state.weather);
    for cloud in &state.clouds {
        draw_cloud(fb, cloud);
    }
    if state.weather.is_raining {
        for drop in &state.raindrops {
            draw_raindrop(fb, drop);
        }
    }

    draw_ground(fb);
    draw_grass(fb, if options.grass_sway { time } else { 0.0 });
    draw_mine_shaft(fb);

    miner::draw_character(fb, state.lever.pumping);
    miner::draw_pump(fb, state.sim.can_pump, state.lever.pumping);

    draw_water(fb, state.sim.water_level, time, options);

    if options.rain_banner {
        if let Some(alpha) = state.rain_banner_alpha() {
            font::draw_text_centered(
                fb,
                "HEAVY RAIN!",
                Vec2::new(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 3.0),
                3.0,
                Rgba::WHITE.with_alpha(alpha),
            );
        }
    }
}

/// Sky colour darkens with `sky_darkness`
pub fn sky_color(weather: &WeatherState) -> Rgba {
    let d = weather.sky_darkness;
    Rgba::from_f32(135.0 - d * 50.0, 206.0 - d * 100.0, 235.0 - d * 100.0, 1.0)
}

fn draw_sky(fb: &mut Framebuffer, weather: &WeatherState) {
    fb.fill_rect(0.0, 0.0, CANVAS_WIDTH, GROUND_LEVEL, sky_color(weather));
}

fn draw_cloud(fb: &mut Framebuffer, cloud: &Cloud) {
    let light = 1.0 - cloud.darkness;
    let base = Rgba::from_f32(255.0 * light, 255.0 * light, 255.0 * light, 0.95);
    let shadow = Rgba::from_f32(230.0 * light, 230.0 * light, 230.0 * light, 0.8);

    for lobe in &cloud.lobes {
        let center = cloud.pos + lobe.offset;
        fb.fill_circle(center, lobe.radius, base);
        fb.fill_circle(center + Vec2::new(0.0, 5.0), lobe.radius * 0.9, shadow);
    }
}

fn draw_raindrop(fb: &mut Framebuffer, drop: &Raindrop) {
    fb.line(
        drop.pos,
        drop.pos + Vec2::new(-1.0, drop.length),
        palette::RAIN_STREAK,
    );
}

/// Checkerboard-ish dither: `step`-spaced `size` squares where `(x + y) % modulus == 0`
fn dither(fb: &mut Framebuffer, area: (i32, i32, i32, i32), step: usize, size: f32, modulus: i32, color: Rgba) {
    let (x0, y0, x1, y1) = area;
    for y in (y0..y1).step_by(step) {
        for x in (x0..x1).step_by(step) {
            if (x + y).rem_euclid(modulus) == 0 {
                fb.fill_rect(x as f32, y as f32, size, size, color);
            }
        }
    }
}

fn draw_ground(fb: &mut Framebuffer) {
    fb.fill_rect(
        0.0,
        GROUND_LEVEL,
        CANVAS_WIDTH,
        CANVAS_HEIGHT - GROUND_LEVEL,
        palette::GROUND,
    );
    dither(
        fb,
        (0, GROUND_LEVEL as i32, CANVAS_WIDTH as i32, CANVAS_HEIGHT as i32),
        8,
        4.0,
        16,
        palette::GROUND_DARK,
    );
}

fn draw_grass(fb: &mut Framebuffer, time: f64) {
    fb.fill_rect(0.0, GROUND_LEVEL - 8.0, CANVAS_WIDTH, 18.0, palette::GRASS);

    for x in (0..CANVAS_WIDTH as i32).step_by(4) {
        let xf = x as f64;
        let height = 4.0 + (xf * 0.2).sin() * 2.0;
        let sway = (xf * 0.1 + time).sin() * 2.0;
        let top = (GROUND_LEVEL as f64 - 8.0 - height + sway) as f32;

        fb.fill_rect(x as f32, top, 2.0, height as f32, palette::GRASS_LIGHT);
        fb.fill_rect(x as f32 + 1.0, top, 1.0, height as f32, palette::GRASS_DARK);
    }
}

fn draw_wood_beam(fb: &mut Framebuffer, x: f32, y: f32, w: f32, h: f32) {
    fb.fill_rect(x, y, w, h, palette::SUPPORT);
    let grain = w * 0.8;
    let mut i = 0.0;
    while i < h {
        fb.fill_rect(x + (w - grain) / 2.0, y + i, grain, 2.0, palette::SUPPORT_LIGHT);
        i += 4.0;
    }
}

fn draw_dirt_wall(fb: &mut Framebuffer, x: i32, y: i32, w: i32, h: i32) {
    fb.fill_rect(x as f32, y as f32, w as f32, h as f32, palette::DIRT);
    dither(fb, (x, y, x + w, y + h), 4, 2.0, 8, palette::DIRT_DARK);
}

/// Entrance frame, shaft walls, timber supports, gold veins and floor cracks
fn draw_mine_shaft(fb: &mut Framebuffer) {
    draw_wood_beam(fb, PIT_X - 30.0, GROUND_LEVEL - 20.0, PIT_WIDTH + 60.0, 20.0);
    draw_wood_beam(fb, PIT_X - 30.0, GROUND_LEVEL - 20.0, 30.0, 60.0);
    draw_wood_beam(fb, PIT_X + PIT_WIDTH, GROUND_LEVEL - 20.0, 30.0, 60.0);

    draw_dirt_wall(fb, PIT_X as i32 - 20, PIT_Y as i32, 20, PIT_HEIGHT as i32);
    draw_dirt_wall(fb, (PIT_X + PIT_WIDTH) as i32, PIT_Y as i32, 20, PIT_HEIGHT as i32);

    for i in 0..4 {
        draw_wood_beam(fb, PIT_X + i as f32 * (PIT_WIDTH / 3.0), PIT_Y, 20.0, PIT_HEIGHT);
    }
    for i in 0..5 {
        draw_wood_beam(fb, PIT_X - 20.0, PIT_Y + i as f32 * (PIT_HEIGHT / 4.0), PIT_WIDTH + 40.0, 15.0);
    }

    draw_gold_veins(fb);
    draw_cracks(fb);
}

/// (x, y, w, h) relative to the pit origin
const GOLD_SPOTS: [(i32, i32, i32, i32); 4] = [
    (50, 100, 30, 20),
    (200, 150, 40, 25),
    (300, 250, 25, 35),
    (100, 200, 35, 30),
];

fn draw_gold_veins(fb: &mut Framebuffer) {
    for (dx, dy, w, h) in GOLD_SPOTS {
        let x = PIT_X as i32 + dx;
        let y = PIT_Y as i32 + dy;
        fb.fill_rect(x as f32, y as f32, w as f32, h as f32, palette::GOLD);
        dither(fb, (x, y, x + w, y + h), 4, 2.0, 12, palette::GOLD_LIGHT);
        dither(fb, (x + 2, y + 2, x + w, y + h), 4, 2.0, 8, palette::GOLD_DARK);

        // Stepped nugget edges
        for i in 0..4 {
            let color = if i % 2 == 0 { palette::GOLD_LIGHT } else { palette::GOLD_DARK };
            let step = (i * 3) as f32;
            let (xf, yf, wf, hf) = (x as f32, y as f32, w as f32, h as f32);
            fb.fill_rect(xf - step, yf + step, 3.0, 3.0, color);
            fb.fill_rect(xf + wf + step, yf + step, 3.0, 3.0, color);
            fb.fill_rect(xf + step, yf + hf - step, 3.0, 3.0, color);
        }
    }
}

fn draw_cracks(fb: &mut Framebuffer) {
    let crack_y = PIT_Y + PIT_HEIGHT - 10.0;
    for i in 0..5 {
        let x = PIT_X + (PIT_WIDTH / 6.0) * i as f32;
        fb.fill_triangle(
            Vec2::new(x, crack_y),
            Vec2::new(x + 40.0, crack_y + 5.0),
            Vec2::new(x + 80.0, crack_y),
            palette::DIRT_DARK,
        );
        for j in 0..3 {
            let jf = j as f32;
            fb.fill_rect(x + jf * 20.0, crack_y + jf.sin() * 3.0, 4.0, 4.0, palette::DIRT);
        }
    }
}

fn draw_water(fb: &mut Framebuffer, water_level: f32, time: f64, options: &RenderOptions) {
    let water_y = water_surface_y(water_level);
    let pit_bottom = (PIT_Y + PIT_HEIGHT) as i32;
    let pit_left = PIT_X as i32;
    let pit_right = (PIT_X + PIT_WIDTH) as i32;
    let t = time * 2.0;

    fb.fill_rect(PIT_X, water_y, PIT_WIDTH, water_level, palette::WATER);

    if options.water_waves {
        for x in (pit_left..pit_right).step_by(8) {
            let wave = ((x as f64 * 0.05 + t).sin() * 2.0) as f32;
            fb.fill_rect(x as f32, water_y + wave, 4.0, 2.0, palette::WATER_LIGHT);
        }
    }

    // Depth dither is anchored to whole pixels so it does not shimmer as the level moves
    dither(
        fb,
        (pit_left, water_y.floor() as i32, pit_right, pit_bottom),
        8,
        4.0,
        16,
        palette::WATER_DARK,
    );

    if options.sparkles {
        for x in (pit_left..pit_right).step_by(16) {
            let xf = x as f64;
            if (t * 3.0 + xf).sin() > 0.7 {
                let sparkle_y = water_y + ((xf * 0.1 + t * 2.0).sin() * 3.0) as f32;
                fb.fill_rect(x as f32, sparkle_y, 2.0, 2.0, palette::WATER_SPARKLE);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{PoolSizes, start_rain};
    use crate::tuning::Tuning;

    fn canvas() -> Framebuffer {
        Framebuffer::new(CANVAS_WIDTH as u32, CANVAS_HEIGHT as u32)
    }

    fn state() -> GameState {
        GameState::new(77, Tuning::default(), PoolSizes { raindrops: 100, clouds: 0 })
    }

    #[test]
    fn test_render_is_deterministic() {
        let state = state();
        let mut a = canvas();
        let mut b = canvas();
        draw_scene(&mut a, &state, 12.5, &RenderOptions::default());
        draw_scene(&mut b, &state, 12.5, &RenderOptions::default());
        assert_eq!(a, b);
    }

    #[test]
    fn test_render_does_not_touch_state() {
        let mut state = state();
        state.begin_run();
        start_rain(&mut state);
        let before = state.clone();
        draw_scene(&mut canvas(), &state, 3.0, &RenderOptions::default());
        assert_eq!(state, before);
    }

    #[test]
    fn test_clear_sky_colour() {
        let mut fb = canvas();
        draw_scene(&mut fb, &state(), 0.0, &RenderOptions::default());
        assert_eq!(fb.pixel(20, 20), Some(palette::SKY));
    }

    #[test]
    fn test_sky_darkens() {
        let weather = WeatherState {
            is_raining: true,
            rain_timer_ms: 1000.0,
            sky_darkness: 0.5,
        };
        assert_eq!(sky_color(&weather), Rgba::new(110, 156, 185, 255));
    }

    #[test]
    fn test_sky_fades_back_after_rain() {
        let fading = WeatherState {
            is_raining: false,
            rain_timer_ms: 0.0,
            sky_darkness: 0.25,
        };
        let sky = sky_color(&fading);
        assert_ne!(sky, palette::SKY);
        assert!(sky.b > 185 && sky.b < palette::SKY.b);

        let cleared = WeatherState {
            sky_darkness: 0.0,
            ..fading
        };
        assert_eq!(sky_color(&cleared), palette::SKY);
    }

    #[test]
    fn test_water_fills_from_bottom() {
        let mut state = state();
        state.sim.water_level = 100.0;
        let options = RenderOptions {
            water_waves: false,
            sparkles: false,
            ..Default::default()
        };
        let mut fb = canvas();
        draw_scene(&mut fb, &state, 0.0, &options);

        // Water is drawn last over the shaft, between surface and pit floor
        let x = (PIT_X + 45.0) as i32;
        let below = (PIT_Y + PIT_HEIGHT - 50.0) as i32 + 1;
        let above = (PIT_Y + PIT_HEIGHT - 150.0) as i32;
        let under = fb.pixel(x, below).unwrap();
        assert!(under == palette::WATER || under == palette::WATER_DARK);
        let over = fb.pixel(x, above).unwrap();
        assert!(over != palette::WATER && over != palette::WATER_DARK);
    }

    #[test]
    fn test_rain_streaks_only_while_raining() {
        let mut dry = state();
        dry.weather.sky_darkness = 0.0;
        let mut wet = dry.clone();
        wet.weather.is_raining = true;
        wet.weather.rain_timer_ms = 100.0;

        let options = RenderOptions::default();
        let mut dry_fb = canvas();
        let mut wet_fb = canvas();
        draw_scene(&mut dry_fb, &dry, 1.0, &options);
        draw_scene(&mut wet_fb, &wet, 1.0, &options);
        assert_ne!(dry_fb, wet_fb);
    }

    #[test]
    fn test_banner_on_rain_start() {
        let mut state = state();
        state.begin_run();
        start_rain(&mut state);
        let mut with_banner = canvas();
        draw_scene(&mut with_banner, &state, 0.0, &RenderOptions::default());

        let no_banner_opts = RenderOptions {
            rain_banner: false,
            ..Default::default()
        };
        let mut without = canvas();
        draw_scene(&mut without, &state, 0.0, &no_banner_opts);
        assert_ne!(with_banner, without);
    }

    #[test]
    fn test_time_drives_decoration_only() {
        let state = state();
        let mut early = canvas();
        let mut late = canvas();
        draw_scene(&mut early, &state, 0.0, &RenderOptions::default());
        draw_scene(&mut late, &state, 1.7, &RenderOptions::default());
        assert_ne!(early, late);

        let still = RenderOptions {
            water_waves: false,
            sparkles: false,
            grass_sway: false,
            rain_banner: true,
        };
        draw_scene(&mut early, &state, 0.0, &still);
        draw_scene(&mut late, &state, 1.7, &still);
        assert_eq!(early, late);
    }
}

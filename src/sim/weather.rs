//! Weather and ambience entities
//!
//! Raindrops and clouds live in fixed-size pools for the whole session. They
//! are never destroyed: a drop that hits the ground and a cloud that drifts off
//! the right edge are recycled in place.

use glam::Vec2;
use rand::Rng;

use crate::consts::*;
use crate::tuning::Tuning;

/// Raindrop speeds are authored per 60 Hz frame
pub const RAIN_REFERENCE_FPS: f32 = 60.0;

/// A single rain streak
#[derive(Debug, Clone, PartialEq)]
pub struct Raindrop {
    pub pos: Vec2,
    /// Fall speed (pixels per reference frame)
    pub speed: f32,
    /// Streak length (pixels)
    pub length: f32,
}

impl Raindrop {
    pub fn spawn(rng: &mut impl Rng) -> Self {
        let mut drop = Self {
            pos: Vec2::ZERO,
            speed: 0.0,
            length: 0.0,
        };
        drop.reset(rng);
        drop
    }

    /// Reposition somewhere above the ground line with a fresh speed/length
    pub fn reset(&mut self, rng: &mut impl Rng) {
        self.pos = Vec2::new(
            rng.random::<f32>() * CANVAS_WIDTH,
            rng.random::<f32>() * GROUND_LEVEL,
        );
        self.speed = 10.0 + rng.random::<f32>() * 10.0;
        self.length = 10.0 + rng.random::<f32>() * 20.0;
    }

    /// Fall straight down; recycle once past the ground line
    pub fn update(&mut self, dt: f32, rng: &mut impl Rng) {
        self.pos.y += self.speed * dt * RAIN_REFERENCE_FPS;
        if self.pos.y > GROUND_LEVEL {
            self.reset(rng);
        }
    }
}

/// One round puff of a cloud, relative to the cloud origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudLobe {
    pub offset: Vec2,
    pub radius: f32,
}

/// A drifting cloud built from overlapping lobes
#[derive(Debug, Clone, PartialEq)]
pub struct Cloud {
    pub pos: Vec2,
    pub width: f32,
    /// Drift speed (pixels/s, rightwards)
    pub speed: f32,
    /// 0 = white, `cloud_darkness_max` = storm grey
    pub darkness: f32,
    /// Fixed at reset: big centre row, medium top row, small bottom row
    pub lobes: Vec<CloudLobe>,
}

/// (count, y offset, x spacing, base radius) per lobe row
const LOBE_ROWS: [(usize, f32, f32, f32); 3] = [(3, 0.0, 25.0, 35.0), (4, -15.0, 20.0, 25.0), (5, 10.0, 22.0, 20.0)];

impl Cloud {
    pub fn spawn(rng: &mut impl Rng) -> Self {
        let mut cloud = Self {
            pos: Vec2::ZERO,
            width: 0.0,
            speed: 0.0,
            darkness: 0.0,
            lobes: Vec::with_capacity(LOBE_ROWS.iter().map(|r| r.0).sum()),
        };
        cloud.reset(rng);
        cloud
    }

    /// Re-roll position, size and shape, reusing the lobe allocation
    pub fn reset(&mut self, rng: &mut impl Rng) {
        self.pos = Vec2::new(
            -100.0 + rng.random::<f32>() * CANVAS_WIDTH,
            rng.random::<f32>() * (GROUND_LEVEL / 2.0),
        );
        self.width = 120.0 + rng.random::<f32>() * 80.0;
        self.speed = 20.0 + rng.random::<f32>() * 15.0;
        self.darkness = 0.0;

        self.lobes.clear();
        let center_x = self.width / 2.0;
        for (count, y_offset, spacing, base_radius) in LOBE_ROWS {
            let half = count as f32 / 2.0;
            for i in 0..count {
                self.lobes.push(CloudLobe {
                    offset: Vec2::new(center_x + (i as f32 - half) * spacing, y_offset),
                    radius: base_radius + rng.random::<f32>() * 10.0,
                });
            }
        }
    }

    /// Drift right, wrap to just off the left edge, ease darkness toward the weather
    pub fn update(&mut self, dt: f32, raining: bool, tuning: &Tuning) {
        self.pos.x += self.speed * dt;
        if self.pos.x > CANVAS_WIDTH + self.width {
            self.pos.x = -self.width;
        }

        let step = dt * tuning.cloud_darkness_rate;
        self.darkness = if raining {
            (self.darkness + step).min(tuning.cloud_darkness_max)
        } else {
            (self.darkness - step).max(0.0)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_raindrop_spawns_above_ground() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..200 {
            let drop = Raindrop::spawn(&mut rng);
            assert!(drop.pos.y >= 0.0 && drop.pos.y < GROUND_LEVEL);
            assert!(drop.pos.x >= 0.0 && drop.pos.x < CANVAS_WIDTH);
            assert!((10.0..20.0).contains(&drop.speed));
            assert!((10.0..30.0).contains(&drop.length));
        }
    }

    #[test]
    fn test_raindrop_recycles_at_ground() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut drop = Raindrop::spawn(&mut rng);
        drop.pos.y = GROUND_LEVEL - 1.0;
        drop.speed = 10.0;
        drop.update(1.0 / 60.0, &mut rng);
        assert!(drop.pos.y < GROUND_LEVEL);
    }

    #[test]
    fn test_raindrop_falls_straight_down() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut drop = Raindrop::spawn(&mut rng);
        drop.pos = Vec2::new(100.0, 10.0);
        drop.speed = 12.0;
        drop.update(1.0 / 60.0, &mut rng);
        assert_eq!(drop.pos.x, 100.0);
        assert!((drop.pos.y - 22.0).abs() < 1e-4);
    }

    #[test]
    fn test_cloud_has_twelve_lobes() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut cloud = Cloud::spawn(&mut rng);
        assert_eq!(cloud.lobes.len(), 12);
        cloud.reset(&mut rng);
        assert_eq!(cloud.lobes.len(), 12);
    }

    #[test]
    fn test_cloud_wraps_to_left() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut cloud = Cloud::spawn(&mut rng);
        cloud.pos.x = CANVAS_WIDTH + cloud.width - 0.1;
        cloud.update(1.0, false, &Tuning::default());
        assert_eq!(cloud.pos.x, -cloud.width);
    }

    #[test]
    fn test_cloud_darkness_eases_and_clamps() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut cloud = Cloud::spawn(&mut rng);

        cloud.update(0.1, true, &tuning);
        assert!((cloud.darkness - 0.3).abs() < 1e-5);
        for _ in 0..20 {
            cloud.update(0.1, true, &tuning);
        }
        assert_eq!(cloud.darkness, tuning.cloud_darkness_max);
        for _ in 0..20 {
            cloud.update(0.1, false, &tuning);
        }
        assert_eq!(cloud.darkness, 0.0);
    }
}

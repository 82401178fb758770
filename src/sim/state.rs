//! Game state and core simulation types
//!
//! `GameState` owns every piece of mutable run state. Update, pump and render
//! functions receive it by reference; nothing lives in globals.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::weather::{Cloud, Raindrop};
use crate::tuning::Tuning;

/// Lifecycle phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    /// Title screen; the scene renders but nothing advances
    #[default]
    NotStarted,
    /// Water is rising
    Running,
    /// The shaft flooded; state is frozen
    GameOver,
}

/// Water, time and pump state for one run
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    /// Seconds survived (monotonic while running)
    pub game_time: f32,
    /// Height of water in the pit, clamped to `[0, PIT_HEIGHT]`
    pub water_level: f32,
    /// Derived from `game_time` every tick
    pub difficulty: f32,
    pub phase: GamePhase,
    pub can_pump: bool,
    /// Seconds until the pump re-arms
    pub pump_cooldown: f32,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self {
            game_time: 0.0,
            water_level: 0.0,
            difficulty: 1.0,
            phase: GamePhase::NotStarted,
            can_pump: true,
            pump_cooldown: 0.0,
        }
    }
}

impl SimulationState {
    pub fn is_game_started(&self) -> bool {
        self.phase != GamePhase::NotStarted
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Started and not over
    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Whole seconds survived
    pub fn score(&self) -> u32 {
        self.game_time.max(0.0).floor() as u32
    }
}

/// Rain event and sky state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherState {
    pub is_raining: bool,
    /// Milliseconds left in the current rain event
    pub rain_timer_ms: f32,
    /// 0 = clear blue, up to `sky_darkness_max`
    pub sky_darkness: f32,
}

/// Pump input tracking for edge-triggered strokes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpLever {
    /// Pump input is currently down
    pub held: bool,
    /// A stroke was accepted and the input has not been released yet
    pub pumping: bool,
}

/// Entity pool sizes, fixed for the lifetime of a `GameState`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSizes {
    pub raindrops: usize,
    pub clouds: usize,
}

impl Default for PoolSizes {
    fn default() -> Self {
        Self {
            raindrops: 100,
            clouds: 5,
        }
    }
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    /// Weather seed; `reset` replays the same weather from it
    pub seed: u64,
    pub tuning: Tuning,
    pub sim: SimulationState,
    pub weather: WeatherState,
    pub lever: PumpLever,
    pub raindrops: Vec<Raindrop>,
    pub clouds: Vec<Cloud>,
    pub(super) rng: Pcg32,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, tuning: Tuning, pools: PoolSizes) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let raindrops = (0..pools.raindrops)
            .map(|_| Raindrop::spawn(&mut rng))
            .collect();
        let clouds = (0..pools.clouds).map(|_| Cloud::spawn(&mut rng)).collect();

        Self {
            seed,
            tuning,
            sim: SimulationState::default(),
            weather: WeatherState::default(),
            lever: PumpLever::default(),
            raindrops,
            clouds,
            rng,
        }
    }

    /// Return every field to its start-of-run default.
    ///
    /// Pools are recycled in place, never reallocated. The RNG is reseeded so
    /// resetting twice is the same as resetting once.
    pub fn reset(&mut self) {
        self.sim = SimulationState::default();
        self.weather = WeatherState::default();
        self.lever = PumpLever::default();
        self.rng = Pcg32::seed_from_u64(self.seed);
        for drop in &mut self.raindrops {
            drop.reset(&mut self.rng);
        }
        for cloud in &mut self.clouds {
            cloud.reset(&mut self.rng);
        }
    }

    /// Reset with a new weather seed
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.reset();
    }

    /// NotStarted/GameOver -> Running
    pub fn begin_run(&mut self) {
        self.sim.phase = GamePhase::Running;
    }

    /// Water rise multiplier currently applied by the weather
    pub fn rain_multiplier(&self) -> f32 {
        if self.weather.is_raining {
            self.tuning.rain_water_multiplier
        } else {
            1.0
        }
    }

    /// Difficulty times rain, as shown on the HUD
    pub fn effective_multiplier(&self) -> f32 {
        self.sim.difficulty * self.rain_multiplier()
    }

    /// The "HEAVY RAIN!" banner is up for the opening of a rain event
    pub fn rain_banner_alpha(&self) -> Option<f32> {
        let duration = self.tuning.rain_duration_ms;
        if self.weather.is_raining && self.weather.rain_timer_ms > duration - self.tuning.rain_banner_ms {
            Some((self.weather.rain_timer_ms / duration).clamp(0.0, 1.0))
        } else {
            None
        }
    }
}

//! Run lifecycle: title screen, frame loop, game over, restart
//!
//! `Game` is platform independent. The browser front end feeds it animation
//! frame timestamps and key events; the native autopilot drives it the same
//! way with a synthetic clock.

use crate::highscores::{PersonalBest, ScoreSubmission, SubmitRetry};
use crate::identity::Identity;
use crate::persistence::KeyValueStore;
use crate::settings::{QualityPreset, Settings};
use crate::sim::{self, GameState, TickEvents};
use crate::tuning::Tuning;

/// `KeyboardEvent.code` of the pump key
pub const PUMP_KEY: &str = "Space";

/// Produced exactly once when a run floods
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOverReport {
    /// Whole seconds survived
    pub score: u32,
    pub previous_best: u32,
    pub new_personal_best: bool,
    pub submission: ScoreSubmission,
}

impl GameOverReport {
    pub fn final_score_text(&self) -> String {
        format!("Final Score: {}s", self.score)
    }
}

/// Result of one animation frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOutcome {
    /// Clamped delta actually simulated, seconds
    pub dt: f32,
    pub events: TickEvents,
    pub game_over: Option<GameOverReport>,
}

/// Rolling FPS over the last 60 frame timestamps
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: [f64; 60],
    frame_index: usize,
    fps: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }
    }
}

impl FpsCounter {
    pub fn record(&mut self, time_ms: f64) {
        self.frame_times[self.frame_index] = time_ms;
        self.frame_index = (self.frame_index + 1) % 60;

        // Oldest sample is the one about to be overwritten
        let oldest_time = self.frame_times[self.frame_index];
        if oldest_time > 0.0 {
            let elapsed = time_ms - oldest_time;
            if elapsed > 0.0 {
                self.fps = (60000.0 / elapsed).round() as u32;
            }
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

/// Game instance holding all state
#[derive(Debug, Clone)]
pub struct Game {
    pub state: GameState,
    pub settings: Settings,
    pub identity: Identity,
    pub personal_best: PersonalBest,
    last_time: Option<f64>,
    fps: FpsCounter,
    /// Bumped whenever the player changes; async work started under an older
    /// value must not touch the UI
    session: u64,
}

impl Game {
    pub fn new(seed: u64, tuning: Tuning, settings: Settings) -> Self {
        Self {
            state: GameState::new(seed, tuning, settings.pool_sizes()),
            settings,
            identity: Identity::Anonymous,
            personal_best: PersonalBest::default(),
            last_time: None,
            fps: FpsCounter::default(),
            session: 0,
        }
    }

    /// Restore tuning, settings and personal best from storage
    pub fn load(seed: u64, store: &impl KeyValueStore) -> Self {
        let tuning = Tuning::load(store);
        let settings = Settings::load(store);
        let mut game = Self::new(seed, tuning, settings);
        game.personal_best = PersonalBest::load(store);
        log::info!(
            "Game initialized with seed {} (personal best {}s)",
            seed,
            game.personal_best.best
        );
        game
    }

    pub fn fps(&self) -> u32 {
        self.fps.fps()
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    /// Switch quality preset; pools are resized on the next (re)start
    pub fn set_quality(&mut self, preset: QualityPreset) {
        if preset != self.settings.quality {
            log::info!("Quality preset: {}", preset.as_str());
            self.settings.apply_preset(preset);
        }
    }

    /// Retry budget for this run's score submission
    pub fn submit_retry(&self) -> SubmitRetry {
        SubmitRetry::new(
            self.state.tuning.submit_retries,
            self.state.tuning.submit_retry_delay_ms,
        )
    }

    /// Advance one animation frame at `time_ms` (monotonic milliseconds).
    ///
    /// The first frame after a (re)start simulates zero time; afterwards the
    /// delta is clamped to `max_frame_dt` so a backgrounded tab cannot flood
    /// the shaft in one step.
    pub fn frame(&mut self, time_ms: f64) -> FrameOutcome {
        self.fps.record(time_ms);

        let dt = match self.last_time {
            Some(last) => (((time_ms - last) / 1000.0) as f32).clamp(0.0, self.state.tuning.max_frame_dt),
            None => 0.0,
        };
        self.last_time = Some(time_ms);

        let events = sim::tick(&mut self.state, dt);
        let game_over = events.game_over.then(|| self.finish_run());

        FrameOutcome {
            dt,
            events,
            game_over,
        }
    }

    /// Title screen -> running. Applies one nudge tick so water starts moving
    /// before the first animation frame arrives.
    pub fn start(&mut self) -> bool {
        if self.state.sim.is_game_started() {
            return false;
        }
        self.begin(self.state.seed);
        true
    }

    /// Fresh run straight from the game-over screen
    pub fn restart(&mut self, seed: u64) {
        self.begin(seed);
    }

    fn begin(&mut self, seed: u64) {
        let pools = self.settings.pool_sizes();
        if pools.raindrops != self.state.raindrops.len() || pools.clouds != self.state.clouds.len() {
            self.state = GameState::new(seed, self.state.tuning.clone(), pools);
        } else {
            self.state.reseed(seed);
        }
        self.state.begin_run();
        self.last_time = None;
        let nudge = self.state.tuning.start_nudge_dt;
        sim::tick(&mut self.state, nudge);
        log::info!("Run started with seed {}", seed);
    }

    /// Back to the title screen, e.g. after a wallet change
    pub fn reset_to_title(&mut self) {
        self.state.reset();
        self.last_time = None;
    }

    /// Returns true if a pump stroke was applied
    pub fn key_down(&mut self, code: &str) -> bool {
        if code != PUMP_KEY || !self.state.sim.is_game_started() {
            return false;
        }
        sim::press_pump(&mut self.state)
    }

    pub fn key_up(&mut self, code: &str) {
        if code == PUMP_KEY {
            sim::release_pump(&mut self.state);
        }
    }

    /// Replace the active identity. Always starts a new session on the title
    /// screen, even for the same wallet reconnecting.
    pub fn set_identity(&mut self, identity: Identity) {
        if identity != self.identity {
            log::info!("Player is now {}", identity.short_label());
        }
        self.identity = identity;
        self.session = self.session.wrapping_add(1);
        self.reset_to_title();
    }

    /// `Time: 12s (2.4x)`
    pub fn hud_text(&self) -> String {
        format!(
            "Time: {}s ({:.1}x)",
            self.state.sim.score(),
            self.state.effective_multiplier()
        )
    }

    fn finish_run(&mut self) -> GameOverReport {
        let score = self.state.sim.score();
        let previous_best = self.personal_best.best;
        let new_personal_best = self.personal_best.record(score);
        if new_personal_best {
            log::info!("New personal best: {}s", score);
        }
        GameOverReport {
            score,
            previous_best,
            new_personal_best,
            submission: ScoreSubmission::new(self.identity.wallet_str(), score),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::PIT_HEIGHT;
    use crate::persistence::MemoryStore;
    use crate::sim::GamePhase;

    fn dry_tuning() -> Tuning {
        Tuning {
            rain_chance_per_frame: 0.0,
            ..Default::default()
        }
    }

    fn game() -> Game {
        Game::new(3, dry_tuning(), Settings::default())
    }

    #[test]
    fn test_title_screen_does_not_advance() {
        let mut g = game();
        g.frame(0.0);
        let out = g.frame(500.0);
        assert_eq!(out.events, TickEvents::default());
        assert_eq!(g.state.sim.water_level, 0.0);
        assert!(!g.key_down(PUMP_KEY));
    }

    #[test]
    fn test_start_applies_nudge() {
        let mut g = game();
        assert!(g.start());
        assert!(!g.start());
        assert_eq!(g.state.sim.phase, GamePhase::Running);
        assert!((g.state.sim.game_time - 0.016).abs() < 1e-6);
        assert!(g.state.sim.water_level > 0.0);
    }

    #[test]
    fn test_first_frame_is_zero_and_dt_clamped() {
        let mut g = game();
        g.start();
        let first = g.frame(10_000.0);
        assert_eq!(first.dt, 0.0);
        let long_pause = g.frame(15_000.0);
        assert!((long_pause.dt - 0.1).abs() < 1e-6);
        let backwards = g.frame(14_000.0);
        assert_eq!(backwards.dt, 0.0);
    }

    #[test]
    fn test_space_pumps_once_per_press() {
        let mut g = game();
        g.start();
        g.state.sim.water_level = 200.0;
        assert!(g.key_down(PUMP_KEY));
        assert_eq!(g.state.sim.water_level, 120.0);
        assert!(!g.key_down("KeyA"));
        g.key_up(PUMP_KEY);
        assert!(!g.state.lever.pumping);
    }

    #[test]
    fn test_game_over_reported_once() {
        let mut g = game();
        g.identity = Identity::Wallet("0xabc".into());
        g.start();
        g.frame(0.0);
        g.state.sim.water_level = PIT_HEIGHT - 1.0;
        g.state.sim.game_time = 41.7;

        let out = g.frame(50.0);
        let report = out.game_over.expect("flooded");
        assert_eq!(report.score, 41);
        assert!(report.new_personal_best);
        assert_eq!(report.submission, ScoreSubmission::new("0xabc", 41));
        assert_eq!(report.final_score_text(), "Final Score: 41s");

        assert_eq!(g.frame(100.0).game_over, None);
        assert_eq!(g.personal_best.best, 41);
    }

    #[test]
    fn test_worse_run_keeps_best() {
        let mut g = game();
        g.personal_best.best = 100;
        g.start();
        g.frame(0.0);
        g.state.sim.water_level = PIT_HEIGHT;
        let report = g.frame(16.0).game_over.expect("flooded");
        assert!(!report.new_personal_best);
        assert_eq!(report.previous_best, 100);
        assert_eq!(report.submission.wallet, "Anonymous");
    }

    #[test]
    fn test_restart_is_fresh_run() {
        let mut g = game();
        g.start();
        g.state.sim.water_level = PIT_HEIGHT;
        g.frame(0.0);
        g.frame(16.0);
        assert!(g.state.sim.is_game_over());

        g.restart(99);
        assert!(g.state.sim.is_running());
        assert!(g.state.sim.water_level < 2.0);
        assert_eq!(g.state.seed, 99);
        assert_eq!(g.frame(1_000.0).dt, 0.0);
    }

    #[test]
    fn test_quality_change_applies_on_restart() {
        let mut g = game();
        g.settings = Settings::from_preset(crate::settings::QualityPreset::High);
        assert_eq!(g.state.raindrops.len(), 100);
        g.restart(1);
        assert_eq!(g.state.raindrops.len(), 160);
        assert_eq!(g.state.clouds.len(), 7);
    }

    #[test]
    fn test_identity_change_returns_to_title() {
        let mut g = game();
        g.start();
        g.set_identity(Identity::Wallet("0xdef".into()));
        assert_eq!(g.state.sim.phase, GamePhase::NotStarted);
        assert_eq!(g.state.sim.water_level, 0.0);
    }

    #[test]
    fn test_identity_change_starts_new_session() {
        let mut g = game();
        let before = g.session();
        g.set_identity(Identity::Wallet("0xdef".into()));
        let connected = g.session();
        assert_ne!(connected, before);

        // Disconnecting invalidates work started while connected
        g.set_identity(Identity::Anonymous);
        assert_ne!(g.session(), connected);

        // Frames and runs do not
        let current = g.session();
        g.start();
        g.frame(0.0);
        g.restart(5);
        assert_eq!(g.session(), current);
    }

    #[test]
    fn test_quality_from_query_applies_on_restart() {
        let mut g = game();
        let preset = QualityPreset::from_query("?quality=low").expect("preset");
        g.set_quality(preset);
        assert!(!g.settings.sparkles);
        assert_eq!(g.state.raindrops.len(), 100);
        g.restart(2);
        assert_eq!(g.state.raindrops.len(), 40);
        assert_eq!(g.state.clouds.len(), 3);
    }

    #[test]
    fn test_hud_text() {
        let mut g = game();
        g.start();
        g.state.sim.game_time = 12.9;
        g.state.sim.difficulty = 1.2;
        assert_eq!(g.hud_text(), "Time: 12s (1.2x)");
        g.state.weather.is_raining = true;
        assert_eq!(g.hud_text(), "Time: 12s (2.4x)");
    }

    #[test]
    fn test_load_restores_personal_best() {
        let mut store = MemoryStore::new();
        store.set(PersonalBest::STORAGE_KEY, "27");
        store.set(Tuning::STORAGE_KEY, r#"{ "pump_power": 60.0 }"#);
        let g = Game::load(1, &store);
        assert_eq!(g.personal_best.best, 27);
        assert_eq!(g.settings, Settings::default());
        assert_eq!(g.state.tuning.pump_power, 60.0);
    }

    #[test]
    fn test_fps_counter() {
        let mut fps = FpsCounter::default();
        for i in 1..=120 {
            fps.record(i as f64 * 1000.0 / 60.0);
        }
        assert!((59..=61).contains(&fps.fps()));
    }
}

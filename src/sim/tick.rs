//! Per-frame simulation tick
//!
//! Advances the run by one frame of wall-clock time. The pump is not handled
//! here: it reacts to input edges in `sim::pump`.

use rand::Rng;

use super::state::{GamePhase, GameState};
use crate::consts::PIT_HEIGHT;
use crate::tuning::Tuning;

/// What happened during a tick, for audio and logging
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickEvents {
    pub rain_started: bool,
    pub rain_stopped: bool,
    pub game_over: bool,
    pub pump_ready: bool,
}

/// `1 + (t * rate)^exponent`: superlinear in elapsed time only
#[inline]
pub fn difficulty_multiplier(game_time: f32, tuning: &Tuning) -> f32 {
    1.0 + (game_time.max(0.0) * tuning.difficulty_rate).powf(tuning.difficulty_exponent)
}

/// Advance the game state by `dt` seconds.
///
/// A no-op unless the run is started and not over. Reaching the top of the
/// pit ends the run immediately; nothing after the water step runs that frame.
pub fn tick(state: &mut GameState, dt: f32) -> TickEvents {
    let mut events = TickEvents::default();
    if !state.sim.is_running() {
        return events;
    }
    let dt = dt.max(0.0);

    state.sim.game_time += dt;
    state.sim.difficulty = difficulty_multiplier(state.sim.game_time, &state.tuning);

    let rise = state.tuning.water_rise_speed * state.sim.difficulty * state.rain_multiplier() * dt;
    state.sim.water_level = (state.sim.water_level + rise).clamp(0.0, PIT_HEIGHT);

    if state.sim.water_level >= PIT_HEIGHT {
        state.sim.phase = GamePhase::GameOver;
        events.game_over = true;
        log::info!(
            "Shaft flooded after {:.2}s (difficulty {:.2}x)",
            state.sim.game_time,
            state.sim.difficulty
        );
        return events;
    }

    // Independent trial every frame, so expected time-to-rain depends on frame rate
    if !state.weather.is_raining && state.rng.random::<f64>() < state.tuning.rain_chance_per_frame {
        start_rain(state);
        events.rain_started = true;
    }

    if state.weather.is_raining {
        state.weather.rain_timer_ms -= dt * 1000.0;
        if state.weather.rain_timer_ms <= 0.0 {
            stop_rain(state);
            events.rain_stopped = true;
        }
        for drop in &mut state.raindrops {
            drop.update(dt, &mut state.rng);
        }
    }

    let raining = state.weather.is_raining;
    for cloud in &mut state.clouds {
        cloud.update(dt, raining, &state.tuning);
    }

    let sky_step = dt * state.tuning.sky_darkness_rate;
    state.weather.sky_darkness = if raining {
        (state.weather.sky_darkness + sky_step).min(state.tuning.sky_darkness_max)
    } else {
        (state.weather.sky_darkness - sky_step).max(0.0)
    };

    if !state.sim.can_pump {
        state.sim.pump_cooldown -= dt;
        if state.sim.pump_cooldown <= 0.0 {
            state.sim.can_pump = true;
            events.pump_ready = true;
        }
    }

    events
}

pub fn start_rain(state: &mut GameState) {
    state.weather.is_raining = true;
    state.weather.rain_timer_ms = state.tuning.rain_duration_ms;
    log::debug!("Rain started at {:.1}s", state.sim.game_time);
}

pub fn stop_rain(state: &mut GameState) {
    state.weather.is_raining = false;
    state.weather.rain_timer_ms = 0.0;
    log::debug!("Rain stopped at {:.1}s", state.sim.game_time);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::PoolSizes;
    use proptest::prelude::*;

    fn dry_tuning() -> Tuning {
        Tuning {
            rain_chance_per_frame: 0.0,
            ..Default::default()
        }
    }

    fn running(tuning: Tuning) -> GameState {
        let mut state = GameState::new(12345, tuning, PoolSizes::default());
        state.begin_run();
        state
    }

    #[test]
    fn test_not_started_is_noop() {
        let mut state = GameState::new(1, dry_tuning(), PoolSizes::default());
        let before = state.clone();
        tick(&mut state, 1.0);
        assert_eq!(state, before);
    }

    #[test]
    fn test_one_second_rise_matches_formula() {
        let mut state = running(dry_tuning());
        tick(&mut state, 1.0);

        let expected = 80.0_f32 * (1.0 + 0.08_f32.powf(1.2));
        assert_eq!(state.sim.game_time, 1.0);
        assert_eq!(state.sim.water_level, expected);
        assert!((state.sim.water_level - 83.86).abs() < 0.01);
    }

    #[test]
    fn test_rain_doubles_rise() {
        let mut dry = running(dry_tuning());
        let mut wet = running(dry_tuning());
        start_rain(&mut wet);

        tick(&mut dry, 0.1);
        tick(&mut wet, 0.1);
        assert!((wet.sim.water_level - 2.0 * dry.sim.water_level).abs() < 1e-4);
    }

    #[test]
    fn test_flooding_ends_run_and_freezes_frame() {
        let mut state = running(dry_tuning());
        state.sim.water_level = 399.0;
        state.sim.can_pump = false;
        state.sim.pump_cooldown = 0.01;
        let clouds_before = state.clouds.clone();

        let events = tick(&mut state, 0.1);
        assert!(events.game_over);
        assert!(state.sim.is_game_over());
        assert_eq!(state.sim.water_level, PIT_HEIGHT);
        // Steps after the water check did not run
        assert_eq!(state.clouds, clouds_before);
        assert!(!state.sim.can_pump);

        let frozen = state.clone();
        tick(&mut state, 0.1);
        assert_eq!(state, frozen);
    }

    #[test]
    fn test_water_driven_to_top_by_repeated_updates() {
        let mut state = running(dry_tuning());
        let mut frames = 0;
        while !state.sim.is_game_over() {
            tick(&mut state, 0.1);
            frames += 1;
            assert!(frames < 10_000);
        }
        assert_eq!(state.sim.water_level, PIT_HEIGHT);
        let time = state.sim.game_time;
        tick(&mut state, 0.1);
        assert_eq!(state.sim.game_time, time);
    }

    #[test]
    fn test_rain_runs_out() {
        let mut state = running(dry_tuning());
        start_rain(&mut state);
        assert_eq!(state.weather.rain_timer_ms, 2000.0);

        let mut stopped = false;
        for _ in 0..21 {
            state.sim.water_level = 0.0;
            stopped |= tick(&mut state, 0.1).rain_stopped;
        }
        assert!(stopped);
        assert!(!state.weather.is_raining);
        assert_eq!(state.weather.rain_timer_ms, 0.0);
    }

    #[test]
    fn test_certain_rain_chance_starts_rain() {
        let tuning = Tuning {
            rain_chance_per_frame: 1.0,
            ..Default::default()
        };
        let mut state = running(tuning);
        let events = tick(&mut state, 0.016);
        assert!(events.rain_started);
        assert!(state.weather.is_raining);
        assert!(state.weather.rain_timer_ms > 0.0);
    }

    #[test]
    fn test_sky_darkness_clamped() {
        let mut state = running(dry_tuning());
        start_rain(&mut state);
        for _ in 0..5 {
            state.sim.water_level = 0.0;
            tick(&mut state, 0.1);
        }
        assert_eq!(state.weather.sky_darkness, 0.5);
    }

    #[test]
    fn test_pump_cooldown_rearms() {
        let mut state = running(dry_tuning());
        state.sim.can_pump = false;
        state.sim.pump_cooldown = 0.05;
        assert!(!tick(&mut state, 0.03).pump_ready);
        assert!(!state.sim.can_pump);
        assert!(tick(&mut state, 0.03).pump_ready);
        assert!(state.sim.can_pump);
    }

    proptest! {
        #[test]
        fn prop_water_stays_in_pit(
            start in 0.0f32..400.0,
            game_time in 0.0f32..600.0,
            dt in 0.0f32..0.1,
            raining in any::<bool>(),
        ) {
            let mut state = running(dry_tuning());
            state.sim.water_level = start;
            state.sim.game_time = game_time;
            if raining {
                start_rain(&mut state);
            }
            let multiplier = state.rain_multiplier();
            let difficulty = difficulty_multiplier(game_time + dt, &state.tuning);
            let rise = state.tuning.water_rise_speed * difficulty * multiplier * dt;

            tick(&mut state, dt);
            prop_assert!(state.sim.water_level >= 0.0);
            prop_assert!(state.sim.water_level <= PIT_HEIGHT);
            if state.sim.water_level == PIT_HEIGHT {
                prop_assert!(start + rise >= PIT_HEIGHT - 1e-3);
                prop_assert!(state.sim.is_game_over());
            }
        }

        #[test]
        fn prop_difficulty_monotonic(a in 0.0f32..10_000.0, b in 0.0f32..10_000.0) {
            let tuning = Tuning::default();
            let (t1, t2) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(difficulty_multiplier(t1, &tuning) <= difficulty_multiplier(t2, &tuning));
        }

        #[test]
        fn prop_pool_sizes_fixed(seed in any::<u64>(), frames in 1usize..400) {
            let tuning = Tuning {
                rain_chance_per_frame: 0.05,
                ..Default::default()
            };
            let mut state = GameState::new(seed, tuning, PoolSizes::default());
            state.begin_run();
            for _ in 0..frames {
                state.sim.water_level = 0.0;
                tick(&mut state, 1.0 / 60.0);
            }
            prop_assert_eq!(state.raindrops.len(), 100);
            prop_assert_eq!(state.clouds.len(), 5);
        }
    }
}

//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects, no external files. The cue table is
//! platform independent; playback exists only in the browser build.

use crate::game::FrameOutcome;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// A pump stroke drained water
    PumpStroke,
    /// Heavy rain began
    RainStart,
    /// The shaft flooded
    GameOver,
    /// The run beat the personal best
    NewBest,
}

/// Length of the flood sweep played on game over (s)
pub const FLOOD_SWEEP_SECS: f64 = 1.35;
/// The new-best arpeggio waits for the sweep to finish (s)
pub const NEW_BEST_DELAY_SECS: f64 = FLOOD_SWEEP_SECS + 0.05;

/// Sounds triggered by one frame, in play order
pub fn frame_cues(outcome: &FrameOutcome) -> Vec<SoundEffect> {
    let mut cues = Vec::new();
    if outcome.events.rain_started {
        cues.push(SoundEffect::RainStart);
    }
    if let Some(report) = &outcome.game_over {
        cues.push(SoundEffect::GameOver);
        if report.new_personal_best {
            cues.push(SoundEffect::NewBest);
        }
    }
    cues
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{FLOOD_SWEEP_SECS, NEW_BEST_DELAY_SECS, SoundEffect};
    use crate::settings::Settings;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: settings.effective_volume(),
            }
        }

        pub fn apply_settings(&mut self, settings: &Settings) {
            self.volume = settings.effective_volume();
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        pub fn play(&self, effect: SoundEffect) {
            let vol = self.volume;
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::PumpStroke => self.play_pump(ctx, vol),
                SoundEffect::RainStart => self.play_rain(ctx, vol),
                SoundEffect::GameOver => self.play_game_over(ctx, vol),
                SoundEffect::NewBest => self.play_new_best(ctx, vol),
            }
        }

        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Pump stroke - piston thunk with a falling gurgle
        fn play_pump(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            if let Some((osc, gain)) = self.create_osc(ctx, 120.0, OscillatorType::Square) {
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.08)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.1).ok();
            }

            if let Some((osc, gain)) = self.create_osc(ctx, 500.0, OscillatorType::Sine) {
                gain.gain().set_value_at_time(vol * 0.3, t + 0.03).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                    .ok();
                osc.frequency().set_value_at_time(500.0, t + 0.03).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(180.0, t + 0.2)
                    .ok();
                osc.start_with_when(t + 0.03).ok();
                osc.stop_with_when(t + 0.25).ok();
            }
        }

        /// Rain start - low thunder roll
        fn play_rain(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            for (i, freq) in [55.0, 70.0, 45.0].iter().enumerate() {
                let start = t + i as f64 * 0.15;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sawtooth) {
                    gain.gain().set_value_at_time(vol * 0.3, start).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, start + 0.6)
                        .ok();
                    osc.frequency()
                        .exponential_ramp_to_value_at_time(*freq * 0.6, start + 0.6)
                        .ok();
                    osc.start_with_when(start).ok();
                    osc.stop_with_when(start + 0.7).ok();
                }
            }
        }

        /// Flooded - a long falling sweep with wobbling bubbles on top
        fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            if let Some((osc, gain)) = self.create_osc(ctx, 320.0, OscillatorType::Sawtooth) {
                gain.gain().set_value_at_time(vol * 0.2, t).ok();
                gain.gain().linear_ramp_to_value_at_time(vol * 0.15, t + 0.9).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + FLOOD_SWEEP_SECS - 0.05)
                    .ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(40.0, t + FLOOD_SWEEP_SECS - 0.05)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + FLOOD_SWEEP_SECS).ok();
            }

            for (i, freq) in [900.0, 700.0, 820.0, 560.0, 640.0].iter().enumerate() {
                let start = t + 0.1 + i as f64 * 0.17;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                    gain.gain().set_value_at_time(vol * 0.2, start).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, start + 0.09)
                        .ok();
                    osc.frequency()
                        .exponential_ramp_to_value_at_time(*freq * 1.6, start + 0.09)
                        .ok();
                    osc.start_with_when(start).ok();
                    osc.stop_with_when(start + 0.1).ok();
                }
            }
        }

        /// New personal best - rising arpeggio after the flood sweep
        fn play_new_best(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [500.0, 630.0, 750.0, 1000.0].iter().enumerate() {
                let delay = NEW_BEST_DELAY_SECS + i as f64 * 0.08;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.25, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.3).ok();
                }
            }
        }
    }
}

//! Audio system using Web Audio API
//!
//! Cues with a configured file play through a fresh `<audio>` element each
//! time so they can overlap. Cues without one are synthesized. Every failure
//! (no context, blocked autoplay, missing file) is swallowed.

use std::collections::BTreeMap;

use wasm_bindgen::prelude::*;
use web_sys::{AudioContext, GainNode, HtmlAudioElement, OscillatorNode, OscillatorType};

use crate::settings::GameOptions;
use crate::sim::SoundCue;

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    assets: BTreeMap<SoundCue, String>,
    volume: f32,
    /// Rejection handler for `play()` promises
    swallow: Closure<dyn FnMut(JsValue)>,
}

impl AudioManager {
    pub fn new(options: &GameOptions) -> Self {
        // Fails outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - synthesized cues disabled");
        }
        Self {
            ctx,
            assets: options.sound_assets.clone(),
            volume: options.effective_volume(),
            swallow: Closure::new(|err: JsValue| {
                log::debug!("Audio playback rejected: {:?}", err);
            }),
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Fire and forget
    pub fn play(&self, cue: SoundCue) {
        if self.volume <= 0.0 {
            return;
        }
        match self.assets.get(&cue) {
            Some(src) => self.play_file(src),
            None => self.synthesize(cue),
        }
    }

    fn play_file(&self, src: &str) {
        let Ok(el) = HtmlAudioElement::new_with_src(src) else {
            log::debug!("Could not create audio element for {}", src);
            return;
        };
        el.set_volume(self.volume as f64);
        if let Ok(promise) = el.play() {
            let _ = promise.catch(&self.swallow);
        }
    }

    fn synthesize(&self, cue: SoundCue) {
        let Some(ctx) = &self.ctx else { return };

        // Browsers suspend the context until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let vol = self.volume;
        match cue {
            SoundCue::Catch => self.play_catch(ctx, vol),
            SoundCue::Perfect => self.play_perfect(ctx, vol),
            SoundCue::Damage => self.play_damage(ctx, vol),
            SoundCue::GameOver => self.play_game_over(ctx, vol),
            SoundCue::Start => self.play_start(ctx, vol),
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
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

    /// Short rising arpeggio; notes `delay` seconds apart
    fn arpeggio(&self, ctx: &AudioContext, vol: f32, freqs: &[f32], delay: f64, len: f64, osc_type: OscillatorType) {
        for (i, &freq) in freqs.iter().enumerate() {
            if let Some((osc, gain)) = self.create_osc(ctx, freq, osc_type) {
                let t = ctx.current_time() + i as f64 * delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + len)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + len + 0.05).ok();
            }
        }
    }

    /// Caught a note - bright blip
    fn play_catch(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 660.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency().set_value_at_time(660.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(880.0, t + 0.08)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Caught a top grade - happy ding
    fn play_perfect(&self, ctx: &AudioContext, vol: f32) {
        self.arpeggio(ctx, vol, &[660.0, 880.0, 1100.0], 0.07, 0.15, OscillatorType::Sine);
    }

    /// Caught a failing grade - low buzz
    fn play_damage(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 180.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.35, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.25)
            .ok();
        osc.frequency().set_value_at_time(180.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(70.0, t + 0.25)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.3).ok();
    }

    /// Game over - sad descending
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
            let delay = i as f64 * 0.2;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.4).ok();
            }
        }
    }

    /// Run started - whoosh up
    fn play_start(&self, ctx: &AudioContext, vol: f32) {
        self.arpeggio(ctx, vol, &[400.0, 500.0, 600.0, 800.0], 0.1, 0.3, OscillatorType::Triangle);
    }
}

//! Audio system
//!
//! The simulation talks to audio through [`AudioService`], handed to `tick`
//! explicitly. On wasm, [`AudioManager`] synthesizes every sound with the Web
//! Audio API - no external files needed. Everywhere else [`SilentAudio`]
//! swallows the calls.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Pickup collected
    Collect,
    /// Every pickup collected
    Win,
    /// Time's up
    Lose,
}

/// Fire-and-forget sound output
pub trait AudioService {
    fn play(&self, effect: SoundEffect);
    /// Start the background loop (no-op if already running or disabled)
    fn start_music(&self);
    fn stop_music(&self);
}

/// Audio sink that plays nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAudio;

impl AudioService for SilentAudio {
    fn play(&self, effect: SoundEffect) {
        log::debug!("(silent) {:?}", effect);
    }

    fn start_music(&self) {}

    fn stop_music(&self) {}
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::{Cell, RefCell};

    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioService, SoundEffect};

    /// Two detuned sines held for the ambient drone
    struct Drone {
        low: OscillatorNode,
        fifth: OscillatorNode,
        gain: GainNode,
    }

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        master_volume: f32,
        sfx_volume: f32,
        music_volume: f32,
        music_enabled: Cell<bool>,
        drone: RefCell<Option<Drone>>,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: 0.8,
                sfx_volume: 1.0,
                music_volume: 0.3,
                music_enabled: Cell::new(true),
                drone: RefCell::new(None),
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Set master volume (0.0 - 1.0)
        pub fn set_master_volume(&mut self, vol: f32) {
            self.master_volume = vol.clamp(0.0, 1.0);
        }

        /// Set SFX volume (0.0 - 1.0)
        pub fn set_sfx_volume(&mut self, vol: f32) {
            self.sfx_volume = vol.clamp(0.0, 1.0);
        }

        /// Set music volume (0.0 - 1.0), applied on the next music start
        pub fn set_music_volume(&mut self, vol: f32) {
            self.music_volume = vol.clamp(0.0, 1.0);
        }

        pub fn music_enabled(&self) -> bool {
            self.music_enabled.get()
        }

        /// Toggle the background drone; stops it immediately when disabled
        pub fn set_music_enabled(&self, enabled: bool) {
            self.music_enabled.set(enabled);
            if !enabled {
                self.stop_music();
            }
        }

        fn effective_volume(&self) -> f32 {
            self.master_volume * self.sfx_volume
        }

        fn effective_music_volume(&self) -> f32 {
            if !self.music_enabled.get() {
                0.0
            } else {
                self.master_volume * self.music_volume
            }
        }

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

        /// Single enveloped tone starting `delay` seconds from now
        fn tone(
            &self,
            ctx: &AudioContext,
            freq: f32,
            duration: f64,
            delay: f64,
            osc_type: OscillatorType,
            vol: f32,
        ) {
            let Some((osc, gain)) = self.create_osc(ctx, freq, osc_type) else {
                return;
            };
            let t = ctx.current_time() + delay;

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + duration)
                .ok();

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + duration).ok();
        }

        /// Collect - short high sine blip
        fn play_collect(&self, ctx: &AudioContext, vol: f32) {
            self.tone(ctx, 800.0, 0.1, 0.0, OscillatorType::Sine, vol);
        }

        /// Win - C E G square arpeggio
        fn play_win(&self, ctx: &AudioContext, vol: f32) {
            for (freq, duration, delay) in [(523.0, 0.3, 0.0), (659.0, 0.3, 0.2), (784.0, 0.5, 0.4)] {
                self.tone(ctx, freq, duration, delay, OscillatorType::Square, vol);
            }
        }

        /// Lose - low sawtooth buzz
        fn play_lose(&self, ctx: &AudioContext, vol: f32) {
            self.tone(ctx, 200.0, 0.5, 0.0, OscillatorType::Sawtooth, vol);
        }

        fn build_drone(&self, ctx: &AudioContext, vol: f32) -> Option<Drone> {
            let low = ctx.create_oscillator().ok()?;
            let fifth = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            // Low A and E
            low.set_type(OscillatorType::Sine);
            low.frequency().set_value(110.0);
            fifth.set_type(OscillatorType::Sine);
            fifth.frequency().set_value(165.0);
            gain.gain().set_value(vol * 0.33);

            low.connect_with_audio_node(&gain).ok()?;
            fifth.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            low.start().ok()?;
            fifth.start().ok()?;
            Some(Drone { low, fifth, gain })
        }
    }

    impl AudioService for AudioManager {
        fn play(&self, effect: SoundEffect) {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Collect => self.play_collect(ctx, vol),
                SoundEffect::Win => self.play_win(ctx, vol),
                SoundEffect::Lose => self.play_lose(ctx, vol),
            }
        }

        fn start_music(&self) {
            let vol = self.effective_music_volume();
            if vol <= 0.0 || self.drone.borrow().is_some() {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            match self.build_drone(ctx, vol) {
                Some(drone) => *self.drone.borrow_mut() = Some(drone),
                None => log::warn!("Could not start background drone"),
            }
        }

        fn stop_music(&self) {
            if let Some(drone) = self.drone.borrow_mut().take() {
                drone.low.stop().ok();
                drone.fifth.stop().ok();
                drone.gain.disconnect().ok();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_audio_accepts_everything() {
        let audio = SilentAudio;
        let service: &dyn AudioService = &audio;
        service.start_music();
        service.play(SoundEffect::Collect);
        service.play(SoundEffect::Win);
        service.stop_music();
    }
}

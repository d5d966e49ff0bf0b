//! Audio system using the Web Audio API
//!
//! Tick and fanfare effects are procedurally generated; background music and the
//! win sound stream from the URLs configured in settings. Playback failures
//! (blocked autoplay, missing context, unreachable URL) are swallowed; the spin
//! and winner logic never depend on a sound actually playing.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Wheel crossed a slice boundary
    SpinTick,
    /// Winner fanfare when the spin resolves
    WinFanfare,
}

/// Volume model shared by the web and native managers
#[derive(Debug, Clone, Copy)]
struct Volumes {
    master: f32,
    music: f32,
    sfx: f32,
    muted: bool,
}

impl Default for Volumes {
    fn default() -> Self {
        Self {
            master: 0.7,
            music: 0.5,
            sfx: 1.0,
            muted: false,
        }
    }
}

impl Volumes {
    fn effective_sfx(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master * self.sfx
        }
    }

    fn effective_music(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master * self.music
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{SoundEffect, Volumes};
    use web_sys::{AudioContext, GainNode, HtmlAudioElement, OscillatorNode, OscillatorType};

    /// Audio manager for the wheel
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        /// Looping background music element, replaced on each spin start
        music: Option<HtmlAudioElement>,
        volumes: Volumes,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                music: None,
                volumes: Volumes::default(),
            }
        }

        /// Resume the audio context (required after a user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Set master volume (0.0 - 1.0)
        pub fn set_master_volume(&mut self, vol: f32) {
            self.volumes.master = vol.clamp(0.0, 1.0);
            self.apply_music_volume();
        }

        /// Set background music volume (0.0 - 1.0)
        pub fn set_music_volume(&mut self, vol: f32) {
            self.volumes.music = vol.clamp(0.0, 1.0);
            self.apply_music_volume();
        }

        /// Set SFX volume (0.0 - 1.0)
        pub fn set_sfx_volume(&mut self, vol: f32) {
            self.volumes.sfx = vol.clamp(0.0, 1.0);
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.volumes.muted = muted;
            self.apply_music_volume();
        }

        fn apply_music_volume(&self) {
            if let Some(el) = &self.music {
                el.set_volume(self.volumes.effective_music() as f64);
            }
        }

        /// Start (or restart) looping background music from `url`
        pub fn play_music(&mut self, url: &str) {
            self.stop_music();
            let Ok(el) = HtmlAudioElement::new_with_src(url) else {
                log::warn!("Could not create music element for {url}");
                return;
            };
            el.set_loop(true);
            el.set_volume(self.volumes.effective_music() as f64);
            if el.play().is_err() {
                log::warn!("Background music blocked, continuing without it");
            }
            self.music = Some(el);
        }

        pub fn stop_music(&mut self) {
            if let Some(el) = self.music.take() {
                let _ = el.pause();
            }
        }

        /// Play the configured win sound; if the element can't be created the
        /// synthesized fanfare covers for it.
        pub fn play_win_sound(&self, url: &str) {
            match HtmlAudioElement::new_with_src(url) {
                Ok(el) => {
                    el.set_volume(self.volumes.effective_sfx() as f64);
                    if el.play().is_err() {
                        self.play(SoundEffect::WinFanfare);
                    }
                }
                Err(_) => self.play(SoundEffect::WinFanfare),
            }
        }

        /// Play a synthesized sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = self.volumes.effective_sfx();
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Browsers suspend the context until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::SpinTick => self.play_tick(ctx, vol),
                SoundEffect::WinFanfare => self.play_fanfare(ctx, vol),
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

        /// Slice tick - short sine drop, like a clacker passing a peg
        fn play_tick(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 200.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.15, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.001, t + 0.05)
                .ok();
            osc.frequency().set_value_at_time(200.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(50.0, t + 0.05)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.05).ok();
        }

        /// Winner fanfare - rising sawtooth arpeggio (A4, C#5, E5, A5)
        fn play_fanfare(&self, ctx: &AudioContext, vol: f32) {
            let notes = [440.0, 554.37, 659.25, 880.0];
            let now = ctx.current_time();

            for (i, freq) in notes.iter().enumerate() {
                let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sawtooth)
                else {
                    return;
                };
                let start = now + i as f64 * 0.15;

                gain.gain().set_value_at_time(vol * 0.25, start).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, start + 0.8)
                    .ok();

                osc.start_with_when(start).ok();
                osc.stop_with_when(start + 0.8).ok();
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

/// Native stub - same surface, no sound
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct AudioManager {
    volumes: Volumes,
}

#[cfg(not(target_arch = "wasm32"))]
impl AudioManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resume(&self) {}

    pub fn set_master_volume(&mut self, vol: f32) {
        self.volumes.master = vol.clamp(0.0, 1.0);
    }

    pub fn set_music_volume(&mut self, vol: f32) {
        self.volumes.music = vol.clamp(0.0, 1.0);
    }

    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.volumes.sfx = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.volumes.muted = muted;
    }

    pub fn play_music(&mut self, url: &str) {
        log::debug!("audio: music {url} at {:.2}", self.volumes.effective_music());
    }

    pub fn stop_music(&mut self) {}

    pub fn play_win_sound(&self, url: &str) {
        log::debug!("audio: win sound {url}");
    }

    pub fn play(&self, effect: SoundEffect) {
        if !self.volumes.muted {
            log::debug!("audio: {effect:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_music_volume_combines_master_and_music() {
        let mut v = Volumes::default();
        v.master = 0.5;
        v.music = 0.4;
        assert!((v.effective_music() - 0.2).abs() < 1e-6);
        assert!((v.effective_sfx() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_mute_silences_everything() {
        let v = Volumes {
            muted: true,
            ..Volumes::default()
        };
        assert_eq!(v.effective_music(), 0.0);
        assert_eq!(v.effective_sfx(), 0.0);
    }

    #[test]
    fn test_manager_volume_setters_clamp() {
        let mut audio = AudioManager::new();
        audio.set_master_volume(2.0);
        audio.set_music_volume(-1.0);
        assert_eq!(audio.volumes.master, 1.0);
        assert_eq!(audio.volumes.music, 0.0);
    }
}

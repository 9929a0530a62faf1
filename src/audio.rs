//! Audio cues
//!
//! Sound effects are described procedurally (oscillator steps + envelope) and
//! handed to an `AudioSink` owned by the host. The background loop follows the
//! store's music mute flag. Sink failures (no device, autoplay blocked) are
//! logged and dropped; they never reach game state.

use crate::Settings;
use crate::sim::{GameEvent, GameState};

/// Errors a backend may report
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AudioError {
    #[error("audio output unavailable")]
    Unavailable,
    #[error("playback rejected: {0}")]
    Rejected(String),
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
}

/// Frequency envelope of one oscillator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pitch {
    /// Jump between frequencies at the given offsets (secs, Hz)
    Steps(&'static [(f32, f32)]),
    /// Linear glide from one frequency to another over the tone
    Glide { from: f32, to: f32, secs: f32 },
}

/// One oscillator voice with a short attack and exponential release
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    pub pitch: Pitch,
    /// Peak gain before volume scaling
    pub peak: f32,
    pub attack_secs: f32,
    pub duration_secs: f32,
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Honey picked up - soft ascending chime
    Collect,
    /// Bee got hit - startled buzz
    Damage,
}

// E5 -> G5 -> B5
const COLLECT_NOTES: &[(f32, f32)] = &[(0.0, 659.25), (0.04, 783.99), (0.08, 987.77)];

const COLLECT_TONES: &[Tone] = &[Tone {
    waveform: Waveform::Triangle,
    pitch: Pitch::Steps(COLLECT_NOTES),
    peak: 0.08,
    attack_secs: 0.01,
    duration_secs: 0.4,
}];

// Two slightly detuned voices for the buzz
const DAMAGE_TONES: &[Tone] = &[
    Tone {
        waveform: Waveform::Triangle,
        pitch: Pitch::Glide {
            from: 380.0,
            to: 320.0,
            secs: 0.15,
        },
        peak: 0.06,
        attack_secs: 0.01,
        duration_secs: 0.2,
    },
    Tone {
        waveform: Waveform::Triangle,
        pitch: Pitch::Glide {
            from: 385.0,
            to: 325.0,
            secs: 0.15,
        },
        peak: 0.06,
        attack_secs: 0.01,
        duration_secs: 0.2,
    },
];

impl SoundEffect {
    /// Cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Collected { .. } => Some(SoundEffect::Collect),
            GameEvent::Damaged { .. } => Some(SoundEffect::Damage),
            GameEvent::GameOver { .. } => None,
        }
    }

    /// Voices making up this effect
    pub fn tones(self) -> &'static [Tone] {
        match self {
            SoundEffect::Collect => COLLECT_TONES,
            SoundEffect::Damage => DAMAGE_TONES,
        }
    }
}

/// Host audio backend
pub trait AudioSink {
    /// Fire-and-forget one voice at the given gain
    fn play_tone(&mut self, tone: &Tone, gain: f32) -> Result<(), AudioError>;

    /// Start or stop the looping background track
    fn set_music(&mut self, playing: bool, gain: f32) -> Result<(), AudioError>;
}

/// Sink that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play_tone(&mut self, tone: &Tone, gain: f32) -> Result<(), AudioError> {
        log::trace!("tone {:?} at gain {:.3}", tone.pitch, gain);
        Ok(())
    }

    fn set_music(&mut self, playing: bool, gain: f32) -> Result<(), AudioError> {
        log::debug!("music {} (gain {:.2})", if playing { "on" } else { "off" }, gain);
        Ok(())
    }
}

/// Audio manager for the game
pub struct AudioManager<S: AudioSink> {
    sink: S,
    sfx_gain: f32,
    music_gain: f32,
    /// Last music state pushed to the sink (None until the first sync)
    music_playing: Option<bool>,
}

impl<S: AudioSink> AudioManager<S> {
    pub fn new(sink: S, settings: &Settings) -> Self {
        Self {
            sink,
            sfx_gain: settings.effective_sfx_volume(),
            music_gain: settings.effective_music_volume(),
            music_playing: None,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        if self.sfx_gain <= 0.0 {
            return;
        }
        for tone in effect.tones() {
            let gain = tone.peak * self.sfx_gain;
            if let Err(err) = self.sink.play_tone(tone, gain) {
                log::warn!("Dropping {:?} cue: {}", effect, err);
                return;
            }
        }
    }

    /// Play cues for everything that happened this frame
    pub fn handle_events(&mut self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.play(effect);
        }
    }

    /// Keep the background loop in line with the mute flag
    pub fn sync_music(&mut self, state: &GameState) {
        let playing = !state.is_music_muted;
        if self.music_playing == Some(playing) {
            return;
        }
        match self.sink.set_music(playing, self.music_gain) {
            Ok(()) => self.music_playing = Some(playing),
            // Leave the state unknown so the next sync retries
            Err(err) => log::warn!("Background music unavailable: {}", err),
        }
    }
}

//! The delivery chime: a short sine blip sliding down an octave.
//!
//! The core never touches an audio device. It describes the tone as a
//! [`ChimeEnvelope`] and hands it to whatever [`AudioSink`] the host wired in.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Oscillator waveform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// Frequency and gain automation for a one-shot tone.
/// All times are seconds from the moment the tone starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChimeEnvelope {
    pub waveform: Waveform,
    pub start_hz: f32,
    pub end_hz: f32,
    /// When the exponential frequency slide reaches `end_hz`.
    pub sweep_end: f32,
    /// Near-silent gain at both ends (exponential ramps cannot touch zero).
    pub floor_gain: f32,
    pub peak_gain: f32,
    /// When the attack reaches `peak_gain`.
    pub attack_end: f32,
    /// When the decay is back at `floor_gain`.
    pub decay_end: f32,
    /// When the oscillator is stopped.
    pub stop_at: f32,
}

impl Default for ChimeEnvelope {
    fn default() -> Self {
        Self {
            waveform: Waveform::Sine,
            start_hz: 880.0,
            end_hz: 440.0,
            sweep_end: 0.25,
            floor_gain: 0.0001,
            peak_gain: 0.2,
            attack_end: 0.02,
            decay_end: 0.6,
            stop_at: 0.65,
        }
    }
}

/// `from * (to / from)^(t / span)`, the Web Audio exponential ramp.
fn exp_ramp(from: f32, to: f32, t: f32, span: f32) -> f32 {
    if span <= 0.0 {
        return to;
    }
    let k = (t / span).clamp(0.0, 1.0);
    from * (to / from).powf(k)
}

/// Instantaneous frequency and gain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChimeSample {
    pub frequency: f32,
    pub gain: f32,
}

impl ChimeEnvelope {
    pub fn frequency_at(&self, t: f32) -> f32 {
        if t <= 0.0 {
            self.start_hz
        } else {
            exp_ramp(self.start_hz, self.end_hz, t, self.sweep_end)
        }
    }

    pub fn gain_at(&self, t: f32) -> f32 {
        if t < 0.0 || t >= self.stop_at {
            0.0
        } else if t <= self.attack_end {
            exp_ramp(self.floor_gain, self.peak_gain, t, self.attack_end)
        } else {
            exp_ramp(self.peak_gain, self.floor_gain, t - self.attack_end, self.decay_end - self.attack_end)
        }
    }

    /// Evaluate the envelope `t` seconds after the tone starts.
    pub fn sample(&self, t: f32) -> ChimeSample {
        ChimeSample {
            frequency: self.frequency_at(t),
            gain: self.gain_at(t),
        }
    }

    /// Total time the tone occupies the output.
    pub fn duration(&self) -> f32 {
        self.stop_at
    }
}

/// Why a chime could not be played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// No audio backend in this environment.
    Unavailable,
    /// The backend refused one of the node or scheduling calls.
    Backend(String),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::Unavailable => write!(f, "audio output unavailable"),
            AudioError::Backend(msg) => write!(f, "audio backend error: {}", msg),
        }
    }
}

impl std::error::Error for AudioError {}

/// Something that can play a chime once, without blocking.
pub trait AudioSink {
    fn play(&mut self, envelope: &ChimeEnvelope) -> Result<(), AudioError>;
}

/// Sink for environments with no audio at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSink;

impl AudioSink for SilentSink {
    fn play(&mut self, _envelope: &ChimeEnvelope) -> Result<(), AudioError> {
        Err(AudioError::Unavailable)
    }
}

/// Fire the chime and forget it. Failures are dropped without logging.
/// Returns whether the sink accepted the tone.
pub fn play_chime<A: AudioSink + ?Sized>(sink: &mut A, envelope: &ChimeEnvelope) -> bool {
    sink.play(envelope).is_ok()
}

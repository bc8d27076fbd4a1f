use penguin_post::{AudioError, AudioSink, ChimeEnvelope, Waveform};
use wasm_bindgen::JsValue;
use web_sys::{AudioContext, OscillatorType};

fn backend(err: JsValue) -> AudioError {
    AudioError::Backend(format!("{:?}", err))
}

fn oscillator_type(waveform: Waveform) -> OscillatorType {
    match waveform {
        Waveform::Sine => OscillatorType::Sine,
        Waveform::Square => OscillatorType::Square,
        Waveform::Sawtooth => OscillatorType::Sawtooth,
        Waveform::Triangle => OscillatorType::Triangle,
    }
}

/// Plays the chime through one Web Audio context, opened on the first chime
/// and reused for every later one.
#[derive(Debug, Default)]
pub struct WebAudioSink {
    ctx: Option<AudioContext>,
}

impl WebAudioSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_context(&self) -> bool {
        self.ctx.is_some()
    }

    fn context(&mut self) -> Result<&AudioContext, AudioError> {
        if self.ctx.is_none() {
            let ctx = AudioContext::new().map_err(|_| AudioError::Unavailable)?;
            log::debug!("audio: context opened");
            self.ctx = Some(ctx);
        }
        self.ctx.as_ref().ok_or(AudioError::Unavailable)
    }
}

impl AudioSink for WebAudioSink {
    fn play(&mut self, env: &ChimeEnvelope) -> Result<(), AudioError> {
        let ctx = self.context()?;
        // Browsers suspend contexts created outside a gesture or left idle.
        let _ = ctx.resume().map_err(backend)?;
        let osc = ctx.create_oscillator().map_err(backend)?;
        let gain = ctx.create_gain().map_err(backend)?;
        let now = ctx.current_time();
        let at = |t: f32| now + t as f64;

        osc.set_type(oscillator_type(env.waveform));
        let freq = osc.frequency();
        freq.set_value_at_time(env.start_hz, now).map_err(backend)?;
        freq.exponential_ramp_to_value_at_time(env.end_hz, at(env.sweep_end)).map_err(backend)?;

        let level = gain.gain();
        level.set_value_at_time(env.floor_gain, now).map_err(backend)?;
        level.exponential_ramp_to_value_at_time(env.peak_gain, at(env.attack_end)).map_err(backend)?;
        level.exponential_ramp_to_value_at_time(env.floor_gain, at(env.decay_end)).map_err(backend)?;

        osc.connect_with_audio_node(&gain).map_err(backend)?;
        gain.connect_with_audio_node(&ctx.destination()).map_err(backend)?;
        osc.start_with_when(now).map_err(backend)?;
        osc.stop_with_when(at(env.stop_at)).map_err(backend)?;
        Ok(())
    }
}

//! Audio playback using the Web Audio API
//!
//! Procedurally generated tones - no external files needed!

use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

use crate::error::CapabilityError;
use crate::feedback::{Tone, ToneSink, Waveform};

/// Near-silent gain used as the envelope floor (exponential ramps cannot hit 0)
const SILENCE: f32 = 0.0001;
/// Envelope attack (seconds)
const ATTACK: f64 = 0.012;
/// Oscillator tail after the envelope closes (seconds)
const RELEASE_TAIL: f64 = 0.03;

fn oscillator_type(waveform: Waveform) -> OscillatorType {
    match waveform {
        Waveform::Sine => OscillatorType::Sine,
        Waveform::Triangle => OscillatorType::Triangle,
        Waveform::Square => OscillatorType::Square,
        Waveform::Sawtooth => OscillatorType::Sawtooth,
    }
}

fn failed(reason: &str) -> CapabilityError {
    CapabilityError::Failed {
        capability: "audio",
        reason: reason.to_string(),
    }
}

/// Tone sink over a lazily created `AudioContext`
#[derive(Default)]
pub struct WebAudio {
    ctx: Option<AudioContext>,
    /// Set once creation failed so we stop retrying every cue
    unavailable: bool,
}

impl WebAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Browsers only allow a running context after a user gesture, so the
    /// context is created on first use (which follows a click or key press).
    fn context(&mut self) -> Result<&AudioContext, CapabilityError> {
        if self.unavailable {
            return Err(CapabilityError::Unsupported("audio"));
        }
        if self.ctx.is_none() {
            match AudioContext::new() {
                Ok(ctx) => self.ctx = Some(ctx),
                Err(_) => {
                    log::warn!("Failed to create AudioContext - audio disabled");
                    self.unavailable = true;
                    return Err(CapabilityError::Unsupported("audio"));
                }
            }
        }
        self.ctx.as_ref().ok_or(CapabilityError::Unsupported("audio"))
    }

    /// Create an oscillator routed through a gain node
    fn create_osc(
        ctx: &AudioContext,
        osc_type: OscillatorType,
    ) -> Result<(OscillatorNode, GainNode), CapabilityError> {
        let osc = ctx.create_oscillator().map_err(|_| failed("create oscillator"))?;
        let gain = ctx.create_gain().map_err(|_| failed("create gain"))?;

        osc.set_type(osc_type);
        osc.connect_with_audio_node(&gain)
            .map_err(|_| failed("connect oscillator"))?;
        gain.connect_with_audio_node(&ctx.destination())
            .map_err(|_| failed("connect gain"))?;

        Ok((osc, gain))
    }
}

impl ToneSink for WebAudio {
    fn play(&mut self, tone: &Tone) -> Result<(), CapabilityError> {
        let ctx = self.context()?;

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let (osc, gain) = Self::create_osc(ctx, oscillator_type(tone.waveform))?;
        let start = ctx.current_time() + tone.offset_ms / 1000.0;
        let end = start + tone.duration as f64;

        osc.frequency().set_value_at_time(tone.frequency, start).ok();
        if let Some(target) = tone.glide_to {
            osc.frequency()
                .exponential_ramp_to_value_at_time(target, end)
                .ok();
        }

        gain.gain().set_value_at_time(SILENCE, start).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(tone.volume, start + ATTACK)
            .ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(SILENCE, end)
            .ok();

        osc.start_with_when(start).map_err(|_| failed("start"))?;
        osc.stop_with_when(end + RELEASE_TAIL)
            .map_err(|_| failed("stop"))?;
        Ok(())
    }
}

//! Audio and haptic feedback
//!
//! Game events map to cues: a few short synthesized tones plus a vibration
//! pattern. Playback goes through optional capabilities; when one is missing
//! or fails the cue is simply dropped.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::CapabilityError;
use crate::settings::Preferences;
use crate::sim::{GameEvent, VariantId};

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
    Sawtooth,
}

/// One synthesized tone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Start offset from the cue (ms)
    pub offset_ms: f64,
    /// Hz
    pub frequency: f32,
    /// Seconds
    pub duration: f32,
    pub waveform: Waveform,
    /// Peak gain
    pub volume: f32,
    /// Exponential glide target (Hz)
    pub glide_to: Option<f32>,
}

impl Tone {
    fn new(frequency: f32, duration: f32, waveform: Waveform, volume: f32) -> Self {
        Self {
            offset_ms: 0.0,
            frequency,
            duration,
            waveform,
            volume,
            glide_to: None,
        }
    }

    fn after(mut self, offset_ms: f64) -> Self {
        self.offset_ms = offset_ms;
        self
    }

    fn glide(mut self, to: f32) -> Self {
        self.glide_to = Some(to);
        self
    }
}

/// Tones and vibration for one event
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cue {
    pub tones: Vec<Tone>,
    /// Alternating vibrate/pause durations (ms)
    pub haptic: Vec<u32>,
}

pub fn start_cue() -> Cue {
    Cue {
        tones: vec![
            Tone::new(440.0, 0.08, Waveform::Sine, 0.045),
            Tone::new(680.0, 0.1, Waveform::Triangle, 0.04).after(70.0),
        ],
        haptic: vec![12],
    }
}

pub fn wave_cue() -> Cue {
    Cue {
        tones: vec![
            Tone::new(620.0, 0.08, Waveform::Triangle, 0.045),
            Tone::new(780.0, 0.09, Waveform::Triangle, 0.038).after(65.0),
        ],
        haptic: vec![10, 26, 10],
    }
}

pub fn miss_cue() -> Cue {
    Cue {
        tones: vec![Tone::new(180.0, 0.14, Waveform::Sawtooth, 0.034).glide(120.0)],
        haptic: vec![24],
    }
}

/// Hit cue: pitch by variant, raised with the combo
pub fn hit_cue(variant: VariantId, combo: u32) -> Cue {
    let base = match variant {
        VariantId::Scout => 520.0,
        VariantId::Tank => 360.0,
        VariantId::Glitch => 760.0,
        VariantId::Gold => 960.0,
    };
    let pitch = base + (combo as f32 * 18.0).min(170.0);
    let waveform = if variant == VariantId::Tank {
        Waveform::Square
    } else {
        Waveform::Triangle
    };

    let mut tones = vec![Tone::new(pitch, 0.075, waveform, 0.04)];
    let haptic = match variant {
        VariantId::Glitch => {
            tones.push(Tone::new(pitch + 120.0, 0.06, Waveform::Sine, 0.028).after(35.0));
            combo_haptic(combo)
        }
        VariantId::Gold => {
            tones.push(Tone::new(pitch + 240.0, 0.1, Waveform::Triangle, 0.05).after(45.0));
            vec![14, 28, 14]
        }
        _ => combo_haptic(combo),
    };
    Cue { tones, haptic }
}

fn combo_haptic(combo: u32) -> Vec<u32> {
    if combo >= 4 { vec![10, 18, 10] } else { vec![10] }
}

/// End cue: a rising arpeggio at or above `threshold`, a falling tone below
pub fn end_cue(score: u64, threshold: u64) -> Cue {
    if score >= threshold {
        Cue {
            tones: vec![
                Tone::new(520.0, 0.09, Waveform::Sine, 0.045),
                Tone::new(700.0, 0.11, Waveform::Sine, 0.038).after(85.0),
                Tone::new(860.0, 0.13, Waveform::Triangle, 0.04).after(175.0),
            ],
            haptic: vec![16, 34, 24],
        }
    } else {
        Cue {
            tones: vec![Tone::new(260.0, 0.16, Waveform::Sine, 0.032).glide(160.0)],
            haptic: vec![30],
        }
    }
}

/// Cue for an event, if it has one
pub fn cue_for(event: &GameEvent, end_threshold: u64) -> Option<Cue> {
    match event {
        GameEvent::Started { .. } => Some(start_cue()),
        GameEvent::WaveSpawned { .. } => Some(wave_cue()),
        GameEvent::Miss { .. } => Some(miss_cue()),
        GameEvent::Hit { variant, combo, .. } => Some(hit_cue(*variant, *combo)),
        GameEvent::Finished { score, .. } => Some(end_cue(*score, end_threshold)),
        GameEvent::ComboLost | GameEvent::Closed => None,
    }
}

/// Confetti particle count for a celebratory finish
pub fn celebration_particles(score: u64) -> u32 {
    (90 + score / 4).min(220) as u32
}

/// Tone playback capability
pub trait ToneSink {
    fn play(&mut self, tone: &Tone) -> Result<(), CapabilityError>;
}

/// Vibration capability
pub trait HapticSink {
    fn vibrate(&mut self, pattern: &[u32]) -> Result<(), CapabilityError>;
}

/// Optional celebratory particle effect
pub trait Celebration {
    fn launch(&mut self, particle_count: u32) -> Result<(), CapabilityError>;
}

/// Routes cues to whichever capabilities exist, gated by preferences
#[derive(Default)]
pub struct Feedback {
    tones: Option<Box<dyn ToneSink>>,
    haptics: Option<Box<dyn HapticSink>>,
}

impl Feedback {
    pub fn new(tones: Option<Box<dyn ToneSink>>, haptics: Option<Box<dyn HapticSink>>) -> Self {
        Self { tones, haptics }
    }

    /// Whether vibration is available at all (for showing the toggle)
    pub fn haptics_available(&self) -> bool {
        self.haptics.is_some()
    }

    pub fn emit(&mut self, cue: &Cue, prefs: &Preferences) {
        if prefs.sound_enabled {
            if let Some(sink) = self.tones.as_mut() {
                for tone in &cue.tones {
                    if let Err(e) = sink.play(tone) {
                        log::debug!("Tone dropped: {}", e);
                        break;
                    }
                }
            }
        }

        if prefs.haptics_enabled && !cue.haptic.is_empty() {
            if let Some(sink) = self.haptics.as_mut() {
                if let Err(e) = sink.vibrate(&cue.haptic) {
                    log::debug!("Haptic dropped: {}", e);
                }
            }
        }
    }
}

/// Capability stand-in that records everything it is asked to do.
/// Clones share the same log, so a host (or a test) can hand one clone to
/// the engine and inspect the other. Public for headless hosts and
/// integration tests.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    tones: Rc<RefCell<Vec<Tone>>>,
    haptics: Rc<RefCell<Vec<Vec<u32>>>>,
    celebrations: Rc<RefCell<Vec<u32>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tones(&self) -> Vec<Tone> {
        self.tones.borrow().clone()
    }

    pub fn haptics(&self) -> Vec<Vec<u32>> {
        self.haptics.borrow().clone()
    }

    pub fn celebrations(&self) -> Vec<u32> {
        self.celebrations.borrow().clone()
    }

    pub fn clear(&self) {
        self.tones.borrow_mut().clear();
        self.haptics.borrow_mut().clear();
        self.celebrations.borrow_mut().clear();
    }
}

impl ToneSink for Recorder {
    fn play(&mut self, tone: &Tone) -> Result<(), CapabilityError> {
        self.tones.borrow_mut().push(*tone);
        Ok(())
    }
}

impl HapticSink for Recorder {
    fn vibrate(&mut self, pattern: &[u32]) -> Result<(), CapabilityError> {
        self.haptics.borrow_mut().push(pattern.to_vec());
        Ok(())
    }
}

impl Celebration for Recorder {
    fn launch(&mut self, particle_count: u32) -> Result<(), CapabilityError> {
        self.celebrations.borrow_mut().push(particle_count);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl ToneSink for Broken {
        fn play(&mut self, _tone: &Tone) -> Result<(), CapabilityError> {
            Err(CapabilityError::Unsupported("audio"))
        }
    }

    impl HapticSink for Broken {
        fn vibrate(&mut self, _pattern: &[u32]) -> Result<(), CapabilityError> {
            Err(CapabilityError::Unsupported("vibration"))
        }
    }

    #[test]
    fn test_hit_cue_by_variant() {
        let scout = hit_cue(VariantId::Scout, 1);
        assert_eq!(scout.tones.len(), 1);
        assert_eq!(scout.tones[0].frequency, 538.0);
        assert_eq!(scout.tones[0].waveform, Waveform::Triangle);
        assert_eq!(scout.haptic, vec![10]);

        let tank = hit_cue(VariantId::Tank, 4);
        assert_eq!(tank.tones[0].waveform, Waveform::Square);
        assert_eq!(tank.haptic, vec![10, 18, 10]);

        let glitch = hit_cue(VariantId::Glitch, 2);
        assert_eq!(glitch.tones.len(), 2);
        assert_eq!(glitch.tones[1].frequency, 760.0 + 36.0 + 120.0);
        assert_eq!(glitch.tones[1].offset_ms, 35.0);

        let gold = hit_cue(VariantId::Gold, 20);
        assert_eq!(gold.tones[0].frequency, 960.0 + 170.0);
        assert_eq!(gold.tones[1].offset_ms, 45.0);
        assert_eq!(gold.haptic, vec![14, 28, 14]);
    }

    #[test]
    fn test_end_cue_tiers() {
        let big = end_cue(260, 260);
        assert_eq!(big.tones.len(), 3);
        assert_eq!(big.haptic, vec![16, 34, 24]);

        let small = end_cue(259, 260);
        assert_eq!(small.tones.len(), 1);
        assert_eq!(small.tones[0].glide_to, Some(160.0));
        assert_eq!(small.haptic, vec![30]);
    }

    #[test]
    fn test_events_without_cues() {
        assert!(cue_for(&GameEvent::ComboLost, 260).is_none());
        assert!(cue_for(&GameEvent::Closed, 260).is_none());
        assert_eq!(cue_for(&GameEvent::Miss { time_left: 3.0 }, 260), Some(miss_cue()));
    }

    #[test]
    fn test_celebration_particles() {
        assert_eq!(celebration_particles(260), 155);
        assert_eq!(celebration_particles(2000), 220);
    }

    #[test]
    fn test_emit_respects_preferences() {
        let recorder = Recorder::new();
        let mut feedback = Feedback::new(
            Some(Box::new(recorder.clone())),
            Some(Box::new(recorder.clone())),
        );
        let mut prefs = Preferences::default();

        feedback.emit(&start_cue(), &prefs);
        assert_eq!(recorder.tones().len(), 2);
        assert_eq!(recorder.haptics(), vec![vec![12]]);

        recorder.clear();
        prefs.sound_enabled = false;
        feedback.emit(&wave_cue(), &prefs);
        assert!(recorder.tones().is_empty());
        assert_eq!(recorder.haptics().len(), 1);

        recorder.clear();
        prefs.sound_enabled = true;
        prefs.haptics_enabled = false;
        feedback.emit(&miss_cue(), &prefs);
        assert_eq!(recorder.tones().len(), 1);
        assert!(recorder.haptics().is_empty());
    }

    #[test]
    fn test_missing_or_broken_capabilities_are_silent() {
        let mut none = Feedback::default();
        assert!(!none.haptics_available());
        none.emit(&start_cue(), &Preferences::default());

        let mut broken = Feedback::new(Some(Box::new(Broken)), Some(Box::new(Broken)));
        broken.emit(&end_cue(300, 260), &Preferences::default());
    }
}

//! Data-driven game balance
//!
//! Defaults mirror `consts`; a JSON override may replace any subset of fields.
//! Overrides are validated so a session can always run down to zero.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TuningError;

/// Tunable timing and balance values for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Round length (seconds)
    pub game_duration: f64,
    /// Ceiling for time_left (seconds)
    pub max_time_cap: f64,
    /// Time deducted per miss (seconds)
    pub miss_penalty: f64,
    /// Countdown and motion interval (ms)
    pub tick_ms: f64,
    /// Largest frame delta accepted by `Game::advance` (ms)
    pub max_frame_ms: f64,
    pub base_bugs_desktop: usize,
    pub base_bugs_mobile: usize,
    /// Combo continuation window (ms)
    pub combo_window_ms: f64,
    pub combo_decay_grace_ms: f64,
    pub wave_spawn_threshold: usize,
    pub wave_spawn_delay_ms: f64,
    pub celebration_score: u64,
    pub arena_shake_ms: f64,
    pub flash_message_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            game_duration: GAME_DURATION_SECONDS,
            max_time_cap: MAX_TIME_CAP,
            miss_penalty: MISS_TIME_PENALTY,
            tick_ms: TICK_RATE_MS,
            max_frame_ms: MAX_FRAME_MS,
            base_bugs_desktop: BASE_BUG_COUNT_DESKTOP,
            base_bugs_mobile: BASE_BUG_COUNT_MOBILE,
            combo_window_ms: COMBO_WINDOW_MS,
            combo_decay_grace_ms: COMBO_DECAY_GRACE_MS,
            wave_spawn_threshold: WAVE_SPAWN_THRESHOLD,
            wave_spawn_delay_ms: WAVE_SPAWN_DELAY_MS,
            celebration_score: CELEBRATION_SCORE,
            arena_shake_ms: ARENA_SHAKE_MS,
            flash_message_ms: FLASH_MESSAGE_MS,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override on top of the defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check the values the clock and countdown depend on
    pub fn validate(&self) -> Result<(), TuningError> {
        for (field, value) in [
            ("game_duration", self.game_duration),
            ("max_time_cap", self.max_time_cap),
            ("tick_ms", self.tick_ms),
            ("max_frame_ms", self.max_frame_ms),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(TuningError::NotPositive { field, value });
            }
        }
        if !self.miss_penalty.is_finite() || self.miss_penalty < 0.0 {
            return Err(TuningError::NegativePenalty(self.miss_penalty));
        }
        if self.game_duration > self.max_time_cap {
            return Err(TuningError::DurationAboveCap {
                duration: self.game_duration,
                cap: self.max_time_cap,
            });
        }
        Ok(())
    }

    /// Initial bug count for a device class
    pub fn base_bug_count(&self, mobile_like: bool) -> usize {
        if mobile_like {
            self.base_bugs_mobile
        } else {
            self.base_bugs_desktop
        }
    }

    /// Countdown decrement per tick (seconds)
    pub fn tick_seconds(&self) -> f64 {
        self.tick_ms / 1000.0
    }
}

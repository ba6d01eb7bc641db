//! QA Bug Hunt - a timed "squash the bugs" arena mini-game
//!
//! Core modules:
//! - `sim`: Simulation (variants, spawning, motion, pointer resolution, clock)
//! - `game`: Session state machine driving the simulation
//! - `feedback`: Audio/haptic cues derived from game events
//! - `persistence`: Key-value storage capability and best-effort accessors
//! - `platform`: Device probes and optional platform capabilities
//! - `tuning`: Data-driven game balance

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod error;
pub mod feedback;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{CapabilityError, StorageError, TuningError};
pub use game::Game;
pub use highscores::BestScore;
pub use settings::{MotionPreference, Preferences};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation interval for countdown and motion (ms)
    pub const TICK_RATE_MS: f64 = 33.0;
    /// Largest frame delta the clock will accept (ms); longer gaps freeze time
    pub const MAX_FRAME_MS: f64 = 100.0;

    /// Round length (seconds)
    pub const GAME_DURATION_SECONDS: f64 = 25.0;
    /// Ceiling for time_left after bonus awards (seconds)
    pub const MAX_TIME_CAP: f64 = 35.0;
    /// Time deducted per miss (seconds)
    pub const MISS_TIME_PENALTY: f64 = 1.2;

    /// Initial bug counts per device class
    pub const BASE_BUG_COUNT_DESKTOP: usize = 12;
    pub const BASE_BUG_COUNT_MOBILE: usize = 9;

    /// Hits closer together than this keep the combo going (ms)
    pub const COMBO_WINDOW_MS: f64 = 900.0;
    /// Slack added to the combo decay check (ms)
    pub const COMBO_DECAY_GRACE_MS: f64 = 50.0;

    /// Live bug count at or below which the next wave is queued
    pub const WAVE_SPAWN_THRESHOLD: usize = 3;
    /// Debounce before a queued wave spawns (ms)
    pub const WAVE_SPAWN_DELAY_MS: f64 = 75.0;

    /// Score at which the finish gets the celebratory treatment
    pub const CELEBRATION_SCORE: u64 = 260;

    /// Visual cue durations (ms)
    pub const ARENA_SHAKE_MS: f64 = 200.0;
    pub const FLASH_MESSAGE_MS: f64 = 900.0;

    /// Arena bounds bugs bounce inside (percent of arena)
    pub const ARENA_MIN_X: f32 = 5.0;
    pub const ARENA_MAX_X: f32 = 95.0;
    pub const ARENA_MIN_Y: f32 = 8.0;
    pub const ARENA_MAX_Y: f32 = 92.0;

    /// Smallest rendered bug on mobile-like devices (px)
    pub const MIN_TOUCH_TARGET_PX: u32 = 44;

    /// Inset bounds new bugs spawn inside (percent of arena)
    pub const SPAWN_MIN_X: f32 = 8.0;
    pub const SPAWN_MAX_X: f32 = 92.0;
    pub const SPAWN_MIN_Y: f32 = 12.0;
    pub const SPAWN_MAX_Y: f32 = 88.0;
}

/// Round to 2 decimal places (keeps the countdown free of float drift)
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(24.967), 24.97);
        assert_eq!(round2(0.004), 0.0);
        assert_eq!(round2(1.2 - 1.2), 0.0);
    }
}

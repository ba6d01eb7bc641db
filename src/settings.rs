//! Player preferences
//!
//! Each flag lives under its own key so the page and the game can share them.

use serde::{Deserialize, Serialize};

use crate::persistence::{
    self, HAPTICS_KEY, KeyValueStore, MOTION_KEY, SOUND_KEY,
};

/// Motion preference: forced on/off, or follow the platform's reduced-motion signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MotionPreference {
    On,
    Off,
    #[default]
    Auto,
}

impl MotionPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            MotionPreference::On => "on",
            MotionPreference::Off => "off",
            MotionPreference::Auto => "auto",
        }
    }

    /// Unknown values normalize to `Auto`
    pub fn parse(s: &str) -> Self {
        match s {
            "on" => MotionPreference::On,
            "off" => MotionPreference::Off,
            _ => MotionPreference::Auto,
        }
    }

    /// Whether motion effects run given the platform's reduced-motion signal
    pub fn motion_enabled(&self, reduce_motion: bool) -> bool {
        match self {
            MotionPreference::On => true,
            MotionPreference::Off => false,
            MotionPreference::Auto => !reduce_motion,
        }
    }
}

/// Game preferences
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Preferences {
    pub sound_enabled: bool,
    pub haptics_enabled: bool,
    pub motion: MotionPreference,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            haptics_enabled: true,
            motion: MotionPreference::Auto,
        }
    }
}

impl Preferences {
    /// Read every flag, falling back to defaults for anything missing or corrupt
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let defaults = Self::default();
        let motion = persistence::read_string(store, MOTION_KEY)
            .map(|s| MotionPreference::parse(&s))
            .unwrap_or_default();
        Self {
            sound_enabled: persistence::read_bool(store, SOUND_KEY, defaults.sound_enabled),
            haptics_enabled: persistence::read_bool(store, HAPTICS_KEY, defaults.haptics_enabled),
            motion,
        }
    }

    /// Flip sound and write it through. Returns the new value.
    pub fn toggle_sound(&mut self, store: &mut dyn KeyValueStore) -> bool {
        self.sound_enabled = !self.sound_enabled;
        persistence::write_bool(store, SOUND_KEY, self.sound_enabled);
        self.sound_enabled
    }

    /// Flip haptics and write it through. Returns the new value.
    pub fn toggle_haptics(&mut self, store: &mut dyn KeyValueStore) -> bool {
        self.haptics_enabled = !self.haptics_enabled;
        persistence::write_bool(store, HAPTICS_KEY, self.haptics_enabled);
        self.haptics_enabled
    }

    /// Set motion preference; `Auto` clears the stored key
    pub fn set_motion(&mut self, motion: MotionPreference, store: &mut dyn KeyValueStore) {
        self.motion = motion;
        match motion {
            MotionPreference::Auto => persistence::remove_key(store, MOTION_KEY),
            _ => persistence::write_string(store, MOTION_KEY, motion.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_defaults_when_empty() {
        let store = MemoryStore::new();
        assert_eq!(Preferences::load(&store), Preferences::default());
    }

    #[test]
    fn test_toggles_write_through() {
        let mut store = MemoryStore::new();
        let mut prefs = Preferences::load(&store);

        assert!(!prefs.toggle_sound(&mut store));
        assert!(!prefs.toggle_haptics(&mut store));
        assert_eq!(store.peek(SOUND_KEY).as_deref(), Some("false"));
        assert_eq!(store.peek(HAPTICS_KEY).as_deref(), Some("false"));

        let reloaded = Preferences::load(&store);
        assert!(!reloaded.sound_enabled);
        assert!(!reloaded.haptics_enabled);
    }

    #[test]
    fn test_motion_preference_round_trip_and_auto_clears() {
        let mut store = MemoryStore::with_entries([(MOTION_KEY, "sideways")]);
        let mut prefs = Preferences::load(&store);
        assert_eq!(prefs.motion, MotionPreference::Auto);

        prefs.set_motion(MotionPreference::Off, &mut store);
        assert_eq!(store.peek(MOTION_KEY).as_deref(), Some("off"));
        assert_eq!(Preferences::load(&store).motion, MotionPreference::Off);

        prefs.set_motion(MotionPreference::Auto, &mut store);
        assert_eq!(store.peek(MOTION_KEY), None);
    }

    #[test]
    fn test_motion_enabled_resolution() {
        assert!(MotionPreference::On.motion_enabled(true));
        assert!(!MotionPreference::Off.motion_enabled(false));
        assert!(MotionPreference::Auto.motion_enabled(false));
        assert!(!MotionPreference::Auto.motion_enabled(true));
    }

    #[test]
    fn test_toggle_survives_denied_storage() {
        let mut store = MemoryStore::new();
        store.set_denied(true);
        let mut prefs = Preferences::load(&store);
        assert!(!prefs.toggle_sound(&mut store));
        assert!(!prefs.sound_enabled);
    }
}

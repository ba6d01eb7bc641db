//! Best score record
//!
//! A single scalar persisted across sessions.

use crate::persistence::{self, KeyValueStore};

/// The best finished-session score seen so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BestScore {
    value: u64,
}

impl BestScore {
    /// Load from storage (0 when missing, invalid or unreadable)
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let value = persistence::read_best_score(store);
        if value > 0 {
            log::info!("Loaded best score {}", value);
        }
        Self { value }
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    /// Check if a score would beat the record
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.value
    }

    /// Record a finished score, writing through when it beats the best.
    /// Returns true on a new record.
    pub fn record(&mut self, score: u64, store: &mut dyn KeyValueStore) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.value = score;
        persistence::write_best_score(store, score);
        log::info!("New best score {}", score);
        true
    }
}

//! Session state and core simulation types

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::variant::{BugVariant, VariantId};
use crate::consts::MIN_TOUCH_TARGET_PX;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GamePhase {
    /// Pre-game, or the game was closed
    #[default]
    Idle,
    /// Active play
    Running,
    /// Results shown
    Finished,
}

/// Opaque bug identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BugId(pub u32);

impl std::fmt::Display for BugId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bug-{}", self.0)
    }
}

/// A bug entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bug {
    pub id: BugId,
    /// Position in arena percent
    pub pos: Vec2,
    /// Velocity in arena percent per tick
    pub vel: Vec2,
    /// Diameter in pixels
    pub size: u32,
    pub variant: VariantId,
    /// Terminal: once set the bug never moves or scores again
    pub squashed: bool,
}

impl Bug {
    pub fn variant(&self) -> &'static BugVariant {
        self.variant.variant()
    }

    pub fn is_live(&self) -> bool {
        !self.squashed
    }

    /// Rendered diameter (px); touch devices never go below the minimum target
    pub fn hit_size(&self, mobile_like: bool) -> u32 {
        if mobile_like {
            self.size.max(MIN_TOUCH_TARGET_PX)
        } else {
            self.size
        }
    }
}

/// Something that happened during a session, in order.
/// Drained by the host for rendering and used to derive feedback cues.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Started {
        mobile_like: bool,
        bug_count: usize,
    },
    Hit {
        bug: BugId,
        variant: VariantId,
        combo: u32,
        gained: u64,
        bonus_time: f64,
    },
    Miss {
        time_left: f64,
    },
    ComboLost,
    WaveSpawned {
        wave: u32,
        count: usize,
    },
    Finished {
        score: u64,
        new_best: bool,
    },
    Closed,
}

/// Mutable state of one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    pub phase: GamePhase,
    /// Seconds remaining, within [0, max time cap]
    pub time_left: f64,
    pub score: u64,
    pub combo: u32,
    pub hits: u32,
    pub misses: u32,
    /// Current wave (1-based)
    pub wave: u32,
    /// Device class captured at start
    pub mobile_like: bool,
    /// Bugs in spawn order
    pub bugs: Vec<Bug>,
}

impl GameSession {
    /// Fresh idle session
    pub fn new(game_duration: f64) -> Self {
        Self {
            phase: GamePhase::Idle,
            time_left: game_duration,
            score: 0,
            combo: 0,
            hits: 0,
            misses: 0,
            wave: 1,
            mobile_like: false,
            bugs: Vec::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Bugs that can still be hit
    pub fn live_bugs(&self) -> impl Iterator<Item = &Bug> {
        self.bugs.iter().filter(|b| b.is_live())
    }

    pub fn live_count(&self) -> usize {
        self.live_bugs().count()
    }

    pub fn bug(&self, id: BugId) -> Option<&Bug> {
        self.bugs.iter().find(|b| b.id == id)
    }

    /// Hit accuracy in percent (100 before any attempt)
    pub fn accuracy(&self) -> u32 {
        let attempts = self.hits + self.misses;
        if attempts == 0 {
            return 100;
        }
        ((self.hits as f64 / attempts as f64) * 100.0).round() as u32
    }
}

/// Time bar fill in percent
pub fn progress_percent(time_left: f64, game_duration: f64) -> f64 {
    if game_duration <= 0.0 {
        return 0.0;
    }
    (time_left / game_duration * 100.0).clamp(0.0, 100.0)
}

/// Rank shown on the results screen
pub fn result_label(score: u64, accuracy: u32, wave: u32) -> String {
    if score >= 450 && accuracy >= 85 {
        "Legendary QA Commander".to_string()
    } else if score >= 320 && accuracy >= 75 {
        "Automation Ace".to_string()
    } else if score >= 220 {
        "High-Impact Bug Hunter".to_string()
    } else if score >= 140 {
        "Reliable QA Specialist".to_string()
    } else {
        format!("Warmed up through wave {}", wave)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy() {
        let mut session = GameSession::new(25.0);
        assert_eq!(session.accuracy(), 100);
        session.hits = 2;
        session.misses = 1;
        assert_eq!(session.accuracy(), 67);
        session.hits = 0;
        assert_eq!(session.accuracy(), 0);
    }

    #[test]
    fn test_progress_clamps() {
        assert_eq!(progress_percent(12.5, 25.0), 50.0);
        assert_eq!(progress_percent(30.0, 25.0), 100.0);
        assert_eq!(progress_percent(0.0, 25.0), 0.0);
    }

    #[test]
    fn test_result_labels() {
        assert_eq!(result_label(500, 90, 6), "Legendary QA Commander");
        assert_eq!(result_label(500, 80, 6), "Automation Ace");
        assert_eq!(result_label(320, 60, 4), "High-Impact Bug Hunter");
        assert_eq!(result_label(150, 10, 2), "Reliable QA Specialist");
        assert_eq!(result_label(30, 100, 2), "Warmed up through wave 2");
    }

    #[test]
    fn test_hit_size_has_touch_minimum() {
        let mut bug = Bug {
            id: BugId(1),
            pos: Vec2::new(50.0, 50.0),
            vel: Vec2::ZERO,
            size: 26,
            variant: VariantId::Gold,
            squashed: false,
        };
        assert_eq!(bug.hit_size(false), 26);
        assert_eq!(bug.hit_size(true), 44);

        bug.size = 52;
        assert_eq!(bug.hit_size(true), 52);
        assert_eq!(bug.hit_size(false), 52);
    }

    #[test]
    fn test_bug_id_display() {
        assert_eq!(BugId(7).to_string(), "bug-7");
    }
}

//! Pointer resolution and combo scoring
//!
//! The host resolves the pointer-down target once; a press on a bug is a hit
//! and never also a miss on the arena behind it.

use super::state::BugId;

/// Pointer device type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}

impl PointerKind {
    /// Parse a DOM `pointerType`; unknown types are treated like touch
    pub fn from_dom(pointer_type: &str) -> Self {
        match pointer_type {
            "mouse" => PointerKind::Mouse,
            "pen" => PointerKind::Pen,
            _ => PointerKind::Touch,
        }
    }
}

/// What the pointer landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// A bug's hit region
    Bug(BugId),
    /// The arena background itself
    Arena,
    /// Anything else (HUD, buttons, outside the arena)
    Outside,
}

/// A pointer-down event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerInput {
    pub kind: PointerKind,
    pub is_primary: bool,
    /// DOM button index (0 = main)
    pub button: i16,
    pub target: PointerTarget,
}

impl PointerInput {
    /// Primary mouse press on a target
    pub fn mouse(target: PointerTarget) -> Self {
        Self {
            kind: PointerKind::Mouse,
            is_primary: true,
            button: 0,
            target,
        }
    }

    /// Primary touch contact on a target
    pub fn touch(target: PointerTarget) -> Self {
        Self {
            kind: PointerKind::Touch,
            is_primary: true,
            button: 0,
            target,
        }
    }

    /// Primary pointer only; mouse additionally needs the main button
    pub fn is_primary_press(&self) -> bool {
        if !self.is_primary {
            return false;
        }
        match self.kind {
            PointerKind::Mouse => self.button == 0,
            PointerKind::Touch | PointerKind::Pen => true,
        }
    }
}

/// Outcome of a pointer-down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strike {
    Hit(BugId),
    Miss,
}

/// Turn a pointer-down into at most one strike
pub fn resolve_pointer(input: &PointerInput) -> Option<Strike> {
    if !input.is_primary_press() {
        return None;
    }
    match input.target {
        PointerTarget::Bug(id) => Some(Strike::Hit(id)),
        PointerTarget::Arena => Some(Strike::Miss),
        PointerTarget::Outside => None,
    }
}

/// Combo after a hit at `now`, given the previous hit time.
/// Within the window the combo grows, otherwise it restarts at 1.
pub fn next_combo(combo: u32, last_hit_at: Option<f64>, now: f64, window_ms: f64) -> u32 {
    match last_hit_at {
        Some(last) if now - last < window_ms => combo + 1,
        _ => 1,
    }
}

/// Score multiplier: +18% per chained hit, at most +150%
pub fn combo_multiplier(combo: u32) -> f64 {
    1.0 + (combo.saturating_sub(1) as f64 * 0.18).min(1.5)
}

/// Points awarded for a hit at a given combo
pub fn hit_score(points: u32, combo: u32) -> u64 {
    (points as f64 * combo_multiplier(combo)).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_filter() {
        let mut input = PointerInput::mouse(PointerTarget::Arena);
        assert!(input.is_primary_press());

        input.button = 2;
        assert!(!input.is_primary_press());

        let mut touch = PointerInput::touch(PointerTarget::Arena);
        touch.button = -1;
        assert!(touch.is_primary_press());

        touch.is_primary = false;
        assert!(!touch.is_primary_press());
    }

    #[test]
    fn test_bug_press_is_only_a_hit() {
        let press = PointerInput::mouse(PointerTarget::Bug(BugId(3)));
        assert_eq!(resolve_pointer(&press), Some(Strike::Hit(BugId(3))));
        assert_eq!(
            resolve_pointer(&PointerInput::touch(PointerTarget::Arena)),
            Some(Strike::Miss)
        );
        assert_eq!(resolve_pointer(&PointerInput::mouse(PointerTarget::Outside)), None);
    }

    #[test]
    fn test_next_combo() {
        assert_eq!(next_combo(0, None, 10.0, 900.0), 1);
        assert_eq!(next_combo(1, Some(0.0), 500.0, 900.0), 2);
        assert_eq!(next_combo(4, Some(0.0), 899.0, 900.0), 5);
        assert_eq!(next_combo(4, Some(0.0), 900.0, 900.0), 1);
    }

    #[test]
    fn test_multiplier_and_score() {
        assert_eq!(combo_multiplier(1), 1.0);
        assert!((combo_multiplier(2) - 1.18).abs() < 1e-12);
        assert_eq!(combo_multiplier(50), 2.5);
        assert_eq!(hit_score(10, 1), 10);
        assert_eq!(hit_score(10, 2), 12);
        assert_eq!(hit_score(34, 3), 46);
        assert_eq!(hit_score(16, 20), 40);
    }
}

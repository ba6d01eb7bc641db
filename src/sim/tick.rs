//! Fixed-interval simulation steps
//!
//! Pure functions run by the countdown and motion timers.

use super::state::Bug;
use crate::consts::*;
use crate::round2;

/// Advance one bug by its velocity, bouncing off the arena walls.
/// Each axis reflects independently when it reaches its bound.
pub fn step_bug(bug: &mut Bug) {
    if bug.squashed {
        return;
    }

    let mut next = bug.pos + bug.vel;

    if next.x <= ARENA_MIN_X || next.x >= ARENA_MAX_X {
        bug.vel.x = -bug.vel.x;
        next.x = next.x.clamp(ARENA_MIN_X, ARENA_MAX_X);
    }
    if next.y <= ARENA_MIN_Y || next.y >= ARENA_MAX_Y {
        bug.vel.y = -bug.vel.y;
        next.y = next.y.clamp(ARENA_MIN_Y, ARENA_MAX_Y);
    }

    bug.pos = next;
}

/// Motion tick: move every live bug
pub fn step_bugs(bugs: &mut [Bug]) {
    for bug in bugs.iter_mut() {
        step_bug(bug);
    }
}

/// Subtract `seconds` from the clock, rounded to 2 decimals and floored at 0
pub fn drain_time(time_left: f64, seconds: f64) -> f64 {
    round2(time_left - seconds).max(0.0)
}

/// Add bonus seconds, rounded to 2 decimals and capped
pub fn award_time(time_left: f64, seconds: f64, cap: f64) -> f64 {
    round2(time_left + seconds).min(cap)
}

//! Bug factory
//!
//! Bugs get faster with each wave (capped at +72%) and slightly larger but
//! slower on mobile-like devices.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::state::{Bug, BugId};
use super::variant::pick_variant;
use crate::consts::*;

/// Size bonus for touch targets (px)
pub const MOBILE_SIZE_BOOST: f32 = 6.0;
/// Speed multiplier for mobile-like devices
pub const MOBILE_SPEED_SCALE: f32 = 0.84;

/// Speed multiplier for a wave: +8% per wave after the first, at most +72%
pub fn wave_speed_boost(wave: u32) -> f32 {
    1.0 + (wave.saturating_sub(1) as f32 * 0.08).min(0.72)
}

/// Bugs added when a new wave spawns
pub fn extra_bugs_for_wave(wave: u32, mobile_like: bool) -> usize {
    let half = (wave / 2) as usize;
    if mobile_like {
        3 + half.min(2)
    } else {
        4 + half.min(3)
    }
}

/// Create one bug for the given wave and device class
pub fn create_bug<R: Rng>(rng: &mut R, id: BugId, wave: u32, mobile_like: bool) -> Bug {
    let variant = pick_variant(rng);
    let (min_size, max_size) = variant.size_range;
    let (min_speed, max_speed) = variant.speed_range;

    let size_boost = if mobile_like { MOBILE_SIZE_BOOST } else { 0.0 };
    let speed_scale = if mobile_like { MOBILE_SPEED_SCALE } else { 1.0 };
    let speed = rng.random_range(min_speed..max_speed) * wave_speed_boost(wave) * speed_scale;
    let heading = rng.random_range(0.0..TAU);

    let pos = Vec2::new(
        rng.random_range(SPAWN_MIN_X..SPAWN_MAX_X),
        rng.random_range(SPAWN_MIN_Y..SPAWN_MAX_Y),
    );
    let size = rng
        .random_range(min_size + size_boost..max_size + size_boost)
        .round() as u32;

    Bug {
        id,
        pos,
        vel: Vec2::new(heading.cos(), heading.sin()) * speed,
        size,
        variant: variant.id,
        squashed: false,
    }
}

/// Create `count` bugs, taking ids from `next_id`
pub fn spawn_bugs<R: Rng>(
    rng: &mut R,
    next_id: &mut u32,
    count: usize,
    wave: u32,
    mobile_like: bool,
) -> Vec<Bug> {
    (0..count)
        .map(|_| {
            let id = BugId(*next_id);
            *next_id += 1;
            create_bug(rng, id, wave, mobile_like)
        })
        .collect()
}

//! Simulation module
//!
//! All gameplay rules live here. This module must stay platform free:
//! - Virtual time only (see `clock`)
//! - Injected RNG only
//! - Stable iteration order (spawn order)

pub mod clock;
pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod variant;

pub use clock::{Scheduler, TimerId, TimerKind};
pub use collision::{
    PointerInput, PointerKind, PointerTarget, Strike, combo_multiplier, hit_score, next_combo,
    resolve_pointer,
};
pub use spawn::{create_bug, extra_bugs_for_wave, spawn_bugs, wave_speed_boost};
pub use state::{Bug, BugId, GameEvent, GamePhase, GameSession, progress_percent, result_label};
pub use tick::{award_time, drain_time, step_bug, step_bugs};
pub use variant::{BugVariant, VARIANTS, VariantId, pick_variant, variant_for_roll};

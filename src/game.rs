//! Session state machine
//!
//! `Game` owns the session, its timers and the injected capabilities. The
//! host feeds it elapsed time, pointer-downs and key presses; everything else
//! (countdown, motion, waves, combo decay) runs off the internal scheduler.
//!
//! Phases: `Idle --start--> Running --time out--> Finished --start--> Running`,
//! and `close` returns to `Idle` from anywhere.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::error::TuningError;
use crate::feedback::{self, Celebration, Feedback};
use crate::highscores::BestScore;
use crate::persistence::KeyValueStore;
use crate::platform::{Capabilities, DeviceProbe};
use crate::settings::{MotionPreference, Preferences};
use crate::sim::{
    BugId, GameEvent, GamePhase, GameSession, PointerInput, Scheduler, Strike, TimerId,
    TimerKind, award_time, drain_time, extra_bugs_for_wave, hit_score, next_combo,
    progress_percent, resolve_pointer, result_label, spawn_bugs, step_bugs,
};
use crate::tuning::Tuning;

/// Timers that only exist while running
#[derive(Debug, Default)]
struct RunTimers {
    countdown: Option<TimerId>,
    motion: Option<TimerId>,
    wave_spawn: Option<TimerId>,
    combo_decay: Option<TimerId>,
}

/// The mini-game engine
pub struct Game {
    session: GameSession,
    tuning: Tuning,
    clock: Scheduler,
    rng: Pcg32,
    next_bug_id: u32,

    storage: Box<dyn KeyValueStore>,
    device: Box<dyn DeviceProbe>,
    feedback: Feedback,
    celebration: Option<Box<dyn Celebration>>,
    prefs: Preferences,
    best: BestScore,

    last_hit_at: Option<f64>,
    /// A wave spawn is queued and has not fired yet
    wave_spawn_queued: bool,
    timers: RunTimers,

    arena_shaking: bool,
    shake_timer: Option<TimerId>,
    flash: Option<String>,
    flash_timer: Option<TimerId>,

    events: Vec<GameEvent>,
}

impl Game {
    /// Create an idle game with default tuning
    pub fn new(seed: u64, caps: Capabilities) -> Self {
        Self::build(seed, caps, Tuning::default())
    }

    /// Create an idle game with custom tuning, rejecting values that would
    /// stall the countdown or push time past the cap
    pub fn with_tuning(
        seed: u64,
        caps: Capabilities,
        tuning: Tuning,
    ) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::build(seed, caps, tuning))
    }

    fn build(seed: u64, caps: Capabilities, tuning: Tuning) -> Self {
        let Capabilities {
            storage,
            device,
            audio,
            haptics,
            celebration,
        } = caps;

        let prefs = Preferences::load(storage.as_ref());
        let best = BestScore::load(storage.as_ref());
        log::info!(
            "Bug hunt ready (seed {}, best {}, sound {}, haptics {})",
            seed,
            best.value(),
            prefs.sound_enabled,
            prefs.haptics_enabled
        );

        Self {
            session: GameSession::new(tuning.game_duration),
            tuning,
            clock: Scheduler::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_bug_id: 1,
            storage,
            device,
            feedback: Feedback::new(audio, haptics),
            celebration,
            prefs,
            best,
            last_hit_at: None,
            wave_spawn_queued: false,
            timers: RunTimers::default(),
            arena_shaking: false,
            shake_timer: None,
            flash: None,
            flash_timer: None,
            events: Vec::new(),
        }
    }

    // === Read-outs ===

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    pub fn best_score(&self) -> u64 {
        self.best.value()
    }

    /// Current virtual time (ms)
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Timers still scheduled (0 once closed)
    pub fn pending_timers(&self) -> usize {
        self.clock.pending()
    }

    pub fn flash_message(&self) -> Option<&str> {
        self.flash.as_deref()
    }

    pub fn arena_shaking(&self) -> bool {
        self.arena_shaking
    }

    pub fn haptics_available(&self) -> bool {
        self.feedback.haptics_available()
    }

    pub fn motion_enabled(&self) -> bool {
        self.prefs
            .motion
            .motion_enabled(self.device.prefers_reduced_motion())
    }

    pub fn accuracy(&self) -> u32 {
        self.session.accuracy()
    }

    pub fn progress_percent(&self) -> f64 {
        progress_percent(self.session.time_left, self.tuning.game_duration)
    }

    pub fn result_label(&self) -> String {
        result_label(self.session.score, self.accuracy(), self.session.wave)
    }

    /// Take the events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Preferences ===

    pub fn toggle_sound(&mut self) -> bool {
        self.prefs.toggle_sound(self.storage.as_mut())
    }

    pub fn toggle_haptics(&mut self) -> bool {
        self.prefs.toggle_haptics(self.storage.as_mut())
    }

    pub fn set_motion_preference(&mut self, motion: MotionPreference) {
        self.prefs.set_motion(motion, self.storage.as_mut());
    }

    // === Transitions ===

    /// Start (or replay) a session. No-op while already running.
    pub fn start(&mut self) -> bool {
        if self.session.is_running() {
            return false;
        }

        self.clock.cancel_all();
        self.timers = RunTimers::default();
        self.shake_timer = None;
        self.flash_timer = None;
        self.arena_shaking = false;
        self.last_hit_at = None;
        self.wave_spawn_queued = false;

        let mobile_like = self.device.is_mobile_like();
        let count = self.tuning.base_bug_count(mobile_like);

        let mut session = GameSession::new(self.tuning.game_duration);
        session.phase = GamePhase::Running;
        session.mobile_like = mobile_like;
        session.bugs = spawn_bugs(&mut self.rng, &mut self.next_bug_id, count, 1, mobile_like);
        self.session = session;

        self.timers.countdown = Some(
            self.clock
                .set_interval(TimerKind::Countdown, self.tuning.tick_ms),
        );
        self.timers.motion = Some(self.clock.set_interval(TimerKind::Motion, self.tuning.tick_ms));

        log::info!(
            "Hunt started: {} bugs ({})",
            count,
            if mobile_like { "mobile-like" } else { "desktop" }
        );
        self.set_flash("Hunt started".to_string());
        self.emit(GameEvent::Started {
            mobile_like,
            bug_count: count,
        });
        self.check_wave_escalation();
        true
    }

    /// Close the game: drop the session and every pending timer
    pub fn close(&mut self) {
        self.clock.cancel_all();
        self.timers = RunTimers::default();
        self.shake_timer = None;
        self.flash_timer = None;
        self.arena_shaking = false;
        self.flash = None;
        self.last_hit_at = None;
        self.wave_spawn_queued = false;
        self.session = GameSession::new(self.tuning.game_duration);
        log::info!("Hunt closed");
        self.emit(GameEvent::Closed);
    }

    /// Running -> Finished. Shared by the countdown and the miss penalty;
    /// only the first caller gets through.
    fn finish(&mut self) {
        if !self.session.is_running() {
            return;
        }
        self.session.phase = GamePhase::Finished;

        for id in [
            self.timers.countdown.take(),
            self.timers.motion.take(),
            self.timers.wave_spawn.take(),
            self.timers.combo_decay.take(),
        ]
        .into_iter()
        .flatten()
        {
            self.clock.cancel(id);
        }
        self.wave_spawn_queued = false;

        let score = self.session.score;
        let new_best = self.best.record(score, self.storage.as_mut());
        if new_best {
            self.set_flash("New high score unlocked".to_string());
        }

        log::info!(
            "Hunt finished: score {}, wave {}, accuracy {}%",
            score,
            self.session.wave,
            self.accuracy()
        );
        self.emit(GameEvent::Finished { score, new_best });

        if self.motion_enabled() && score >= self.tuning.celebration_score {
            if let Some(celebration) = self.celebration.as_mut() {
                if let Err(e) = celebration.launch(feedback::celebration_particles(score)) {
                    log::debug!("Celebration skipped: {}", e);
                }
            }
        }
    }

    // === Input ===

    /// Handle a pointer-down. Returns true if it counted as a hit or miss.
    pub fn pointer_down(&mut self, input: &PointerInput) -> bool {
        match resolve_pointer(input) {
            Some(Strike::Hit(id)) => self.hit(id),
            Some(Strike::Miss) => self.miss(),
            None => false,
        }
    }

    /// Handle a key press. Returns true if the key was consumed.
    pub fn key_down(&mut self, key: &str) -> bool {
        match key {
            "Escape" => {
                self.close();
                true
            }
            "Enter" | " " if !self.session.is_running() => self.start(),
            _ => false,
        }
    }

    /// Handle a key press on a focused bug. Enter and Space squash it.
    /// Returns true if the key was consumed.
    pub fn bug_key_down(&mut self, id: BugId, key: &str) -> bool {
        match key {
            "Enter" | " " => self.hit(id),
            _ => false,
        }
    }

    /// Squash a bug. Ignored unless running and the bug is live.
    pub fn hit(&mut self, id: BugId) -> bool {
        if !self.session.is_running() {
            return false;
        }
        let Some(bug) = self
            .session
            .bugs
            .iter_mut()
            .find(|b| b.id == id && !b.squashed)
        else {
            return false;
        };
        bug.squashed = true;
        let variant = bug.variant();

        let now = self.clock.now();
        let combo = next_combo(
            self.session.combo,
            self.last_hit_at,
            now,
            self.tuning.combo_window_ms,
        );
        self.last_hit_at = Some(now);
        self.session.combo = combo;

        let gained = hit_score(variant.points, combo);
        self.session.score += gained;
        self.session.hits += 1;

        if variant.bonus_time > 0.0 {
            self.session.time_left = award_time(
                self.session.time_left,
                variant.bonus_time,
                self.tuning.max_time_cap,
            );
            self.set_flash(format!("+{:.1}s bonus bug", variant.bonus_time));
        } else if combo > 1 {
            self.set_flash(format!("Combo x{}", combo));
        }

        log::debug!("{} squashed: +{} (combo {})", variant.name, gained, combo);
        self.emit(GameEvent::Hit {
            bug: id,
            variant: variant.id,
            combo,
            gained,
            bonus_time: variant.bonus_time,
        });

        if let Some(old) = self.timers.combo_decay.take() {
            self.clock.cancel(old);
        }
        self.timers.combo_decay = Some(self.clock.set_timeout(
            TimerKind::ComboDecay,
            self.tuning.combo_window_ms + self.tuning.combo_decay_grace_ms,
        ));

        self.check_wave_escalation();
        true
    }

    /// Press on empty arena: lose the combo and some time
    pub fn miss(&mut self) -> bool {
        if !self.session.is_running() {
            return false;
        }

        self.session.combo = 0;
        self.session.misses += 1;
        if let Some(old) = self.timers.combo_decay.take() {
            self.clock.cancel(old);
        }

        let penalty = self.tuning.miss_penalty;
        self.session.time_left = drain_time(self.session.time_left, penalty);

        if let Some(old) = self.shake_timer.take() {
            self.clock.cancel(old);
        }
        self.arena_shaking = true;
        self.shake_timer = Some(
            self.clock
                .set_timeout(TimerKind::ArenaShake, self.tuning.arena_shake_ms),
        );

        self.set_flash(format!("Miss! -{:.1}s", penalty));
        log::debug!("Miss, {:.2}s left", self.session.time_left);
        self.emit(GameEvent::Miss {
            time_left: self.session.time_left,
        });

        if self.session.time_left <= 0.0 {
            self.finish();
        }
        true
    }

    // === Clock ===

    /// Advance virtual time by a frame delta (ms). Deltas above
    /// `max_frame_ms` are clipped so a suspended tab resumes where it left off.
    pub fn advance(&mut self, dt_ms: f64) {
        if !dt_ms.is_finite() || dt_ms <= 0.0 {
            return;
        }
        let until = self.clock.now() + dt_ms.min(self.tuning.max_frame_ms);
        while let Some((_, kind)) = self.clock.pop_due(until) {
            self.fire(kind);
        }
        self.clock.settle(until);
    }

    fn fire(&mut self, kind: TimerKind) {
        match kind {
            TimerKind::Countdown => {
                if !self.session.is_running() {
                    return;
                }
                self.session.time_left =
                    drain_time(self.session.time_left, self.tuning.tick_seconds());
                if self.session.time_left <= 0.0 {
                    self.finish();
                }
            }
            TimerKind::Motion => {
                if self.session.is_running() {
                    step_bugs(&mut self.session.bugs);
                }
            }
            TimerKind::WaveSpawn => {
                self.timers.wave_spawn = None;
                self.wave_spawn_queued = false;
                if self.session.is_running() {
                    self.spawn_wave();
                }
            }
            TimerKind::ComboDecay => {
                self.timers.combo_decay = None;
                if !self.session.is_running() || self.session.combo == 0 {
                    return;
                }
                let idle = self
                    .last_hit_at
                    .map(|last| self.clock.now() - last)
                    .unwrap_or(f64::INFINITY);
                if idle >= self.tuning.combo_window_ms {
                    self.session.combo = 0;
                    self.emit(GameEvent::ComboLost);
                }
            }
            TimerKind::ArenaShake => {
                self.shake_timer = None;
                self.arena_shaking = false;
            }
            TimerKind::FlashClear => {
                self.flash_timer = None;
                self.flash = None;
            }
        }
    }

    /// Queue the next wave once few enough bugs are left
    fn check_wave_escalation(&mut self) {
        if !self.session.is_running() || self.wave_spawn_queued {
            return;
        }
        if self.session.live_count() > self.tuning.wave_spawn_threshold {
            return;
        }
        self.wave_spawn_queued = true;
        self.timers.wave_spawn = Some(
            self.clock
                .set_timeout(TimerKind::WaveSpawn, self.tuning.wave_spawn_delay_ms),
        );
    }

    fn spawn_wave(&mut self) {
        let wave = self.session.wave + 1;
        let mobile_like = self.session.mobile_like;
        let count = extra_bugs_for_wave(wave, mobile_like);

        self.session.wave = wave;
        self.session.bugs.retain(|b| !b.squashed);
        let fresh = spawn_bugs(
            &mut self.rng,
            &mut self.next_bug_id,
            count,
            wave,
            mobile_like,
        );
        self.session.bugs.extend(fresh);

        log::info!("Wave {}: +{} bugs", wave, count);
        self.set_flash(format!("Wave {}", wave));
        self.emit(GameEvent::WaveSpawned { wave, count });
        self.check_wave_escalation();
    }

    // === Helpers ===

    fn set_flash(&mut self, message: String) {
        self.flash = Some(message);
        if let Some(old) = self.flash_timer.take() {
            self.clock.cancel(old);
        }
        self.flash_timer = Some(
            self.clock
                .set_timeout(TimerKind::FlashClear, self.tuning.flash_message_ms),
        );
    }

    fn emit(&mut self, event: GameEvent) {
        if let Some(cue) = feedback::cue_for(&event, self.tuning.celebration_score) {
            self.feedback.emit(&cue, &self.prefs);
        }
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::Recorder;
    use crate::persistence::{BEST_SCORE_KEY, MemoryStore};
    use crate::platform::FixedDevice;
    use crate::sim::{PointerTarget, VariantId};

    fn game_with(store: MemoryStore, recorder: &Recorder) -> Game {
        let caps = Capabilities::headless()
            .with_storage(store)
            .with_audio(recorder.clone())
            .with_haptics(recorder.clone())
            .with_celebration(recorder.clone());
        Game::new(42, caps)
    }

    fn run_ms(game: &mut Game, ms: f64) {
        let mut left = ms;
        while left > 0.0 {
            let step = left.min(16.0);
            game.advance(step);
            left -= step;
        }
    }

    fn first_live(game: &Game) -> BugId {
        game.session()
            .live_bugs()
            .next()
            .map(|b| b.id)
            .expect("live bug")
    }

    #[test]
    fn test_start_resets_and_spawns() {
        let recorder = Recorder::new();
        let mut game = game_with(MemoryStore::new(), &recorder);
        assert_eq!(game.phase(), GamePhase::Idle);

        assert!(game.start());
        let session = game.session();
        assert_eq!(session.phase, GamePhase::Running);
        assert_eq!(session.bugs.len(), 12);
        assert_eq!(session.time_left, 25.0);
        assert_eq!(session.wave, 1);
        assert_eq!(game.flash_message(), Some("Hunt started"));
        assert_eq!(recorder.haptics(), vec![vec![12]]);

        // Already running
        assert!(!game.start());
    }

    #[test]
    fn test_mobile_like_start() {
        let caps = Capabilities::headless().with_device(FixedDevice::mobile());
        let mut game = Game::new(3, caps);
        game.start();
        assert!(game.session().mobile_like);
        assert_eq!(game.session().bugs.len(), 9);
        assert!(game.session().bugs.iter().all(|b| b.size >= 26));
    }

    #[test]
    fn test_actions_ignored_unless_running() {
        let recorder = Recorder::new();
        let mut game = game_with(MemoryStore::new(), &recorder);
        assert!(!game.miss());
        assert!(!game.hit(BugId(1)));
        game.advance(500.0);
        assert_eq!(game.session().misses, 0);
        assert_eq!(game.session().time_left, 25.0);
    }

    #[test]
    fn test_countdown_ticks() {
        let mut game = game_with(MemoryStore::new(), &Recorder::new());
        game.start();
        game.advance(33.0);
        assert_eq!(game.session().time_left, 24.97);
        game.advance(33.0);
        assert_eq!(game.session().time_left, 24.94);
    }

    #[test]
    fn test_hit_scores_and_squashes_once() {
        let mut game = game_with(MemoryStore::new(), &Recorder::new());
        game.start();
        let id = first_live(&game);
        let points = game.session().bug(id).map(|b| b.variant().points).unwrap_or(0) as u64;

        assert!(game.pointer_down(&PointerInput::mouse(PointerTarget::Bug(id))));
        assert_eq!(game.session().score, points);
        assert_eq!(game.session().combo, 1);
        assert_eq!(game.session().hits, 1);
        assert_eq!(game.session().misses, 0);

        // Squashed bugs do not score again
        assert!(!game.hit(id));
        assert_eq!(game.session().hits, 1);
    }

    #[test]
    fn test_miss_penalty_and_shake() {
        let recorder = Recorder::new();
        let mut game = game_with(MemoryStore::new(), &recorder);
        game.start();
        recorder.clear();

        assert!(game.pointer_down(&PointerInput::mouse(PointerTarget::Arena)));
        assert_eq!(game.session().time_left, 23.8);
        assert_eq!(game.session().misses, 1);
        assert!(game.arena_shaking());
        assert_eq!(game.flash_message(), Some("Miss! -1.2s"));
        assert_eq!(recorder.haptics(), vec![vec![24]]);

        run_ms(&mut game, 200.0);
        assert!(!game.arena_shaking());
    }

    #[test]
    fn test_secondary_button_is_ignored() {
        let mut game = game_with(MemoryStore::new(), &Recorder::new());
        game.start();
        let mut input = PointerInput::mouse(PointerTarget::Arena);
        input.button = 2;
        assert!(!game.pointer_down(&input));
        assert_eq!(game.session().misses, 0);
    }

    #[test]
    fn test_combo_decays_after_window() {
        let mut game = game_with(MemoryStore::new(), &Recorder::new());
        game.start();
        game.hit(first_live(&game));
        assert_eq!(game.session().combo, 1);

        run_ms(&mut game, 900.0);
        assert_eq!(game.session().combo, 1);
        run_ms(&mut game, 60.0);
        assert_eq!(game.session().combo, 0);
        assert!(game.drain_events().contains(&GameEvent::ComboLost));
    }

    #[test]
    fn test_wave_spawns_after_debounce() {
        let mut game = game_with(MemoryStore::new(), &Recorder::new());
        game.start();
        while game.session().live_count() > 3 {
            game.hit(first_live(&game));
        }
        assert_eq!(game.session().wave, 1);

        // Another hit while queued must not queue a second wave
        game.hit(first_live(&game));
        run_ms(&mut game, 80.0);

        assert_eq!(game.session().wave, 2);
        assert_eq!(game.session().live_count(), 2 + extra_bugs_for_wave(2, false));
        assert!(game.session().bugs.iter().all(|b| !b.squashed));
        assert_eq!(game.flash_message(), Some("Wave 2"));

        run_ms(&mut game, 500.0);
        assert_eq!(game.session().wave, 2);
    }

    #[test]
    fn test_gold_bonus_time_capped() {
        let tuning = Tuning {
            game_duration: 34.5,
            ..Tuning::default()
        };
        // Find a seed whose first wave has a gold bug
        for seed in 0..200 {
            let mut game = Game::with_tuning(seed, Capabilities::headless(), tuning.clone())
                .expect("valid tuning");
            game.start();
            let gold = game
                .session()
                .live_bugs()
                .find(|b| b.variant == VariantId::Gold)
                .map(|b| b.id);
            if let Some(id) = gold {
                game.hit(id);
                assert_eq!(game.session().time_left, 35.0);
                assert_eq!(game.flash_message(), Some("+1.7s bonus bug"));
                return;
            }
        }
        panic!("no gold bug in 200 seeds");
    }

    #[test]
    fn test_time_out_finishes_once_and_records_best() {
        let store = MemoryStore::new();
        let recorder = Recorder::new();
        let mut game = game_with(store.clone(), &recorder);
        game.start();
        game.hit(first_live(&game));
        let score = game.session().score;

        run_ms(&mut game, 40_000.0);
        assert_eq!(game.phase(), GamePhase::Finished);
        assert_eq!(game.session().time_left, 0.0);
        assert_eq!(game.best_score(), score);
        assert_eq!(store.peek(BEST_SCORE_KEY), Some(score.to_string()));

        let finishes = game
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::Finished { .. }))
            .count();
        assert_eq!(finishes, 1);
        // Low score: no celebration
        assert!(recorder.celebrations().is_empty());
        // Only the flash timer may outlive the run
        assert!(game.pending_timers() <= 1);
    }

    #[test]
    fn test_celebration_needs_motion_and_score() {
        let tuning = Tuning {
            celebration_score: 1,
            ..Tuning::default()
        };
        let recorder = Recorder::new();
        let caps = Capabilities::headless().with_celebration(recorder.clone());
        let mut game = Game::with_tuning(5, caps, tuning.clone()).expect("valid tuning");
        game.start();
        game.hit(first_live(&game));
        run_ms(&mut game, 40_000.0);
        assert_eq!(recorder.celebrations().len(), 1);

        let recorder = Recorder::new();
        let caps = Capabilities::headless()
            .with_celebration(recorder.clone())
            .with_device(FixedDevice {
                mobile_like: false,
                reduce_motion: true,
            });
        let mut game = Game::with_tuning(5, caps, tuning).expect("valid tuning");
        game.start();
        game.hit(first_live(&game));
        run_ms(&mut game, 40_000.0);
        assert!(recorder.celebrations().is_empty());
    }

    #[test]
    fn test_keyboard_controls() {
        let mut game = game_with(MemoryStore::new(), &Recorder::new());
        assert!(game.key_down("Enter"));
        assert_eq!(game.phase(), GamePhase::Running);
        assert!(!game.key_down(" "));
        assert!(!game.key_down("a"));
        assert!(game.key_down("Escape"));
        assert_eq!(game.phase(), GamePhase::Idle);
        assert!(game.key_down(" "));
        assert_eq!(game.phase(), GamePhase::Running);
    }

    #[test]
    fn test_enter_or_space_on_focused_bug_squashes_it() {
        let mut game = game_with(MemoryStore::new(), &Recorder::new());
        let id = BugId(1);
        assert!(!game.bug_key_down(id, "Enter"));

        game.start();
        let bugs: Vec<_> = game.session().live_bugs().map(|b| b.id).collect();
        assert!(!game.bug_key_down(bugs[0], "a"));
        assert!(game.bug_key_down(bugs[0], "Enter"));
        assert!(game.bug_key_down(bugs[1], " "));
        assert_eq!(game.session().hits, 2);
        assert_eq!(game.session().misses, 0);

        // Already squashed
        assert!(!game.bug_key_down(bugs[0], "Enter"));
        assert_eq!(game.session().hits, 2);
    }

    #[test]
    fn test_with_tuning_rejects_invalid_overrides() {
        let too_long = Tuning {
            game_duration: 40.0,
            ..Tuning::default()
        };
        assert!(matches!(
            Game::with_tuning(1, Capabilities::headless(), too_long),
            Err(TuningError::DurationAboveCap { .. })
        ));

        let stalled = Tuning {
            tick_ms: 0.0,
            ..Tuning::default()
        };
        assert!(matches!(
            Game::with_tuning(1, Capabilities::headless(), stalled),
            Err(TuningError::NotPositive { field: "tick_ms", .. })
        ));
    }

    #[test]
    fn test_toggles_persist() {
        let store = MemoryStore::new();
        let mut game = game_with(store.clone(), &Recorder::new());
        assert!(!game.toggle_sound());
        assert!(!game.toggle_haptics());
        game.set_motion_preference(MotionPreference::Off);
        assert!(!game.motion_enabled());

        let reopened = game_with(store, &Recorder::new());
        assert!(!reopened.preferences().sound_enabled);
        assert!(!reopened.preferences().haptics_enabled);
        assert_eq!(reopened.preferences().motion, MotionPreference::Off);
    }

    #[test]
    fn test_advance_ignores_bad_deltas_and_clips_long_frames() {
        let mut game = game_with(MemoryStore::new(), &Recorder::new());
        game.start();
        game.advance(f64::NAN);
        game.advance(-5.0);
        assert_eq!(game.now(), 0.0);

        game.advance(10_000.0);
        assert_eq!(game.now(), 100.0);
        assert_eq!(game.session().time_left, 24.91);
    }
}

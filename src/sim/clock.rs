//! Virtual-time timer scheduler
//!
//! Replaces host intervals/timeouts so the session can be driven
//! synchronously. The host only supplies elapsed time; timers fire in due
//! order (ties in registration order) and never outlive a `cancel`.

/// Handle for a pending timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// What a timer is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Interval: decrements time_left
    Countdown,
    /// Interval: moves bugs
    Motion,
    /// Timeout: spawns the queued wave
    WaveSpawn,
    /// Timeout: drops the combo after the window lapses
    ComboDecay,
    /// Timeout: clears the miss shake
    ArenaShake,
    /// Timeout: clears the flash message
    FlashClear,
}

#[derive(Debug, Clone)]
struct Timer {
    id: TimerId,
    kind: TimerKind,
    due: f64,
    /// Re-arm period for intervals
    period: Option<f64>,
}

/// Deterministic timer queue over a virtual millisecond clock
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now: f64,
    next_id: u64,
    timers: Vec<Timer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time (ms)
    pub fn now(&self) -> f64 {
        self.now
    }

    fn push(&mut self, kind: TimerKind, delay: f64, period: Option<f64>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            kind,
            due: self.now + delay.max(0.0),
            period,
        });
        id
    }

    /// Fire `kind` every `period` ms until cancelled
    pub fn set_interval(&mut self, kind: TimerKind, period: f64) -> TimerId {
        // A zero period would never let `pop_due` drain
        let period = period.max(1.0);
        self.push(kind, period, Some(period))
    }

    /// Fire `kind` once after `delay` ms
    pub fn set_timeout(&mut self, kind: TimerKind, delay: f64) -> TimerId {
        self.push(kind, delay, None)
    }

    /// Cancel a timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Cancel every pending timer
    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    /// Number of pending timers
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to
    /// its due time. Intervals are re-armed before returning.
    pub fn pop_due(&mut self, until: f64) -> Option<(TimerId, TimerKind)> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= until)
            .min_by(|(_, a), (_, b)| {
                a.due
                    .partial_cmp(&b.due)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.id.0.cmp(&b.id.0))
            })
            .map(|(i, _)| i)?;

        let timer = &mut self.timers[idx];
        self.now = self.now.max(timer.due);
        let fired = (timer.id, timer.kind);
        match timer.period {
            Some(period) => timer.due += period,
            None => {
                self.timers.swap_remove(idx);
            }
        }
        Some(fired)
    }

    /// Move the clock to `until` once nothing more is due
    pub fn settle(&mut self, until: f64) {
        self.now = self.now.max(until);
    }
}

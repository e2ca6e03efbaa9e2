//! Single-slot cooperative debounce timer.
//!
//! The scheduler never spawns threads or owns a clock. The host event loop reports edits through
//! [`DebounceScheduler::notify`] and calls [`DebounceScheduler::poll`] from its idle/timer hook;
//! a pass fires once the configured delay has elapsed since the most recent edit.

use std::time::{Duration, Instant};
use tracing::warn;

/// Longest idle delay a scheduler accepts; longer delays are clamped.
pub const MAX_DELAY: Duration = Duration::from_secs(60);

/// Scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    /// Nothing scheduled.
    Idle,
    /// A pass is scheduled.
    Pending {
        /// When the pass becomes due.
        deadline: Instant,
        /// Arm counter value at scheduling time.
        generation: u64,
    },
}

/// Coalesces bursts of text-change events into a single deferred pass.
#[derive(Debug, Clone)]
pub struct DebounceScheduler {
    delay: Duration,
    state: DebounceState,
    generation: u64,
}

impl DebounceScheduler {
    /// Create an idle scheduler with the given idle delay, clamped to [`MAX_DELAY`].
    pub fn new(delay: Duration) -> Self {
        if delay > MAX_DELAY {
            warn!(?delay, max = ?MAX_DELAY, "debounce delay clamped");
        }
        let delay = delay.min(MAX_DELAY);
        Self {
            delay,
            state: DebounceState::Idle,
            generation: 0,
        }
    }

    /// The idle delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Current state.
    pub fn state(&self) -> DebounceState {
        self.state
    }

    /// Returns `true` while a pass is scheduled.
    pub fn is_pending(&self) -> bool {
        matches!(self.state, DebounceState::Pending { .. })
    }

    /// Record a text change at `now`.
    ///
    /// Any not-yet-fired deadline is replaced. Returns the new arm generation.
    pub fn notify(&mut self, now: Instant) -> u64 {
        self.generation += 1;
        let deadline = now.checked_add(self.delay).unwrap_or(now);
        self.state = DebounceState::Pending {
            deadline,
            generation: self.generation,
        };
        self.generation
    }

    /// Returns `true` exactly once per armed deadline, when `now` has reached it.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.state {
            DebounceState::Pending { deadline, .. } if now >= deadline => {
                self.state = DebounceState::Idle;
                true
            }
            _ => false,
        }
    }

    /// Time left until the pending pass is due, or `None` when idle.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        match self.state {
            DebounceState::Pending { deadline, .. } => Some(deadline.saturating_duration_since(now)),
            DebounceState::Idle => None,
        }
    }
}

impl Default for DebounceScheduler {
    fn default() -> Self {
        Self::new(Duration::from_millis(1500))
    }
}

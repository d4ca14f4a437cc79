//! Phase-stable alarm timer.
//!
//! [`AlarmTimer`] tracks an absolute next-trigger time instead of a
//! countdown. Polling late, or not polling at all for several periods,
//! never shifts the phase of the signal: the next trigger always lands on
//! `start + k * duration`.

use super::clock::SharedClock;
use std::fmt;
use tracing::warn;

/// One-shot or periodic alarm driven by a [`SharedClock`].
///
/// # Example
///
/// ```rust
/// use tickfsm::core::{AlarmTimer, ManualClock};
///
/// let clock = ManualClock::new();
/// let mut timer = AlarmTimer::new(clock.shared(), 100);
/// timer.start();
///
/// clock.set(99);
/// assert!(!timer.elapsed());
///
/// // Polled late: fires once, next trigger stays on the 100 ms grid
/// clock.set(350);
/// assert!(timer.elapsed());
/// assert_eq!(timer.next_trigger(), 400);
/// assert!(!timer.elapsed());
/// ```
pub struct AlarmTimer {
    clock: SharedClock,
    duration: u64,
    running: bool,
    next_trigger: u64,
}

impl AlarmTimer {
    /// Create a stopped timer with the given period in milliseconds.
    pub fn new(clock: SharedClock, duration: u64) -> Self {
        Self {
            clock,
            duration,
            running: false,
            next_trigger: 0,
        }
    }

    /// Arm the timer: the first trigger is one full duration from now.
    ///
    /// A zero-duration timer cannot run; it stays stopped and never
    /// elapses.
    pub fn start(&mut self) {
        if self.duration == 0 {
            warn!("refusing to start alarm timer with zero duration");
            self.running = false;
            return;
        }
        self.next_trigger = self.now().saturating_add(self.duration);
        self.running = true;
    }

    /// Same as [`start`](Self::start).
    pub fn reset(&mut self) {
        self.start();
    }

    /// Disarm the timer. The pending trigger time is kept.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Returns true once per period boundary crossed since the last poll.
    ///
    /// Any number of missed periods collapses into a single `true`, and
    /// the next trigger is moved to the first boundary strictly after now.
    pub fn elapsed(&mut self) -> bool {
        if !self.running || self.duration == 0 {
            return false;
        }

        let now = self.now();
        if now < self.next_trigger {
            return false;
        }

        let missed = (now - self.next_trigger) / self.duration + 1;
        self.next_trigger = self
            .next_trigger
            .saturating_add(missed.saturating_mul(self.duration));
        true
    }

    /// Change the period.
    ///
    /// While running this is a resynchronisation point: the next trigger
    /// becomes `now + duration`, dropping the old phase. Setting a zero
    /// duration on a running timer stops it.
    pub fn set_duration(&mut self, duration: u64) {
        self.duration = duration;
        if !self.running {
            return;
        }
        if duration == 0 {
            warn!("zero duration set on running alarm timer, stopping it");
            self.running = false;
            return;
        }
        self.next_trigger = self.now().saturating_add(duration);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn duration(&self) -> u64 {
        self.duration
    }

    /// Absolute time of the next trigger, as last computed.
    pub fn next_trigger(&self) -> u64 {
        self.next_trigger
    }

    /// Milliseconds until the next trigger, or `None` when stopped.
    pub fn remaining(&self) -> Option<u64> {
        self.running
            .then(|| self.next_trigger.saturating_sub(self.now()))
    }

    fn now(&self) -> u64 {
        self.clock.now_millis()
    }
}

impl fmt::Debug for AlarmTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlarmTimer")
            .field("duration", &self.duration)
            .field("running", &self.running)
            .field("next_trigger", &self.next_trigger)
            .finish()
    }
}

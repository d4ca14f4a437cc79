//! Millisecond clocks driving every timer in the engine.
//!
//! The engine never reads time directly. Timers hold a [`SharedClock`]
//! handle and query it when started or polled, so the same machine can run
//! against the platform clock or a simulated one.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Monotonic millisecond time source.
///
/// Implementations must never go backwards. Wrapping is not handled: a
/// `u64` millisecond counter outlives any realistic uptime.
pub trait Clock {
    /// Milliseconds elapsed since an arbitrary, fixed origin.
    fn now_millis(&self) -> u64;
}

/// Handle to the clock shared by all timers of one execution context.
pub type SharedClock = Rc<dyn Clock>;

/// Clock backed by [`std::time::Instant`], counting from its construction.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Wrap a fresh system clock into a [`SharedClock`].
    pub fn shared() -> SharedClock {
        Rc::new(Self::new())
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        millis_saturating(self.origin.elapsed())
    }
}

fn millis_saturating(elapsed: std::time::Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// Simulated clock advanced explicitly by the caller.
///
/// Clones share the same underlying time, so a test can keep one handle
/// while the engine holds another.
///
/// # Example
///
/// ```rust
/// use tickfsm::core::{Clock, ManualClock};
///
/// let clock = ManualClock::new();
/// let engine_side = clock.shared();
///
/// clock.advance(250);
/// assert_eq!(engine_side.now_millis(), 250);
///
/// clock.set(1_000);
/// assert_eq!(engine_side.now_millis(), 1_000);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    /// Create a clock reading zero.
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Create a clock reading `millis`.
    pub fn starting_at(millis: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(millis)),
        }
    }

    /// Jump to an absolute time. Moving backwards is ignored.
    pub fn set(&self, millis: u64) {
        if millis >= self.now.get() {
            self.now.set(millis);
        }
    }

    /// Move time forward by `millis`.
    pub fn advance(&self, millis: u64) {
        self.now.set(self.now.get().saturating_add(millis));
    }

    /// A [`SharedClock`] handle observing this clock.
    pub fn shared(&self) -> SharedClock {
        Rc::new(self.clone())
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.get()
    }
}

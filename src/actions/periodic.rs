//! Periodic, optionally delayed and bounded action.

use super::Action;
use crate::config::PeriodicActionConfig;
use crate::core::{AlarmTimer, SharedClock};
use std::fmt;
use tracing::debug;

/// Runs a task every `period` milliseconds.
///
/// Without a delay the first call to [`execute`](Action::execute) runs the
/// task immediately. With a delay the first run happens once the delay has
/// passed, and every later run one period after the previous one. A
/// bounded action stops after its last execution.
///
/// # Example
///
/// ```rust
/// use tickfsm::actions::{Action, PeriodicAction};
/// use tickfsm::core::ManualClock;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let clock = ManualClock::new();
/// let runs = Rc::new(Cell::new(0));
/// let counter = Rc::clone(&runs);
/// let mut blink = PeriodicAction::new(clock.shared(), 500, move || {
///     counter.set(counter.get() + 1)
/// })
/// .with_executions(2);
///
/// blink.execute(); // runs at t = 0
/// clock.set(500);
/// blink.execute(); // runs at t = 500
/// clock.set(1_000);
/// blink.execute(); // bounded: nothing left
///
/// assert_eq!(runs.get(), 2);
/// assert!(blink.is_finished());
/// ```
pub struct PeriodicAction {
    name: String,
    task: Box<dyn FnMut()>,
    timer: AlarmTimer,
    period: u64,
    delay: u64,
    remaining: Option<u32>,
    first_pending: bool,
    delay_pending: bool,
}

impl PeriodicAction {
    pub fn new<F>(clock: SharedClock, period: u64, task: F) -> Self
    where
        F: FnMut() + 'static,
    {
        Self {
            name: "periodic".to_string(),
            task: Box::new(task),
            timer: AlarmTimer::new(clock, period),
            period,
            delay: 0,
            remaining: None,
            first_pending: true,
            delay_pending: false,
        }
    }

    /// Build from a config entry; the entry's name becomes the action's.
    pub fn from_config<F>(
        clock: SharedClock,
        name: impl Into<String>,
        config: &PeriodicActionConfig,
        task: F,
    ) -> Self
    where
        F: FnMut() + 'static,
    {
        let action = Self::new(clock, config.period_ms, task)
            .named(name)
            .with_delay(config.delay_ms);
        match config.executions {
            Some(count) => action.with_executions(count),
            None => action,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Wait `millis` before the first execution.
    pub fn with_delay(mut self, millis: u64) -> Self {
        self.delay = millis;
        self.delay_pending = millis > 0;
        self
    }

    /// Run exactly `count` times, then finish.
    pub fn with_executions(mut self, count: u32) -> Self {
        self.remaining = Some(count);
        self
    }

    /// True while a bounded action still has executions left.
    pub fn is_running(&self) -> bool {
        self.remaining.is_some_and(|count| count > 0)
    }

    /// Executions left, `None` for an unbounded action.
    pub fn remaining_executions(&self) -> Option<u32> {
        self.remaining
    }

    pub fn period(&self) -> u64 {
        self.period
    }

    pub fn delay(&self) -> u64 {
        self.delay
    }

    pub fn timer(&self) -> &AlarmTimer {
        &self.timer
    }

    fn fire(&mut self) {
        (self.task)();
        if let Some(count) = self.remaining.as_mut() {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.timer.stop();
                debug!(action = %self.name, "bounded action finished");
            }
        }
    }
}

impl Action for PeriodicAction {
    fn execute(&mut self) {
        if self.remaining == Some(0) {
            return;
        }

        if self.first_pending {
            self.first_pending = false;
            if self.delay == 0 {
                self.fire();
                if !self.is_finished() {
                    self.timer.start();
                }
                return;
            }
            self.timer.set_duration(self.delay);
            self.timer.start();
        }

        if self.timer.elapsed() {
            self.fire();
            if self.is_finished() {
                return;
            }
            if self.delay_pending {
                self.delay_pending = false;
                self.timer.set_duration(self.period);
            }
            self.timer.start();
        }
    }

    fn is_finished(&self) -> bool {
        self.remaining == Some(0)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for PeriodicAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeriodicAction")
            .field("name", &self.name)
            .field("period", &self.period)
            .field("delay", &self.delay)
            .field("remaining", &self.remaining)
            .field("timer", &self.timer)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Clock, ManualClock};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording(clock: &ManualClock, period: u64) -> (PeriodicAction, Rc<RefCell<Vec<u64>>>) {
        let runs = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&runs);
        let at = clock.clone();
        let action = PeriodicAction::new(clock.shared(), period, move || {
            sink.borrow_mut().push(at.now_millis())
        });
        (action, runs)
    }

    #[test]
    fn runs_immediately_without_delay() {
        let clock = ManualClock::new();
        let (mut action, runs) = recording(&clock, 100);

        action.execute();
        clock.set(50);
        action.execute();
        clock.set(100);
        action.execute();

        assert_eq!(*runs.borrow(), vec![0, 100]);
    }

    #[test]
    fn delayed_first_run_then_periodic() {
        let clock = ManualClock::new();
        let (action, runs) = recording(&clock, 100);
        let mut action = action.with_delay(250);

        for t in [0, 100, 249, 250, 300, 349, 350, 450] {
            clock.set(t);
            action.execute();
        }

        assert_eq!(*runs.borrow(), vec![250, 350, 450]);
        assert_eq!(action.timer().duration(), 100);
    }

    #[test]
    fn bounded_action_runs_exactly_n_times() {
        let clock = ManualClock::new();
        let (action, runs) = recording(&clock, 10);
        let mut action = action.with_executions(3);

        for t in (0..200).step_by(5) {
            clock.set(t);
            action.execute();
        }

        assert_eq!(runs.borrow().len(), 3);
        assert!(action.is_finished());
        assert!(!action.is_running());
        assert!(!action.timer().is_running());
    }

    #[test]
    fn zero_executions_never_runs() {
        let clock = ManualClock::new();
        let (action, runs) = recording(&clock, 10);
        let mut action = action.with_executions(0);

        action.execute();

        assert!(runs.borrow().is_empty());
        assert!(action.is_finished());
    }

    #[test]
    fn unbounded_action_is_never_finished() {
        let clock = ManualClock::new();
        let (mut action, _) = recording(&clock, 10);

        action.execute();

        assert!(!action.is_finished());
        assert!(!action.is_running());
        assert_eq!(action.remaining_executions(), None);
    }

    #[test]
    fn from_config_applies_all_fields() {
        let clock = ManualClock::new();
        let config = PeriodicActionConfig {
            period_ms: 40,
            delay_ms: 10,
            executions: Some(2),
        };

        let action = PeriodicAction::from_config(clock.shared(), "led", &config, || {});

        assert_eq!(action.name(), "led");
        assert_eq!(action.period(), 40);
        assert_eq!(action.delay(), 10);
        assert_eq!(action.remaining_executions(), Some(2));
    }
}

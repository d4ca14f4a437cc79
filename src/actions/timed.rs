//! One-shot delayed action.

use super::Action;
use crate::config::TimedActionConfig;
use crate::core::{AlarmTimer, SharedClock};
use std::fmt;

/// Runs a task once, `interval` milliseconds after its first execution.
///
/// The countdown starts on the first call to [`execute`](Action::execute),
/// not at construction, so an action added to a scheduler late still
/// waits its full interval.
pub struct TimedAction {
    name: String,
    task: Box<dyn FnMut()>,
    timer: AlarmTimer,
    executed: bool,
}

impl TimedAction {
    pub fn new<F>(clock: SharedClock, interval: u64, task: F) -> Self
    where
        F: FnMut() + 'static,
    {
        Self {
            name: "timed".to_string(),
            task: Box::new(task),
            timer: AlarmTimer::new(clock, interval),
            executed: false,
        }
    }

    pub fn from_config<F>(
        clock: SharedClock,
        name: impl Into<String>,
        config: &TimedActionConfig,
        task: F,
    ) -> Self
    where
        F: FnMut() + 'static,
    {
        Self::new(clock, config.interval_ms, task).named(name)
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn is_executed(&self) -> bool {
        self.executed
    }

    /// Arm the action again; the countdown restarts on the next execution.
    pub fn rearm(&mut self) {
        self.executed = false;
        self.timer.stop();
    }

    pub fn interval(&self) -> u64 {
        self.timer.duration()
    }
}

impl Action for TimedAction {
    fn execute(&mut self) {
        if self.executed {
            return;
        }
        if !self.timer.is_running() {
            self.timer.start();
        }
        if self.timer.elapsed() {
            (self.task)();
            self.executed = true;
            self.timer.stop();
        }
    }

    fn is_finished(&self) -> bool {
        self.executed
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for TimedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimedAction")
            .field("name", &self.name)
            .field("executed", &self.executed)
            .field("timer", &self.timer)
            .finish()
    }
}
